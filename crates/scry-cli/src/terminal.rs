//! Terminal width detection for layout-aware daemon formatting.

/// Width reported to the daemon when no terminal is attached.
const FALLBACK_WIDTH: u32 = 1024;

/// Queries the controlling terminal's column count.
#[cfg(unix)]
pub(crate) fn terminal_width() -> u32 {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 {
        u32::from(size.ws_col)
    } else {
        FALLBACK_WIDTH
    }
}

#[cfg(not(unix))]
pub(crate) fn terminal_width() -> u32 {
    FALLBACK_WIDTH
}
