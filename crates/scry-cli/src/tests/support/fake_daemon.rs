//! Fake daemon for behavioural tests.
//!
//! A mock TCP server that accepts a single connection and serves scripted
//! responses: the i-th request line received is answered with the i-th
//! script's lines. Requests are recorded in arrival order so tests can
//! assert on dispatch ordering without a real daemon.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

pub(in crate::tests) struct FakeDaemon {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    result: Arc<Mutex<Option<Result<()>>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeDaemon {
    /// Spawns a fake daemon listening on an ephemeral TCP port.
    ///
    /// The daemon accepts one connection and answers each request with the
    /// corresponding script. Unused scripts are discarded when the client
    /// hangs up early.
    pub fn spawn(scripts: Vec<Vec<String>>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake daemon")?;
        listener
            .set_nonblocking(true)
            .context("fake daemon nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));
        let requests_clone = Arc::clone(&requests);
        let result_clone = Arc::clone(&result);
        let handle = thread::spawn(move || {
            let outcome = Self::serve_client(listener, scripts, requests_clone);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });
        Ok(Self {
            port,
            requests,
            result,
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the daemon thread to complete and returns all recorded
    /// requests in arrival order.
    pub fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake daemon thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake daemon result: {error}"))?
            .take()
        {
            outcome.context("fake daemon failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: TcpListener,
        scripts: Vec<Vec<String>>,
        requests: Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        let stream = match Self::accept_with_deadline(&listener)? {
            Some(stream) => stream,
            None => return Ok(()),
        };
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .context("set fake daemon read timeout")?;
        let mut writer = stream.try_clone().context("clone stream")?;
        let mut reader = BufReader::new(stream);

        for script in scripts {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => return Ok(()),
                Ok(_) => {}
                Err(ref error) if is_timeout(error) => return Ok(()),
                Err(error) => return Err(error).context("read command request"),
            }
            requests
                .lock()
                .map_err(|error| anyhow!("lock requests: {error}"))?
                .push(line);
            write_lines(&mut writer, &script).context("write response lines")?;
        }

        // Scripts exhausted: drain whatever else arrives until the client
        // hangs up, so unexpected extra requests show up in the recording.
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => return Ok(()),
                Ok(_) => {
                    requests
                        .lock()
                        .map_err(|error| anyhow!("lock requests: {error}"))?
                        .push(line);
                }
                Err(ref error) if is_timeout(error) => return Ok(()),
                Err(error) => return Err(error).context("drain requests"),
            }
        }
    }

    fn accept_with_deadline(listener: &TcpListener) -> Result<Option<TcpStream>> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match listener.accept() {
                Ok((stream, _)) => return Ok(Some(stream)),
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => {
                    // No connection arrived; exit cleanly so tests do not hang
                    // when the CLI aborts before connecting.
                    return Ok(None);
                }
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }
}

impl Drop for FakeDaemon {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

/// Writes lines to a stream, appending newlines and flushing.
fn write_lines(stream: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        stream.write_all(line.as_bytes())?;
        stream.write_all(b"\n")?;
    }
    stream.flush()
}
