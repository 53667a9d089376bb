//! Precedence checks for the layered configuration loader.

use std::ffi::{OsStr, OsString};
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use scry_config::{Config, ExitPolicy, SocketEndpoint, default_socket_endpoint};

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct EnvOverride {
    key: &'static str,
    previous: Option<OsString>,
    guard: Option<MutexGuard<'static, ()>>,
}

impl EnvOverride {
    fn set_var(key: &'static str, value: &OsStr) -> Self {
        let guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        let previous = std::env::var_os(key);
        // Nightly currently marks environment mutation as unsafe while the API
        // stabilises; overrides are restored in Drop.
        unsafe { std::env::set_var(key, value) };
        Self {
            key,
            previous,
            guard: Some(guard),
        }
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { std::env::set_var(self.key, value) },
            None => unsafe { std::env::remove_var(self.key) },
        }
        drop(self.guard.take());
    }
}

#[test]
fn bare_invocation_applies_built_in_defaults() {
    let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
    let config = Config::load_from_iter(vec![OsString::from("scry")]).expect("load defaults");
    assert_eq!(config.daemon_socket(), &default_socket_endpoint());
    assert_eq!(config.exit_policy(), ExitPolicy::AnyZero);
}

#[test]
fn cli_flag_overrides_daemon_socket() {
    let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
    let args = vec![
        OsString::from("scry"),
        OsString::from("--daemon-socket"),
        OsString::from("tcp://127.0.0.1:9100"),
    ];
    let config = Config::load_from_iter(args).expect("load with CLI override");
    assert_eq!(
        config.daemon_socket(),
        &SocketEndpoint::tcp("127.0.0.1", 9100)
    );
}

#[test]
fn environment_overrides_exit_policy() {
    let _env = EnvOverride::set_var("SCRY_EXIT_POLICY", OsStr::new("completion"));
    let config = Config::load_from_iter(vec![OsString::from("scry")]).expect("load with env");
    assert_eq!(config.exit_policy(), ExitPolicy::Completion);
}
