use std::ffi::OsString;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes process-environment mutation. Configuration lookups read
/// `STELLWERK_*` variables, so tests that override them go through here.
pub struct EnvAdapter;

impl EnvAdapter {
    pub fn set_var(key: &str, value: &str) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var(key, value);
        }
    }

    pub fn remove_var(key: &str) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::remove_var(key);
        }
    }

    /// Override `key` until the returned guard is dropped, then restore the
    /// previous value (or unset it).
    pub fn scoped(key: &str, value: &str) -> ScopedEnvVar {
        let previous = std::env::var_os(key);
        Self::set_var(key, value);
        ScopedEnvVar {
            key: key.to_string(),
            previous,
        }
    }
}

pub struct ScopedEnvVar {
    key: String,
    previous: Option<OsString>,
}

impl Drop for ScopedEnvVar {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => EnvAdapter::set_var(&self.key, &value.to_string_lossy()),
            None => EnvAdapter::remove_var(&self.key),
        }
    }
}
