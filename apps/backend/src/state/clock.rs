use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// Source of "now" for token issuance and verification.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> SystemTime + Send + Sync>);

impl Clock {
    pub fn system() -> Self {
        Self(Arc::new(SystemTime::now))
    }

    /// Always returns `at`. Used by tests that need logical time.
    pub fn fixed(at: SystemTime) -> Self {
        Self(Arc::new(move || at))
    }

    pub fn now(&self) -> SystemTime {
        (self.0)()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Clock")
    }
}
