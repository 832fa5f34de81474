// ABOUTME: Bounds for waiting on the control plane.
// ABOUTME: Poll interval and overall timeout shared by every log request.

use serde::Deserialize;
use std::time::Duration;

/// How long, and how often, to poll for objects that do not exist or have
/// not progressed yet. Fixed at construction and read by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WaitSettings {
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_interval() -> Duration {
    Duration::from_secs(1)
}

impl Default for WaitSettings {
    fn default() -> Self {
        WaitSettings {
            timeout: default_timeout(),
            interval: default_interval(),
        }
    }
}

impl WaitSettings {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        WaitSettings { timeout, interval }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.interval.is_zero() {
            return Err("wait.interval must be greater than zero".to_string());
        }
        if self.interval > self.timeout {
            return Err(format!(
                "wait.interval ({:?}) must not exceed wait.timeout ({:?})",
                self.interval, self.timeout
            ));
        }
        Ok(())
    }
}
