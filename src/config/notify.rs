use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_NOTIFY_THREAD_NAME;
use crate::Error;
use crate::Result;

/// How a `process` call hands its result to listeners.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Hold the algorithm lock until listeners on the target context are done.
    /// A slow listener back-pressures every other miss.
    #[default]
    Barrier,

    /// Release the algorithm lock first, then wait for delivery.
    AfterUnlock,

    /// Submit the notification and return without waiting for it.
    FireAndForget,
}

impl DeliveryMode {
    pub fn waits_for_delivery(&self) -> bool {
        !matches!(self, DeliveryMode::FireAndForget)
    }

    pub fn holds_lock_during_delivery(&self) -> bool {
        matches!(self, DeliveryMode::Barrier)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotifyConfig {
    #[serde(default)]
    pub delivery: DeliveryMode,

    /// Name given to the worker thread of a `ThreadExecutor` built from this config
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            delivery: DeliveryMode::default(),
            thread_name: default_thread_name(),
        }
    }
}

impl NotifyConfig {
    pub(super) fn validate(&self) -> Result<()> {
        if self.thread_name.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "notify.thread_name cannot be empty".into(),
            )));
        }
        Ok(())
    }
}

fn default_thread_name() -> String {
    DEFAULT_NOTIFY_THREAD_NAME.to_string()
}
