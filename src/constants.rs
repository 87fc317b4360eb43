// -
// Defaults

/// Number of recognition results kept by a dispatcher unless configured otherwise
pub const DEFAULT_CACHE_CAPACITY: usize = 20;

pub(crate) const DEFAULT_DISPATCHER_NAME: &str = "recognizer";

pub(crate) const DEFAULT_NOTIFY_THREAD_NAME: &str = "recognition-notify";

// -
// Configuration sources

/// Environment variable pointing at an optional configuration file
pub(crate) const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Prefix of environment overrides, e.g. `RECOGNIZER__CACHE__CAPACITY=50`
pub(crate) const ENV_PREFIX: &str = "RECOGNIZER";

pub(crate) const ENV_SEPARATOR: &str = "__";
