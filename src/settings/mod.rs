mod settings_version;
pub use settings_version::*;
