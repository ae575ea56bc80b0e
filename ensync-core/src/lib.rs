//! Shared foundation for enSync: the message table, channel logging and
//! settings.

pub mod logger;
pub mod messages;
pub mod settings;

pub use logger::{Channel, EndpointId, LOG_TARGET, LogRecorder, Logger};
pub use messages::{MessageCode, message};
pub use settings::{DatabaseSettings, LogSettings, Settings, SettingsError, settings_path};
