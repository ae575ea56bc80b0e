//! Channel-based logging handle.
//!
//! A [`Logger`] is a cheap, cloneable handle onto a table of endpoints. Each
//! endpoint is a closure registered for a set of [`Channel`]s; [`Logger::log`]
//! delivers a message to every endpoint registered for its channel, in the
//! order the endpoints were added.
//!
//! There is no global logger. Code that logs takes a `Logger` at construction,
//! so tests can attach a [`LogRecorder`] and applications can forward to the
//! `log` crate with [`Logger::facade`].

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::settings::LogSettings;

/// `log` target used by [`Logger::facade`].
pub const LOG_TARGET: &str = "ensync";

/// A named logging destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Error,
    Warning,
    Information,
    Debug,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Error,
        Channel::Warning,
        Channel::Information,
        Channel::Debug,
    ];

    /// Three-letter label used in formatted output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "ERR",
            Self::Warning => "WAR",
            Self::Information => "INF",
            Self::Debug => "DEB",
        }
    }

    /// The `log` level this channel forwards to.
    pub fn level(&self) -> log::Level {
        match self {
            Self::Error => log::Level::Error,
            Self::Warning => log::Level::Warn,
            Self::Information => log::Level::Info,
            Self::Debug => log::Level::Debug,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifies a registered endpoint so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointId(u64);

type Endpoint = Arc<dyn Fn(Channel, &str) + Send + Sync>;

struct Registration {
    id: EndpointId,
    channels: Vec<Channel>,
    endpoint: Endpoint,
}

#[derive(Default)]
struct Endpoints {
    next_id: u64,
    entries: Vec<Registration>,
}

/// Shared handle onto a set of logging endpoints.
///
/// Clones share the same endpoint table. Endpoints run after the table lock
/// is released, so an endpoint may log, add or remove endpoints itself.
#[derive(Clone, Default)]
pub struct Logger {
    endpoints: Arc<Mutex<Endpoints>>,
}

impl Logger {
    /// A logger with no endpoints. Messages are discarded.
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger that forwards the given channels to the `log` crate.
    pub fn facade(channels: &[Channel]) -> Self {
        let logger = Self::new();
        logger.add(channels, forward_to_log);
        logger
    }

    /// A facade logger for the channels enabled in the settings file.
    pub fn from_settings(settings: &LogSettings) -> Self {
        Self::facade(&settings.channels)
    }

    /// A logger that writes `[LBL] message` lines: errors to stderr,
    /// everything else to stdout.
    pub fn console(channels: &[Channel]) -> Self {
        let logger = Self::new();
        logger.add(channels, |channel, message| {
            let line = console_line(channel, message);
            if channel == Channel::Error {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        });
        logger
    }

    /// Register an endpoint for a set of channels.
    pub fn add<F>(&self, channels: &[Channel], endpoint: F) -> EndpointId
    where
        F: Fn(Channel, &str) + Send + Sync + 'static,
    {
        let mut table = self.lock();
        let id = EndpointId(table.next_id);
        table.next_id += 1;
        let mut channels = channels.to_vec();
        channels.sort();
        channels.dedup();
        table.entries.push(Registration {
            id,
            channels,
            endpoint: Arc::new(endpoint),
        });
        id
    }

    /// Remove an endpoint. Returns `false` if it was not registered.
    pub fn remove(&self, id: EndpointId) -> bool {
        let mut table = self.lock();
        let before = table.entries.len();
        table.entries.retain(|r| r.id != id);
        table.entries.len() != before
    }

    /// Remove all endpoints.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Number of registered endpoints.
    pub fn endpoint_count(&self) -> usize {
        self.lock().entries.len()
    }

    /// Deliver a message on a channel.
    pub fn log(&self, channel: Channel, message: &str) {
        let endpoints: Vec<Endpoint> = self
            .lock()
            .entries
            .iter()
            .filter(|r| r.channels.contains(&channel))
            .map(|r| Arc::clone(&r.endpoint))
            .collect();
        for endpoint in endpoints {
            endpoint(channel, message);
        }
    }

    pub fn error(&self, message: &str) {
        self.log(Channel::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(Channel::Warning, message);
    }

    pub fn information(&self, message: &str) {
        self.log(Channel::Information, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Channel::Debug, message);
    }

    // A panicking endpoint must not disable logging for everyone else.
    fn lock(&self) -> MutexGuard<'_, Endpoints> {
        self.endpoints
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("endpoints", &self.endpoint_count())
            .finish()
    }
}

fn console_line(channel: Channel, message: &str) -> String {
    format!("[{}] {}", channel.label(), message)
}

fn forward_to_log(channel: Channel, message: &str) {
    log::log!(target: LOG_TARGET, channel.level(), "{}", message);
}

/// An endpoint that keeps every message it receives.
///
/// Mostly useful in tests: attach it to a logger, run the code under test,
/// then count what arrived on each channel.
#[derive(Debug, Clone, Default)]
pub struct LogRecorder {
    records: Arc<Mutex<Vec<(Channel, String)>>>,
}

impl LogRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh logger with a recorder attached on every channel.
    pub fn logger() -> (Logger, LogRecorder) {
        let logger = Logger::new();
        let recorder = LogRecorder::new();
        recorder.attach(&logger);
        (logger, recorder)
    }

    /// Register this recorder on all channels of `logger`.
    pub fn attach(&self, logger: &Logger) -> EndpointId {
        let records = Arc::clone(&self.records);
        logger.add(&Channel::ALL, move |channel, message| {
            records
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push((channel, message.to_string()));
        })
    }

    /// All records, in arrival order.
    pub fn records(&self) -> Vec<(Channel, String)> {
        self.lock().clone()
    }

    /// Number of messages received on `channel`.
    pub fn count(&self, channel: Channel) -> usize {
        self.lock().iter().filter(|(c, _)| *c == channel).count()
    }

    /// Messages received on `channel`, in arrival order.
    pub fn messages(&self, channel: Channel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Message counts as `[error, warning, information, debug]`.
    pub fn counts(&self) -> [usize; 4] {
        Channel::ALL.map(|channel| self.count(channel))
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Channel, String)>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
#[path = "tests/logger_tests.rs"]
mod tests;
