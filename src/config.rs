//! Configuration for the default listener
//!
//! Loaded from a JSON file at startup. Any read or parse failure falls back to
//! defaults so a missing config never stops the host from printing.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub listener: ListenerConfig,
}

/// Default adapter behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Flush the process stream after every message
    pub flush_each_write: bool,
    /// Also emit each message as a trace event on `zengarden::print`
    pub mirror_to_log: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            flush_each_write: true,
            mirror_to_log: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Returns
    /// The parsed configuration, or `AppConfig::default()` if the file is
    /// missing or its JSON is invalid.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
