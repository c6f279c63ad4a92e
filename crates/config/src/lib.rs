//! Photon Sniffer Configuration Management
//!
//! Loads the sniffer's options from a plain `key = value` file.

use std::fs;
use std::path::{Path, PathBuf};

use photon_protocol::DecodeOptions;

/// Default location of the options file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/sniffer.txt";

/// Complete sniffer configuration from `sniffer.txt`
#[derive(Debug, Clone)]
pub struct SnifferConfig {
    // Capture input
    /// Game server port the dump is filtered on (from "port" option, default: 5056)
    pub port: u16,
    /// Captured datagrams, one hex payload per line (from "dumpfile" option)
    pub dump_file: PathBuf,

    // Decoding
    /// Bound command bodies by their declared length (from "strictlength" option)
    pub strict_length: bool,

    // Delivery
    /// Capacity of the decoded packet queue (from "channelcapacity" option)
    pub channel_capacity: usize,
    /// Print decoded requests (from "logrequests" option)
    pub log_requests: bool,
    /// Print decoded responses (from "logresponses" option)
    pub log_responses: bool,
    /// Print decoded events (from "logevents" option)
    pub log_events: bool,

    // Logging
    /// Default tracing filter when RUST_LOG is unset (from "loglevel" option)
    pub log_level: String,
}

impl Default for SnifferConfig {
    fn default() -> Self {
        Self {
            port: 5056,
            dump_file: PathBuf::from("capture.txt"),
            strict_length: false,
            channel_capacity: 256,
            log_requests: true,
            log_responses: true,
            log_events: true,
            log_level: "info".into(),
        }
    }
}

impl SnifferConfig {
    /// Load configuration from an options file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        Ok(config)
    }

    /// Load configuration from [`DEFAULT_CONFIG_PATH`]
    pub fn load_default() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }

    /// Parse options file content
    ///
    /// Unknown keys are ignored and unparsable values keep their defaults.
    pub fn parse(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse key=value
            if let Some(eq_pos) = line.find('=') {
                let key = line[..eq_pos].trim();
                let value = line[eq_pos + 1..].trim();

                config.parse_option(key, value);
            }
        }

        if config.channel_capacity == 0 {
            return Err("channelcapacity must be at least 1".into());
        }

        Ok(config)
    }

    fn parse_option(&mut self, key: &str, value: &str) {
        match key.to_lowercase().as_str() {
            "port" => {
                self.port = value.parse().unwrap_or(5056);
            }
            "dumpfile" => self.dump_file = PathBuf::from(value),
            "strictlength" => {
                self.strict_length = parse_bool(value).unwrap_or(false);
            }
            "channelcapacity" => {
                self.channel_capacity = value.parse().unwrap_or(256);
            }
            "logrequests" => {
                self.log_requests = parse_bool(value).unwrap_or(true);
            }
            "logresponses" => {
                self.log_responses = parse_bool(value).unwrap_or(true);
            }
            "logevents" => {
                self.log_events = parse_bool(value).unwrap_or(true);
            }
            "loglevel" => self.log_level = value.to_lowercase(),
            _ => {
                tracing::debug!("Ignoring unknown option '{}'", key);
            }
        }
    }

    /// Decoder options derived from this configuration
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            strict_command_length: self.strict_length,
        }
    }

    /// Display configuration summary
    pub fn display(&self) {
        tracing::info!("Sniffer configuration:");
        tracing::info!("  Port: {}", self.port);
        tracing::info!("  Dump file: {}", self.dump_file.display());
        tracing::info!("  Strict command length: {}", self.strict_length);
        tracing::info!("  Channel capacity: {}", self.channel_capacity);
        tracing::info!(
            "  Printing: requests={} responses={} events={}",
            self.log_requests,
            self.log_responses,
            self.log_events
        );
        tracing::info!("  Log level: {}", self.log_level);
    }
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SnifferConfig::default();
        assert_eq!(config.port, 5056);
        assert_eq!(config.channel_capacity, 256);
        assert!(!config.decode_options().strict_command_length);
    }

    #[test]
    fn test_parse_simple_config() {
        let config_text = r#"
# capture settings
port = 5055
dumpfile = captures/session.txt
strictlength = yes
logevents = false
loglevel = DEBUG
"#;
        let config = SnifferConfig::parse(config_text).unwrap();
        assert_eq!(config.port, 5055);
        assert_eq!(config.dump_file, PathBuf::from("captures/session.txt"));
        assert!(config.decode_options().strict_command_length);
        assert!(!config.log_events);
        assert!(config.log_requests);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_bad_values_fall_back_to_defaults() {
        let config = SnifferConfig::parse("port = many\nstrictlength = maybe\nunknown = 1\n").unwrap();
        assert_eq!(config.port, 5056);
        assert!(!config.strict_length);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(SnifferConfig::parse("channelcapacity = 0").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 6000").unwrap();
        writeln!(file, "channelcapacity = 8").unwrap();

        let config = SnifferConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.port, 6000);
        assert_eq!(config.channel_capacity, 8);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SnifferConfig::load_from_file(dir.path().join("absent.txt")).is_err());
    }
}
