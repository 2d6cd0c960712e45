use std::path::Path;

use serde_derive::{Deserialize, Serialize};

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:4000";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Server configuration, loaded from a TOML file. Every field is optional in
/// the file; absent fields fall back to the defaults above.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigLoad {
    version: u8,

    /// listen address, default '127.0.0.1:4000'
    listen_addr: Option<String>,

    /// directory for rolling log files, default 'logs'
    log_dir: Option<String>,

    /// log level for the file appender, default 'info'
    log_level: Option<String>,
}

impl Default for ConfigLoad {
    fn default() -> Self {
        ConfigLoad {
            version: 0,
            listen_addr: Some(DEFAULT_LISTEN_ADDR.to_string()),
            log_dir: Some(DEFAULT_LOG_DIR.to_string()),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl ConfigLoad {
    /// Loads the configuration file, creating it with defaults when absent.
    pub fn new(path: &str) -> anyhow::Result<Self> {
        Ok(confy::load_path(Path::new(path))?)
    }

    pub fn get_listen_addr(&self) -> String {
        self.listen_addr.clone().unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
    }

    pub fn get_log_dir(&self) -> String {
        self.log_dir.clone().unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())
    }

    pub fn get_log_level(&self) -> String {
        self.log_level.clone().unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    pub fn set_listen_addr(&mut self, addr: String) {
        self.listen_addr = Some(addr);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConfigLoad::default();
        assert_eq!(config.get_listen_addr(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.get_log_dir(), DEFAULT_LOG_DIR);
        assert_eq!(config.get_log_level(), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn absent_fields_fall_back() {
        let config: ConfigLoad = toml_like_empty();
        assert_eq!(config.get_listen_addr(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.get_log_level(), DEFAULT_LOG_LEVEL);
    }

    fn toml_like_empty() -> ConfigLoad {
        ConfigLoad { version: 0, listen_addr: None, log_dir: None, log_level: None }
    }

    #[test]
    fn overrides_stick() {
        let mut config = ConfigLoad::default();
        config.set_listen_addr("0.0.0.0:4100".to_string());
        assert_eq!(config.get_listen_addr(), "0.0.0.0:4100");
    }
}
