// Configuration module entry point
// Loads the startup configuration and builds the shared application state

mod state;
mod types;

use std::env::{self, VarError};
use std::net::SocketAddr;

pub use state::AppState;
pub use types::Config;

/// Config file consulted when `STATIC_CONFIG` is not set (extension optional)
const DEFAULT_CONFIG_PATH: &str = "config";

/// Port used when `PORT` is absent
pub const DEFAULT_PORT: u16 = 3001;

impl Config {
    /// Load configuration from the process environment
    ///
    /// Layers, lowest precedence first: built-in defaults, the optional config
    /// file, `STATIC_*` environment variables, then `PORT`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            env::var("STATIC_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let port = match env::var("PORT") {
            Ok(raw) => Some(raw),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(raw)) => {
                return Err(config::ConfigError::Message(format!(
                    "Invalid PORT value {raw:?}: not valid unicode"
                )));
            }
        };
        Self::load_from(&config_path, port.as_deref())
    }

    /// Load configuration from the given file path (without extension),
    /// applying `port` as the final override for `server.port`
    pub fn load_from(config_path: &str, port: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("STATIC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.root", "dist")?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.backlog", 128)?
            .set_default("http.server_name", default_server_name())?;

        if let Some(raw) = port {
            builder = builder.set_override("server.port", i64::from(parse_port(raw)?))?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Parse a `PORT` value, rejecting anything that is not an integer in 0..=65535
pub fn parse_port(raw: &str) -> Result<u16, config::ConfigError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|e| config::ConfigError::Message(format!("Invalid PORT value '{raw}': {e}")))
}

fn default_server_name() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING_FILE: &str = "this-config-file-does-not-exist";

    #[test]
    fn test_defaults() {
        let cfg = Config::load_from(MISSING_FILE, None).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3001);
        assert_eq!(cfg.server.root, "dist");
        assert!(!cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert!(cfg.performance.keep_alive);
        assert_eq!(cfg.performance.backlog, 128);
        assert_eq!(cfg.performance.max_connections, None);
        assert_eq!(cfg.http.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.http.directory_listing);
        assert!(cfg.http.server_name.starts_with("cors-static-server/"));
    }

    #[test]
    fn test_port_override() {
        let cfg = Config::load_from(MISSING_FILE, Some("8080")).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_port_from_config_file_loses_to_env() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("server.toml");
        std::fs::write(&file, "[server]\nport = 9000\nroot = \"/srv/site\"\n").unwrap();
        let path = file.to_str().unwrap();

        let cfg = Config::load_from(path, None).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.root, "/srv/site");

        let cfg = Config::load_from(path, Some("8081")).unwrap();
        assert_eq!(cfg.server.port, 8081);
    }

    #[test]
    fn test_malformed_port_fails_fast() {
        assert!(Config::load_from(MISSING_FILE, Some("abc")).is_err());
        assert!(Config::load_from(MISSING_FILE, Some("70000")).is_err());
        assert!(Config::load_from(MISSING_FILE, Some("-1")).is_err());
        assert!(Config::load_from(MISSING_FILE, Some("")).is_err());
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("0").unwrap(), 0);
        assert_eq!(parse_port(" 65535 ").unwrap(), 65535);
        assert!(parse_port("65536").is_err());
        assert!(parse_port("80.5").is_err());
    }

    #[test]
    fn test_socket_addr_binds_all_interfaces() {
        let cfg = Config::load_from(MISSING_FILE, None).unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert!(addr.ip().is_unspecified());
    }
}
