//! Config for the agent's bootstrap
//!
//! This module provides the options surrounding the decision policy: where the game server is
//! and how the agent reports what it does. The policy itself takes no configuration.
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Flags are case-insensitive; set them to `"true"` to enable,
//! `"false"` to disable.
//!
//! - `CYCLES_HOST` — Game server host (default: `127.0.0.1`)
//! - `CYCLES_PORT` — Game server TCP port (default: `55015`)
//! - `CYCLES_LOG` — Write logs to a timestamped file instead of stderr (default: `false`)
//! - `CYCLES_DEBUG` — Log validator rejections and other debug output (default: `true` in debug
//!   builds, `false` in release builds)

/// Port the game server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 55015;

/// Configuration for the agent process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) log: bool,
    pub(crate) debug: bool,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - The server is expected on `127.0.0.1:55015`.
    /// - Logs go to stderr.
    /// - Debug output follows the build profile.
    pub fn new() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: DEFAULT_PORT,
            log: false,
            debug: cfg!(debug_assertions),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// The following environment variables are recognized:
    /// - `CYCLES_HOST`: server host name or address
    /// - `CYCLES_PORT`: server port, ignored if not a valid port number
    /// - `CYCLES_LOG`: if set to `"true"`, logs to file (default: `false`)
    /// - `CYCLES_DEBUG`: `"true"` or `"false"` overrides the build-time verbosity
    ///
    /// Any other value (including unset) will result in using the default value for each field.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::new();
        let get_flag = |var: &str, default: bool| match lookup(var) {
            Some(val) if val.eq_ignore_ascii_case("true") => true,
            Some(val) if val.eq_ignore_ascii_case("false") => false,
            _ => default,
        };

        Self {
            host: lookup("CYCLES_HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.host),
            port: lookup("CYCLES_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            log: get_flag("CYCLES_LOG", defaults.log),
            debug: get_flag("CYCLES_DEBUG", defaults.debug),
        }
    }

    /// Set the game server host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the game server port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Enable or disable debug output.
    pub fn with_debug(mut self, value: bool) -> Self {
        self.debug = value;
        self
    }

    /// `host:port` of the game server.
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
