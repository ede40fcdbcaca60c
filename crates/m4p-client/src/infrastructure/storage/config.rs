//! TOML-based configuration for the client.
//!
//! Reads `ClientConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\Magic4rs\config.toml`
//! - Linux:    `~/.config/magic4rs/config.toml`
//! - macOS:    `~/Library/Application Support/Magic4rs/config.toml`
//!
//! ```toml
//! [device]
//! host = "192.168.1.75"
//! port = 42831
//!
//! [calibration]
//! scale_x = 1.00313479624
//! scale_y = 1.00558659218
//!
//! [injector]
//! backend = "uinput"
//! ```
//!
//! Every field has a serde default, so a missing file, a missing section or
//! a missing key all fall back to the values below.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use m4p_core::{CalibrationError, CalibrationProfile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::session::DeviceEndpoint;
use crate::infrastructure::network::UdpTransportConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid calibration: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("invalid sleep listener address {0:?}")]
    BindAddress(String),

    /// A numeric setting is outside its valid range.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: &'static str },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub injector: InjectorConfig,
    #[serde(default)]
    pub sleep_listener: SleepListenerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the TV app listens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Scale from device coordinates to local pixels.
///
/// Known values: `1.00313479624` / `1.00558659218` for a 1920×1080 panel,
/// `0.668756530825496` / `0.670391061452514` for a 4K panel at 150 % scaling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalibrationConfig {
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    #[serde(default = "default_scale")]
    pub scale_y: f64,
}

/// Session timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    #[serde(default = "default_keepalive_interval_ms")]
    pub keepalive_interval_ms: u64,
    #[serde(default = "default_receive_timeout_ms")]
    pub receive_timeout_ms: u64,
    #[serde(default = "default_update_frequency_hz")]
    pub update_frequency_hz: u32,
}

/// Which injector backend to use.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InjectorBackend {
    /// Log actions without injecting them.
    #[default]
    Log,
    /// Linux uinput virtual device.
    Uinput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InjectorConfig {
    #[serde(default)]
    pub backend: InjectorBackend,
    /// Screen size used to size the absolute pointer axes.
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SleepListenerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_sleep_bind_address")]
    pub bind_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` level or filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_host() -> String {
    "192.168.1.75".to_string()
}
fn default_port() -> u16 {
    42831
}
fn default_scale() -> f64 {
    1.0
}
fn default_retry_delay_secs() -> u64 {
    5
}
fn default_keepalive_interval_ms() -> u64 {
    2000
}
fn default_receive_timeout_ms() -> u64 {
    6000
}
fn default_update_frequency_hz() -> u32 {
    65
}
fn default_screen_width() -> u32 {
    1920
}
fn default_screen_height() -> u32 {
    1080
}
fn default_sleep_bind_address() -> String {
    "0.0.0.0:9105".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            scale_x: default_scale(),
            scale_y: default_scale(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retry_delay_secs: default_retry_delay_secs(),
            keepalive_interval_ms: default_keepalive_interval_ms(),
            receive_timeout_ms: default_receive_timeout_ms(),
            update_frequency_hz: default_update_frequency_hz(),
        }
    }
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            backend: InjectorBackend::default(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

impl Default for SleepListenerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: default_sleep_bind_address(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Derived runtime values ────────────────────────────────────────────────────

impl ClientConfig {
    pub fn endpoint(&self) -> DeviceEndpoint {
        DeviceEndpoint::new(self.device.host.clone(), self.device.port)
    }

    /// Validated calibration profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Calibration`] for a non-positive or non-finite
    /// factor.
    pub fn calibration_profile(&self) -> Result<CalibrationProfile, ConfigError> {
        Ok(CalibrationProfile::new(
            self.calibration.scale_x,
            self.calibration.scale_y,
        )?)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.session.retry_delay_secs)
    }

    /// Timing for the UDP transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `receive_timeout_ms` is 0.
    pub fn transport_config(&self) -> Result<UdpTransportConfig, ConfigError> {
        if self.session.receive_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "session.receive_timeout_ms",
                reason: "must be greater than 0",
            });
        }
        Ok(UdpTransportConfig {
            keepalive_interval: Duration::from_millis(self.session.keepalive_interval_ms.max(1)),
            receive_timeout: Duration::from_millis(self.session.receive_timeout_ms),
            update_frequency_hz: self.session.update_frequency_hz,
        })
    }

    /// Parsed sleep listener address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BindAddress`] if it is not `ip:port`.
    pub fn sleep_listener_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.sleep_listener
            .bind_address
            .parse()
            .map_err(|_| ConfigError::BindAddress(self.sleep_listener.bind_address.clone()))
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the configuration.
///
/// With an explicit `path` the file must exist.  Without one the default
/// location is used and a missing file yields [`ClientConfig::default`].
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    match path {
        Some(path) => read_config(path),
        None => {
            let path = match config_file_path() {
                Ok(path) => path,
                Err(ConfigError::NoPlatformConfigDir) => return Ok(ClientConfig::default()),
                Err(e) => return Err(e),
            };
            match read_config(&path) {
                Err(ConfigError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    Ok(ClientConfig::default())
                }
                other => other,
            }
        }
    }
}

fn read_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Resolves the platform config directory including the `Magic4rs` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Magic4rs"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("magic4rs"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Magic4rs")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default_device_address() {
        // Arrange / Act
        let cfg = ClientConfig::default();

        // Assert
        assert_eq!(cfg.device.host, "192.168.1.75");
        assert_eq!(cfg.device.port, 42831);
        assert_eq!(cfg.endpoint().to_string(), "192.168.1.75:42831");
    }

    #[test]
    fn test_client_config_default_session_timing() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.retry_delay(), Duration::from_secs(5));
        let transport = cfg.transport_config().unwrap();
        assert_eq!(transport.keepalive_interval, Duration::from_millis(2000));
        assert_eq!(transport.receive_timeout, Duration::from_millis(6000));
        assert_eq!(transport.update_frequency_hz, 65);
    }

    #[test]
    fn test_client_config_default_is_log_backend_without_sleep_listener() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.injector.backend, InjectorBackend::Log);
        assert!(!cfg.sleep_listener.enabled);
        assert_eq!(cfg.sleep_listener_addr().unwrap(), "0.0.0.0:9105".parse().unwrap());
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg: ClientConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides_only_given_fields() {
        // Arrange
        let toml_str = r#"
[device]
host = "tv.local"

[calibration]
scale_x = 0.668756530825496

[injector]
backend = "uinput"
"#;

        // Act
        let cfg: ClientConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.device.host, "tv.local");
        assert_eq!(cfg.device.port, 42831);
        assert_eq!(cfg.calibration.scale_x, 0.668756530825496);
        assert_eq!(cfg.calibration.scale_y, 1.0);
        assert_eq!(cfg.injector.backend, InjectorBackend::Uinput);
        assert_eq!(cfg.injector.screen_width, 1920);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut cfg = ClientConfig::default();
        cfg.session.retry_delay_secs = 1;
        cfg.sleep_listener.enabled = true;

        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: ClientConfig = toml::from_str(&toml_str).expect("deserialize");

        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let result: Result<ClientConfig, _> = toml::from_str("[injector]\nbackend = \"xtest\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_calibration_profile_rejects_zero_scale() {
        let mut cfg = ClientConfig::default();
        cfg.calibration.scale_y = 0.0;

        let err = cfg.calibration_profile().unwrap_err();

        assert!(matches!(err, ConfigError::Calibration(CalibrationError::InvalidScaleY(_))));
    }

    #[test]
    fn test_transport_config_rejects_zero_receive_timeout() {
        // Arrange
        let cfg: ClientConfig = toml::from_str("[session]\nreceive_timeout_ms = 0").unwrap();

        // Act
        let err = cfg.transport_config().unwrap_err();

        // Assert
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "session.receive_timeout_ms", .. }
        ));
    }

    #[test]
    fn test_transport_config_clamps_zero_keepalive_interval() {
        let mut cfg = ClientConfig::default();
        cfg.session.keepalive_interval_ms = 0;

        let transport = cfg.transport_config().unwrap();

        assert_eq!(transport.keepalive_interval, Duration::from_millis(1));
    }

    #[test]
    fn test_invalid_sleep_bind_address_is_error() {
        let mut cfg = ClientConfig::default();
        cfg.sleep_listener.bind_address = "not an address".into();
        assert!(matches!(cfg.sleep_listener_addr(), Err(ConfigError::BindAddress(_))));
    }

    #[test]
    fn test_load_config_explicit_missing_path_is_io_error() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.toml");

        let err = load_config(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_config_reads_explicit_file() {
        // Arrange
        let path = std::env::temp_dir().join(format!("m4p-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[device]\nport = 5000\n").unwrap();

        // Act
        let cfg = load_config(Some(&path));
        std::fs::remove_file(&path).ok();

        // Assert
        assert_eq!(cfg.unwrap().device.port, 5000);
    }

    #[test]
    fn test_load_config_malformed_file_is_parse_error() {
        let path = std::env::temp_dir().join(format!("m4p-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = load_config(Some(&path));
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
