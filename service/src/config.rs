use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Application configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. config.yaml file (if exists)
/// 3. Environment variables with SW_ prefix (always wins)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub policies: PolicyConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP server bind address.
    #[serde(default = "default_host")]
    pub host: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminConfig {
    /// Root directory the file-editing surface operates on.
    #[serde(default = "default_content_root")]
    pub content_root: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SwaggerConfig {
    /// Enable Swagger UI at /swagger-ui.
    /// Default: false (disabled for security - exposes API documentation).
    /// Enable in development via `SW_SWAGGER__ENABLED=true`
    #[serde(default)]
    pub enabled: bool,
}

/// The closed set of named security policies an operator can toggle.
///
/// Fixed at build time; every lookup is an exhaustive match, so adding a
/// variant forces the catalog and the snapshot to be extended together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    FrameOptions,
    ContentSecurityPolicy,
    Hsts,
    ContentTypeOptions,
    XssProtection,
    ReferrerPolicy,
    PermissionsPolicy,
    DisableLegacyRpc,
    DisableFileEditing,
}

/// Boolean enabled-state for each [`Policy`], as resolved from configuration.
///
/// This is the snapshot the header engine and the capability gates read.
/// Absent keys deserialize to `false`: a partially initialized configuration
/// always degrades to the safe (disabled) state. Values are accepted in the
/// loose forms operators actually write (`true`, `"1"`, `"on"`, `0`, `""`);
/// anything unrecognized also resolves to `false` rather than erroring.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Emit `X-Frame-Options: SAMEORIGIN`.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub frame_options: bool,

    /// Emit the Content-Security-Policy header.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub content_security_policy: bool,

    /// Emit Strict-Transport-Security. Only meaningful behind HTTPS.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub hsts: bool,

    /// Emit `X-Content-Type-Options: nosniff`.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub content_type_options: bool,

    /// Emit `X-XSS-Protection: 1; mode=block` (legacy browsers).
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub xss_protection: bool,

    /// Emit the Referrer-Policy header.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub referrer_policy: bool,

    /// Emit the Permissions-Policy header.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub permissions_policy: bool,

    /// Reject all requests to the legacy RPC endpoint.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub disable_legacy_rpc: bool,

    /// Block in-place file editing through the admin surface.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub disable_file_editing: bool,
}

impl PolicyConfig {
    /// Whether the snapshot explicitly enables the given policy.
    ///
    /// Total over all [`Policy`] values; a policy never present in the
    /// underlying sources reads as disabled.
    #[must_use]
    pub const fn is_enabled(&self, policy: Policy) -> bool {
        match policy {
            Policy::FrameOptions => self.frame_options,
            Policy::ContentSecurityPolicy => self.content_security_policy,
            Policy::Hsts => self.hsts,
            Policy::ContentTypeOptions => self.content_type_options,
            Policy::XssProtection => self.xss_protection,
            Policy::ReferrerPolicy => self.referrer_policy,
            Policy::PermissionsPolicy => self.permissions_policy,
            Policy::DisableLegacyRpc => self.disable_legacy_rpc,
            Policy::DisableFileEditing => self.disable_file_editing,
        }
    }
}

/// Accepted shapes for a policy flag across YAML, JSON, and env sources.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
    Str(String),
    Other(serde::de::IgnoredAny),
}

/// Deserialize a policy flag leniently.
///
/// Booleans pass through, integers follow the non-zero convention, and
/// strings are matched against the usual truthy spellings. Every other
/// shape (null, lists, maps, garbage) resolves to `false` so a malformed
/// entry disables its policy instead of failing the whole config load.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let enabled = match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
        Flag::Str(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Flag::Other(_) => false,
    };
    Ok(enabled)
}

#[allow(clippy::missing_const_for_fn)]
fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_content_root() -> String {
    "content".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: default_port(),
                host: default_host(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
            },
            policies: PolicyConfig::default(),
            admin: AdminConfig::default(),
            swagger: SwaggerConfig::default(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Sources are merged in priority order:
    /// 1. Struct defaults (lowest)
    /// 2. config.yaml file (if exists)
    /// 3. Environment variables with SW_ prefix (highest)
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("SW_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port cannot be 0".into()));
        }

        if self.admin.content_root.is_empty() {
            return Err(ConfigError::Validation(
                "admin.content_root cannot be empty".into(),
            ));
        }

        Ok(())
    }
}
