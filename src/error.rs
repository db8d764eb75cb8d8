use std::path::PathBuf;
use thiserror::Error;

/// User-facing configuration errors. Each one is terminal for the current
/// invocation: it is printed and the process exits non-zero, no retries.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid profile '{0}' (expected dev, prod or all)")]
    InvalidProfile(String),

    #[error("profile 'all' is not valid for '{0}' (pick dev or prod)")]
    UnsupportedForProfile(&'static str),

    #[error("invalid IP address '{0}' (expected four dot-separated octets, e.g. 192.168.1.100)")]
    MalformedIp(String),

    #[error("invalid IP address '{input}' (octet {octet} is outside 0-255)")]
    OctetOutOfRange { input: String, octet: String },

    #[error("environment file {} not found", .0.display())]
    EnvFileNotFound(PathBuf),

    #[error("no '{key}=' entry in {} (keys are only replaced, never added)", .file.display())]
    MissingRequiredKey { file: PathBuf, key: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
