use crate::error::ConfigError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A single deployment profile backed by one env file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Dev, Profile::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Dev => "dev",
            Profile::Prod => "prod",
        }
    }

    /// Path of the env file backing this profile, relative to the project root.
    pub fn env_file(&self, root: &Path) -> PathBuf {
        root.join(format!(".env.{}", self.as_str()))
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Profile::Dev),
            "prod" => Ok(Profile::Prod),
            other => Err(ConfigError::InvalidProfile(other.to_string())),
        }
    }
}

/// What a profile argument on the command line can name: one profile, or the
/// aggregate "all" for commands that fan out (stop, status, clean, restart).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    One(Profile),
    All,
}

impl Target {
    /// The profiles this target expands to, in fixed dev-then-prod order.
    pub fn profiles(&self) -> &'static [Profile] {
        match self {
            Target::One(Profile::Dev) => &[Profile::Dev],
            Target::One(Profile::Prod) => &[Profile::Prod],
            Target::All => &Profile::ALL,
        }
    }

    /// Resolve to exactly one profile, for operations that cannot fan out.
    /// The clap surface never routes "all" to such operations, but callers
    /// going through this module directly still get the guard.
    #[allow(dead_code)]
    pub fn single(&self, operation: &'static str) -> Result<Profile, ConfigError> {
        match self {
            Target::One(p) => Ok(*p),
            Target::All => Err(ConfigError::UnsupportedForProfile(operation)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::One(p) => p.fmt(f),
            Target::All => f.write_str("all"),
        }
    }
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Target::All),
            other => other.parse::<Profile>().map(Target::One),
        }
    }
}
