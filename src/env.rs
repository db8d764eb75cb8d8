use crate::error::ConfigError;
use crate::profile::Profile;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// The env-file key holding the production host address.
pub const PRODUCTION_IP_KEY: &str = "PRODUCTION_IP";

/// Keys the deployment template is expected to define. Missing ones are
/// surfaced as warnings before a deploy, not errors.
const EXPECTED_KEYS: [&str; 7] = [
    PRODUCTION_IP_KEY,
    "GRAPHDB_PORT",
    "CORE_API_PORT",
    "MODELS_MANAGER_PORT",
    "VALIDATION_ENGINE_PORT",
    "SCENARIO_MANAGER_PORT",
    "REACT_DASHBOARD_PORT",
];

/// Load base .env (if present) and the profile's env file into the process
/// environment, profile values overriding base ones.
pub fn load_env(root: &Path, profile: Profile) -> Result<(), ConfigError> {
    let base = root.join(".env");
    if base.exists() {
        dotenvy::from_path(&base).ok();
    }

    let pf = profile.env_file(root);
    if !pf.exists() {
        return Err(ConfigError::EnvFileNotFound(pf));
    }
    dotenvy::from_path_override(&pf).ok();
    Ok(())
}

/// Check the profile env file exists and warn about expected keys it lacks.
pub fn validate_env(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::EnvFileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    for key in EXPECTED_KEYS {
        if !content
            .lines()
            .any(|l| l.trim_start().starts_with(&format!("{key}=")))
        {
            tracing::warn!(file = %path.display(), key, "expected variable not set");
        }
    }
    Ok(())
}

/// Replace the value of `key` in the env file at `path`.
///
/// The file must already exist and already contain a `key=` line; this tool
/// never creates env files or appends keys the deployment template did not
/// define. Every other line is preserved byte for byte, and the file is
/// replaced atomically (temp file + rename) so a crash mid-write cannot leave
/// a half-written file behind.
pub fn update_env_file(path: &Path, key: &str, value: &str) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::EnvFileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let rewritten = replace_key(&content, key, value).ok_or_else(|| {
        ConfigError::MissingRequiredKey {
            file: path.to_path_buf(),
            key: key.to_string(),
        }
    })?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(rewritten.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Rewrite the first `key=` line to `key=value`, keeping its original line
/// terminator and every other byte of the file. Returns None when no line
/// matches.
fn replace_key(content: &str, key: &str, value: &str) -> Option<String> {
    let prefix = format!("{key}=");
    let mut out = String::with_capacity(content.len());
    let mut found = false;

    for line in content.split_inclusive('\n') {
        let body = line.trim_end_matches(['\r', '\n']);
        if !found && body.trim_start().starts_with(&prefix) {
            out.push_str(&prefix);
            out.push_str(value);
            out.push_str(&line[body.len()..]);
            found = true;
        } else {
            out.push_str(line);
        }
    }

    found.then_some(out)
}
