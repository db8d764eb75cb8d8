use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;

/// Resolved docker tooling for this invocation: which binary to call and
/// whether the daemon and the compose plugin answered.
#[derive(Debug, Clone)]
pub struct DockerMeta {
    pub docker_bin: String,
    pub daemon_available: bool,
    pub compose_available: bool,
}

impl DockerMeta {
    pub async fn detect(cwd: &Path, docker_bin: &str) -> Self {
        let docker_bin = docker_bin.to_string();
        let cwd_buf = cwd.to_path_buf();

        let daemon_check = async {
            Command::new(&docker_bin)
                .current_dir(&cwd_buf)
                .args(["info"]) // cheaper than ping and works for ssh contexts
                .output()
                .await
                .map(|o| o.status.success())
                .unwrap_or(false)
        };

        let compose_check = async {
            Command::new(&docker_bin)
                .current_dir(&cwd_buf)
                .args(["compose", "version"])
                .output()
                .await
                .map(|o| o.status.success())
                .unwrap_or(false)
        };

        let (daemon_available, compose_available) = tokio::join!(daemon_check, compose_check);
        tracing::debug!(daemon_available, compose_available, bin = %docker_bin, "docker detection");

        DockerMeta {
            docker_bin,
            daemon_available,
            compose_available,
        }
    }

    /// Fail fast before any command that needs the daemon.
    pub fn ensure_available(&self) -> Result<()> {
        if !self.daemon_available {
            return Err(anyhow!(
                "docker daemon is not reachable (is Docker running, and is '{}' in PATH?)",
                self.docker_bin
            ));
        }
        if !self.compose_available {
            return Err(anyhow!(
                "'{} compose' is not available (install the Docker Compose plugin)",
                self.docker_bin
            ));
        }
        Ok(())
    }
}

async fn cmd_out(bin: &str, cwd: &Path, args: &[&str]) -> Result<String> {
    let out = Command::new(bin).current_dir(cwd).args(args).output().await?;
    if !out.status.success() {
        return Err(anyhow!("command failed: {bin} {:?}", args));
    }
    Ok(String::from_utf8_lossy(&out.stdout).trim_end().to_string())
}

/// Run `docker compose --profile <profile> <args>` with inherited stdio,
/// blocking until it exits, and return its exit code.
pub async fn compose(meta: &DockerMeta, cwd: &Path, profile: &str, args: &[&str]) -> Result<i32> {
    let mut full: Vec<&str> = vec!["compose", "--profile", profile];
    full.extend_from_slice(args);
    compose_raw(meta, cwd, &full).await
}

/// Same as [`compose`] but without a profile flag, for commands like `logs`
/// that apply across profiles.
pub async fn compose_plain(meta: &DockerMeta, cwd: &Path, args: &[&str]) -> Result<i32> {
    let mut full: Vec<&str> = vec!["compose"];
    full.extend_from_slice(args);
    compose_raw(meta, cwd, &full).await
}

async fn compose_raw(meta: &DockerMeta, cwd: &Path, full: &[&str]) -> Result<i32> {
    let status = Command::new(&meta.docker_bin)
        .current_dir(cwd)
        .args(full)
        .envs(std::env::vars())
        .status()
        .await?;
    Ok(status.code().unwrap_or(if status.success() { 0 } else { 1 }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComposeService {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Service", default)]
    pub service: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}

/// List services of one compose profile via `compose ps --format json`.
/// Compose emits either a JSON array or one object per line depending on
/// version; both are handled.
pub async fn compose_ps(meta: &DockerMeta, cwd: &Path, profile: &str) -> Result<Vec<ComposeService>> {
    let out = cmd_out(
        &meta.docker_bin,
        cwd,
        &["compose", "--profile", profile, "ps", "-a", "--format", "json"],
    )
    .await?;

    let mut services = parse_ps_output(&out);
    services.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(services)
}

fn parse_ps_output(out: &str) -> Vec<ComposeService> {
    let trimmed = out.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).unwrap_or_default();
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(|l| serde_json::from_str::<ComposeService>(l).ok())
        .map(|mut s| {
            if s.state.trim().is_empty() {
                s.state = "unknown".to_string();
            }
            s
        })
        .collect()
}

/// `docker system prune -f`, used by `clean all`. Failure is reported but
/// not fatal to the clean itself.
pub async fn system_prune(meta: &DockerMeta, cwd: &Path) -> Result<()> {
    let status = Command::new(&meta.docker_bin)
        .current_dir(cwd)
        .args(["system", "prune", "-f"])
        .status()
        .await?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("docker system prune failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ndjson_ps_output() {
        let out = r#"
{"Name":"coesi-graphdb-1","Service":"graphdb","State":"running","Status":"Up 2 hours"}
{"Name":"coesi-core-api-1","Service":"core-api","State":"exited","Status":"Exited (0)"}
"#;
        let services = parse_ps_output(out);
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].service, "graphdb");
        assert_eq!(services[1].state, "exited");
    }

    #[test]
    fn parses_array_ps_output() {
        let out = r#"[{"Name":"coesi-graphdb-1","Service":"graphdb","State":"running","Status":"Up"}]"#;
        let services = parse_ps_output(out);
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "coesi-graphdb-1");
    }

    #[test]
    fn empty_ps_output_is_no_services() {
        assert!(parse_ps_output("").is_empty());
        assert!(parse_ps_output("  \n").is_empty());
    }
}
