use std::path::{Path, PathBuf};

/// Production address used when neither the command line nor the env file
/// supplies one.
pub const DEFAULT_PROD_IP: &str = "192.168.177.23";

/// Address the dev profile always deploys against.
pub const DEV_HOST: &str = "localhost";

/// Everything a command handler needs, resolved once at startup and passed
/// explicitly. No handler reads ambient globals.
#[derive(Debug, Clone)]
pub struct Context {
    pub root: PathBuf,
    pub docker_bin: String,
}

pub fn resolve_docker_binary() -> String {
    std::env::var("DOCKER_BIN").unwrap_or_else(|_| "docker".to_string())
}

/// Walk up from `start_dir` until a directory containing docker-compose.yml
/// is found. Commands must run from inside a COESI checkout.
pub fn find_project_root(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.to_path_buf();

    for _ in 0..12 {
        if dir.join("docker-compose.yml").exists() {
            return Some(dir);
        }
        match dir.parent() {
            Some(parent) if parent != dir => dir = parent.to_path_buf(),
            _ => break,
        }
    }
    None
}

/// Host ports of the platform services, read from the loaded environment
/// with the deployment template's defaults.
#[derive(Debug, Clone)]
pub struct Ports {
    pub graphdb: String,
    pub core_api: String,
    pub models_manager: String,
    pub validation_engine: String,
    pub scenario_manager: String,
    pub react_dashboard: String,
}

impl Ports {
    pub fn from_env() -> Self {
        Ports {
            graphdb: env_or("GRAPHDB_PORT", "7200"),
            core_api: env_or("CORE_API_PORT", "8000"),
            models_manager: env_or("MODELS_MANAGER_PORT", "8001"),
            validation_engine: env_or("VALIDATION_ENGINE_PORT", "8002"),
            scenario_manager: env_or("SCENARIO_MANAGER_PORT", "8003"),
            react_dashboard: env_or("REACT_DASHBOARD_PORT", "3000"),
        }
    }

    /// (service, url) pairs for the post-deploy summary.
    pub fn service_urls(&self, host: &str) -> Vec<(&'static str, String)> {
        vec![
            ("React Dashboard", format!("http://{host}:{}", self.react_dashboard)),
            ("GraphDB", format!("http://{host}:{}", self.graphdb)),
            ("Core API", format!("http://{host}:{}", self.core_api)),
            ("Model Manager", format!("http://{host}:{}", self.models_manager)),
            ("Validation", format!("http://{host}:{}", self.validation_engine)),
            ("Scenarios", format!("http://{host}:{}", self.scenario_manager)),
        ]
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
