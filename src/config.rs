use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_CONTAINERS: [&str; 2] = ["wanderer-wanderer_db-1", "wanderer_devcontainer-db-1"];
pub const DEFAULT_USER: &str = "postgres";
pub const DEFAULT_DEV_PATTERN: &str = "devcontainer";
pub const DEFAULT_DEV_DATABASE: &str = "wanderer_dev";
pub const DEFAULT_DATABASE: &str = "postgres";
pub const DEFAULT_DOCKER: &str = "docker";

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Containers to probe, in order.
    pub candidates: Vec<String>,
    pub user: String,
    /// Container-name substring that selects `dev_database`.
    pub dev_pattern: String,
    pub dev_database: String,
    pub default_database: String,
    /// Container CLI binary.
    pub docker: String,
    pub summary_json: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::new(),
            candidates: DEFAULT_CONTAINERS.iter().map(|c| c.to_string()).collect(),
            user: DEFAULT_USER.to_string(),
            dev_pattern: DEFAULT_DEV_PATTERN.to_string(),
            dev_database: DEFAULT_DEV_DATABASE.to_string(),
            default_database: DEFAULT_DATABASE.to_string(),
            docker: DEFAULT_DOCKER.to_string(),
            summary_json: None,
        }
    }
}

impl Config {
    pub fn validate(self) -> Result<Self> {
        if self.candidates.iter().all(|c| c.trim().is_empty()) {
            bail!("at least one candidate container is required");
        }
        if self.user.trim().is_empty() {
            bail!("database user cannot be empty");
        }
        if self.dev_database.trim().is_empty() || self.default_database.trim().is_empty() {
            bail!("database names cannot be empty");
        }
        if self.docker.trim().is_empty() {
            bail!("container CLI path cannot be empty");
        }
        let candidates = self
            .candidates
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        Ok(Self { candidates, ..self })
    }

    /// Database to query inside `container`.
    pub fn database_for(&self, container: &str) -> &str {
        if !self.dev_pattern.is_empty() && container.contains(&self.dev_pattern) {
            &self.dev_database
        } else {
            &self.default_database
        }
    }
}
