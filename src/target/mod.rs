// src/target/mod.rs

pub mod docker;

use anyhow::{bail, Result};
use tracing::{debug, info, instrument};

use crate::config::Config;

pub use docker::{DockerCli, PsqlCatalog};

/// The database the rewritten dump will be restored into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub container: String,
    pub database: String,
    pub user: String,
}

/// Checks whether a named container exists and responds.
pub trait ContainerProbe {
    fn exists(&self, name: &str) -> bool;
}

/// Pick the first candidate container the probe can see and map it to a
/// database name.
#[instrument(level = "info", skip_all, fields(candidates = config.candidates.len()))]
pub fn discover_target<P: ContainerProbe + ?Sized>(probe: &P, config: &Config) -> Result<Target> {
    for name in &config.candidates {
        if probe.exists(name) {
            let target = Target {
                container: name.clone(),
                database: config.database_for(name).to_string(),
                user: config.user.clone(),
            };
            info!(container = %target.container, "using database container");
            info!(database = %target.database, user = %target.user, "target database");
            return Ok(target);
        }
        debug!(container = %name, "container not found");
    }
    bail!(
        "no known Postgres container found; checked: {}",
        config.candidates.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeProbe {
        running: Vec<&'static str>,
        probed: RefCell<Vec<String>>,
    }

    impl FakeProbe {
        fn new(running: Vec<&'static str>) -> Self {
            Self {
                running,
                probed: RefCell::new(Vec::new()),
            }
        }
    }

    impl ContainerProbe for FakeProbe {
        fn exists(&self, name: &str) -> bool {
            self.probed.borrow_mut().push(name.to_string());
            self.running.iter().any(|r| *r == name)
        }
    }

    #[test]
    fn first_running_candidate_wins() {
        let config = Config::default();
        let probe = FakeProbe::new(vec!["wanderer-wanderer_db-1", "wanderer_devcontainer-db-1"]);
        let target = discover_target(&probe, &config).unwrap();
        assert_eq!(target.container, "wanderer-wanderer_db-1");
        assert_eq!(target.database, "postgres");
        assert_eq!(target.user, "postgres");
        assert_eq!(probe.probed.borrow().len(), 1);
    }

    #[test]
    fn devcontainer_maps_to_dev_database() {
        let config = Config::default();
        let probe = FakeProbe::new(vec!["wanderer_devcontainer-db-1"]);
        let target = discover_target(&probe, &config).unwrap();
        assert_eq!(target.container, "wanderer_devcontainer-db-1");
        assert_eq!(target.database, "wanderer_dev");
        assert_eq!(
            *probe.probed.borrow(),
            vec!["wanderer-wanderer_db-1", "wanderer_devcontainer-db-1"]
        );
    }

    #[test]
    fn no_candidate_is_fatal() {
        let config = Config::default();
        let probe = FakeProbe::new(vec!["something-else"]);
        let err = discover_target(&probe, &config).unwrap_err();
        assert!(err.to_string().contains("wanderer-wanderer_db-1"));
    }
}
