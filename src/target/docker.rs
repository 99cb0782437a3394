use std::process::{Command, Stdio};
use tracing::{debug, trace};

use super::{ContainerProbe, Target};
use crate::schema::{build_columns_query, parse_column_line, ColumnLookup, LookupError, TableIdent};

/// Thin wrapper over the `docker` (or compatible) CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Column lookups against `target` via `psql` inside its container.
    pub fn catalog(&self, target: Target) -> PsqlCatalog {
        PsqlCatalog {
            docker: self.clone(),
            target,
        }
    }
}

impl ContainerProbe for DockerCli {
    fn exists(&self, name: &str) -> bool {
        let status = Command::new(&self.program)
            .args(["inspect", name])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(s) => s.success(),
            Err(e) => {
                debug!(program = %self.program, error = %e, "failed to run container probe");
                false
            }
        }
    }
}

pub struct PsqlCatalog {
    docker: DockerCli,
    target: Target,
}

impl PsqlCatalog {
    fn psql_args(&self, query: &str) -> Vec<String> {
        vec![
            "exec".into(),
            "-i".into(),
            self.target.container.clone(),
            "psql".into(),
            "-U".into(),
            self.target.user.clone(),
            "-d".into(),
            self.target.database.clone(),
            "-t".into(),
            "-c".into(),
            query.to_string(),
        ]
    }
}

impl ColumnLookup for PsqlCatalog {
    fn lookup_columns(&self, table: &TableIdent) -> Result<Vec<String>, LookupError> {
        let args = self.psql_args(&build_columns_query(table));
        trace!(program = %self.docker.program, ?args, "running catalog query");

        let output = Command::new(&self.docker.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                LookupError::QueryFailed(format!("running {}: {}", self.docker.program, e))
            })?;

        if !output.status.success() {
            return Err(LookupError::QueryFailed(format!(
                "{} {} exited with {}: {}",
                self.docker.program,
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_column_line(&String::from_utf8_lossy(&output.stdout))
    }
}
