use anyhow::Result;
use clap::{error::ErrorKind, Parser};
use restoreprep::{
    config::{
        Config, DEFAULT_CONTAINERS, DEFAULT_DATABASE, DEFAULT_DEV_DATABASE, DEFAULT_DEV_PATTERN,
        DEFAULT_DOCKER, DEFAULT_USER,
    },
    discover_target, pipeline, DockerCli, DumpFiles,
};
use std::{ffi::OsString, path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Rewrite a pg_dump --data-only file so it restores into a target database
/// whose tables have drifted from the dump's schema.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Data-only dump to read.
    input: PathBuf,

    /// Where to write the adjusted dump.
    output: PathBuf,

    /// Candidate database containers, probed in order.
    #[arg(
        long = "container",
        env = "RESTOREPREP_CONTAINERS",
        value_delimiter = ',',
        default_values = DEFAULT_CONTAINERS
    )]
    containers: Vec<String>,

    /// Database user for catalog queries.
    #[arg(long, env = "RESTOREPREP_USER", default_value = DEFAULT_USER)]
    user: String,

    /// Container-name substring that selects the dev database.
    #[arg(long, env = "RESTOREPREP_DEV_PATTERN", default_value = DEFAULT_DEV_PATTERN)]
    dev_pattern: String,

    #[arg(long, env = "RESTOREPREP_DEV_DATABASE", default_value = DEFAULT_DEV_DATABASE)]
    dev_database: String,

    #[arg(long, env = "RESTOREPREP_DATABASE", default_value = DEFAULT_DATABASE)]
    default_database: String,

    /// Container CLI binary.
    #[arg(long, env = "RESTOREPREP_DOCKER", default_value = DEFAULT_DOCKER)]
    docker: String,

    /// Write a JSON run summary to this path.
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        Config {
            input: self.input,
            output: self.output,
            candidates: self.containers,
            user: self.user,
            dev_pattern: self.dev_pattern,
            dev_database: self.dev_database,
            default_database: self.default_database,
            docker: self.docker,
            summary_json: self.summary_json,
        }
        .validate()
    }
}

fn main() -> ExitCode {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    ExitCode::from(cli_exit(std::env::args_os()))
}

/// Parse `argv`, run, and map the outcome to an exit status: usage errors
/// and fatal run errors are 1, `--help`/`--version` are 0.
fn cli_exit<I, T>(argv: I) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    // ─── 2) parse args; usage errors exit 1 ──────────────────────────
    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) => {
            // nothing left to report if stdout/stderr are gone
            e.print().ok();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
        }
    };

    match args.into_config().and_then(|config| run(&config)) {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn run(config: &Config) -> Result<()> {
    // ─── 3) open files before touching the environment ───────────────
    let files = DumpFiles::open(&config.input, &config.output)?;

    // ─── 4) locate the target database ───────────────────────────────
    let docker = DockerCli::new(&config.docker);
    let target = discover_target(&docker, config)?;

    // ─── 5) rewrite ──────────────────────────────────────────────────
    let stats = files.rewrite(docker.catalog(target))?;

    if let Some(path) = &config.summary_json {
        pipeline::write_summary(path, &stats)?;
        info!(path = %path.display(), "wrote run summary");
    }
    Ok(())
}
