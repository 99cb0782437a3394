pub mod config;
pub mod pipeline;
pub mod rewrite;
pub mod schema;
pub mod target;

pub use config::Config;
pub use pipeline::DumpFiles;
pub use rewrite::{DumpRewriter, RewriteStats};
pub use schema::{ColumnLookup, LookupError, SchemaResolver, TableIdent};
pub use target::{discover_target, ContainerProbe, DockerCli, Target};
