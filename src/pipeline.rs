// src/pipeline.rs

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument};

use crate::rewrite::{DumpRewriter, RewriteStats};
use crate::schema::{ColumnLookup, SchemaResolver};

/// Input and output handles, opened up front and held for the whole run.
pub struct DumpFiles {
    input: BufReader<File>,
    output: BufWriter<File>,
    output_path: PathBuf,
}

impl DumpFiles {
    pub fn open(input: &Path, output: &Path) -> Result<Self> {
        let fin = File::open(input)
            .with_context(|| format!("opening input file {}", input.display()))?;
        let fout = File::create(output)
            .with_context(|| format!("opening output file {}", output.display()))?;
        Ok(Self {
            input: BufReader::new(fin),
            output: BufWriter::new(fout),
            output_path: output.to_path_buf(),
        })
    }

    /// Rewrite the whole dump against `lookup`.
    #[instrument(level = "info", skip_all, fields(output = %self.output_path.display()))]
    pub fn rewrite<L: ColumnLookup>(self, lookup: L) -> Result<RewriteStats> {
        let start = Instant::now();
        info!("processing backup file");

        let rewriter = DumpRewriter::new(SchemaResolver::new(lookup));
        let stats = rewriter.rewrite(self.input, self.output)?;

        stats.log_summary();
        info!(elapsed = ?start.elapsed(), "preprocessing complete; output written to {}", self.output_path.display());
        Ok(stats)
    }
}

pub fn write_summary(path: &Path, stats: &RewriteStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats).context("serializing run summary")?;
    fs::write(path, json).with_context(|| format!("writing run summary {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::resolve::tests::FakeCatalog;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    const DUMP: &str = "\
--
-- PostgreSQL database dump
--

SET client_encoding = 'UTF8';

COPY public.user_v1 (id, name, hash, legacy_flag) FROM stdin;
1\talice\tabc\tt
2\tbob\tdef\t
\\.

COPY public.map_v1 (id, title) FROM stdin;
7\tDeep Space\t
\\.

SELECT pg_catalog.setval('public.user_v1_id_seq', 2, true);
";

    #[test]
    fn rewrites_dump_file_end_to_end() -> Result<()> {
        let mut input = NamedTempFile::new()?;
        input.write_all(DUMP.as_bytes())?;
        let dir = tempdir()?;
        let output = dir.path().join("restore.sql");

        let catalog = FakeCatalog::default().with_table("public.user_v1", &["id", "name", "hash"]);
        let stats = DumpFiles::open(input.path(), &output)?.rewrite(&catalog)?;

        let written = fs::read_to_string(&output)?;
        assert!(written.contains("COPY public.user_v1 (id, name, hash) FROM stdin;\n1\talice\tabc\n2\tbob\tdef\n\\.\n"));
        assert!(written.contains("COPY public.map_v1 (id, title) FROM stdin;\n7\tDeep Space\t\n\\.\n"));
        assert!(written.starts_with("--\n-- PostgreSQL database dump\n--\n\nSET client_encoding = 'UTF8';\n"));
        assert!(written.ends_with("SELECT pg_catalog.setval('public.user_v1_id_seq', 2, true);\n"));

        assert_eq!(stats.blocks, 2);
        assert_eq!(stats.headers_rewritten, 1);
        assert_eq!(stats.blocks_unchecked, 1);
        assert_eq!(stats.rows_truncated, 1);
        assert_eq!(stats.rows_trailing_dropped, 1);
        Ok(())
    }

    #[test]
    fn missing_input_is_fatal() {
        let dir = tempdir().unwrap();
        let err = DumpFiles::open(&dir.path().join("nope.sql"), &dir.path().join("out.sql"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("opening input file"));
    }

    #[test]
    fn unwritable_output_is_fatal() {
        let input = NamedTempFile::new().unwrap();
        let dir = tempdir().unwrap();
        let err = DumpFiles::open(input.path(), &dir.path().join("missing").join("out.sql"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("opening output file"));
    }

    #[test]
    fn summary_is_written_as_json() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("summary.json");
        let stats = RewriteStats {
            blocks: 3,
            rows_truncated: 5,
            ..RewriteStats::default()
        };
        write_summary(&path, &stats)?;
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(value["blocks"], 3);
        assert_eq!(value["rows_truncated"], 5);
        assert_eq!(value["ended_inside_block"], false);
        Ok(())
    }
}
