// src/rewrite/state.rs

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::io::{BufRead, Write};
use tracing::{info, instrument, warn};

use super::header::CopyHeader;
use super::row::{reconcile_row, split_terminator, RowFix};
use super::stats::RewriteStats;
use crate::schema::{ColumnLookup, SchemaResolver, TableIdent};

/// End-of-data marker closing a COPY block.
pub const TERMINATOR: &str = "\\.";

/// Context of the currently open COPY block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContext {
    pub table: TableIdent,
    /// `None` when the target's columns are unknown; rows then pass through.
    pub expected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockState {
    Outside,
    Inside(BlockContext),
}

pub fn is_terminator(line: &str) -> bool {
    line.trim() == TERMINATOR
}

/// Line-at-a-time rewriter for COPY-style data dumps.
pub struct DumpRewriter<L> {
    resolver: SchemaResolver<L>,
    state: BlockState,
    stats: RewriteStats,
}

impl<L: ColumnLookup> DumpRewriter<L> {
    pub fn new(resolver: SchemaResolver<L>) -> Self {
        Self {
            resolver,
            state: BlockState::Outside,
            stats: RewriteStats::default(),
        }
    }

    pub fn state(&self) -> &BlockState {
        &self.state
    }

    pub fn stats(&self) -> &RewriteStats {
        &self.stats
    }

    /// Transform one input line (terminator included) into its output form.
    pub fn process_line<'a>(&mut self, line: &'a str) -> Cow<'a, str> {
        self.stats.lines += 1;

        let expected = match &self.state {
            BlockState::Outside => return self.outside_line(line),
            BlockState::Inside(ctx) => ctx.expected,
        };

        if is_terminator(line) {
            self.close_block();
            return Cow::Borrowed(line);
        }

        let Some(expected) = expected else {
            return Cow::Borrowed(line);
        };
        let (body, term) = split_terminator(line);
        let (row, fix) = reconcile_row(body, expected);
        self.stats.record_row(fix);
        match fix {
            RowFix::Unchanged | RowFix::Short => Cow::Borrowed(line),
            RowFix::DroppedTrailingEmpty | RowFix::Truncated { .. } => {
                Cow::Owned(format!("{}{}", row, term))
            }
        }
    }

    fn outside_line<'a>(&mut self, line: &'a str) -> Cow<'a, str> {
        let Some(header) = CopyHeader::parse(line) else {
            return Cow::Borrowed(line);
        };
        let table = header.table_ident();
        self.stats.blocks += 1;

        match self.resolver.resolve(&table) {
            Ok(cols) => {
                info!(
                    table = %table,
                    declared = header.declared_count(),
                    columns = cols.len(),
                    "rewrote COPY header"
                );
                self.stats.headers_rewritten += 1;
                let rewritten = header.with_columns(&cols);
                self.state = BlockState::Inside(BlockContext {
                    table,
                    expected: Some(cols.len()),
                });
                Cow::Owned(rewritten)
            }
            Err(err) => {
                warn!(
                    table = %table,
                    reason = %err,
                    "could not get target columns; leaving header unchanged"
                );
                self.stats.blocks_unchecked += 1;
                self.state = BlockState::Inside(BlockContext {
                    table,
                    expected: None,
                });
                Cow::Borrowed(line)
            }
        }
    }

    fn close_block(&mut self) {
        if let BlockState::Inside(ctx) = std::mem::replace(&mut self.state, BlockState::Outside) {
            info!(table = %ctx.table, "finished COPY block");
        }
    }

    /// Close out the pass, noting a block left open at end of input.
    pub fn finish(mut self) -> RewriteStats {
        if let BlockState::Inside(ctx) = &self.state {
            warn!(table = %ctx.table, "input ended inside COPY block");
            self.stats.ended_inside_block = true;
        }
        self.stats
    }

    /// Stream `reader` through the rewriter into `writer`, one line at a time.
    #[instrument(level = "info", skip_all)]
    pub fn rewrite<R: BufRead, W: Write>(
        mut self,
        mut reader: R,
        mut writer: W,
    ) -> Result<RewriteStats> {
        let mut line = String::new();
        let mut line_no: u64 = 0;
        loop {
            line.clear();
            line_no += 1;
            let n = reader
                .read_line(&mut line)
                .with_context(|| format!("reading dump line {}", line_no))?;
            if n == 0 {
                break;
            }
            let out = self.process_line(&line);
            writer
                .write_all(out.as_bytes())
                .with_context(|| format!("writing output for dump line {}", line_no))?;
        }
        writer.flush().context("flushing output")?;
        Ok(self.finish())
    }
}
