// src/rewrite/stats.rs

use serde::Serialize;
use tracing::info;

use super::row::RowFix;

/// Counters collected over one rewriting pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    pub lines: u64,
    pub blocks: u64,
    pub headers_rewritten: u64,
    pub blocks_unchecked: u64,
    pub rows_checked: u64,
    pub rows_trailing_dropped: u64,
    pub rows_truncated: u64,
    pub fields_discarded: u64,
    pub rows_short: u64,
    /// Input ended before the last block's terminator.
    pub ended_inside_block: bool,
}

impl RewriteStats {
    pub(crate) fn record_row(&mut self, fix: RowFix) {
        self.rows_checked += 1;
        match fix {
            RowFix::Unchanged => {}
            RowFix::DroppedTrailingEmpty => self.rows_trailing_dropped += 1,
            RowFix::Truncated { discarded } => {
                self.rows_truncated += 1;
                self.fields_discarded += discarded as u64;
            }
            RowFix::Short => self.rows_short += 1,
        }
    }

    pub fn log_summary(&self) {
        info!(
            lines = self.lines,
            blocks = self.blocks,
            rewritten = self.headers_rewritten,
            unchecked = self.blocks_unchecked,
            rows = self.rows_checked,
            trailing_dropped = self.rows_trailing_dropped,
            truncated = self.rows_truncated,
            fields_discarded = self.fields_discarded,
            short = self.rows_short,
            "rewrite summary"
        );
    }
}
