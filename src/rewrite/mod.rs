//! COPY-block rewriting: header column substitution plus per-row
//! reconciliation against the target's column count.

pub mod header;
pub mod row;
pub mod state;
pub mod stats;

pub use header::CopyHeader;
pub use row::{reconcile_row, RowFix};
pub use state::{BlockContext, BlockState, DumpRewriter};
pub use stats::RewriteStats;
