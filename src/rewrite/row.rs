/// What reconciliation did to one data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFix {
    /// Field count already matched.
    Unchanged,
    /// Exactly one extra, empty trailing field was removed.
    DroppedTrailingEmpty,
    /// Fields past the expected count were discarded.
    Truncated { discarded: usize },
    /// Fewer fields than expected; passed through as-is.
    Short,
}

/// Split a line into its content and its terminator (`\n`, `\r\n` or none).
pub fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, &line[body.len()..])
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, &line[body.len()..])
    } else {
        (line, "")
    }
}

/// Fit a tab-separated row (no terminator) to `expected` fields.
///
/// A single trailing empty field is dropped first; any remaining surplus is
/// cut from the end. Short rows are never padded.
pub fn reconcile_row(row: &str, expected: usize) -> (String, RowFix) {
    let mut fields: Vec<&str> = row.split('\t').collect();
    let mut fix = RowFix::Unchanged;

    if fields.len() == expected + 1 && fields.last() == Some(&"") {
        fields.pop();
        fix = RowFix::DroppedTrailingEmpty;
    }
    if fields.len() > expected {
        let discarded = fields.len() - expected;
        fields.truncate(expected);
        fix = RowFix::Truncated { discarded };
    } else if fields.len() < expected {
        fix = RowFix::Short;
    }

    if fix == RowFix::Unchanged || fix == RowFix::Short {
        return (row.to_string(), fix);
    }
    (fields.join("\t"), fix)
}
