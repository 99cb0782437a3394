// src/rewrite/header.rs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::TableIdent;

static COPY_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(COPY\s+)(\S+)(\s+)\(([^)]*)\)(\s+FROM\s+stdin;)")
        .expect("valid COPY header regex")
});

/// The pieces of a `COPY <table> (<cols>) FROM stdin;` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyHeader<'a> {
    pub prefix: &'a str,
    pub table: &'a str,
    pub spacer: &'a str,
    pub columns: &'a str,
    pub suffix: &'a str,
    /// Whatever follows `stdin;`, line terminator included.
    pub rest: &'a str,
}

impl<'a> CopyHeader<'a> {
    /// Match a header at the start of `line`; anything else yields `None`.
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = COPY_HEADER.captures(line)?;
        let whole = caps.get(0)?;
        Some(Self {
            prefix: caps.get(1)?.as_str(),
            table: caps.get(2)?.as_str(),
            spacer: caps.get(3)?.as_str(),
            columns: caps.get(4)?.as_str(),
            suffix: caps.get(5)?.as_str(),
            rest: &line[whole.end()..],
        })
    }

    pub fn table_ident(&self) -> TableIdent {
        TableIdent::parse(self.table)
    }

    /// Number of columns the dump itself declares.
    pub fn declared_count(&self) -> usize {
        self.columns
            .split(',')
            .filter(|c| !c.trim().is_empty())
            .count()
    }

    /// Rebuild the line with `columns` in place of the declared list.
    pub fn with_columns(&self, columns: &[String]) -> String {
        format!(
            "{}{}{}({}){}{}",
            self.prefix,
            self.table,
            self.spacer,
            columns.join(", "),
            self.suffix,
            self.rest
        )
    }
}
