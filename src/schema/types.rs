// src/schema/types.rs

use std::fmt;

/// Schema used when a COPY header names a bare table.
pub const DEFAULT_SCHEMA: &str = "public";

/// A table named in a COPY header, split into catalog-ready parts.
///
/// `raw` is the token exactly as it appeared in the dump and is what gets
/// written back into rewritten headers. `schema` and `table` are unquoted so
/// they can be compared against `information_schema` values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableIdent {
    pub raw: String,
    pub schema: String,
    pub table: String,
}

impl TableIdent {
    /// Split `schema.table` on the first dot outside double quotes.
    pub fn parse(raw: &str) -> Self {
        let (schema, table) = match split_qualified(raw) {
            Some((schema, table)) => (unquote(schema), unquote(table)),
            None => (DEFAULT_SCHEMA.to_string(), unquote(raw)),
        };
        Self {
            raw: raw.to_string(),
            schema,
            table,
        }
    }
}

impl fmt::Display for TableIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_qualified(raw: &str) -> Option<(&str, &str)> {
    let mut in_quotes = false;
    for (i, c) in raw.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '.' if !in_quotes => return Some((&raw[..i], &raw[i + 1..])),
            _ => {}
        }
    }
    None
}

/// Strip one level of identifier quoting, collapsing `""` to `"`.
pub fn unquote(part: &str) -> String {
    if part.len() >= 2 && part.starts_with('"') && part.ends_with('"') {
        part[1..part.len() - 1].replace("\"\"", "\"")
    } else {
        part.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_table_defaults_to_public() {
        let t = TableIdent::parse("user_v1");
        assert_eq!(t.schema, "public");
        assert_eq!(t.table, "user_v1");
        assert_eq!(t.raw, "user_v1");
    }

    #[test]
    fn qualified_table_splits_on_first_dot() {
        let t = TableIdent::parse("audit.events.archive");
        assert_eq!(t.schema, "audit");
        assert_eq!(t.table, "events.archive");
    }

    #[test]
    fn quoted_parts_are_unquoted() {
        let t = TableIdent::parse(r#""My.Schema"."Order""#);
        assert_eq!(t.schema, "My.Schema");
        assert_eq!(t.table, "Order");
        assert_eq!(t.to_string(), r#""My.Schema"."Order""#);

        let t = TableIdent::parse(r#"public."say ""hi""""#);
        assert_eq!(t.table, r#"say "hi""#);
    }
}
