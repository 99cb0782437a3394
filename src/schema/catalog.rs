// src/schema/catalog.rs

use tracing::trace;

use super::resolve::LookupError;
use super::types::TableIdent;

/// Catalog query returning one line: the table's columns, identifier-quoted,
/// joined by `", "` in ordinal order.
pub fn build_columns_query(table: &TableIdent) -> String {
    format!(
        "SELECT string_agg(quote_ident(column_name), ', ' ORDER BY ordinal_position) \
         FROM information_schema.columns \
         WHERE table_schema = '{}' AND table_name = '{}';",
        escape_literal(&table.schema),
        escape_literal(&table.table),
    )
}

fn escape_literal(s: &str) -> String {
    s.replace('\'', "''")
}

/// Parse the tuples-only output of the catalog query.
///
/// Blank output means the table has no columns in the target. Commas inside
/// double-quoted identifiers do not split.
pub fn parse_column_line(output: &str) -> Result<Vec<String>, LookupError> {
    let line = output.trim();
    if line.is_empty() {
        return Err(LookupError::NotFound);
    }
    if line.contains('\n') {
        return Err(LookupError::QueryFailed(format!(
            "expected a single result line, got {:?}",
            line
        )));
    }

    let mut cols = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                cols.push(finish_column(&current, line)?);
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if in_quotes {
        return Err(LookupError::QueryFailed(format!(
            "unbalanced quotes in column list {:?}",
            line
        )));
    }
    cols.push(finish_column(&current, line)?);

    trace!(columns = cols.len(), "parsed catalog output");
    Ok(cols)
}

fn finish_column(raw: &str, line: &str) -> Result<String, LookupError> {
    let col = raw.trim();
    if col.is_empty() {
        return Err(LookupError::QueryFailed(format!(
            "empty column name in {:?}",
            line
        )));
    }
    Ok(col.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_targets_schema_and_table() {
        let q = build_columns_query(&TableIdent::parse("public.user_v1"));
        assert!(q.contains("table_schema = 'public' AND table_name = 'user_v1'"));
        assert!(q.contains("ORDER BY ordinal_position"));
    }

    #[test]
    fn query_escapes_single_quotes() {
        let q = build_columns_query(&TableIdent::parse(r#"public."o'brien""#));
        assert!(q.contains("table_name = 'o''brien'"));
    }

    #[test]
    fn parses_psql_tuples_output() {
        let cols = parse_column_line(" id, name, hash, inserted_at\n\n").unwrap();
        assert_eq!(cols, vec!["id", "name", "hash", "inserted_at"]);
    }

    #[test]
    fn keeps_quoted_identifiers_whole() {
        let cols = parse_column_line(r#" id, "Last, First", "Order""#).unwrap();
        assert_eq!(cols, vec!["id", r#""Last, First""#, r#""Order""#]);
    }

    #[test]
    fn blank_output_is_not_found() {
        assert_eq!(parse_column_line("   \n"), Err(LookupError::NotFound));
    }

    #[test]
    fn garbage_is_query_failure() {
        assert!(matches!(
            parse_column_line(r#"id, "broken"#),
            Err(LookupError::QueryFailed(_))
        ));
        assert!(matches!(
            parse_column_line("id, , name"),
            Err(LookupError::QueryFailed(_))
        ));
        assert!(matches!(
            parse_column_line("id\nname"),
            Err(LookupError::QueryFailed(_))
        ));
    }
}
