//! CSS property table reader.
//!
//! One property per line, tab separated: `name`, value grammar, initial
//! value. Blank lines and lines starting with `#` are ignored.

use tracing::warn;

use attrgen_core::CssPropertyRow;

/// Read the property table. Malformed rows are kept with an empty initial
/// value and a warning, so one bad row never blocks generation.
pub fn parse_css_table(source: &str) -> Vec<CssPropertyRow> {
    let mut rows = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim_end_matches('\r');
        if text.trim().is_empty() || text.trim_start().starts_with('#') {
            continue;
        }

        let mut columns = text.split('\t').map(str::trim);
        let name = columns
            .next()
            .unwrap_or_default()
            .trim_matches(|c| c == '\'' || c == '"');
        if name.is_empty() {
            warn!(line, "property row without a name, skipped");
            continue;
        }

        let values = columns.next().unwrap_or_default();
        let initial = match columns.next() {
            Some(initial) => initial,
            None => {
                warn!(line, property = name, "row has fewer than three columns");
                ""
            }
        };

        rows.push(CssPropertyRow {
            name: name.to_string(),
            values: values.to_string(),
            initial: initial.to_string(),
            line,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_and_comments() {
        let table = "# name\tvalues\tinitial\n\
                     'fill'\t<paint>\tblack\n\
                     \n\
                     stroke-linecap\tbutt | round | square | inherit\tbutt\n";
        let rows = parse_css_table(table);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "fill");
        assert_eq!(rows[0].values, "<paint>");
        assert_eq!(rows[0].initial, "black");
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].name, "stroke-linecap");
        assert_eq!(rows[1].line, 4);
    }

    #[test]
    fn test_short_row_gets_empty_initial() {
        let rows = parse_css_table("opacity\t<number>\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values, "<number>");
        assert_eq!(rows[0].initial, "");
    }

    #[test]
    fn test_nameless_row_skipped() {
        let rows = parse_css_table("\t<number>\t1\r\nclip\tauto\tauto\r\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "clip");
        assert_eq!(rows[0].initial, "auto");
    }
}
