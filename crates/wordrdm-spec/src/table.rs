//! Minimal delimited-text reading and writing.
//!
//! Rating norms and output matrices are plain CSV/TSV. Only the subset needed
//! here is supported: a header row, optional double-quoted fields with `""`
//! escapes, and no embedded newlines.

use std::fs;
use std::path::Path;

use crate::error::{RdmError, RdmResult};

/// A parsed delimited file: header plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DelimitedTable {
    /// Header cells.
    pub header: Vec<String>,
    /// Data rows with their 1-based source line numbers.
    pub rows: Vec<(usize, Vec<String>)>,
}

impl DelimitedTable {
    /// Parses delimited text. The first non-empty line is the header.
    pub fn parse(text: &str, delimiter: char) -> RdmResult<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (header_line, header_text) = lines.next().ok_or(RdmError::Parse {
            line: 1,
            message: "missing header row".to_string(),
        })?;
        let header = parse_record(header_text, delimiter, header_line)?;

        let mut rows = Vec::new();
        for (line_no, line) in lines {
            rows.push((line_no, parse_record(line, delimiter, line_no)?));
        }

        Ok(Self { header, rows })
    }

    /// Reads and parses a delimited file.
    pub fn read(path: &Path, delimiter: char) -> RdmResult<Self> {
        let text =
            fs::read_to_string(path).map_err(|e| RdmError::asset_load(path, e.to_string()))?;
        Self::parse(&text, delimiter).map_err(|e| RdmError::asset_load(path, e.to_string()))
    }

    /// Index of a named column.
    pub fn column_index(&self, name: &str) -> RdmResult<usize> {
        self.header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| RdmError::Parse {
                line: 1,
                message: format!(
                    "column '{}' not found (available: {})",
                    name,
                    self.header.join(", ")
                ),
            })
    }
}

/// Splits one line into fields, honoring double quotes.
pub fn parse_record(line: &str, delimiter: char, line_no: usize) -> RdmResult<Vec<String>> {
    let line = line.trim_end_matches('\r');
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == '"' && field.is_empty() {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }

    if in_quotes {
        return Err(RdmError::Parse {
            line: line_no,
            message: "unterminated quoted field".to_string(),
        });
    }
    fields.push(field);
    Ok(fields)
}

/// Quotes a field if it contains the delimiter, a quote, or a newline.
pub fn escape_field(value: &str, delimiter: char) -> String {
    if value.contains(delimiter) || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple() {
        let table = DelimitedTable::parse("WORD,O,N,C\ncat,0.9,0.8,0.7\n\ndog,1,1,1\n", ',').unwrap();
        assert_eq!(table.header, vec!["WORD", "O", "N", "C"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].0, 4);
        assert_eq!(table.rows[1].1, vec!["dog", "1", "1", "1"]);
    }

    #[test]
    fn test_quoted_fields() {
        let fields = parse_record(r#""a,b","say ""hi""",c"#, ',', 1).unwrap();
        assert_eq!(fields, vec!["a,b", "say \"hi\"", "c"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(parse_record("\"open,field", ',', 7).is_err());
    }

    #[test]
    fn test_tab_delimiter_and_bom() {
        let table = DelimitedTable::parse("\u{feff}Word\tConc.M\r\napple\t5.0\r\n", '\t').unwrap();
        assert_eq!(table.column_index("Word").unwrap(), 0);
        assert_eq!(table.column_index("Conc.M").unwrap(), 1);
        assert_eq!(table.rows[0].1, vec!["apple", "5.0"]);
    }

    #[test]
    fn test_missing_column() {
        let table = DelimitedTable::parse("a,b\n1,2\n", ',').unwrap();
        let err = table.column_index("IMAG").unwrap_err();
        assert!(err.to_string().contains("IMAG"));
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain", ','), "plain");
        assert_eq!(escape_field("a,b", ','), "\"a,b\"");
        assert_eq!(escape_field("q\"", ','), "\"q\"\"\"");
    }
}
