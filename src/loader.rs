use csv::StringRecord;
use std::collections::HashSet;

use crate::error::ParseError;
use crate::table::Table;

/// Delimiters considered when sniffing the header line
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Parse decoded CSV text into a [`Table`]
///
/// The first non-blank record is the header. The delimiter is picked by
/// [`sniff_delimiter`]; quoting follows RFC 4180 with `"` as the quote
/// character. Blank lines are skipped, short rows are padded with empty
/// cells, and a row wider than the header is an error.
///
/// # Arguments
/// * `text` - The whole file, already decoded
///
/// # Returns
/// * `Result<Table, ParseError>` - The parsed table or the reason it could not be read
///
/// # Examples
/// ```
/// use csv_viewer::loader::parse_csv;
///
/// let table = parse_csv("a,b\n1,2\n3,4").unwrap();
/// assert_eq!(table.columns(), ["a", "b"]);
/// assert_eq!(table.row_count(), 2);
/// ```
pub fn parse_csv(text: &str) -> Result<Table, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader
        .records()
        .filter(|record| !matches!(record, Ok(r) if is_blank(r)));

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(ParseError::NoColumns),
    };
    let columns = dedupe_columns(&header);
    let width = columns.len();

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        if record.len() > width {
            return Err(ParseError::TooManyFields {
                expected: width,
                line: record.position().map(|p| p.line()).unwrap_or(0),
                found: record.len(),
            });
        }

        let mut row: Vec<String> = record.iter().map(String::from).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(Table::new(columns, rows)?)
}

/// Guess the field delimiter from the first non-blank line
///
/// Counts each candidate outside of quoted sections and returns the most
/// frequent one. Falls back to `,` when no candidate appears.
pub fn sniff_delimiter(text: &str) -> u8 {
    let Some(line) = text.lines().find(|line| !line.trim().is_empty()) else {
        return b',';
    };

    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut quoted = false;
    for byte in line.bytes() {
        if byte == b'"' {
            quoted = !quoted;
        } else if !quoted {
            if let Some(idx) = CANDIDATE_DELIMITERS.iter().position(|&d| d == byte) {
                counts[idx] += 1;
            }
        }
    }

    // Ties keep the earlier candidate, so `,` wins over the rest.
    let mut best = 0;
    for idx in 1..counts.len() {
        if counts[idx] > counts[best] {
            best = idx;
        }
    }

    if counts[best] == 0 {
        b','
    } else {
        CANDIDATE_DELIMITERS[best]
    }
}

/// A line holding nothing but whitespace counts as blank
fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|field| field.trim().is_empty())
}

/// Name empty headers `Unnamed: <idx>` and suffix repeats with `.1`, `.2`, ...
fn dedupe_columns(header: &StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(header.len());

    for (idx, name) in header.iter().enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(candidate.clone());
        columns.push(candidate);
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_header_and_rows() {
        let table = parse_csv("a,b\n1,2\n3,4").unwrap();
        assert_eq!(table.columns(), row(&["a", "b"]).as_slice());
        assert_eq!(table.rows(), &[row(&["1", "2"]), row(&["3", "4"])]);
    }

    #[test]
    fn header_only_gives_zero_rows() {
        let table = parse_csv("name,age\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn skips_blank_lines() {
        let table = parse_csv("\n\na,b\n\n1,2\n\n3,4\n\n").unwrap();
        assert_eq!(table.columns(), row(&["a", "b"]).as_slice());
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn handles_crlf_and_quotes() {
        let table = parse_csv("city,note\r\n\"Paris, FR\",\"said \"\"hi\"\"\"\r\n").unwrap();
        assert_eq!(table.rows(), &[row(&["Paris, FR", "said \"hi\""])]);
    }

    #[test]
    fn quoted_newline_stays_in_cell() {
        let table = parse_csv("a,b\n\"line1\nline2\",x\n").unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows()[0][0], "line1\nline2");
    }

    #[test]
    fn pads_short_rows() {
        let table = parse_csv("a,b,c\n1\n4,5\n").unwrap();
        assert_eq!(table.rows(), &[row(&["1", "", ""]), row(&["4", "5", ""])]);
    }

    #[test]
    fn rejects_wide_rows() {
        let err = parse_csv("a,b\n1,2\n3,4,5\n").unwrap_err();
        match err {
            ParseError::TooManyFields {
                expected,
                line,
                found,
            } => {
                assert_eq!(expected, 2);
                assert_eq!(line, 3);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(
            parse_csv("a,b\n1,2\n3,4,5\n").unwrap_err().to_string(),
            "Error tokenizing data. Expected 2 fields in line 3, saw 3"
        );
    }

    #[test]
    fn blank_input_has_no_columns() {
        assert!(matches!(parse_csv(""), Err(ParseError::NoColumns)));
        assert!(matches!(parse_csv("\n\r\n\n"), Err(ParseError::NoColumns)));
    }

    #[test]
    fn whitespace_only_input_has_no_columns() {
        assert!(matches!(parse_csv("   \n\t\n"), Err(ParseError::NoColumns)));
        assert!(matches!(parse_csv("  \r\n \n"), Err(ParseError::NoColumns)));
    }

    #[test]
    fn whitespace_lines_are_skipped() {
        let table = parse_csv("a,b\n1,2\n  \n\t\n3,4\n   ").unwrap();
        assert_eq!(table.rows(), &[row(&["1", "2"]), row(&["3", "4"])]);
    }

    #[test]
    fn duplicate_and_empty_headers_are_renamed() {
        let table = parse_csv("a,a,,a\n1,2,3,4\n").unwrap();
        assert_eq!(
            table.columns(),
            row(&["a", "a.1", "Unnamed: 2", "a.2"]).as_slice()
        );
    }

    #[test]
    fn sniffs_common_delimiters() {
        assert_eq!(sniff_delimiter("a,b,c\n"), b',');
        assert_eq!(sniff_delimiter("a;b;c\n1,5;2,5;3\n"), b';');
        assert_eq!(sniff_delimiter("a\tb\n"), b'\t');
        assert_eq!(sniff_delimiter("a|b|c"), b'|');
        assert_eq!(sniff_delimiter("single"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn sniff_ignores_quoted_delimiters() {
        assert_eq!(sniff_delimiter("\"x;y;z\",b\n"), b',');
    }

    #[test]
    fn semicolon_file_parses() {
        let table = parse_csv("name;price\nwidget;1,50\n").unwrap();
        assert_eq!(table.columns(), row(&["name", "price"]).as_slice());
        assert_eq!(table.rows(), &[row(&["widget", "1,50"])]);
    }

    #[test]
    fn semicolon_only_header_splits_columns() {
        let table = parse_csv("first;last\nAda;Lovelace\n").unwrap();
        assert_eq!(table.columns(), row(&["first", "last"]).as_slice());
        assert_eq!(table.rows(), &[row(&["Ada", "Lovelace"])]);
    }
}
