//! Delimited text sheets.

use csv::{ReaderBuilder, Trim, WriterBuilder};

use super::{Row, Sheet, SheetError};

/// UTF-8 byte order mark emitted by some spreadsheet exporters.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Candidate delimiters, in tie-break order.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Pick the delimiter that occurs most often in the header line.
///
/// Falls back to `,` when the line contains none of the candidates.
pub fn detect_delimiter(first_line: &[u8]) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for &candidate in &DELIMITERS {
        let count = first_line.iter().filter(|&&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

pub(super) fn read(bytes: &[u8]) -> Result<Sheet, SheetError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let first_line = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
    let delimiter = detect_delimiter(first_line);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(bytes);

    let mut records = reader.records().enumerate();

    let header = match records.next() {
        Some((_, record)) => record
            .map_err(|e| SheetError::Malformed {
                row: 1,
                message: e.to_string(),
            })?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>(),
        None => return Err(SheetError::Empty),
    };

    let mut rows = Vec::new();
    for (index, record) in records {
        let number = index + 1;
        let record = record.map_err(|e| SheetError::Malformed {
            row: number,
            message: e.to_string(),
        })?;
        let row = Row::new(number, record.iter().map(str::to_string).collect());
        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(Sheet { header, rows })
}

pub(super) fn write<I>(header: &[&str], rows: I) -> Result<Vec<u8>, SheetError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(header)
        .map_err(|e| SheetError::Write(e.to_string()))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| SheetError::Write(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| SheetError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn rows_are_numbered_from_two() {
        let sheet = read(b"username,email\nalice,a@x.com\nbob,b@x.com\n").unwrap();
        assert_eq!(sheet.header, vec!["username", "email"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].number, 2);
        assert_eq!(sheet.rows[1].number, 3);
        assert_eq!(sheet.rows[1].cell(0), "bob");
    }

    #[test]
    fn cells_are_trimmed_and_short_rows_pad_with_empty() {
        let sheet = read(b"a,b,c\n  x  ,y\n").unwrap();
        let row = &sheet.rows[0];
        assert_eq!(row.cell(0), "x");
        assert_eq!(row.cell(1), "y");
        assert_eq!(row.cell(2), "");
        assert_eq!(row.cell(17), "");
    }

    #[test]
    fn semicolon_delimiter_is_detected() {
        let sheet = read(b"name;email\nalice;a@x.com\n").unwrap();
        assert_eq!(sheet.rows[0].cells, vec!["alice", "a@x.com"]);
    }

    #[test]
    fn detect_delimiter_defaults_to_comma() {
        assert_eq!(detect_delimiter(b"single"), b',');
        assert_eq!(detect_delimiter(b"a\tb\tc"), b'\t');
    }

    #[test]
    fn byte_order_mark_is_stripped() {
        let sheet = read(b"\xEF\xBB\xBFusername,email\nalice,a@x.com\n").unwrap();
        assert_eq!(sheet.header[0], "username");
    }

    #[test]
    fn blank_rows_are_skipped_but_keep_numbering() {
        let sheet = read(b"a,b\n1,2\n,\n3,4\n").unwrap();
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[1].number, 4);
    }

    #[test]
    fn header_only_sheet_has_no_rows() {
        let sheet = read(b"username,email\n").unwrap();
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_matches!(read(b""), Err(SheetError::Empty));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let result = read(b"a,b\n\xFF\xFE,x\n");
        assert_matches!(result, Err(SheetError::Malformed { row: 2, .. }));
    }

    #[test]
    fn written_sheet_quotes_embedded_delimiters() {
        let bytes = write(
            &["ID", "Address"],
            vec![vec!["1".to_string(), "12 Main St, Springfield".to_string()]],
        )
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "ID,Address\n1,\"12 Main St, Springfield\"\n");
    }
}
