//! `.xlsx` workbooks. Only the first worksheet is read.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::NaiveTime;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, XlsxError};

use super::{Row, Sheet, SheetError};

pub(super) fn read(bytes: &[u8]) -> Result<Sheet, SheetError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| SheetError::Workbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::Empty)?
        .map_err(|e| SheetError::Workbook(e.to_string()))?;

    // The range starts at the first non-empty cell; keep absolute positions.
    let Some((first_row, first_col)) = range.start() else {
        return Err(SheetError::Empty);
    };
    let lead = first_col as usize;
    let cells = |row: &[Data]| -> Vec<String> {
        std::iter::repeat(String::new())
            .take(lead)
            .chain(row.iter().map(cell_text))
            .collect()
    };

    let mut records = range.rows().enumerate();
    let header = match records.next() {
        Some((_, row)) => cells(row),
        None => return Err(SheetError::Empty),
    };
    if header.iter().all(String::is_empty) {
        return Err(SheetError::Empty);
    }

    let mut rows = Vec::new();
    for (index, record) in records {
        let row = Row::new(first_row as usize + index + 1, cells(record));
        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(Sheet { header, rows })
}

/// Render a cell the way it would read in a delimited export.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        // f64's Display drops a zero fraction: 5550100.0 reads as "5550100".
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(at) if at.time() == NaiveTime::MIN => at.format("%Y-%m-%d").to_string(),
            Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::Error(e) => e.to_string(),
    }
}

pub(super) fn write<I>(header: &[&str], rows: I) -> Result<Vec<u8>, SheetError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, title) in header.iter().enumerate() {
        worksheet
            .write_string_with_format(0, column(col)?, *title, &bold)
            .map_err(write_error)?;
    }
    for (index, row) in rows.into_iter().enumerate() {
        let line = RowNum::try_from(index + 1)
            .map_err(|_| SheetError::Write(format!("row {} is out of range", index + 2)))?;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(line, column(col)?, value)
                .map_err(write_error)?;
        }
    }

    workbook.save_to_buffer().map_err(write_error)
}

fn column(index: usize) -> Result<ColNum, SheetError> {
    ColNum::try_from(index).map_err(|_| SheetError::Write(format!("column {index} is out of range")))
}

fn write_error(err: XlsxError) -> SheetError {
    SheetError::Write(err.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_xlsxwriter::ExcelDateTime;

    use super::*;

    #[test]
    fn typed_cells_read_as_text() {
        let mut workbook = Workbook::new();
        let date = Format::new().set_num_format("yyyy-mm-dd");
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "username").unwrap();
        sheet.write_string(0, 1, "phone").unwrap();
        sheet.write_string(0, 2, "active").unwrap();
        sheet.write_string(0, 3, "joined").unwrap();
        sheet.write_string(1, 0, "  alice ").unwrap();
        sheet.write_number(1, 1, 5550100.0).unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        let joined = ExcelDateTime::from_ymd(2024, 3, 9).unwrap();
        sheet
            .write_datetime_with_format(1, 3, &joined, &date)
            .unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let sheet = read(&bytes).unwrap();
        assert_eq!(sheet.header, vec!["username", "phone", "active", "joined"]);
        assert_eq!(
            sheet.rows[0].cells,
            vec!["alice", "5550100", "true", "2024-03-09"]
        );
    }

    #[test]
    fn offset_data_keeps_sheet_positions() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(2, 1, "email").unwrap();
        sheet.write_string(3, 1, "a@x.com").unwrap();
        sheet.write_string(5, 1, "b@x.com").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let sheet = read(&bytes).unwrap();
        assert_eq!(sheet.header, vec!["", "email"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].number, 4);
        assert_eq!(sheet.rows[0].cell(1), "a@x.com");
        assert_eq!(sheet.rows[1].number, 6);
    }

    #[test]
    fn header_only_workbook_has_no_rows() {
        let bytes = write(&["username", "email"], Vec::new()).unwrap();
        let sheet = read(&bytes).unwrap();
        assert_eq!(sheet.header, vec!["username", "email"]);
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn blank_workbook_is_empty() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let bytes = workbook.save_to_buffer().unwrap();
        assert_matches!(read(&bytes), Err(SheetError::Empty));
    }

    #[test]
    fn truncated_archive_is_unreadable() {
        assert_matches!(read(b"PK\x03\x04not a workbook"), Err(SheetError::Workbook(_)));
    }

    #[test]
    fn empty_cells_are_left_blank() {
        let bytes = write(
            &["ID", "Phone", "Address"],
            vec![vec!["7".to_string(), String::new(), "1 Main St".to_string()]],
        )
        .unwrap();
        let sheet = read(&bytes).unwrap();
        assert_eq!(sheet.rows[0].cells, vec!["7", "", "1 Main St"]);
    }
}
