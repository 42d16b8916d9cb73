use crate::{
    data::{Cell, Table},
    error::ExportError,
};
use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;
use tracing::{debug, info, warn};

/// A text column holding dates in a fixed chrono format, e.g. `%B %d, %Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateColumn {
    pub name: &'static str,
    pub format: &'static str,
}

/// Parses the text cells of `column` into dates. Cells that do not parse, or fall outside the
/// years a spreadsheet can hold, are kept as they are. Returns the number of converted cells.
pub fn normalize_dates(table: &mut Table, column: &DateColumn) -> usize {
    let Some(idx) = table.column_index(column.name) else {
        if !table.is_empty() {
            warn!("Unable to convert {} column to date: no such column", column.name);
        }
        return 0;
    };

    let mut converted = 0;
    let mut malformed = 0;
    for row in &mut table.rows {
        let Some(cell) = row.get_mut(idx) else {
            continue;
        };
        if let Cell::Text(text) = cell {
            match NaiveDate::parse_from_str(text.trim(), column.format) {
                Ok(date) if excel_date(date).is_some() => {
                    *cell = Cell::Date(date);
                    converted += 1;
                }
                _ => malformed += 1,
            }
        }
    }

    if malformed > 0 {
        warn!(
            "{} values of {} are not dates in format {:?}, left unchanged",
            malformed, column.name, column.format
        );
    }
    converted
}

/// Writes the table as a single sheet, header first. The parent directory is created when missing.
pub fn write_xlsx(table: &Table, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    if table.columns.len() > usize::from(u16::MAX) {
        return Err(ExportError::TooManyColumns(table.columns.len()));
    }

    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = workbook.add_worksheet();

    for (col, name) in table.columns.iter().enumerate() {
        sheet.write_string(0, col as u16, name)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = i as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(r, col, s)?;
                }
                Cell::Date(d) => match excel_date(*d) {
                    Some(date) => {
                        sheet.write_datetime_with_format(r, col, &date, &date_format)?;
                    }
                    None => {
                        warn!("Date {} out of spreadsheet range, written as text", d);
                        sheet.write_string(r, col, &d.to_string())?;
                    }
                },
                Cell::Empty => {}
            }
        }
    }

    workbook.save(path)?;
    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

// Spreadsheet dates cover the years 1900 to 9999.
fn excel_date(d: NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(d.year()).ok()?;
    ExcelDateTime::from_ymd(year, d.month() as u8, d.day() as u8).ok()
}

/// Reads back a sheet written by [`write_xlsx`]. `None` when the file does not exist.
pub fn read_xlsx(path: &Path) -> Result<Option<Table>, ExportError> {
    if !path.exists() {
        debug!("No previous export at {}", path.display());
        return Ok(None);
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ExportError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Some(Table::default()));
    };

    let mut table = Table::new(header.iter().map(|c| c.to_string()).collect());
    let width = table.columns.len();
    for row in rows {
        let mut cells: Vec<Cell> = row.iter().take(width).map(read_cell).collect();
        cells.resize(width, Cell::Empty);
        table.rows.push(cells);
    }

    info!("Read {} rows from {}", table.len(), path.display());
    Ok(Some(table))
}

fn read_cell(cell: &Data) -> Cell {
    if cell.is_empty() {
        return Cell::Empty;
    }
    if cell.is_datetime() {
        if let Some(date) = cell.as_date() {
            return Cell::Date(date);
        }
    }
    Cell::Text(cell.to_string())
}
