use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use chrono::NaiveTime;
use tracing::{debug, info, instrument};

use crate::cruzeiro::stats::error::{Result, StatsError};
use crate::cruzeiro::stats::model::{CellValue, SheetTable};

/// Read-only access to the sheets of a match workbook.
///
/// Sheet names come back in workbook order; every sheet is one competition.
pub trait WorkbookSource {
    /// Brings the sheet list and any cached sheets up to date with the
    /// underlying source. Called once before each report selects its sheets.
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    fn sheet_names(&self) -> &[String];

    /// Returns the named sheet as a table whose first row became the headers.
    fn read_sheet(&mut self, name: &str) -> Result<&SheetTable>;
}

/// Workbook handle backed by an `.xlsx` file.
///
/// Sheets are parsed on first use and cached by name. On [`refresh`] the cache
/// is dropped and the file reopened if its modification time changed, so
/// repeated reports over an unchanged file never parse a sheet twice.
///
/// [`refresh`]: WorkbookSource::refresh
pub struct ExcelWorkbook {
    path: PathBuf,
    workbook: Xlsx<BufReader<File>>,
    sheet_names: Vec<String>,
    modified: Option<SystemTime>,
    cache: HashMap<String, SheetTable>,
}

impl ExcelWorkbook {
    /// Opens the workbook. A missing or unreadable file is fatal: no report
    /// can run without it.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StatsError::MissingInput(path.to_path_buf()));
        }

        let workbook: Xlsx<_> = open_workbook(path)?;
        let sheet_names = workbook.sheet_names().to_vec();
        info!(sheet_count = sheet_names.len(), "workbook opened");

        Ok(Self {
            path: path.to_path_buf(),
            workbook,
            sheet_names,
            modified: modified_time(path),
            cache: HashMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkbookSource for ExcelWorkbook {
    fn refresh(&mut self) -> Result<()> {
        let modified = modified_time(&self.path);
        if modified == self.modified {
            return Ok(());
        }
        if modified.is_none() {
            return Err(StatsError::MissingInput(self.path.clone()));
        }

        info!(path = %self.path.display(), "workbook changed on disk, reloading");
        let workbook: Xlsx<_> = open_workbook(&self.path)?;
        self.sheet_names = workbook.sheet_names().to_vec();
        self.workbook = workbook;
        self.modified = modified;
        self.cache.clear();
        Ok(())
    }

    fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    fn read_sheet(&mut self, name: &str) -> Result<&SheetTable> {
        if !self.cache.contains_key(name) {
            let range = read_required_sheet(&mut self.workbook, name)?;
            let table = range_to_table(name, &range);
            debug!(sheet = name, rows = table.rows.len(), "sheet parsed");
            self.cache.insert(name.to_string(), table);
        }

        self.cache
            .get(name)
            .ok_or_else(|| StatsError::InvalidWorkbook(format!("missing sheet '{name}'")))
    }
}

/// Workbook held entirely in memory, used when sheets come from somewhere
/// other than an `.xlsx` file.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    sheet_names: Vec<String>,
    sheets: Vec<SheetTable>,
}

impl InMemoryWorkbook {
    pub fn new(sheets: Vec<SheetTable>) -> Self {
        Self {
            sheet_names: sheets.iter().map(|sheet| sheet.name.clone()).collect(),
            sheets,
        }
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    fn read_sheet(&mut self, name: &str) -> Result<&SheetTable> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name == name)
            .ok_or_else(|| StatsError::InvalidWorkbook(format!("missing sheet '{name}'")))
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| StatsError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(StatsError::from)?;
    Ok(range)
}

/// Uses the first row as headers and skips rows that are entirely blank.
fn range_to_table(name: &str, range: &calamine::Range<DataType>) -> SheetTable {
    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => Vec::new(),
    };

    let rows = rows_iter
        .map(|row| row.iter().map(cell_to_value).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| *cell != CellValue::Empty))
        .collect();

    SheetTable::new(name, &headers, rows)
}

fn cell_to_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(value) => CellValue::String(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Boolean(*value),
        DataType::Empty => CellValue::Empty,
        DataType::Error(_) => CellValue::Empty,
        DataType::DateTime(_) | DataType::DateTimeIso(_) => match date_text(cell) {
            Some(text) => CellValue::Date(text),
            None => CellValue::String(cell.to_string()),
        },
        other => CellValue::String(other.to_string()),
    }
}

/// Renders a date cell as `YYYY-MM-DD`, adding the time of day when it is
/// not midnight.
fn date_text(cell: &DataType) -> Option<String> {
    let datetime = cell.as_datetime()?;
    if Some(datetime.time()) == NaiveTime::from_hms_opt(0, 0, 0) {
        Some(datetime.date().format("%Y-%m-%d").to_string())
    } else {
        Some(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => date_text(other).unwrap_or_else(|| other.to_string()),
    }
}
