use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{info, instrument};

use crate::cruzeiro::stats::error::{Result, StatsError};
use crate::cruzeiro::stats::report::{Report, ReportBody, YearCell};

/// Name of the single sheet an exported report is written to.
pub const REPORT_SHEET: &str = "Relatório";

/// Writes the report into a new workbook at `path`.
///
/// Exports never overwrite the workbook the report was computed from.
#[instrument(
    level = "info",
    skip_all,
    fields(path = %path.display(), mode = %report.mode)
)]
pub fn write_report(path: &Path, source: &Path, report: &Report) -> Result<()> {
    if same_file(path, source) {
        return Err(StatsError::InvalidWorkbook(format!(
            "refusing to overwrite source workbook {}",
            source.display()
        )));
    }

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(REPORT_SHEET)?;
    worksheet.write_string_with_format(0, 0, &report.title, &bold)?;

    let written = match &report.body {
        ReportBody::General(rows) => {
            write_header(worksheet, &["Competição", "Ano", "Gols", "Assistências"], &bold)?;
            for (idx, row) in rows.iter().enumerate() {
                let line = (idx + 2) as u32;
                worksheet.write_string(line, 0, &row.competition)?;
                match row.year {
                    YearCell::Year(year) => worksheet.write_number(line, 1, year)?,
                    other => worksheet.write_string(line, 1, other.to_string())?,
                };
                worksheet.write_number(line, 2, row.goals)?;
                worksheet.write_number(line, 3, row.assists)?;
            }
            rows.len()
        }
        ReportBody::Ranking(entries) => {
            write_header(
                worksheet,
                &["Rank", "Jogador", "Gols", "Assistências", "Total Participações"],
                &bold,
            )?;
            for (idx, entry) in entries.iter().enumerate() {
                let line = (idx + 2) as u32;
                worksheet.write_number(line, 0, entry.rank as u32)?;
                worksheet.write_string(line, 1, &entry.player)?;
                worksheet.write_number(line, 2, entry.goals)?;
                worksheet.write_number(line, 3, entry.assists)?;
                worksheet.write_number(line, 4, entry.total)?;
            }
            entries.len()
        }
        ReportBody::Lines(_) => {
            let lines = report.numbered_lines();
            for (idx, line) in lines.iter().enumerate() {
                worksheet.write_string((idx + 1) as u32, 0, line)?;
            }
            lines.len()
        }
    };

    workbook.save(path)?;
    info!(rows = written, "report exported");
    Ok(())
}

fn write_header(worksheet: &mut Worksheet, columns: &[&str], format: &Format) -> Result<()> {
    for (col_idx, header) in columns.iter().enumerate() {
        worksheet.write_string_with_format(1, col_idx as u16, *header, format)?;
    }
    Ok(())
}

fn same_file(lhs: &Path, rhs: &Path) -> bool {
    match (lhs.canonicalize(), rhs.canonicalize()) {
        (Ok(lhs), Ok(rhs)) => lhs == rhs,
        _ => lhs == rhs,
    }
}
