//! Runs a report across the sheets of a workbook.
//!
//! Sheet-level problems never abort a report: they are turned into
//! [`SheetWarning`]s at the sheet boundary and processing moves on to the next
//! sheet. A selected competition missing from the workbook yields an empty
//! report with a warning. Only a request without its player fails.

use tracing::{debug, info, instrument, warn};

use crate::cruzeiro::stats::aggregate::{self, ColumnRequirement, RankingTally, SheetRows};
use crate::cruzeiro::stats::error::{Result, StatsError};
use crate::cruzeiro::stats::io::excel_read::WorkbookSource;
use crate::cruzeiro::stats::model::{
    CompetitionSelection, EventKind, MatchRecord, ReportMode, SheetWarning, WarningKind,
};
use crate::cruzeiro::stats::report::{self, Report, ReportBody};

/// Parameters of one report computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub mode: ReportMode,
    /// Exact-match target, trimmed. Required by every non-ranking mode.
    pub player: Option<String>,
    /// Ignored by the goal and assist lists.
    pub competition: CompetitionSelection,
    /// Only used by the per-year ranking and the goal and assist lists.
    pub year: Option<i32>,
}

impl ReportRequest {
    pub fn new(mode: ReportMode) -> Self {
        Self {
            mode,
            player: None,
            competition: CompetitionSelection::All,
            year: None,
        }
    }

    pub fn with_player(mut self, player: &str) -> Self {
        let trimmed = player.trim();
        self.player = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn with_competition(mut self, competition: CompetitionSelection) -> Self {
        self.competition = competition;
        self
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    /// Year filter actually applied for this mode.
    fn effective_year(&self) -> Option<i32> {
        if self.mode.uses_year() { self.year } else { None }
    }
}

/// Parses a free-text year. Blank text means no filter; text that is not a
/// whole number is reported and also treated as no filter.
pub fn parse_year_filter(text: &str) -> Option<i32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<i32>() {
        Ok(year) => Some(year),
        Err(_) => {
            warn!(input = trimmed, "not a valid year, showing all years");
            None
        }
    }
}

/// Competitions offered for selection: the "all" option, then every sheet.
pub fn competition_options(workbook: &dyn WorkbookSource) -> Vec<String> {
    CompetitionSelection::options(workbook.sheet_names())
}

/// Sheets a report visits.
///
/// Goal and assist lists always cover the whole workbook, whatever
/// competition is selected. A selected competition with no sheet of its own
/// selects nothing and comes back as the warning to attach to the report.
pub fn select_sheets(
    sheet_names: &[String],
    mode: ReportMode,
    competition: &CompetitionSelection,
) -> std::result::Result<Vec<String>, SheetWarning> {
    match competition {
        CompetitionSelection::Named(name) if mode.uses_competition() => {
            if sheet_names.contains(name) {
                Ok(vec![name.clone()])
            } else {
                Err(SheetWarning {
                    sheet: name.clone(),
                    kind: WarningKind::UnknownCompetition,
                })
            }
        }
        _ => Ok(sheet_names.to_vec()),
    }
}

/// Computes the requested report over the workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(mode = %request.mode, competition = %request.competition, year = ?request.year)
)]
pub fn run_report(workbook: &mut dyn WorkbookSource, request: &ReportRequest) -> Result<Report> {
    let player = match (&request.player, request.mode.requires_player()) {
        (Some(player), true) => Some(player.as_str()),
        (None, true) => return Err(StatsError::PlayerRequired(request.mode)),
        (_, false) => None,
    };
    let year = request.effective_year();
    workbook.refresh()?;

    let mut warnings = Vec::new();
    let sheets = match select_sheets(workbook.sheet_names(), request.mode, &request.competition)
    {
        Ok(sheets) => sheets,
        Err(warning) => {
            warn!("{warning}");
            warnings.push(warning);
            Vec::new()
        }
    };
    debug!(sheet_count = sheets.len(), "sheets selected");

    let requirement = ColumnRequirement::for_mode(request.mode, year);
    let target = player.unwrap_or_default();

    let body = match request.mode {
        ReportMode::GeneralNumbers => {
            let mut per_sheet = Vec::new();
            for_each_sheet(workbook, &sheets, &requirement, &mut warnings, |records| {
                per_sheet.push(aggregate::general_numbers(records, target));
            });
            ReportBody::General(report::general_numbers(&per_sheet))
        }
        ReportMode::GamesWithParticipation => {
            let mut events = Vec::new();
            for_each_sheet(workbook, &sheets, &requirement, &mut warnings, |records| {
                events.extend(aggregate::games_with_participation(records, target));
            });
            ReportBody::Lines(report::participation_lines(&events))
        }
        ReportMode::Ranking | ReportMode::RankingByYear => {
            let mut tally = RankingTally::new();
            for_each_sheet(workbook, &sheets, &requirement, &mut warnings, |records| {
                tally.merge(aggregate::ranking(aggregate::filter_year(records, year)));
            });
            ReportBody::Ranking(report::ranking(&tally))
        }
        mode @ (ReportMode::GoalList | ReportMode::AssistList) => {
            let kind = if mode == ReportMode::GoalList {
                EventKind::Goal
            } else {
                EventKind::Assist
            };
            let mut events = Vec::new();
            for_each_sheet(workbook, &sheets, &requirement, &mut warnings, |records| {
                events.extend(aggregate::event_list(records, kind, target, year));
            });
            ReportBody::Lines(report::event_lines(&events))
        }
    };

    let report = Report::new(
        request.mode,
        player,
        &request.competition,
        year,
        body,
        warnings,
    );
    info!(
        empty = report.is_empty(),
        warnings = report.warnings.len(),
        "report computed"
    );
    Ok(report)
}

/// Feeds the typed rows of every usable sheet to `visit`, in sheet order.
///
/// Unreadable sheets and sheets missing required columns are skipped with
/// exactly one warning each.
fn for_each_sheet<F>(
    workbook: &mut dyn WorkbookSource,
    sheets: &[String],
    requirement: &ColumnRequirement,
    warnings: &mut Vec<SheetWarning>,
    mut visit: F,
) where
    F: FnMut(&[MatchRecord]),
{
    for sheet in sheets {
        let table = match workbook.read_sheet(sheet) {
            Ok(table) => table,
            Err(error) => {
                let warning = SheetWarning {
                    sheet: sheet.clone(),
                    kind: WarningKind::Unreadable(error.to_string()),
                };
                warn!("{warning}");
                warnings.push(warning);
                continue;
            }
        };

        match aggregate::prepare(table, requirement) {
            SheetRows::Ready(records) => {
                debug!(sheet = sheet.as_str(), rows = records.len(), "processing sheet");
                visit(&records);
            }
            SheetRows::MissingColumns(columns) => {
                let warning = SheetWarning {
                    sheet: sheet.clone(),
                    kind: WarningKind::MissingColumns(columns),
                };
                warn!("{warning}");
                warnings.push(warning);
            }
        }
    }
}
