use std::fmt;

use serde::Serialize;

use crate::cruzeiro::stats::participation::normalize;

/// Normalized header of the column listing goal scorers.
pub const GOALS_COLUMN: &str = "gols";
/// Normalized header of the column listing assist providers.
pub const ASSISTS_COLUMN: &str = "assistências";
/// Normalized header of the free-text match description.
pub const MATCH_COLUMN: &str = "partida";
/// Normalized header of the competition name.
pub const COMPETITION_COLUMN: &str = "campeonato";
/// Normalized header of the season year.
pub const YEAR_COLUMN: &str = "ano";

/// Placeholder printed when a row has no usable year, competition or match.
pub const UNKNOWN_LABEL: &str = "N/A";

/// A single cell read from a sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text cell, kept verbatim.
    String(String),
    /// Any numeric cell. Excel stores integers as floats too.
    Number(f64),
    /// Boolean cell.
    Boolean(bool),
    /// Date or date-time cell, already rendered as text.
    Date(String),
    /// Blank cell or a cell past the end of a short row.
    Empty,
}

impl CellValue {
    /// Returns the text of a string cell. Every other variant yields `None`,
    /// which the participation counter treats as zero participations.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Renders the cell for display, `None` when the cell is blank.
    pub fn to_display(&self) -> Option<String> {
        match self {
            CellValue::String(value) if value.trim().is_empty() => None,
            CellValue::String(value) => Some(value.clone()),
            CellValue::Number(value) => Some(value.to_string()),
            CellValue::Boolean(value) => Some(value.to_string()),
            CellValue::Date(value) => Some(value.clone()),
            CellValue::Empty => None,
        }
    }

    /// Coerces the cell into a year.
    ///
    /// Numbers and numeric text are accepted, fractional values truncated
    /// toward zero. Anything else is an unknown year.
    pub fn as_year(&self) -> Option<i32> {
        match self {
            CellValue::Number(value) => truncated_year(*value),
            CellValue::String(value) => {
                let trimmed = value.trim();
                match trimmed.parse::<i32>() {
                    Ok(year) => Some(year),
                    Err(_) => trimmed.parse::<f64>().ok().and_then(truncated_year),
                }
            }
            CellValue::Boolean(_) | CellValue::Date(_) | CellValue::Empty => None,
        }
    }
}

fn truncated_year(value: f64) -> Option<i32> {
    let year = value.trunc();
    if year.is_finite() && year >= f64::from(i32::MIN) && year <= f64::from(i32::MAX) {
        Some(year as i32)
    } else {
        None
    }
}

/// One sheet of the workbook in tabular form. Headers are normalized on
/// construction so lookups are case and whitespace insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, headers: &[String], rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            columns: headers.iter().map(|header| normalize(header)).collect(),
            rows,
        }
    }

    /// Position of the first column whose normalized header equals `column`.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|header| header == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Converts every row into a typed [`MatchRecord`]. Columns absent from
    /// the sheet leave the matching field unset.
    pub fn records(&self) -> Vec<MatchRecord> {
        let goals = self.column_index(GOALS_COLUMN);
        let assists = self.column_index(ASSISTS_COLUMN);
        let match_label = self.column_index(MATCH_COLUMN);
        let competition = self.column_index(COMPETITION_COLUMN);
        let year = self.column_index(YEAR_COLUMN);

        self.rows
            .iter()
            .map(|row| {
                let cell = |index: Option<usize>| index.and_then(|idx| row.get(idx));
                MatchRecord {
                    competition: cell(competition).and_then(CellValue::to_display),
                    year: cell(year).and_then(CellValue::as_year),
                    match_label: cell(match_label).and_then(CellValue::to_display),
                    scorers: cell(goals).and_then(|value| value.as_text().map(str::to_string)),
                    assists: cell(assists).and_then(|value| value.as_text().map(str::to_string)),
                }
            })
            .collect()
    }
}

/// One match row. Participant fields are only set when the source cell held
/// text; numeric or blank cells never count as participations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRecord {
    pub competition: Option<String>,
    pub year: Option<i32>,
    pub match_label: Option<String>,
    pub scorers: Option<String>,
    pub assists: Option<String>,
}

impl MatchRecord {
    /// Raw participant field for the given event kind.
    pub fn field(&self, kind: EventKind) -> Option<&str> {
        match kind {
            EventKind::Goal => self.scorers.as_deref(),
            EventKind::Assist => self.assists.as_deref(),
        }
    }
}

/// The two kinds of participation recorded per match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Goal,
    Assist,
}

impl EventKind {
    pub fn column(self) -> &'static str {
        match self {
            EventKind::Goal => GOALS_COLUMN,
            EventKind::Assist => ASSISTS_COLUMN,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            EventKind::Goal => "⚽",
            EventKind::Assist => "👟",
        }
    }

    /// Singular label used in participation lines.
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Goal => "Gol",
            EventKind::Assist => "Assistência",
        }
    }

    /// Plural label used in report titles.
    pub fn plural(self) -> &'static str {
        match self {
            EventKind::Goal => "Gols",
            EventKind::Assist => "Assistências",
        }
    }
}

/// Report types offered by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportMode {
    /// Goals and assists of one player grouped by competition and year.
    GeneralNumbers,
    /// One line per goal or assist of one player.
    GamesWithParticipation,
    /// All players ranked by participations.
    Ranking,
    /// Ranking restricted to a single year.
    RankingByYear,
    /// Every goal of one player across the whole workbook.
    GoalList,
    /// Every assist of one player across the whole workbook.
    AssistList,
}

impl ReportMode {
    pub fn requires_player(self) -> bool {
        !matches!(self, ReportMode::Ranking | ReportMode::RankingByYear)
    }

    /// List modes always scan every sheet.
    pub fn uses_competition(self) -> bool {
        self.event_kind().is_none()
    }

    pub fn uses_year(self) -> bool {
        matches!(
            self,
            ReportMode::RankingByYear | ReportMode::GoalList | ReportMode::AssistList
        )
    }

    pub fn event_kind(self) -> Option<EventKind> {
        match self {
            ReportMode::GoalList => Some(EventKind::Goal),
            ReportMode::AssistList => Some(EventKind::Assist),
            _ => None,
        }
    }

    /// Display name shown in report headers.
    pub fn title(self) -> &'static str {
        match self {
            ReportMode::GeneralNumbers => "Números Gerais (por jogador)",
            ReportMode::GamesWithParticipation => "Jogos com Participações (por jogador)",
            ReportMode::Ranking => "Ranking Geral (por competição)",
            ReportMode::RankingByYear => "Análise por Ano (Ranking)",
            ReportMode::GoalList => "Listar Gols (por jogador)",
            ReportMode::AssistList => "Listar Assistências (por jogador)",
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportMode::GeneralNumbers => write!(f, "general"),
            ReportMode::GamesWithParticipation => write!(f, "games"),
            ReportMode::Ranking => write!(f, "ranking"),
            ReportMode::RankingByYear => write!(f, "ranking-by-year"),
            ReportMode::GoalList => write!(f, "goals"),
            ReportMode::AssistList => write!(f, "assists"),
        }
    }
}

/// Which sheets a competition-scoped report visits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CompetitionSelection {
    #[default]
    All,
    Named(String),
}

impl CompetitionSelection {
    /// Label that selects every competition.
    pub const ALL_LABEL: &'static str = "Todas";

    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed == Self::ALL_LABEL {
            CompetitionSelection::All
        } else {
            CompetitionSelection::Named(trimmed.to_string())
        }
    }

    /// Selectable options: the "all" label followed by every sheet name.
    pub fn options(sheet_names: &[String]) -> Vec<String> {
        std::iter::once(Self::ALL_LABEL.to_string())
            .chain(sheet_names.iter().cloned())
            .collect()
    }
}

impl fmt::Display for CompetitionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompetitionSelection::All => write!(f, "{}", Self::ALL_LABEL),
            CompetitionSelection::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Running goal and assist count for one key during a single report pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTally {
    pub goals: u32,
    pub assists: u32,
}

impl PlayerTally {
    pub fn total(&self) -> u32 {
        self.goals + self.assists
    }

    pub fn record(&mut self, kind: EventKind, count: u32) {
        match kind {
            EventKind::Goal => self.goals += count,
            EventKind::Assist => self.assists += count,
        }
    }

    pub fn merge(&mut self, other: PlayerTally) {
        self.goals += other.goals;
        self.assists += other.assists;
    }
}

/// Non-fatal problem that caused a sheet to be skipped, or a selected
/// competition to be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetWarning {
    pub sheet: String,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum WarningKind {
    /// Normalized names of the required columns the sheet lacks.
    MissingColumns(Vec<String>),
    /// The sheet could not be read at all.
    Unreadable(String),
    /// The selected competition names no sheet of the workbook.
    UnknownCompetition,
}

impl fmt::Display for SheetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::MissingColumns(columns) => write!(
                f,
                "sheet '{}': missing columns: {}. Skipping.",
                self.sheet,
                columns.join(", ")
            ),
            WarningKind::Unreadable(message) => {
                write!(f, "sheet '{}': could not be read: {message}", self.sheet)
            }
            WarningKind::UnknownCompetition => {
                write!(f, "competition '{}' selected but not found", self.sheet)
            }
        }
    }
}
