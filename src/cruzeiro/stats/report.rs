//! Turns accumulated tallies into ordered, display-ready report structures.

use serde::{Serialize, Serializer};

use crate::cruzeiro::stats::aggregate::{GroupedTally, ParticipationEvent, RankingTally};
use crate::cruzeiro::stats::model::{CompetitionSelection, ReportMode, SheetWarning, UNKNOWN_LABEL};

/// Year cell of a competition subtotal row.
pub const TOTAL_LABEL: &str = "Total";
/// Competition cell of the final row of the general-numbers report.
pub const GRAND_TOTAL_LABEL: &str = "Total Geral";

/// Year column of a general-numbers row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearCell {
    Year(i32),
    /// Subtotal of one competition.
    Total,
    /// Grand total row, which carries no year.
    Blank,
}

impl Serialize for YearCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            YearCell::Year(year) => serializer.serialize_i32(*year),
            YearCell::Total => serializer.serialize_str(TOTAL_LABEL),
            YearCell::Blank => serializer.serialize_str(""),
        }
    }
}

impl std::fmt::Display for YearCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YearCell::Year(year) => write!(f, "{year}"),
            YearCell::Total => write!(f, "{TOTAL_LABEL}"),
            YearCell::Blank => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneralRow {
    #[serde(rename = "Competição")]
    pub competition: String,
    #[serde(rename = "Ano")]
    pub year: YearCell,
    #[serde(rename = "Gols")]
    pub goals: u32,
    #[serde(rename = "Assistências")]
    pub assists: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Jogador")]
    pub player: String,
    #[serde(rename = "Gols")]
    pub goals: u32,
    #[serde(rename = "Assistências")]
    pub assists: u32,
    #[serde(rename = "Total Participações")]
    pub total: u32,
}

/// Builds the general-numbers table from the groups of each visited sheet.
///
/// Within a sheet, groups of the same competition are listed together in
/// first-seen order and followed by that competition's subtotal. A single
/// grand-total row closes the report.
pub fn general_numbers(sheets: &[Vec<GroupedTally>]) -> Vec<GeneralRow> {
    let mut rows = Vec::new();
    let mut grand_goals = 0;
    let mut grand_assists = 0;

    for groups in sheets {
        let mut competitions: Vec<&str> = Vec::new();
        for group in groups {
            if !competitions.contains(&group.competition.as_str()) {
                competitions.push(&group.competition);
            }
        }

        for competition in competitions {
            let mut goals = 0;
            let mut assists = 0;
            for group in groups.iter().filter(|group| group.competition == competition) {
                rows.push(GeneralRow {
                    competition: group.competition.clone(),
                    year: YearCell::Year(group.year),
                    goals: group.tally.goals,
                    assists: group.tally.assists,
                });
                goals += group.tally.goals;
                assists += group.tally.assists;
            }
            rows.push(GeneralRow {
                competition: competition.to_string(),
                year: YearCell::Total,
                goals,
                assists,
            });
            grand_goals += goals;
            grand_assists += assists;
        }
    }

    if grand_goals + grand_assists > 0 {
        rows.push(GeneralRow {
            competition: GRAND_TOTAL_LABEL.to_string(),
            year: YearCell::Blank,
            goals: grand_goals,
            assists: grand_assists,
        });
    }

    rows
}

/// Ranks every player with at least one participation.
///
/// Ordered by total, then goals, then assists, all descending; remaining ties
/// keep first-seen order. Ranks run from 1 without gaps, tied players
/// included.
pub fn ranking(tally: &RankingTally) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = tally
        .iter()
        .filter(|(_, stats)| stats.total() > 0)
        .map(|(player, stats)| RankingEntry {
            rank: 0,
            player: player.to_string(),
            goals: stats.goals,
            assists: stats.assists,
            total: stats.total(),
        })
        .collect();

    entries.sort_by(|lhs, rhs| {
        (rhs.total, rhs.goals, rhs.assists).cmp(&(lhs.total, lhs.goals, lhs.assists))
    });
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.rank = position + 1;
    }

    entries
}

/// Lines of the games-with-participation report, sorted by their text.
pub fn participation_lines(events: &[ParticipationEvent]) -> Vec<String> {
    sorted_lines(events.iter().map(|event| {
        format!(
            "{} {}: {}",
            event.kind.emoji(),
            event.kind.label(),
            event_context(event)
        )
    }))
}

/// Lines of the goal or assist list, sorted by their text.
pub fn event_lines(events: &[ParticipationEvent]) -> Vec<String> {
    sorted_lines(
        events
            .iter()
            .map(|event| format!("{} {}", event.kind.emoji(), event_context(event))),
    )
}

fn event_context(event: &ParticipationEvent) -> String {
    let year = event
        .year
        .map(|year| year.to_string())
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
    format!(
        "{year} - {} - {}",
        event.competition.as_deref().unwrap_or(UNKNOWN_LABEL),
        event.match_label.as_deref().unwrap_or(UNKNOWN_LABEL)
    )
}

fn sorted_lines(lines: impl Iterator<Item = String>) -> Vec<String> {
    let mut lines: Vec<String> = lines.collect();
    lines.sort();
    lines
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum ReportBody {
    General(Vec<GeneralRow>),
    Ranking(Vec<RankingEntry>),
    Lines(Vec<String>),
}

impl ReportBody {
    pub fn is_empty(&self) -> bool {
        match self {
            ReportBody::General(rows) => rows.is_empty(),
            ReportBody::Ranking(rows) => rows.is_empty(),
            ReportBody::Lines(lines) => lines.is_empty(),
        }
    }
}

/// Finished result of one report computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub mode: ReportMode,
    pub title: String,
    pub player: Option<String>,
    pub competition: String,
    pub year: Option<i32>,
    pub body: ReportBody,
    /// Sheets skipped while computing the report.
    pub warnings: Vec<SheetWarning>,
}

impl Report {
    pub fn new(
        mode: ReportMode,
        player: Option<&str>,
        competition: &CompetitionSelection,
        year: Option<i32>,
        body: ReportBody,
        warnings: Vec<SheetWarning>,
    ) -> Self {
        let mut report = Self {
            mode,
            title: String::new(),
            player: player.map(str::to_string),
            competition: competition.to_string(),
            year,
            body,
            warnings,
        };
        report.title = report.build_title();
        report
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// List lines prefixed with their 1-based position.
    pub fn numbered_lines(&self) -> Vec<String> {
        match &self.body {
            ReportBody::Lines(lines) => lines
                .iter()
                .enumerate()
                .map(|(index, line)| format!("{}. {line}", index + 1))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Informational message shown when the report has no rows.
    pub fn empty_message(&self) -> String {
        let player = self.player_label();
        match self.mode {
            ReportMode::GeneralNumbers => format!(
                "Nenhuma participação em gols ou assistências encontrada para '{player}' nos filtros selecionados."
            ),
            ReportMode::GamesWithParticipation => {
                format!("Nenhuma participação encontrada para '{player}' nos filtros selecionados.")
            }
            ReportMode::Ranking => format!(
                "Nenhum jogador com participação válida encontrado para a competição '{}'.",
                self.competition
            ),
            ReportMode::RankingByYear => format!(
                "Nenhum jogador com participação válida encontrado para Ano: {} / Competição: {}.",
                self.year_label(),
                self.competition_label()
            ),
            ReportMode::GoalList | ReportMode::AssistList => {
                let kind = self.mode.event_kind().map(|kind| kind.plural()).unwrap_or("");
                format!(
                    "Nenhum(a) {} encontrado(a) para '{player}' no ano {}.",
                    kind.to_lowercase(),
                    self.year_label()
                )
            }
        }
    }

    fn build_title(&self) -> String {
        let player = self.player_label();
        match self.mode {
            ReportMode::GeneralNumbers => format!("Números Gerais de {player}"),
            ReportMode::GamesWithParticipation => {
                format!("Jogos com Participação em Gols/Assistências de {player}")
            }
            ReportMode::Ranking => {
                format!("Ranking de Participações - Competição: {}", self.competition)
            }
            ReportMode::RankingByYear => format!(
                "Ranking de Participações - Ano: {} / Competição: {}",
                self.year_label(),
                self.competition_label()
            ),
            ReportMode::GoalList | ReportMode::AssistList => match self.mode.event_kind() {
                Some(kind) => format!(
                    "{} Lista de {} de {player} ({})",
                    kind.emoji(),
                    kind.plural(),
                    self.year_label()
                ),
                None => String::new(),
            },
        }
    }

    fn player_label(&self) -> String {
        self.player.as_deref().map(title_case).unwrap_or_default()
    }

    fn year_label(&self) -> String {
        self.year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "Todos os Anos".to_string())
    }

    fn competition_label(&self) -> &str {
        if self.competition == CompetitionSelection::ALL_LABEL {
            "Todas Competições"
        } else {
            &self.competition
        }
    }
}

/// Capitalizes the first letter of each word for headings.
fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
