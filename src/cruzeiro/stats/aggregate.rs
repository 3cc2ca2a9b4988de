//! Per-sheet accumulation for every report mode.
//!
//! Each function reads the typed rows of one sheet and returns fresh tallies;
//! the source rows are never modified.

use std::collections::HashMap;

use crate::cruzeiro::stats::model::{
    ASSISTS_COLUMN, COMPETITION_COLUMN, EventKind, GOALS_COLUMN, MATCH_COLUMN, MatchRecord,
    PlayerTally, ReportMode, SheetTable, YEAR_COLUMN,
};
use crate::cruzeiro::stats::participation::{count_participation, mentions, normalize, tokenize};

/// Columns a sheet must expose for a given report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRequirement {
    /// Every one of these must be present.
    pub all_of: Vec<&'static str>,
    /// At least one of these must be present, when non-empty.
    pub any_of: Vec<&'static str>,
}

impl ColumnRequirement {
    pub fn for_mode(mode: ReportMode, year: Option<i32>) -> Self {
        match mode {
            ReportMode::GeneralNumbers => Self {
                all_of: vec![GOALS_COLUMN, ASSISTS_COLUMN, COMPETITION_COLUMN, YEAR_COLUMN],
                any_of: Vec::new(),
            },
            ReportMode::GamesWithParticipation => Self {
                all_of: vec![
                    GOALS_COLUMN,
                    ASSISTS_COLUMN,
                    MATCH_COLUMN,
                    COMPETITION_COLUMN,
                    YEAR_COLUMN,
                ],
                any_of: Vec::new(),
            },
            ReportMode::Ranking => Self {
                all_of: Vec::new(),
                any_of: vec![GOALS_COLUMN, ASSISTS_COLUMN],
            },
            ReportMode::RankingByYear => Self {
                all_of: if year.is_some() { vec![YEAR_COLUMN] } else { Vec::new() },
                any_of: vec![GOALS_COLUMN, ASSISTS_COLUMN],
            },
            ReportMode::GoalList | ReportMode::AssistList => {
                let column = match mode.event_kind() {
                    Some(kind) => kind.column(),
                    None => GOALS_COLUMN,
                };
                Self {
                    all_of: vec![column, MATCH_COLUMN, COMPETITION_COLUMN, YEAR_COLUMN],
                    any_of: Vec::new(),
                }
            }
        }
    }

    /// Names of the required columns the table lacks, empty when satisfied.
    pub fn missing_from(&self, table: &SheetTable) -> Vec<String> {
        let mut missing: Vec<String> = self
            .all_of
            .iter()
            .filter(|column| !table.has_column(column))
            .map(|column| column.to_string())
            .collect();

        if !self.any_of.is_empty() && !self.any_of.iter().any(|column| table.has_column(column)) {
            missing.extend(self.any_of.iter().map(|column| column.to_string()));
        }

        missing
    }
}

/// Outcome of validating one sheet against a report's column requirement.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetRows {
    Ready(Vec<MatchRecord>),
    MissingColumns(Vec<String>),
}

pub fn prepare(table: &SheetTable, requirement: &ColumnRequirement) -> SheetRows {
    let missing = requirement.missing_from(table);
    if missing.is_empty() {
        SheetRows::Ready(table.records())
    } else {
        SheetRows::MissingColumns(missing)
    }
}

/// Goal and assist totals for one `(competition, year)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedTally {
    pub competition: String,
    pub year: i32,
    pub tally: PlayerTally,
}

/// Groups the player's participations by competition and year.
///
/// Rows without a valid year or without a competition are left out. Groups
/// keep the order in which they first appear and only non-zero groups are
/// returned.
pub fn general_numbers(records: &[MatchRecord], target: &str) -> Vec<GroupedTally> {
    let target = normalize(target);
    let mut groups: Vec<GroupedTally> = Vec::new();
    let mut index: HashMap<(String, i32), usize> = HashMap::new();

    for record in records {
        let (Some(competition), Some(year)) = (record.competition.as_ref(), record.year) else {
            continue;
        };

        let tally = PlayerTally {
            goals: count_participation(record.scorers.as_deref(), &target),
            assists: count_participation(record.assists.as_deref(), &target),
        };

        let slot = *index
            .entry((competition.clone(), year))
            .or_insert_with(|| {
                groups.push(GroupedTally {
                    competition: competition.clone(),
                    year,
                    tally: PlayerTally::default(),
                });
                groups.len() - 1
            });
        groups[slot].tally.merge(tally);
    }

    groups.retain(|group| group.tally.total() > 0);
    groups
}

/// A single goal or assist credited to the target player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipationEvent {
    pub kind: EventKind,
    pub year: Option<i32>,
    pub competition: Option<String>,
    pub match_label: Option<String>,
}

impl ParticipationEvent {
    fn from_record(kind: EventKind, record: &MatchRecord) -> Self {
        Self {
            kind,
            year: record.year,
            competition: record.competition.clone(),
            match_label: record.match_label.clone(),
        }
    }
}

/// Every goal and assist of the player in the sheet, one event per
/// occurrence: two goals in one match give two events.
pub fn games_with_participation(records: &[MatchRecord], player: &str) -> Vec<ParticipationEvent> {
    let player = player.trim();
    let target = normalize(player);
    let mut events = Vec::new();

    for record in records {
        if !mentions(record.scorers.as_deref(), player)
            && !mentions(record.assists.as_deref(), player)
        {
            continue;
        }

        for kind in [EventKind::Goal, EventKind::Assist] {
            let count = count_participation(record.field(kind), &target);
            for _ in 0..count {
                events.push(ParticipationEvent::from_record(kind, record));
            }
        }
    }

    events
}

/// Goals or assists of the player, optionally restricted to one year.
pub fn event_list(
    records: &[MatchRecord],
    kind: EventKind,
    player: &str,
    year: Option<i32>,
) -> Vec<ParticipationEvent> {
    let target = normalize(player);
    let mut events = Vec::new();

    for record in filter_year(records, year) {
        let count = count_participation(record.field(kind), &target);
        for _ in 0..count {
            events.push(ParticipationEvent::from_record(kind, record));
        }
    }

    events
}

/// Rows whose year equals the filter, or every row when no filter is given.
pub fn filter_year(
    records: &[MatchRecord],
    year: Option<i32>,
) -> impl Iterator<Item = &MatchRecord> {
    records
        .iter()
        .filter(move |record| year.is_none() || record.year == year)
}

/// Per-player tallies keyed by the trimmed, original-cased token.
///
/// Entries remember the order in which players were first seen so rankings
/// break remaining ties deterministically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingTally {
    entries: Vec<(String, PlayerTally)>,
    index: HashMap<String, usize>,
}

impl RankingTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, player: &str, kind: EventKind, count: u32) {
        let slot = match self.index.get(player) {
            Some(slot) => *slot,
            None => {
                self.entries.push((player.to_string(), PlayerTally::default()));
                let slot = self.entries.len() - 1;
                self.index.insert(player.to_string(), slot);
                slot
            }
        };
        self.entries[slot].1.record(kind, count);
    }

    /// Adds another pass's tallies, summing counts for identical keys.
    pub fn merge(&mut self, other: RankingTally) {
        for (player, tally) in other.entries {
            self.record(&player, EventKind::Goal, tally.goals);
            self.record(&player, EventKind::Assist, tally.assists);
        }
    }

    pub fn get(&self, player: &str) -> Option<PlayerTally> {
        self.index.get(player).map(|slot| self.entries[*slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PlayerTally)> {
        self.entries
            .iter()
            .map(|(player, tally)| (player.as_str(), *tally))
    }
}

/// Tallies every countable token of the scorer and assist fields.
pub fn ranking<'a>(records: impl IntoIterator<Item = &'a MatchRecord>) -> RankingTally {
    let mut tally = RankingTally::new();

    for record in records {
        for kind in [EventKind::Goal, EventKind::Assist] {
            let Some(field) = record.field(kind) else {
                continue;
            };
            for token in tokenize(field) {
                if token.is_countable() {
                    tally.record(&token.raw_name, kind, 1);
                }
            }
        }
    }

    tally
}
