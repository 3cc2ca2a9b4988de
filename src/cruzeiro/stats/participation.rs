//! Token-level rules shared by every report: name normalization, the
//! ignore-term filter and participation counting.
//!
//! Matching a target player and filtering noise use two different policies on
//! purpose. A token counts for a player only when its whole normalized form
//! equals the normalized target, while it is discarded as noise when an
//! ignore term appears anywhere inside it.

/// Administrative markers that never count as a participation.
pub const IGNORED_TERMS: [&str; 4] = ["Penalti", "Sem ass", "Falta", "Gol contra"];

/// Separator between participants inside a scorer or assist field.
pub const DELIMITER: char = ';';

/// Canonical form used for comparisons: trimmed and lower-cased.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// True when `normalized_token` contains any ignore term as a substring.
pub fn is_ignored(normalized_token: &str) -> bool {
    IGNORED_TERMS
        .iter()
        .any(|term| normalized_token.contains(normalize(term).as_str()))
}

/// One participant entry extracted from a delimited field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipationToken {
    /// Trimmed text with its original casing, used as the display key.
    pub raw_name: String,
    pub normalized_name: String,
}

impl ParticipationToken {
    pub fn is_ignored(&self) -> bool {
        is_ignored(&self.normalized_name)
    }

    /// Tokens that name a real participant: not a blank leftover of a
    /// missing value and not an administrative marker.
    pub fn is_countable(&self) -> bool {
        self.normalized_name != "nan" && !self.is_ignored()
    }
}

/// Splits a field on `;`, trims each part and drops empty parts.
pub fn tokenize(field: &str) -> Vec<ParticipationToken> {
    field
        .split(DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| ParticipationToken {
            raw_name: part.to_string(),
            normalized_name: normalize(part),
        })
        .collect()
}

/// Counts how many tokens of `field` name the target player.
///
/// A missing (non-text) field or an empty target yields zero. A player listed
/// twice in the same field, e.g. `"Ana; Ana"`, counts twice.
pub fn count_participation(field: Option<&str>, target_normalized: &str) -> u32 {
    let Some(field) = field else {
        return 0;
    };
    if target_normalized.is_empty() {
        return 0;
    }

    let count = field
        .split(DELIMITER)
        .map(normalize)
        .filter(|token| token == target_normalized && !is_ignored(token))
        .count();
    count as u32
}

/// Case-insensitive literal substring test used to cheaply discard rows that
/// cannot mention the player before counting exactly.
pub fn mentions(field: Option<&str>, player: &str) -> bool {
    match field {
        Some(text) => text.to_lowercase().contains(&player.to_lowercase()),
        None => false,
    }
}
