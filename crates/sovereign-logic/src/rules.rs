//! Name and text validation plus the small fixed tables of planet and corp rules.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub const CORP_NAME_MIN_LEN: usize = 3;
pub const CORP_NAME_MAX_LEN: usize = 32;
pub const CORP_SAY_MAX_LEN: usize = 200;

pub const PLANET_NAME_MIN_LEN: usize = 3;
pub const PLANET_NAME_MAX_LEN: usize = 40;
pub const COLONIZE_COST: i64 = 1_500;
pub const CITADEL_MAX_LEVEL: u32 = 10;
pub const CITADEL_COST_PER_LEVEL: i64 = 5_000;

/// Largest quantity accepted by TRADE and PLANET LOAD/UNLOAD.
pub const MAX_TRANSFER_QTY: i64 = 1_000_000;

/// Why a player-chosen name was refused. The display text is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Corporation name too short (min 3).")]
    CorpTooShort,
    #[error("Corporation name too long (max 32).")]
    CorpTooLong,
    #[error("Corporation name contains invalid characters.")]
    CorpInvalidChars,
    #[error("Planet name is too short.")]
    PlanetTooShort,
    #[error("Planet name is too long (max 40).")]
    PlanetTooLong,
}

fn corp_name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9 _\-]+$").ok())
        .as_ref()
}

/// Fold line breaks into spaces, trim, and collapse whitespace runs.
pub fn sanitize_single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sanitize and validate a corporation name.
pub fn validate_corp_name(raw: &str) -> Result<String, NameError> {
    let name = sanitize_single_line(raw);
    let len = name.chars().count();
    if len < CORP_NAME_MIN_LEN {
        return Err(NameError::CorpTooShort);
    }
    if len > CORP_NAME_MAX_LEN {
        return Err(NameError::CorpTooLong);
    }
    if !corp_name_pattern().is_some_and(|re| re.is_match(&name)) {
        return Err(NameError::CorpInvalidChars);
    }
    Ok(name)
}

/// Sanitize and validate a planet name.
pub fn validate_planet_name(raw: &str) -> Result<String, NameError> {
    let name = sanitize_single_line(raw);
    let len = name.chars().count();
    if len < PLANET_NAME_MIN_LEN {
        return Err(NameError::PlanetTooShort);
    }
    if len > PLANET_NAME_MAX_LEN {
        return Err(NameError::PlanetTooLong);
    }
    Ok(name)
}

/// Corp chat text with line breaks replaced by spaces and ends trimmed.
pub fn sanitize_corp_message(raw: &str) -> String {
    raw.trim().replace(['\n', '\r'], " ").trim().to_string()
}

/// Credits needed to raise a citadel to `next_level`.
pub fn citadel_upgrade_cost(next_level: u32) -> i64 {
    i64::from(next_level.max(1)) * CITADEL_COST_PER_LEVEL
}
