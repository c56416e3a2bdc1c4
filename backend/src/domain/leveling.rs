//! Experience ledger: pure mapping from accumulated experience to level data.
//!
//! Reaching level `L + 1` requires `BASE_EXP * L²` total experience, so
//! [`required_exp_for_level`] returns the total needed to complete level `L`.
//! Level `L` therefore spans `[required(L - 1), required(L))`, with level 1
//! starting at zero. The level is capped at [`MAX_LEVEL`].

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::experience::ExperienceEvent;

/// Experience scale factor of the quadratic curve.
pub const BASE_EXP: u64 = 100;
/// Exponent of the level curve.
pub const CURVE_MULTIPLIER: u32 = 2;
/// Highest attainable level.
pub const MAX_LEVEL: u32 = 100;

/// Title thresholds, highest first. The first entry at or below the level wins.
const TITLES: [(u32, &str); 6] = [
    (100, "Legend"),
    (50, "Master"),
    (20, "Expert"),
    (10, "Contributor"),
    (5, "Aktif"),
    (1, "Pemula"),
];

const FALLBACK_TITLE: &str = "Pemula";

/// Total experience needed to complete `level`.
///
/// # Examples
/// ```
/// use campus_hub::domain::leveling::required_exp_for_level;
///
/// assert_eq!(required_exp_for_level(1), 100);
/// assert_eq!(required_exp_for_level(3), 900);
/// ```
pub fn required_exp_for_level(level: u32) -> u64 {
    BASE_EXP * u64::from(level).pow(CURVE_MULTIPLIER)
}

/// Level reached with `total_exp` experience, in `1..=MAX_LEVEL`.
///
/// # Examples
/// ```
/// use campus_hub::domain::leveling::level_for_exp;
///
/// assert_eq!(level_for_exp(0), 1);
/// assert_eq!(level_for_exp(100), 2);
/// assert_eq!(level_for_exp(399), 2);
/// ```
pub fn level_for_exp(total_exp: u64) -> u32 {
    let mut level = 1;
    while level < MAX_LEVEL && total_exp >= required_exp_for_level(level) {
        level += 1;
    }
    level
}

/// Percentage progress from the current level's floor toward the next
/// threshold, truncated to an integer in `0..=100`.
pub fn level_progress(total_exp: u64) -> u8 {
    let level = level_for_exp(total_exp);
    if level >= MAX_LEVEL {
        return 100;
    }

    let floor = required_exp_for_level(level - 1);
    let ceiling = required_exp_for_level(level);
    let span = ceiling.saturating_sub(floor);
    if span == 0 {
        return 100;
    }

    let gained = total_exp.saturating_sub(floor);
    let percent = (gained * 100 / span).min(100);
    u8::try_from(percent).unwrap_or(100)
}

/// Experience remaining until `required_exp_for_level(level + 1)`; zero at the
/// cap.
///
/// This target sits one threshold beyond the one [`level_progress`] measures
/// against, so a fresh account reports 400 rather than 100.
pub fn exp_to_next_level(total_exp: u64) -> u64 {
    let level = level_for_exp(total_exp);
    if level >= MAX_LEVEL {
        return 0;
    }
    required_exp_for_level(level + 1).saturating_sub(total_exp)
}

/// Display title for `level`.
///
/// # Examples
/// ```
/// use campus_hub::domain::leveling::title_for_level;
///
/// assert_eq!(title_for_level(0), "Pemula");
/// assert_eq!(title_for_level(12), "Contributor");
/// ```
pub fn title_for_level(level: u32) -> &'static str {
    TITLES
        .iter()
        .find(|(threshold, _)| level >= *threshold)
        .map_or(FALLBACK_TITLE, |(_, title)| *title)
}

/// Derived gamification stats for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelStats {
    pub total_exp: u64,
    pub level: u32,
    pub level_title: String,
    pub level_progress: u8,
    pub exp_to_next_level: u64,
}

impl LevelStats {
    pub fn from_total_exp(total_exp: u64) -> Self {
        let level = level_for_exp(total_exp);
        Self {
            total_exp,
            level,
            level_title: title_for_level(level).to_owned(),
            level_progress: level_progress(total_exp),
            exp_to_next_level: exp_to_next_level(total_exp),
        }
    }
}

/// Shape of the level curve as published to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelCurve {
    pub base_exp: u64,
    pub multiplier: u32,
    pub max_level: u32,
}

/// Point table, curve and titles clients use to render progress locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GamificationConfig {
    pub action_points: BTreeMap<String, u64>,
    pub level_config: LevelCurve,
    pub level_titles: BTreeMap<u32, String>,
}

impl GamificationConfig {
    /// Configuration compiled into this build.
    pub fn current() -> Self {
        let action_points = ExperienceEvent::ALL
            .iter()
            .map(|event| (event.name().to_owned(), event.points()))
            .collect();
        let level_titles = TITLES
            .iter()
            .map(|(threshold, title)| (*threshold, (*title).to_owned()))
            .collect();

        Self {
            action_points,
            level_config: LevelCurve {
                base_exp: BASE_EXP,
                multiplier: CURVE_MULTIPLIER,
                max_level: MAX_LEVEL,
            },
            level_titles,
        }
    }
}
