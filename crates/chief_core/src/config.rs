//! Planner configuration.
//!
//! # Responsibility
//! - Hold working-week and focus-block placement parameters.
//! - Validate parameter combinations before they reach the reconciler.
//!
//! # Invariants
//! - `work_start_hour < work_end_hour <= 24`.
//! - `focus_block_minutes` fits inside one working day.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Env var overriding `work_start_hour`.
pub const ENV_WORK_START_HOUR: &str = "CHIEF_WORK_START_HOUR";
/// Env var overriding `work_end_hour`.
pub const ENV_WORK_END_HOUR: &str = "CHIEF_WORK_END_HOUR";
/// Env var overriding `focus_block_minutes`.
pub const ENV_FOCUS_BLOCK_MINUTES: &str = "CHIEF_FOCUS_BLOCK_MINUTES";

const DEFAULT_WORK_DAYS: u8 = 5;
const DEFAULT_WORK_START_HOUR: u32 = 8;
const DEFAULT_WORK_END_HOUR: u32 = 18;
const DEFAULT_FOCUS_BLOCK_MINUTES: u32 = 120;
const DEFAULT_SLOT_STEP_MINUTES: u32 = 30;
const DEFAULT_MAX_FOCUS_BLOCKS: usize = 3;
const DEFAULT_GOAL_COLOR: &str = "#ec4899";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidWorkDays(u8),
    InvalidWorkingHours { start: u32, end: u32 },
    ZeroFocusBlock,
    ZeroSlotStep,
    /// Focus block does not fit in one working day.
    FocusBlockTooLong { block_minutes: u32, day_minutes: u32 },
    InvalidOverride { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWorkDays(days) => {
                write!(f, "work_days must be within 1..=7, got {days}")
            }
            Self::InvalidWorkingHours { start, end } => write!(
                f,
                "working hours must satisfy start < end <= 24, got {start}..{end}"
            ),
            Self::ZeroFocusBlock => write!(f, "focus_block_minutes must be positive"),
            Self::ZeroSlotStep => write!(f, "slot_step_minutes must be positive"),
            Self::FocusBlockTooLong {
                block_minutes,
                day_minutes,
            } => write!(
                f,
                "focus block of {block_minutes} minutes exceeds working day of {day_minutes} minutes"
            ),
            Self::InvalidOverride { key, value } => {
                write!(f, "invalid value `{value}` for `{key}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Working-week and reconciliation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Working days counted from Monday.
    pub work_days: u8,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub focus_block_minutes: u32,
    /// Granularity of the focus-block slot scan.
    pub slot_step_minutes: u32,
    /// Upper bound of focus blocks synthesized by one reconciliation.
    pub max_focus_blocks: usize,
    pub default_goal_color: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            work_days: DEFAULT_WORK_DAYS,
            work_start_hour: DEFAULT_WORK_START_HOUR,
            work_end_hour: DEFAULT_WORK_END_HOUR,
            focus_block_minutes: DEFAULT_FOCUS_BLOCK_MINUTES,
            slot_step_minutes: DEFAULT_SLOT_STEP_MINUTES,
            max_focus_blocks: DEFAULT_MAX_FOCUS_BLOCKS,
            default_goal_color: DEFAULT_GOAL_COLOR.to_string(),
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=7).contains(&self.work_days) {
            return Err(ConfigError::InvalidWorkDays(self.work_days));
        }
        if self.work_start_hour >= self.work_end_hour || self.work_end_hour > 24 {
            return Err(ConfigError::InvalidWorkingHours {
                start: self.work_start_hour,
                end: self.work_end_hour,
            });
        }
        if self.focus_block_minutes == 0 {
            return Err(ConfigError::ZeroFocusBlock);
        }
        if self.slot_step_minutes == 0 {
            return Err(ConfigError::ZeroSlotStep);
        }
        let day_minutes = self.working_day_minutes();
        if self.focus_block_minutes > day_minutes {
            return Err(ConfigError::FocusBlockTooLong {
                block_minutes: self.focus_block_minutes,
                day_minutes,
            });
        }
        Ok(())
    }

    pub fn working_day_minutes(&self) -> u32 {
        self.work_end_hour.saturating_sub(self.work_start_hour) * 60
    }

    /// Applies overrides from a key lookup, then re-validates.
    ///
    /// `lookup` is usually `|key| std::env::var(key).ok()`. Blank values
    /// are ignored.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = read_override(&lookup, ENV_WORK_START_HOUR)? {
            self.work_start_hour = value;
        }
        if let Some(value) = read_override(&lookup, ENV_WORK_END_HOUR)? {
            self.work_end_hour = value;
        }
        if let Some(value) = read_override(&lookup, ENV_FOCUS_BLOCK_MINUTES)? {
            self.focus_block_minutes = value;
        }
        self.validate()
    }
}

fn read_override(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u32>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidOverride {
            key,
            value: trimmed.to_string(),
        })
}
