//! Rules configuration.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{
    CLIMBER_MAX_LEVEL, EXPANSION_COST_MAX, EXPANSION_COST_STEP, INITIAL_CASH_CAP,
    INITIAL_EXPANSION_COST, INITIAL_HOUSE_SIZE, INITIAL_POPULARITY_CAP, MAX_HOUSE_SIZE,
    MAX_PARTIES_PER_SCENARIO, STARS_REQUIRED, TROUBLE_LIMIT,
};

/// What happens between two parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intermission {
    /// Dismiss goes straight to the next party and the shop never opens.
    #[default]
    Direct,
    /// Dismiss opens the shop and `EndShop` starts the next party.
    Shop,
}

impl Intermission {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Shop => "shop",
        }
    }
}

impl fmt::Display for Intermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intermission {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "shop" => Ok(Self::Shop),
            _ => Err(()),
        }
    }
}

/// Tunable rules parameters. Every field falls back to the shipped balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub initial_house_size: u32,
    pub max_house_size: u32,
    pub round_limit: u32,
    pub stars_required: u32,
    pub trouble_limit: u32,
    pub initial_expansion_cost: i32,
    pub expansion_cost_step: i32,
    pub expansion_cost_max: i32,
    pub popularity_cap: i32,
    pub cash_cap: i32,
    pub climber_max_level: u8,
    pub intermission: Intermission,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            initial_house_size: INITIAL_HOUSE_SIZE,
            max_house_size: MAX_HOUSE_SIZE,
            round_limit: MAX_PARTIES_PER_SCENARIO,
            stars_required: STARS_REQUIRED,
            trouble_limit: TROUBLE_LIMIT,
            initial_expansion_cost: INITIAL_EXPANSION_COST,
            expansion_cost_step: EXPANSION_COST_STEP,
            expansion_cost_max: EXPANSION_COST_MAX,
            popularity_cap: INITIAL_POPULARITY_CAP,
            cash_cap: INITIAL_CASH_CAP,
            climber_max_level: CLIMBER_MAX_LEVEL,
            intermission: Intermission::Direct,
        }
    }
}

/// Errors raised when a rules configuration is out of range.
#[derive(Debug, Error)]
pub enum RulesConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: i64,
        value: i64,
    },
    #[error("initial house size {initial} exceeds maximum {max}")]
    HouseSizeRange { initial: u32, max: u32 },
    #[error("initial expansion cost {initial} exceeds cap {max}")]
    ExpansionCostRange { initial: i32, max: i32 },
    #[error("rules JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

impl RulesConfig {
    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns `RulesConfigError` if the JSON is malformed or out of range.
    pub fn from_json(json: &str) -> Result<Self, RulesConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `RulesConfigError` when any field violates its bounds.
    pub fn validate(&self) -> Result<(), RulesConfigError> {
        min_check("initial_house_size", self.initial_house_size, 1)?;
        min_check("round_limit", self.round_limit, 1)?;
        min_check("stars_required", self.stars_required, 1)?;
        min_check("trouble_limit", self.trouble_limit, 1)?;
        min_check("initial_expansion_cost", self.initial_expansion_cost, 1)?;
        min_check("expansion_cost_step", self.expansion_cost_step, 0)?;
        min_check("popularity_cap", self.popularity_cap, 1)?;
        min_check("cash_cap", self.cash_cap, 1)?;
        min_check("climber_max_level", self.climber_max_level, 1)?;
        if self.initial_house_size > self.max_house_size {
            return Err(RulesConfigError::HouseSizeRange {
                initial: self.initial_house_size,
                max: self.max_house_size,
            });
        }
        if self.initial_expansion_cost > self.expansion_cost_max {
            return Err(RulesConfigError::ExpansionCostRange {
                initial: self.initial_expansion_cost,
                max: self.expansion_cost_max,
            });
        }
        Ok(())
    }
}

fn min_check<T: Into<i64>>(field: &'static str, value: T, min: T) -> Result<(), RulesConfigError> {
    let (value, min) = (value.into(), min.into());
    if value < min {
        return Err(RulesConfigError::MinViolation { field, min, value });
    }
    Ok(())
}
