//! UCI options configuration for Alfiere
//!
//! Option definitions with their types, defaults and limits, plus typed
//! storage updated by `setoption`.

use crate::error::OptionError;
use crate::search::params::MAX_SEARCH_DEPTH;
use crate::time::DEFAULT_MOVE_OVERHEAD;

/// UCI option types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionType {
    Spin { default: i64, min: i64, max: i64 },
}

/// Individual UCI option definition
#[derive(Debug, Clone)]
pub struct UciOption {
    pub name: &'static str,
    pub opt_type: OptionType,
}

impl UciOption {
    /// The `option name ...` line announced after `uci`
    pub fn declaration(&self) -> String {
        match self.opt_type {
            OptionType::Spin { default, min, max } => format!(
                "option name {} type spin default {} min {} max {}",
                self.name, default, min, max
            ),
        }
    }

    fn parse_spin(&self, value: Option<&str>) -> Result<i64, OptionError> {
        let OptionType::Spin { min, max, .. } = self.opt_type;
        let raw = value.ok_or_else(|| OptionError::MissingValue {
            name: self.name.to_string(),
        })?;
        raw.trim()
            .parse::<i64>()
            .ok()
            .filter(|v| (min..=max).contains(v))
            .ok_or_else(|| OptionError::InvalidValue {
                name: self.name.to_string(),
                value: raw.to_string(),
            })
    }
}

pub const MOVE_OVERHEAD: UciOption = UciOption {
    name: "Move Overhead",
    opt_type: OptionType::Spin {
        default: DEFAULT_MOVE_OVERHEAD as i64,
        min: 0,
        max: 5000,
    },
};

pub const DEFAULT_DEPTH: UciOption = UciOption {
    name: "Default Depth",
    opt_type: OptionType::Spin {
        default: MAX_SEARCH_DEPTH as i64,
        min: 1,
        max: MAX_SEARCH_DEPTH as i64,
    },
};

pub const ALL_OPTIONS: [UciOption; 2] = [MOVE_OVERHEAD, DEFAULT_DEPTH];

/// Current option values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciOptions {
    /// Milliseconds held back from each time allocation
    pub move_overhead: u64,

    /// Depth limit when `go` names neither depth nor clock
    pub default_depth: u32,
}

impl Default for UciOptions {
    fn default() -> Self {
        Self {
            move_overhead: DEFAULT_MOVE_OVERHEAD,
            default_depth: MAX_SEARCH_DEPTH,
        }
    }
}

impl UciOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set option value; names match case-insensitively as GUIs vary
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), OptionError> {
        if name.eq_ignore_ascii_case(MOVE_OVERHEAD.name) {
            self.move_overhead = MOVE_OVERHEAD.parse_spin(value)? as u64;
        } else if name.eq_ignore_ascii_case(DEFAULT_DEPTH.name) {
            self.default_depth = DEFAULT_DEPTH.parse_spin(value)? as u32;
        } else {
            return Err(OptionError::Unknown(name.to_string()));
        }
        Ok(())
    }
}
