use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Identifier of a machine in the production tree (1-based, root is 1).
pub type MachineId = u32;

/// Id of the single root machine.
pub const ROOT_ID: MachineId = 1;

/// One of the five string transforms a machine can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Enhance,
    Reverse,
    Chop,
    Trim,
    Split,
}

impl Operation {
    /// All operations in the order their wear factors appear in the input.
    pub const ALL: [Operation; 5] = [
        Operation::Enhance,
        Operation::Reverse,
        Operation::Chop,
        Operation::Trim,
        Operation::Split,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Enhance => "enhance",
            Operation::Reverse => "reverse",
            Operation::Chop => "chop",
            Operation::Trim => "trim",
            Operation::Split => "split",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enhance" => Ok(Operation::Enhance),
            "reverse" => Ok(Operation::Reverse),
            "chop" => Ok(Operation::Chop),
            "trim" => Ok(Operation::Trim),
            "split" => Ok(Operation::Split),
            other => Err(format!(
                "invalid operation: {other} (expected one of enhance, reverse, chop, trim, split)"
            )),
        }
    }
}

/// Wear cost charged for each operation, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct WearFactors {
    #[serde(default)]
    pub enhance: u64,
    #[serde(default)]
    pub reverse: u64,
    #[serde(default)]
    pub chop: u64,
    #[serde(default)]
    pub trim: u64,
    #[serde(default)]
    pub split: u64,
}

impl WearFactors {
    pub fn factor(&self, op: Operation) -> u64 {
        match op {
            Operation::Enhance => self.enhance,
            Operation::Reverse => self.reverse,
            Operation::Chop => self.chop,
            Operation::Trim => self.trim,
            Operation::Split => self.split,
        }
    }

    /// Build from the five factors in input order: enhance, reverse, chop,
    /// trim, split.
    pub fn from_ordered(values: [u64; 5]) -> Self {
        let [enhance, reverse, chop, trim, split] = values;
        Self {
            enhance,
            reverse,
            chop,
            trim,
            split,
        }
    }
}

/// Input encoding of a plant description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Pick by file extension: `.toml` is TOML, everything else is lines.
    #[default]
    Auto,
    /// Line-oriented format (counts, factors, adjacency, seeds).
    Lines,
    Toml,
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(InputFormat::Auto),
            "lines" => Ok(InputFormat::Lines),
            "toml" => Ok(InputFormat::Toml),
            other => Err(format!(
                "invalid input format: {other} (expected \"auto\", \"lines\" or \"toml\")"
            )),
        }
    }
}
