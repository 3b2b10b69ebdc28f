// src/config/loader.rs

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::config::model::{LinkConfig, PlantConfig, RawPlantConfig};
use crate::errors::{ProdlineError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::{InputFormat, MachineId, Operation, WearFactors};

/// Load a plant description from `path` without semantic validation.
pub fn load_from_path(
    fs: &dyn FileSystem,
    path: impl AsRef<Path>,
    format: InputFormat,
) -> Result<RawPlantConfig> {
    let path = path.as_ref();
    let contents = fs.read_to_string(path)?;

    match resolve_format(path, format) {
        InputFormat::Toml => parse_toml(&contents),
        _ => parse_lines(&contents),
    }
}

/// Load and validate a plant description using `fs`.
pub fn load_with(
    fs: &dyn FileSystem,
    path: impl AsRef<Path>,
    format: InputFormat,
) -> Result<PlantConfig> {
    let raw = load_from_path(fs, path, format)?;
    PlantConfig::try_from(raw)
}

/// Load and validate a plant description from the real filesystem.
///
/// This is the entry point the binary uses.
pub fn load_and_validate(path: impl AsRef<Path>, format: InputFormat) -> Result<PlantConfig> {
    load_with(&RealFileSystem, path, format)
}

fn resolve_format(path: &Path, format: InputFormat) -> InputFormat {
    match format {
        InputFormat::Auto => match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => InputFormat::Toml,
            _ => InputFormat::Lines,
        },
        other => other,
    }
}

pub fn parse_toml(contents: &str) -> Result<RawPlantConfig> {
    Ok(toml::from_str(contents)?)
}

/// Parse the line-oriented format:
///
/// ```text
/// N
/// C
/// enhance reverse chop trim split
/// threshold
/// child parent operation      (N - 1 lines)
/// seed                        (one per leaf, ascending leaf id)
/// ```
///
/// One seed is read per leaf implied by the adjacency records, and anything
/// after the last seed is ignored. A shortfall of seeds is reported during
/// validation.
pub fn parse_lines(contents: &str) -> Result<RawPlantConfig> {
    let mut lines: Vec<&str> = contents.lines().map(str::trim).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let mut cursor = LineCursor::new(&lines);

    let machines: u32 = cursor.next_number("machine count")?;
    let cycles: usize = cursor.next_number("cycle count")?;

    let (line_no, factors_line) = cursor.next_line("wear factors")?;
    let factors = parse_wear_factors(line_no, factors_line)?;

    let threshold: i64 = cursor.next_number("maintenance threshold")?;

    // The header count is untrusted, so the list only grows with real lines.
    let link_count = machines.saturating_sub(1) as usize;
    let mut links = Vec::new();
    for _ in 0..link_count {
        let (line_no, line) = cursor.next_line("adjacency record")?;
        links.push(parse_link(line_no, line)?);
    }

    let rest = cursor.rest();
    let seed_count = leaf_count(machines, &links).min(rest.len());
    if rest.len() > seed_count {
        debug!(
            ignored = rest.len() - seed_count,
            "ignoring lines after the last leaf product"
        );
    }
    let seeds = rest[..seed_count].iter().map(|s| s.to_string()).collect();

    Ok(RawPlantConfig {
        machines,
        cycles,
        wear: factors,
        threshold,
        links,
        seeds,
    })
}

/// Machines in `1..=machines` that no record names as a parent.
fn leaf_count(machines: u32, links: &[LinkConfig]) -> usize {
    let parents: BTreeSet<MachineId> = links
        .iter()
        .map(|link| link.parent)
        .filter(|id| (1..=machines).contains(id))
        .collect();
    (machines as usize).saturating_sub(parents.len())
}

fn parse_wear_factors(line_no: usize, line: &str) -> Result<WearFactors> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != Operation::ALL.len() {
        return Err(ProdlineError::ParseError {
            line: line_no,
            msg: format!(
                "expected {} wear factors (enhance reverse chop trim split), got {}",
                Operation::ALL.len(),
                parts.len()
            ),
        });
    }

    let mut values = [0u64; 5];
    for (slot, (part, op)) in values.iter_mut().zip(parts.iter().zip(Operation::ALL)) {
        *slot = part.parse().map_err(|_| ProdlineError::ParseError {
            line: line_no,
            msg: format!("invalid wear factor for {op}: '{part}'"),
        })?;
    }

    Ok(WearFactors::from_ordered(values))
}

fn parse_link(line_no: usize, line: &str) -> Result<LinkConfig> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [child, parent, operation] = parts.as_slice() else {
        return Err(ProdlineError::ParseError {
            line: line_no,
            msg: format!("expected 'child parent operation', got '{line}'"),
        });
    };

    let parse_id = |s: &str, what: &str| -> Result<MachineId> {
        s.parse().map_err(|_| ProdlineError::ParseError {
            line: line_no,
            msg: format!("invalid {what} id '{s}'"),
        })
    };

    Ok(LinkConfig {
        child: parse_id(*child, "child")?,
        parent: parse_id(*parent, "parent")?,
        operation: operation
            .parse()
            .map_err(|msg| ProdlineError::ParseError { line: line_no, msg })?,
    })
}

/// Sequential reader over trimmed input lines with 1-based line numbers.
struct LineCursor<'a> {
    lines: &'a [&'a str],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self { lines, pos: 0 }
    }

    fn next_line(&mut self, what: &str) -> Result<(usize, &'a str)> {
        let line = self.lines.get(self.pos).copied().ok_or_else(|| ProdlineError::ParseError {
            line: self.pos + 1,
            msg: format!("unexpected end of input, expected {what}"),
        })?;
        self.pos += 1;
        Ok((self.pos, line))
    }

    fn next_number<T: std::str::FromStr>(&mut self, what: &str) -> Result<T> {
        let (line_no, line) = self.next_line(what)?;
        line.parse().map_err(|_| ProdlineError::ParseError {
            line: line_no,
            msg: format!("invalid {what}: '{line}'"),
        })
    }

    fn rest(&self) -> &'a [&'a str] {
        &self.lines[self.pos.min(self.lines.len())..]
    }
}
