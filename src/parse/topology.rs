//! Rebuilds the vdev tree from the indented `config:` block.

use crate::error::ParseError;
use crate::models::pool::{DeviceNode, DeviceTree, NodeId};
use crate::parse::fields::next_column;
use crate::parse::line::{decode_device_line, decode_spare_line};

/// Columns per indentation level in the config block.
pub const INDENT_UNIT: usize = 2;

/// Everything recovered from the config and spares blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    /// The pool's own line (first data row). Its name is not used.
    pub pool_line: Option<DeviceNode>,
    pub devices:   DeviceTree,
    pub spares:    Vec<DeviceNode>,
}

/// Build the topology from the `config` block and, when present, the
/// `spares` block.
pub fn build(config: &str, spares: Option<&str>) -> Result<Topology, ParseError> {
    let mut topo = parse_config(config)?;
    if let Some(spares) = spares {
        topo.spares = parse_spares(spares)?;
    }
    Ok(topo)
}

/// Walk the config rows, placing each one by its indentation relative to the
/// pool row.
///
/// `open` holds the path from a root to the last placed node, tagged with
/// each entry's indentation depth. A new row pops every entry at its own
/// depth or deeper and attaches to whatever is left on top, so a dedent of
/// several levels at once returns to the matching ancestor.
pub fn parse_config(config: &str) -> Result<Topology, ParseError> {
    let mut topo = Topology::default();
    let mut baseline: Option<usize> = None;
    let mut open: Vec<(usize, NodeId)> = Vec::new();

    for line in config.lines() {
        if line.trim().is_empty() || is_column_header(line) {
            continue;
        }
        if line.trim() == "spares" {
            log::debug!("config: spares marker, stopping");
            break;
        }

        let Some(base) = baseline else {
            topo.pool_line = Some(decode_device_line(line)?);
            baseline = Some(indent_of(line));
            continue;
        };

        let depth = indent_of(line).saturating_sub(base) / INDENT_UNIT;
        if depth == 0 {
            log::debug!("config: left the pool tree at {:?}", line.trim());
            break;
        }

        let node = decode_device_line(line)?;
        while open.last().is_some_and(|(d, _)| *d >= depth) {
            open.pop();
        }
        let id = match open.last() {
            Some((_, parent)) if depth > 1 => topo.devices.push_child(*parent, node),
            _                              => topo.devices.push_root(node),
        };
        open.push((depth, id));
    }

    Ok(topo)
}

/// Each spares row becomes a flat, parentless node.
pub fn parse_spares(spares: &str) -> Result<Vec<DeviceNode>, ParseError> {
    spares
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(decode_spare_line)
        .collect()
}

fn is_column_header(line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    tokens.windows(2).any(|w| w == ["NAME", "STATE"])
}

fn indent_of(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .fold(0, next_column)
}
