//! Cutting-program parsing and report formatting.
//!
//! The optimizer ships a flat, already-ordered operation sequence with
//! each result (`sequence` plus `conflicts` and node totals). This module
//! parses that shape into [`CuttingProgram`] and renders it as a
//! human-readable cutting program. It is purely a pass-through formatter:
//! step order and `seq` numbers are producer-authoritative and never
//! recomputed, and conflicts are surfaced verbatim; no geometric
//! conflict detection happens on this side of the trust boundary.

use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;

/// Classification of a producer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operation {
    /// The untouched stock block.
    Start,
    /// A guillotine cut.
    Cut,
    /// An intermediate sub-block produced by a cut.
    SubBlock,
    /// A finished item.
    Item,
}

impl Operation {
    /// Parses a producer operation tag. The producer spells the
    /// sub-block tag with a hyphen; the underscore form is accepted too.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "START" => Some(Operation::Start),
            "CUT" => Some(Operation::Cut),
            "SUB-BLOCK" | "SUB_BLOCK" => Some(Operation::SubBlock),
            "ITEM" => Some(Operation::Item),
            _ => None,
        }
    }

    /// Single-character marker used in the rendered program.
    pub fn marker(self) -> char {
        match self {
            Operation::Start => '#',
            Operation::Cut => '>',
            Operation::SubBlock => '+',
            Operation::Item => '*',
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Operation::Start => "start",
            Operation::Cut => "cut",
            Operation::SubBlock => "sub-block",
            Operation::Item => "item",
        }
    }
}

/// One step of the cutting program, exactly as ordered by the producer.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    /// Producer-assigned sequence number. Authoritative; never recomputed.
    pub seq: u64,
    /// Operation classification.
    pub operation: Operation,
    /// Producer-supplied description, passed through unmodified.
    pub description: String,
    /// Depth of the step's node in the cut tree; drives report indentation.
    pub depth: u64,
    /// Volume of the step's node, or 0 when the producer omitted it.
    pub volume: f64,
}

/// Node totals reported alongside the sequence.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ProgramTotals {
    pub total_nodes: u64,
    pub total_cuts: u64,
    pub total_items: u64,
}

/// A producer-declared conflict between two cuts.
#[derive(Debug, Clone, Serialize)]
pub struct Conflict {
    /// Producer-supplied description, passed through unmodified.
    pub description: String,
}

/// The full cutting program for one result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CuttingProgram {
    /// Steps in producer order.
    pub steps: Vec<Step>,
    /// Node totals.
    pub totals: ProgramTotals,
    /// Producer-declared conflicts. An empty list means the producer
    /// declared none, not that none exist geometrically.
    pub conflicts: Vec<Conflict>,
}

impl CuttingProgram {
    fn new() -> Self {
        Self::default()
    }

    /// Parses the producer's `cutting_tree` payload (the
    /// `sequence`/`conflicts`/totals shape). Missing or malformed pieces
    /// degrade to empty rather than failing: a result without a program
    /// still renders.
    pub fn from_value(raw: &Value) -> CuttingProgram {
        let Some(obj) = raw.as_object() else {
            return CuttingProgram::new();
        };

        let mut program = CuttingProgram::new();
        program.totals = ProgramTotals {
            total_nodes: u64_field(raw, "total_nodes"),
            total_cuts: u64_field(raw, "total_cuts"),
            total_items: u64_field(raw, "total_items"),
        };

        if let Some(sequence) = obj.get("sequence").and_then(Value::as_array) {
            for entry in sequence {
                match parse_step(entry) {
                    Some(step) => program.steps.push(step),
                    None => log::debug!("skipping unrecognized sequence entry: {}", entry),
                }
            }
        }

        if let Some(conflicts) = obj.get("conflicts").and_then(Value::as_array) {
            for conflict in conflicts {
                let description = conflict
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                program.conflicts.push(Conflict { description });
            }
        }

        program
    }
}

fn u64_field(raw: &Value, key: &str) -> u64 {
    raw.get(key).and_then(Value::as_u64).unwrap_or(0)
}

fn parse_step(entry: &Value) -> Option<Step> {
    let operation = Operation::parse(entry.get("operation")?.as_str()?)?;
    let node = entry.get("node");
    let node_num = |key: &str| {
        node.and_then(|n| n.get(key))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    };
    Some(Step {
        seq: entry.get("seq").and_then(Value::as_u64).unwrap_or(0),
        operation,
        description: entry
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        depth: node
            .and_then(|n| n.get("depth"))
            .and_then(Value::as_u64)
            .unwrap_or(0),
        volume: node_num("volume"),
    })
}

/// Renders the cutting program as text: one line per step with a marker,
/// depth-proportional indentation and the node volume (or a `-`
/// placeholder when absent), followed by totals and the conflicts
/// section.
pub fn format_program(program: &CuttingProgram) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Cutting program: {} nodes, {} cuts, {} items",
        program.totals.total_nodes, program.totals.total_cuts, program.totals.total_items
    );

    for step in &program.steps {
        let indent = "  ".repeat(step.depth as usize);
        let volume = if step.volume > 0.0 {
            format!("{:.0} mm3", step.volume)
        } else {
            "-".to_string()
        };
        let _ = writeln!(
            out,
            "{:>4}  {}{} [{}] {}  ({})",
            step.seq,
            indent,
            step.operation.marker(),
            step.operation.label(),
            step.description,
            volume
        );
    }

    if program.conflicts.is_empty() {
        let _ = writeln!(out, "no conflicts reported");
    } else {
        let _ = writeln!(out, "conflicts reported: {}", program.conflicts.len());
        for conflict in &program.conflicts {
            let _ = writeln!(out, "  ! {}", conflict.description);
        }
    }

    out
}
