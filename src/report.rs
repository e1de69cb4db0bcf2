use std::fmt::Write as _;

use colored::*;
use serde::Serialize;

use crate::engine::graph::edge_count;
use crate::error::{SortError, SortResult, VerifyError};
use crate::loader::LoadedGraph;

// ======================================================
// EXIT CODES
// ======================================================

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CYCLE: i32 = 2;
pub const EXIT_INVALID_NODE: i32 = 3;
pub const EXIT_NULL_INPUT: i32 = 4;
pub const EXIT_ORDER_MISMATCH: i32 = 5;

pub fn exit_code(err: &SortError) -> i32 {
    match err {
        SortError::CycleDetected { .. } => EXIT_CYCLE,
        SortError::InvalidNode { .. } => EXIT_INVALID_NODE,
        SortError::NullInput => EXIT_NULL_INPUT,
    }
}

// ======================================================
// DATA MODEL
// ======================================================

/// Outcome of `dagsort sort` / `dagsort check`.
#[derive(Debug, Serialize)]
pub struct SortReport {
    /// `ok`, or the failure kind (`null_input`, `invalid_node`, `cycle_detected`).
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Nodes left unplaced when a cycle stopped the sort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<Vec<usize>>,
    /// Absent when the file was rejected while loading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_digest: Option<String>,
    #[serde(skip)]
    pub exit_code: i32,
    #[serde(skip)]
    pub failure: Option<SortError>,
}

impl SortReport {
    /// `include_order` is false for `check`, which reports only the verdict.
    pub fn new(
        loaded: &LoadedGraph,
        outcome: &SortResult<Vec<usize>>,
        include_order: bool,
    ) -> Self {
        let graph = loaded.as_deref();

        let mut report = SortReport {
            status: "ok",
            nodes: graph.map(<[Vec<usize>]>::len),
            edges: graph.map(edge_count),
            order: None,
            error: None,
            remaining: None,
            graph_digest: Some(loaded.digest.clone()),
            exit_code: EXIT_OK,
            failure: None,
        };

        match outcome {
            Ok(order) => {
                if include_order {
                    report.order = Some(order.clone());
                }
            }
            Err(err) => {
                report.status = err.kind();
                report.error = Some(err.to_string());
                report.exit_code = exit_code(err);
                if let SortError::CycleDetected { remaining } = err {
                    report.remaining = Some(remaining.clone());
                }
                report.failure = Some(err.clone());
            }
        }

        report
    }

    /// Report for a graph the loader refused, e.g. one with a negative identifier.
    pub fn rejected(err: &SortError) -> Self {
        SortReport {
            status: err.kind(),
            nodes: None,
            edges: None,
            order: None,
            error: Some(err.to_string()),
            remaining: None,
            graph_digest: None,
            exit_code: exit_code(err),
            failure: Some(err.clone()),
        }
    }
}

/// Outcome of `dagsort verify`.
#[derive(Debug, Serialize)]
pub struct VerifyReport {
    /// `ok`, `order_mismatch`, or a graph failure kind.
    pub status: &'static str,
    pub order: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub graph_digest: String,
    #[serde(skip)]
    pub exit_code: i32,
    #[serde(skip)]
    pub outcome: Result<(), VerifyError>,
}

impl VerifyReport {
    pub fn new(
        loaded: &LoadedGraph,
        order: &[usize],
        outcome: &Result<(), VerifyError>,
    ) -> Self {
        let (status, error, exit_code) = match outcome {
            Ok(()) => ("ok", None, EXIT_OK),
            Err(VerifyError::Graph(err)) => {
                (err.kind(), Some(err.to_string()), exit_code(err))
            }
            Err(VerifyError::Order(violation)) => (
                "order_mismatch",
                Some(violation.to_string()),
                EXIT_ORDER_MISMATCH,
            ),
        };

        VerifyReport {
            status,
            order: order.to_vec(),
            error,
            graph_digest: loaded.digest.clone(),
            exit_code,
            outcome: outcome.clone(),
        }
    }
}

// ======================================================
// HUMAN OUTPUT
// ======================================================

pub fn render_sort_human(report: &SortReport) -> String {
    let mut out = String::new();

    let err = match &report.failure {
        None => {
            let _ = writeln!(
                out,
                "{} {} node(s), {} edge(s)",
                "✓ Sorted".green().bold(),
                report.nodes.unwrap_or(0),
                report.edges.unwrap_or(0)
            );
            if let Some(order) = &report.order {
                let _ = writeln!(out, "Order: {}", format_order(order));
            }
            return out;
        }
        Some(err) => err,
    };

    let title = match err {
        SortError::CycleDetected { .. } => "✗ Cycle detected",
        SortError::InvalidNode { .. } => "✗ Invalid node",
        SortError::NullInput => "✗ No graph",
    };
    let _ = writeln!(out, "{}", title.red().bold());
    let _ = writeln!(out, "  {}", err);

    if let SortError::CycleDetected { remaining } = err {
        let _ = writeln!(
            out,
            "  Unplaced: {}",
            remaining
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(", ")
                .yellow()
        );
    }

    out
}

pub fn render_verify_human(report: &VerifyReport) -> String {
    let mut out = String::new();

    match &report.outcome {
        Ok(()) => {
            let _ = writeln!(
                out,
                "{} {}",
                "✓ Valid order".green().bold(),
                format_order(&report.order)
            );
        }
        Err(VerifyError::Order(violation)) => {
            let _ = writeln!(out, "{}", "✗ Not a topological order".red().bold());
            let _ = writeln!(out, "  {}", violation);
        }
        Err(VerifyError::Graph(err)) => {
            let _ = writeln!(out, "{}", "✗ Graph rejected".red().bold());
            let _ = writeln!(out, "  {}", err);
        }
    }

    out
}

fn format_order(order: &[usize]) -> String {
    if order.is_empty() {
        return "(empty)".to_string();
    }

    order
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(" → ")
}

// ======================================================
// JSON OUTPUT
// ======================================================

pub fn render_json<T: Serialize>(report: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
