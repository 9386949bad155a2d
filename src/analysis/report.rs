//! Report generation for delivery statistics.
//!
//! Derives per-node and aggregate delivery ratios from the final ledger state
//! and renders the console report. A JSON counterpart is available for
//! machine consumption.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use super::ledger::{DeliveryLedger, TraceStats};
use super::types::*;

/// Derive the delivery report from final trace state.
pub fn build_report(stats: &TraceStats) -> DeliveryReport {
    let silent_nodes = stats
        .registry
        .known()
        .filter(|&node| node != SINK_ID && !stats.collection.has_sent(node))
        .collect();

    DeliveryReport {
        reset_nodes: stats.registry.resets().to_vec(),
        silent_nodes,
        collection: scheme_report(&stats.collection),
        source_routing: scheme_report(&stats.source_routing),
    }
}

/// Per-node and aggregate statistics for one ledger. Iteration is driven by
/// the sent map, ascending by node id.
fn scheme_report(ledger: &DeliveryLedger) -> SchemeReport {
    let mut per_node = Vec::new();
    let mut total_sent = 0usize;
    let mut total_received = 0usize;

    for (&node, sent) in ledger.sent() {
        let nsent = sent.len();
        if nsent == 0 {
            // Structurally unreachable since iteration follows the sent map,
            // but a zero divisor must never abort the report.
            log::warn!("Node {} has an empty sent ledger, skipping", node);
            continue;
        }
        let nrecv = ledger.received_count(node);

        let pdr = 100.0 * nrecv as f64 / nsent as f64;
        per_node.push(NodeDeliveryStats {
            node,
            packets_sent: nsent,
            packets_received: nrecv,
            pdr,
            plr: 100.0 - pdr,
        });

        total_sent += nsent;
        total_received += nrecv;
    }

    // Weighted over all packets, not an average of per-node ratios
    let overall = if total_sent > 0 {
        let pdr = 100.0 * total_received as f64 / total_sent as f64;
        Some(OverallStats {
            pdr,
            plr: 100.0 - pdr,
        })
    } else {
        None
    };

    SchemeReport {
        per_node,
        total_sent,
        total_received,
        overall,
    }
}

/// Render the human-readable console report.
///
/// Section order is fixed: reset warnings, never-sent warnings, collection
/// per-node and overall statistics, source routing per-node and overall
/// statistics.
pub fn render_text(report: &DeliveryReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !report.reset_nodes.is_empty() {
        lines.push("----- WARNING -----".to_string());
        for node in &report.reset_nodes {
            lines.push(format!("Warning: node {} reset during the simulation.", node));
        }
        lines.push(format!(
            "{} nodes reset during the simulation",
            report.reset_nodes.len()
        ));
        lines.push(String::new());
    }

    if !report.silent_nodes.is_empty() {
        lines.push("----- Data Collection WARNING -----".to_string());
        for node in &report.silent_nodes {
            lines.push(format!("Warning: node {} did not send any data.", node));
        }
        lines.push(String::new());
    }

    push_scheme(&mut lines, "Data Collection", &report.collection);
    lines.push(String::new());
    push_scheme(&mut lines, "Source Routing", &report.source_routing);

    lines.join("\n") + "\n"
}

fn push_scheme(lines: &mut Vec<String>, title: &str, scheme: &SchemeReport) {
    lines.push(format!("----- {} Node Statistics -----", title));
    for stats in &scheme.per_node {
        lines.push(format!(
            "Node {}: TX Packets = {}, RX Packets = {}, PDR = {:.2}%, PLR = {:.2}%",
            stats.node, stats.packets_sent, stats.packets_received, stats.pdr, stats.plr
        ));
    }

    if let Some(ref overall) = scheme.overall {
        lines.push(String::new());
        lines.push(format!("----- {} Overall Statistics -----", title));
        lines.push(format!("Total Number of Packets Sent: {}", scheme.total_sent));
        lines.push(format!(
            "Total Number of Packets Received: {}",
            scheme.total_received
        ));
        lines.push(format!("Overall PDR = {:.2}%", overall.pdr));
        lines.push(format!("Overall PLR = {:.2}%", overall.plr));
    }
}

/// Write the report as pretty-printed JSON.
pub fn write_json_report(report: &DeliveryReport, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}
