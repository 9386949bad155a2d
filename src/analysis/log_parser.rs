//! Log parsing for testbed trace files.
//!
//! Classifies raw log lines against the five known event patterns, extracts
//! typed events, and drives the single sequential pass over a trace file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use color_eyre::eyre::{Context, Result};
use regex::Regex;

use super::csv_export::EventCsvWriter;
use super::ledger::TraceStats;
use super::types::*;

/// Compiled regex patterns for trace parsing
pub struct LogPatterns {
    /// Match: "<time> ID:<n> Rime started with address <b>.<b>"
    pub node_boot: Regex,
    /// Match: "<time> ID:<n> App: Recv from <hex>.<hex> seqn <n> hops <n>"
    pub recv: Regex,
    /// Match: "<time> ID:<n> App: Send seqn <n>"
    pub send: Regex,
    /// Match: "<time> ID:<n> App: sr_recv from sink seqn <n> hops <n> node metric <n>"
    pub sr_recv: Regex,
    /// Match: "<time> ID:<n> App: sink sending seqn <n> to <hex>.<hex>"
    pub sr_send: Regex,
}

/// Every event line starts with a timestamp token and the decimal id of the
/// reporting node.
const RECORD_PREFIX: &str = r"^(?P<time>[\w:.]+)\s+ID:(?P<self_id>\d+)\s+";

fn record_pattern(body: &str) -> Regex {
    Regex::new(&format!("{RECORD_PREFIX}{body}")).expect("Invalid event regex")
}

impl LogPatterns {
    pub fn new() -> Self {
        Self {
            node_boot: record_pattern(r"Rime started with address (?P<addr1>\d+)\.(?P<addr2>\d+)"),
            recv: record_pattern(
                r"App: Recv from (?P<src1>\w+)\.(?P<src2>\w+) seqn (?P<seqn>\d+) hops (?P<hops>\d+)",
            ),
            send: record_pattern(r"App: Send seqn (?P<seqn>\d+)"),
            sr_recv: record_pattern(
                r"App: sr_recv from sink seqn (?P<seqn>\d+) hops (?P<hops>\d+) node metric (?P<metric>\d+)",
            ),
            sr_send: record_pattern(
                r"App: sink sending seqn (?P<seqn>\d+) to (?P<dest1>\w+)\.(?P<dest2>\w+)",
            ),
        }
    }
}

/// Global patterns instance
pub static PATTERNS: LazyLock<LogPatterns> = LazyLock::new(LogPatterns::new);

/// Errors from link address decoding
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("Invalid address byte: {byte}")]
    InvalidByte { byte: String },
}

/// Decode a node identity from the first byte of a two-byte link address.
///
/// Addresses are printed as two hex bytes separated by a dot. Only the first
/// byte carries node identity; the second encodes the cluster group and is
/// discarded.
pub fn node_from_address(high_byte: &str) -> Result<NodeId, AddressError> {
    NodeId::from_str_radix(high_byte, 16).map_err(|_| AddressError::InvalidByte {
        byte: high_byte.to_string(),
    })
}

/// Classify one raw log line into a typed event.
///
/// Patterns are attempted in fixed precedence and the first match wins; the
/// patterns are not mutually exclusive by construction, so the order matters.
/// Lines that match no pattern, and matched lines whose fields fail integer
/// conversion, yield `None`.
pub fn classify(line: &str) -> Option<LogEvent> {
    if let Some(caps) = PATTERNS.node_boot.captures(line) {
        return Some(LogEvent::NodeBoot {
            time: caps["time"].to_string(),
            node: caps["self_id"].parse().ok()?,
        });
    }

    if let Some(caps) = PATTERNS.recv.captures(line) {
        return Some(LogEvent::Receive {
            time: caps["time"].to_string(),
            src: node_from_address(&caps["src1"]).ok()?,
            dest: caps["self_id"].parse().ok()?,
            seqn: caps["seqn"].parse().ok()?,
            hops: caps["hops"].parse().ok()?,
        });
    }

    if let Some(caps) = PATTERNS.send.captures(line) {
        return Some(LogEvent::Send {
            time: caps["time"].to_string(),
            src: caps["self_id"].parse().ok()?,
            dest: SINK_ID,
            seqn: caps["seqn"].parse().ok()?,
        });
    }

    if let Some(caps) = PATTERNS.sr_recv.captures(line) {
        return Some(LogEvent::SourceRouteReceive {
            time: caps["time"].to_string(),
            src: SINK_ID,
            dest: caps["self_id"].parse().ok()?,
            seqn: caps["seqn"].parse().ok()?,
            hops: caps["hops"].parse().ok()?,
            metric: caps["metric"].parse().ok()?,
        });
    }

    if let Some(caps) = PATTERNS.sr_send.captures(line) {
        return Some(LogEvent::SourceRouteSend {
            time: caps["time"].to_string(),
            src: caps["self_id"].parse().ok()?,
            dest: node_from_address(&caps["dest1"]).ok()?,
            seqn: caps["seqn"].parse().ok()?,
        });
    }

    None
}

/// Run the sequential pass over one trace file.
///
/// Streams the file line by line, appends data collection events to the CSV
/// files in `output_dir`, and accumulates ledger state for the final report.
/// Unreadable and unmatched lines are skipped.
pub fn process_trace(log_file: &Path, output_dir: &Path) -> Result<TraceStats> {
    let file = File::open(log_file)
        .with_context(|| format!("Failed to open trace file: {}", log_file.display()))?;
    let reader = BufReader::with_capacity(64 * 1024, file);

    let mut csv = EventCsvWriter::create(output_dir)?;
    let mut stats = TraceStats::default();

    let mut total_lines = 0usize;
    let mut matched_events = 0usize;

    for line_result in reader.lines() {
        let line = match line_result {
            Ok(l) => l,
            Err(_) => continue, // Skip lines that are not valid text
        };
        total_lines += 1;

        let Some(event) = classify(&line) else {
            continue;
        };
        matched_events += 1;

        csv.record(&event)?;
        stats.observe(event);
    }

    csv.flush()?;

    log::info!(
        "Parsed {} lines, {} delivery events, {} known nodes",
        total_lines,
        matched_events,
        stats.registry.len()
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_boot_line() {
        let event = classify("12:01:02.123\tID:5\tRime started with address 5.0");
        assert_eq!(
            event,
            Some(LogEvent::NodeBoot {
                time: "12:01:02.123".to_string(),
                node: 5,
            })
        );
    }

    #[test]
    fn test_recv_line_decodes_address_high_byte() {
        let event = classify("12:01:05.000\tID:1\tApp: Recv from 0a.ff seqn 7 hops 2");
        assert_eq!(
            event,
            Some(LogEvent::Receive {
                time: "12:01:05.000".to_string(),
                src: 10, // 0x0a; the trailing ff group byte is discarded
                dest: 1,
                seqn: 7,
                hops: 2,
            })
        );
    }

    #[test]
    fn test_send_line_targets_sink() {
        let event = classify("12:01:04.500\tID:3\tApp: Send seqn 10");
        assert_eq!(
            event,
            Some(LogEvent::Send {
                time: "12:01:04.500".to_string(),
                src: 3,
                dest: SINK_ID,
                seqn: 10,
            })
        );
    }

    #[test]
    fn test_sr_recv_line_originates_at_sink() {
        let event = classify("12:02:00.000\tID:4\tApp: sr_recv from sink seqn 2 hops 3 node metric 12");
        assert_eq!(
            event,
            Some(LogEvent::SourceRouteReceive {
                time: "12:02:00.000".to_string(),
                src: SINK_ID,
                dest: 4,
                seqn: 2,
                hops: 3,
                metric: 12,
            })
        );
    }

    #[test]
    fn test_sr_send_line_decodes_destination() {
        let event = classify("12:01:59.000\tID:1\tApp: sink sending seqn 2 to 04.00");
        assert_eq!(
            event,
            Some(LogEvent::SourceRouteSend {
                time: "12:01:59.000".to_string(),
                src: 1,
                dest: 4,
                seqn: 2,
            })
        );
    }

    #[test]
    fn test_unmatched_lines_are_ignored() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("random noise"), None);
        assert_eq!(classify("12:00:00.000\tID:2\tApp: wrong length: 9"), None);
        // The record prefix is mandatory
        assert_eq!(classify("App: Send seqn 10"), None);
    }

    #[test]
    fn test_non_hex_address_is_skipped() {
        assert_eq!(
            classify("12:01:05.000\tID:1\tApp: Recv from zz.00 seqn 7 hops 2"),
            None
        );
    }

    #[test]
    fn test_node_from_address() {
        assert_eq!(node_from_address("0a").unwrap(), 10);
        assert_eq!(node_from_address("10").unwrap(), 16);
        assert!(node_from_address("zz").is_err());
    }
}
