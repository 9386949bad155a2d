//! # Sensortrace - Delivery statistics for wireless sensor network testbed traces
//!
//! This library parses simulation log traces from a sensor network testbed and
//! derives per-node and network-wide delivery statistics for two communication
//! schemes: direct any-to-sink data collection, and sink-initiated source routing.
//!
//! ## Overview
//!
//! A testbed run produces one text log with interleaved lines from every node.
//! Five line shapes carry meaning here: node boot announcements, data collection
//! send/receive pairs, and source routing send/receive pairs. Everything else is
//! ignored. One sequential pass over the log feeds two tab-separated event files
//! (`recv.csv`, `sent.csv`) and an in-memory ledger from which the final report
//! is computed.
//!
//! ## Architecture
//!
//! The `analysis` module is organized as follows:
//!
//! - `types`: event model, node identity rules, and report data structures
//! - `log_parser`: line classification, field extraction, and the trace pass
//! - `ledger`: node registry, per-scheme delivery ledgers, and event routing
//! - `csv_export`: append-only CSV sink for data collection events
//! - `report`: statistics derivation and text/JSON report generation
//!
//! ## Error Handling
//!
//! Fallible paths return `Result<T, color_eyre::eyre::Error>` with context.
//! Unmatched or malformed log lines are skipped, never surfaced as errors.

pub mod analysis;
