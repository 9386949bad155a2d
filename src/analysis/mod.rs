//! Delivery statistics analysis for sensor network testbed traces.
//!
//! This module provides tools for extracting delivery events from raw trace
//! logs and deriving packet delivery statistics for the data collection and
//! source routing schemes.

pub mod types;
pub mod log_parser;
pub mod ledger;
pub mod csv_export;
pub mod report;

pub use types::*;
pub use log_parser::{classify, process_trace};
pub use ledger::{DeliveryLedger, NodeRegistry, TraceStats};
pub use csv_export::EventCsvWriter;
pub use report::{build_report, render_text, write_json_report};
