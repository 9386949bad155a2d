//! Core data types for trace analysis.

use serde::{Deserialize, Serialize};

/// Node identity. Reported either as a decimal id or as the high byte of a
/// two-byte link address.
pub type NodeId = u16;

/// Application-level sequence number.
pub type SeqNum = u32;

/// The fixed data collection sink. All direct-scheme traffic is addressed to it.
pub const SINK_ID: NodeId = 1;

/// A delivery-relevant event extracted from one trace line.
///
/// `time` is the timestamp token exactly as it appears in the log. The testbed
/// emits several clock formats across deployments, so it is carried verbatim
/// and never reparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// A node (re)announced itself with its link address.
    NodeBoot { time: String, node: NodeId },
    /// Data collection receive, logged at the receiving node.
    Receive {
        time: String,
        src: NodeId,
        dest: NodeId,
        seqn: SeqNum,
        hops: u32,
    },
    /// Data collection send toward the sink, logged at the originating node.
    Send {
        time: String,
        src: NodeId,
        dest: NodeId,
        seqn: SeqNum,
    },
    /// Source routing receive, logged at the destination node.
    SourceRouteReceive {
        time: String,
        src: NodeId,
        dest: NodeId,
        seqn: SeqNum,
        hops: u32,
        /// Routing metric reported by the node. Parsed but not used by the
        /// delivery statistics.
        metric: u32,
    },
    /// Source routing send, logged at the sink.
    SourceRouteSend {
        time: String,
        src: NodeId,
        dest: NodeId,
        seqn: SeqNum,
    },
}

/// Delivery statistics for a single node within one scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDeliveryStats {
    pub node: NodeId,
    pub packets_sent: usize,
    pub packets_received: usize,
    /// Packet delivery ratio, percent.
    pub pdr: f64,
    /// Packet loss ratio, percent.
    pub plr: f64,
}

/// Network-wide totals for one scheme, weighted over all packets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub pdr: f64,
    pub plr: f64,
}

/// Per-node and aggregate statistics for one communication scheme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemeReport {
    /// Sorted by node id ascending.
    pub per_node: Vec<NodeDeliveryStats>,
    pub total_sent: usize,
    pub total_received: usize,
    /// Present only when at least one packet was sent.
    pub overall: Option<OverallStats>,
}

/// Complete delivery report for one trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// One entry per reset occurrence, in order of detection.
    pub reset_nodes: Vec<NodeId>,
    /// Known non-sink nodes that never sent any collection data.
    pub silent_nodes: Vec<NodeId>,
    pub collection: SchemeReport,
    pub source_routing: SchemeReport,
}
