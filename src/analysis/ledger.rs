//! Send/receive ledgers and node registry.
//!
//! All state mutated during the trace pass lives here: the set of known nodes
//! with reset detection, and one delivery ledger per communication scheme.

use std::collections::{BTreeMap, BTreeSet};

use super::types::*;

/// Nodes observed via boot announcements, with reset detection.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    known: BTreeSet<NodeId>,
    resets: Vec<NodeId>,
}

impl NodeRegistry {
    /// Register a boot announcement. A second announcement for a known node is
    /// a reset: recorded as a warning, processing continues unaffected.
    pub fn add(&mut self, node: NodeId) {
        if !self.known.insert(node) {
            log::warn!("Node {} reset during the simulation", node);
            self.resets.push(node);
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.known.contains(&node)
    }

    /// Known node ids, ascending.
    pub fn known(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.known.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// One entry per reset occurrence, in order of detection.
    pub fn resets(&self) -> &[NodeId] {
        &self.resets
    }

    pub fn reset_count(&self) -> usize {
        self.resets.len()
    }
}

/// Send/receive timestamp maps for one scheme, keyed by node and sequence
/// number. A repeated `(node, seqn)` observation overwrites the prior
/// timestamp.
#[derive(Debug, Clone, Default)]
pub struct DeliveryLedger {
    sent: BTreeMap<NodeId, BTreeMap<SeqNum, String>>,
    received: BTreeMap<NodeId, BTreeMap<SeqNum, String>>,
}

impl DeliveryLedger {
    pub fn record_send(&mut self, node: NodeId, seqn: SeqNum, time: String) {
        self.sent.entry(node).or_default().insert(seqn, time);
    }

    pub fn record_receive(&mut self, node: NodeId, seqn: SeqNum, time: String) {
        self.received.entry(node).or_default().insert(seqn, time);
    }

    /// Per-node sent maps, ascending by node id.
    pub fn sent(&self) -> &BTreeMap<NodeId, BTreeMap<SeqNum, String>> {
        &self.sent
    }

    pub fn sent_count(&self, node: NodeId) -> usize {
        self.sent.get(&node).map_or(0, BTreeMap::len)
    }

    pub fn received_count(&self, node: NodeId) -> usize {
        self.received.get(&node).map_or(0, BTreeMap::len)
    }

    pub fn has_sent(&self, node: NodeId) -> bool {
        self.sent.contains_key(&node)
    }
}

/// All ledger state for one trace pass. One instance per invocation, owned by
/// the report-building context; no process-wide state.
#[derive(Debug, Clone, Default)]
pub struct TraceStats {
    pub registry: NodeRegistry,
    /// Direct any-to-sink scheme: sends observed at the originating node,
    /// receives observed at the sink.
    pub collection: DeliveryLedger,
    /// Sink-initiated scheme, direction reversed: sends observed at the sink,
    /// receives observed at the destination node. Both sides key by the
    /// destination.
    pub source_routing: DeliveryLedger,
}

impl TraceStats {
    /// Route one extracted event into the registry or the owning ledger.
    pub fn observe(&mut self, event: LogEvent) {
        match event {
            LogEvent::NodeBoot { node, .. } => self.registry.add(node),
            LogEvent::Receive {
                time,
                src,
                dest,
                seqn,
                ..
            } => {
                // The sink is the only delivery observation point; receives
                // logged by intermediate nodes do not count.
                if dest == SINK_ID {
                    self.collection.record_receive(src, seqn, time);
                }
            }
            LogEvent::Send {
                time, src, seqn, ..
            } => self.collection.record_send(src, seqn, time),
            LogEvent::SourceRouteReceive {
                time, dest, seqn, ..
            } => self.source_routing.record_receive(dest, seqn, time),
            LogEvent::SourceRouteSend {
                time, dest, seqn, ..
            } => self.source_routing.record_send(dest, seqn, time),
        }
    }
}
