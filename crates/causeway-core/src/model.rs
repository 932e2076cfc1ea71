//! Mind-map data model and its wire representation.
//!
//! The wire layer (`MindMapDocument`) keeps the camelCase field names of the
//! original web client so stored documents stay interchangeable with the
//! JavaScript payload: `{ "nodes": [...], "links": [...], "lastUpdated": ... }`.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Outcome,
    Cause,
}

/// One card on the canvas. `x`/`y` are the top-left corner in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Timeline year. Cause nodes carry one; it is authoritative for `y`
    /// while the timeline is active.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Fixed nodes (the outcome) cannot be dragged or deleted.
    #[serde(rename = "isFixed")]
    #[serde(default)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_fixed: bool,
}

impl Node {
    pub fn is_outcome(&self) -> bool {
        self.kind == NodeKind::Outcome
    }
}

/// An undirected causal connection between two nodes. `source`/`target`
/// record the click order but carry no direction semantics; the pair is
/// deduplicated unordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Link {
    /// Canonical unordered key for duplicate detection: the smaller id first.
    pub fn pair_key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    pub fn key(&self) -> (String, String) {
        Self::pair_key(&self.source, &self.target)
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

/// In-memory mind map: insertion-ordered nodes (render order) plus links
/// with an unordered-pair index for O(1) duplicate checks.
#[derive(Debug, Clone, Default)]
pub struct MindMap {
    pub nodes: IndexMap<String, Node>,
    pub links: Vec<Link>,
    pub(crate) link_keys: FxHashSet<(String, String)>,
}

impl MindMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn outcome(&self) -> Option<&Node> {
        self.nodes.values().find(|n| n.is_outcome())
    }

    pub fn cause_count(&self) -> usize {
        self.nodes.values().filter(|n| !n.is_outcome()).count()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn has_link_between(&self, a: &str, b: &str) -> bool {
        self.link_keys.contains(&Link::pair_key(a, b))
    }

    pub(crate) fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub(crate) fn insert_link(&mut self, link: Link) {
        self.link_keys.insert(link.key());
        self.links.push(link);
    }

    pub(crate) fn remove_links_touching(&mut self, id: &str) -> usize {
        let before = self.links.len();
        self.links.retain(|l| !l.touches(id));
        self.link_keys
            .retain(|(a, b)| a != id && b != id);
        before - self.links.len()
    }
}

/// Serialized document shape shared with the original web client and its
/// REST backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(rename = "lastUpdated")]
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl MindMapDocument {
    /// Snapshots a map for persistence, stamping `lastUpdated` with the
    /// current UTC time (RFC 3339). The stamp is display metadata only and
    /// is ignored on load.
    pub fn snapshot(map: &MindMap) -> Self {
        Self {
            nodes: map.nodes.values().cloned().collect(),
            links: map.links.clone(),
            last_updated: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}
