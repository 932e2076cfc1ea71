//! Canonical mind-map state and its mutation surface.
//!
//! Every operation is synchronous, atomic, and keeps the map invariants:
//! exactly one fixed outcome node, no duplicate unordered links, no dangling
//! links, positions clamped to the canvas, and `y` derived from `year` for
//! dated cause nodes. Invalid mutations are silent no-ops that report
//! "nothing applied" through their return value.

use uuid::Uuid;

use crate::case::Case;
use crate::config::CanvasConfig;
use crate::model::{Link, MindMap, MindMapDocument, Node, NodeKind};
use crate::timeline::{self, TimelineRange, embed_year, parse_embedded_year};

/// Id of the single outcome node, shared with the original client documents.
pub const OUTCOME_ID: &str = "outcome";

fn new_cause_id() -> String {
    format!("cause-{}", Uuid::new_v4())
}

fn new_link_id() -> String {
    format!("l-{}", Uuid::new_v4())
}

/// Finalize gate: how close the map is to a discussable causal argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapReadiness {
    pub cause_count: usize,
    pub link_count: usize,
    pub causes_needed: usize,
    pub links_needed: usize,
    pub can_finalize: bool,
}

const MIN_CAUSES: usize = 3;
const MIN_LINKS: usize = 2;

/// Owns the [`MindMap`] plus the canvas/timeline context its coordinates
/// are expressed in.
#[derive(Debug, Clone)]
pub struct MindMapState {
    map: MindMap,
    config: CanvasConfig,
    range: TimelineRange,
}

impl MindMapState {
    pub fn new(config: CanvasConfig, range: TimelineRange) -> Self {
        Self {
            map: MindMap::new(),
            config,
            range,
        }
    }

    /// Fresh map for a case: just the fixed outcome node, centered near the
    /// top of the canvas.
    pub fn new_for_case(config: CanvasConfig, range: TimelineRange, case: &Case) -> Self {
        let mut state = Self::new(config, range);
        let outcome = Node {
            id: OUTCOME_ID.to_string(),
            text: case.headline.clone(),
            x: state.config.outcome_x(),
            y: state.config.outcome_y,
            kind: NodeKind::Outcome,
            year: None,
            is_fixed: true,
        };
        state.map.insert_node(outcome);
        state
    }

    /// Rebuilds state from a stored document, normalizing it: self links,
    /// links to unknown nodes, and duplicate unordered pairs are dropped;
    /// extra outcome nodes beyond the first are dropped; positions are
    /// clamped; dated cause nodes get `y` recomputed under `range`.
    ///
    /// Returns `None` when the document has no outcome node at all, in which
    /// case the caller starts a fresh map instead.
    pub fn from_document(
        config: CanvasConfig,
        range: TimelineRange,
        doc: &MindMapDocument,
    ) -> Option<Self> {
        if !doc.nodes.iter().any(|n| n.kind == NodeKind::Outcome) {
            return None;
        }

        let mut state = Self::new(config, range);
        let height = state.canvas_height();
        let mut seen_outcome = false;
        for stored in &doc.nodes {
            let mut node = stored.clone();
            match node.kind {
                NodeKind::Outcome => {
                    if seen_outcome {
                        tracing::debug!(id = %node.id, "dropping extra outcome node");
                        continue;
                    }
                    seen_outcome = true;
                    node.is_fixed = true;
                    node.year = None;
                }
                NodeKind::Cause => {
                    node.is_fixed = false;
                    if node.year.is_none() {
                        node.year = parse_embedded_year(&node.text);
                    }
                    if let Some(year) = node.year {
                        node.y = state.range.year_to_y(&state.config, year);
                    }
                }
            }
            let (x, y) = state.config.clamp_position(node.x, node.y, height);
            node.x = x;
            node.y = y;
            if state.map.nodes.contains_key(&node.id) {
                tracing::debug!(id = %node.id, "dropping node with duplicate id");
                continue;
            }
            state.map.insert_node(node);
        }

        for stored in &doc.links {
            if stored.source == stored.target {
                tracing::debug!(id = %stored.id, "dropping self link");
                continue;
            }
            if !state.map.nodes.contains_key(&stored.source)
                || !state.map.nodes.contains_key(&stored.target)
            {
                tracing::debug!(id = %stored.id, "dropping link to unknown node");
                continue;
            }
            if state.map.has_link_between(&stored.source, &stored.target) {
                tracing::debug!(id = %stored.id, "dropping duplicate link");
                continue;
            }
            state.map.insert_link(stored.clone());
        }

        Some(state)
    }

    pub fn map(&self) -> &MindMap {
        &self.map
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn range(&self) -> &TimelineRange {
        &self.range
    }

    pub fn canvas_height(&self) -> f64 {
        self.range.required_canvas_height(&self.config)
    }

    pub fn used_years(&self) -> rustc_hash::FxHashSet<i32> {
        timeline::used_years(&self.map, &self.range)
    }

    pub fn readiness(&self) -> MapReadiness {
        let cause_count = self.map.cause_count();
        let link_count = self.map.link_count();
        MapReadiness {
            cause_count,
            link_count,
            causes_needed: MIN_CAUSES.saturating_sub(cause_count),
            links_needed: MIN_LINKS.saturating_sub(link_count),
            can_finalize: cause_count >= MIN_CAUSES && link_count >= MIN_LINKS,
        }
    }

    /// Serializable snapshot of the current map.
    pub fn document(&self) -> MindMapDocument {
        MindMapDocument::snapshot(&self.map)
    }

    /// Adds a cause node. The year defaults to the one embedded in `text`
    /// (range midpoint when absent) and is re-embedded so label and year
    /// agree. Blank text is rejected.
    pub fn add_cause_node(&mut self, text: &str, year: Option<i32>) -> Option<&Node> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::debug!("add rejected: blank text");
            return None;
        }
        let year = year.unwrap_or_else(|| self.range.extract_year(trimmed));
        let height = self.canvas_height();
        let (x, y) = self.config.clamp_position(
            self.config.lane_offset,
            self.range.year_to_y(&self.config, year),
            height,
        );
        let node = Node {
            id: new_cause_id(),
            text: embed_year(trimmed, year),
            x,
            y,
            kind: NodeKind::Cause,
            year: Some(year),
            is_fixed: false,
        };
        let id = node.id.clone();
        self.map.insert_node(node);
        self.map.node(&id)
    }

    /// Transient drag positioning; clamped, does not touch `year`. Fixed or
    /// unknown nodes are left alone.
    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> bool {
        let height = self.canvas_height();
        let Some(node) = self.map.nodes.get_mut(id) else {
            tracing::debug!(%id, "move rejected: unknown node");
            return false;
        };
        if node.is_fixed {
            tracing::debug!(%id, "move rejected: fixed node");
            return false;
        }
        let (x, y) = self.config.clamp_position(x, y, height);
        node.x = x;
        node.y = y;
        true
    }

    /// Resolves a drag release: snaps the node to the year line closest to
    /// `pixel_y`, updates the year, re-embeds it in the label, and re-lanes
    /// the node onto the timeline column.
    pub fn snap_node_to_year(&mut self, id: &str, pixel_y: f64) -> Option<i32> {
        let height = self.canvas_height();
        let year = self.range.y_to_closest_year(&self.config, pixel_y);
        let snapped_y = self.range.year_to_y(&self.config, year);
        let lane = self.config.lane_offset;
        let Some(node) = self.map.nodes.get_mut(id) else {
            tracing::debug!(%id, "snap rejected: unknown node");
            return None;
        };
        if node.is_fixed {
            tracing::debug!(%id, "snap rejected: fixed node");
            return None;
        }
        let (x, y) = self.config.clamp_position(lane, snapped_y, height);
        node.x = x;
        node.y = y;
        node.year = Some(year);
        node.text = embed_year(&node.text, year);
        Some(year)
    }

    /// Connects two nodes. Self links, unknown endpoints, and pairs that are
    /// already connected (in either order) are rejected.
    pub fn link_nodes(&mut self, a: &str, b: &str) -> Option<&Link> {
        if a == b {
            tracing::debug!(%a, "link rejected: self link");
            return None;
        }
        if !self.map.nodes.contains_key(a) || !self.map.nodes.contains_key(b) {
            tracing::debug!(%a, %b, "link rejected: unknown node");
            return None;
        }
        if self.map.has_link_between(a, b) {
            tracing::debug!(%a, %b, "link rejected: pair already connected");
            return None;
        }
        self.map.insert_link(Link {
            id: new_link_id(),
            source: a.to_string(),
            target: b.to_string(),
        });
        self.map.links.last()
    }

    /// Removes a node and every link touching it. The outcome node is
    /// immune.
    pub fn delete_node(&mut self, id: &str) -> bool {
        match self.map.nodes.get(id) {
            None => {
                tracing::debug!(%id, "delete rejected: unknown node");
                return false;
            }
            Some(node) if node.is_fixed => {
                tracing::debug!(%id, "delete rejected: fixed node");
                return false;
            }
            Some(_) => {}
        }
        let removed_links = self.map.remove_links_touching(id);
        self.map.nodes.shift_remove(id);
        tracing::debug!(%id, removed_links, "node deleted");
        true
    }

    /// Switches the active year span and repositions every dated cause node
    /// from its stored year. Years now outside the span are kept (the node
    /// is clamped into view and drops out of the highlight set).
    pub fn retimeline(&mut self, start_year: i32, end_year: i32) -> bool {
        let range = TimelineRange::new(start_year, end_year);
        if range == self.range {
            return false;
        }
        self.range = range;
        let height = self.canvas_height();
        let lane = self.config.lane_offset;
        for node in self.map.nodes.values_mut() {
            if node.is_outcome() {
                continue;
            }
            let Some(year) = node.year else { continue };
            let (x, y) =
                self.config
                    .clamp_position(lane, self.range.year_to_y(&self.config, year), height);
            node.x = x;
            node.y = y;
        }
        true
    }

    /// Moves every cause node tagged `old_year` to `new_year`: the year
    /// field, the embedded label token, and the vertical position all
    /// update together. Returns how many nodes changed.
    pub fn retag_year(&mut self, old_year: i32, new_year: i32) -> usize {
        if old_year == new_year {
            return 0;
        }
        let height = self.canvas_height();
        let new_y = self.range.year_to_y(&self.config, new_year);
        let mut changed = 0;
        for node in self.map.nodes.values_mut() {
            if node.is_outcome() || node.year != Some(old_year) {
                continue;
            }
            node.year = Some(new_year);
            node.text = embed_year(&node.text, new_year);
            let (x, y) = self.config.clamp_position(node.x, new_y, height);
            node.x = x;
            node.y = y;
            changed += 1;
        }
        changed
    }
}
