//! Interaction controller: one editing session for one case.
//!
//! [`EditorSession`] owns the canonical map state, the selection, the drag
//! state machine, any pending drop awaiting a year, and the chat transcript.
//! Input arrives as an abstract gesture stream (press/move/release with a
//! canvas point, a millisecond timestamp, and a pointer kind); the concrete
//! mouse/touch layer is a thin adapter on top.
//!
//! Every mutating action persists through the gateway before returning.
//! Saves are fire-and-continue: a failed save is logged and local state is
//! kept, so the editor never blocks on the backend. Transient drag moves do
//! not save; the snap on release does.

use crate::case::Case;
use crate::chat::{CHALLENGER_UNAVAILABLE, ChatGateway, ChatMessage, WELCOME_MESSAGE};
use crate::config::CanvasConfig;
use crate::gateway::{PersistenceGateway, WatchHandle};
use crate::geom::{Point, Vector};
use crate::map::{MapReadiness, MindMapState};
use crate::timeline::{TimelineRange, parse_embedded_year};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// One event of the normalized input stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Press {
        node_id: String,
        point: Point,
        at_ms: u64,
        kind: PointerKind,
    },
    Move {
        point: Point,
        at_ms: u64,
    },
    Release {
        point: Point,
        at_ms: u64,
    },
}

/// What a completed tap did to the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing was selected; this node is now selected.
    Selected,
    /// The selected node was clicked again; selection cleared.
    Deselected,
    /// A second node was clicked and a new link was created.
    Linked,
    /// A second node was clicked but the pair was already connected (or the
    /// link was invalid); selection cleared, nothing saved.
    NoLink,
    /// Unknown node id; no state change.
    Ignored,
}

/// Result of offering a payload to the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The session now waits for [`EditorSession::provide_year`];
    /// `suggested` is the year to prefill (parsed from the payload, else the
    /// start of the range).
    YearRequested { suggested: i32 },
    /// Blank payload; nothing pending.
    Rejected,
}

/// A drop waiting for its year. The payload text is what the prompt shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDrop {
    pub payload: String,
    pub suggested: i32,
}

enum DragPhase {
    Idle,
    Pressed {
        node_id: String,
        kind: PointerKind,
        pressed_at_ms: u64,
        press_point: Point,
        grab_offset: Vector,
        /// Fixed nodes can be tapped but never arm a drag.
        draggable: bool,
        /// Mouse arms on press; touch arms once the hold elapses.
        armed: bool,
        /// Set once armed movement beyond the tap slop was applied; decides
        /// drag-end vs tap on release.
        moved: bool,
    },
    /// Touch moved beyond the slop before the hold elapsed; the gesture is
    /// dead until release.
    Cancelled,
}

pub struct EditorSession<P, C> {
    persistence: P,
    chat: C,
    case: Case,
    state: MindMapState,
    selection: Option<String>,
    drag: DragPhase,
    pending_drop: Option<PendingDrop>,
    transcript: Vec<ChatMessage>,
    watch: Option<WatchHandle>,
}

impl<P: PersistenceGateway, C: ChatGateway> EditorSession<P, C> {
    /// Opens a session with the default canvas configuration.
    pub async fn open(persistence: P, chat: C, case: Case) -> Self {
        Self::open_with_config(persistence, chat, case, CanvasConfig::default()).await
    }

    /// Opens a session: loads the stored document for the case (falling back
    /// to a fresh outcome-only map, which is saved immediately) and
    /// subscribes to live updates when the gateway offers them.
    pub async fn open_with_config(
        persistence: P,
        chat: C,
        case: Case,
        config: CanvasConfig,
    ) -> Self {
        let range = TimelineRange::new(case.start_year, case.end_year);
        let mut session = Self {
            persistence,
            chat,
            state: MindMapState::new(config, range),
            case,
            selection: None,
            drag: DragPhase::Idle,
            pending_drop: None,
            transcript: Vec::new(),
            watch: None,
        };
        session.reload_from_store().await;
        session
    }

    /// Switches to another case: tears the current watch down, resets all
    /// interaction state, loads (or initializes) the new map, resubscribes.
    pub async fn switch_case(&mut self, case: Case) {
        self.case = case;
        self.reload_from_store().await;
    }

    async fn reload_from_store(&mut self) {
        // Drop the previous subscription before touching the new case.
        self.watch = None;
        self.selection = None;
        self.drag = DragPhase::Idle;
        self.pending_drop = None;
        self.transcript = vec![ChatMessage::assistant(WELCOME_MESSAGE)];

        let config = self.state.config().clone();
        let range = TimelineRange::new(self.case.start_year, self.case.end_year);
        let loaded = match self.persistence.load(&self.case.id).await {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(case = %self.case.id, %err, "load failed, starting fresh");
                None
            }
        };

        let mut fresh = false;
        self.state = loaded
            .and_then(|doc| MindMapState::from_document(config.clone(), range, &doc))
            .unwrap_or_else(|| {
                fresh = true;
                MindMapState::new_for_case(config, range, &self.case)
            });
        tracing::info!(case = %self.case.id, fresh, "case opened");

        if fresh {
            self.persist().await;
        }
        self.watch = self.persistence.watch(&self.case.id);
    }

    pub fn case(&self) -> &Case {
        &self.case
    }

    pub fn state(&self) -> &MindMapState {
        &self.state
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn pending_drop(&self) -> Option<&PendingDrop> {
        self.pending_drop.as_ref()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn readiness(&self) -> MapReadiness {
        self.state.readiness()
    }

    pub fn has_watch(&self) -> bool {
        self.watch.is_some()
    }

    /// Feeds one normalized input event through the drag state machine.
    pub async fn apply_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Press {
                node_id,
                point,
                at_ms,
                kind,
            } => self.pointer_pressed(&node_id, point, at_ms, kind),
            Gesture::Move { point, at_ms } => self.pointer_moved(point, at_ms),
            Gesture::Release { point, at_ms } => self.pointer_released(point, at_ms).await,
        }
    }

    pub fn pointer_pressed(&mut self, node_id: &str, point: Point, at_ms: u64, kind: PointerKind) {
        if self.pending_drop.is_some() {
            tracing::debug!("press ignored: year input pending");
            return;
        }
        let Some(node) = self.state.map().node(node_id) else {
            tracing::debug!(%node_id, "press ignored: unknown node");
            return;
        };
        let draggable = !node.is_fixed;
        self.drag = DragPhase::Pressed {
            node_id: node_id.to_string(),
            kind,
            pressed_at_ms: at_ms,
            press_point: point,
            grab_offset: point - crate::geom::point(node.x, node.y),
            draggable,
            armed: draggable && kind == PointerKind::Mouse,
            moved: false,
        };
    }

    pub fn pointer_moved(&mut self, point: Point, at_ms: u64) {
        let DragPhase::Pressed {
            node_id,
            kind,
            pressed_at_ms,
            press_point,
            grab_offset,
            draggable,
            armed,
            moved,
        } = &mut self.drag
        else {
            return;
        };

        let slop = self.state.config().tap_slop;
        let hold_ms = self.state.config().touch_hold_ms;
        let distance = (point - *press_point).length();

        // Touch arms lazily: there is no timer thread, so hold expiry is
        // checked against the next event's timestamp.
        if !*armed
            && *draggable
            && *kind == PointerKind::Touch
            && at_ms.saturating_sub(*pressed_at_ms) >= hold_ms
        {
            *armed = true;
        }

        if !*armed {
            if distance > slop {
                self.drag = DragPhase::Cancelled;
            }
            return;
        }

        if *moved || distance > slop {
            *moved = true;
            let origin = point - *grab_offset;
            self.state.move_node(node_id, origin.x, origin.y);
        }
    }

    pub async fn pointer_released(&mut self, point: Point, at_ms: u64) {
        match std::mem::replace(&mut self.drag, DragPhase::Idle) {
            DragPhase::Idle | DragPhase::Cancelled => {}
            DragPhase::Pressed {
                node_id,
                kind,
                pressed_at_ms,
                draggable,
                moved,
                ..
            } => {
                let hold_ms = self.state.config().touch_hold_ms;
                let held = at_ms.saturating_sub(pressed_at_ms) >= hold_ms;
                // A touch that sat still past the hold picked the node up,
                // so the release drops it even when no move event arrived.
                // A stationary mouse release stays a click regardless of
                // how long the button was down.
                if moved || (draggable && kind == PointerKind::Touch && held) {
                    if self.state.snap_node_to_year(&node_id, point.y).is_some() {
                        self.persist().await;
                    }
                } else {
                    self.click_node(&node_id).await;
                }
            }
        }
    }

    /// Selection / linking transition for a tap on a node:
    /// nothing selected selects it, the selected node deselects, and any
    /// other node links the pair (clearing the selection either way).
    pub async fn click_node(&mut self, node_id: &str) -> ClickOutcome {
        if self.state.map().node(node_id).is_none() {
            tracing::debug!(%node_id, "click ignored: unknown node");
            return ClickOutcome::Ignored;
        }
        match self.selection.take() {
            None => {
                self.selection = Some(node_id.to_string());
                ClickOutcome::Selected
            }
            Some(selected) if selected == node_id => ClickOutcome::Deselected,
            Some(selected) => {
                if self.state.link_nodes(&selected, node_id).is_some() {
                    self.persist().await;
                    ClickOutcome::Linked
                } else {
                    ClickOutcome::NoLink
                }
            }
        }
    }

    /// Offers an evidence payload to the canvas. A non-blank payload parks
    /// the drop and asks the caller for a year; the suggestion is the year
    /// embedded in the payload, else the start of the range.
    pub fn begin_drop(&mut self, payload: &str) -> DropOutcome {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            tracing::debug!("drop rejected: blank payload");
            return DropOutcome::Rejected;
        }
        let suggested =
            parse_embedded_year(trimmed).unwrap_or(self.state.range().start_year);
        self.pending_drop = Some(PendingDrop {
            payload: trimmed.to_string(),
            suggested,
        });
        DropOutcome::YearRequested { suggested }
    }

    /// Resolves the pending drop with the user's answer. Blank or
    /// non-numeric input falls back to the suggested year. Returns the id of
    /// the created node.
    pub async fn provide_year(&mut self, input: &str) -> Option<String> {
        let pending = self.pending_drop.take()?;
        let year = input
            .trim()
            .parse::<i32>()
            .unwrap_or(pending.suggested);
        let id = self
            .state
            .add_cause_node(&pending.payload, Some(year))
            .map(|n| n.id.clone())?;
        self.persist().await;
        Some(id)
    }

    /// Abandons the pending drop without touching the map.
    pub fn cancel_drop(&mut self) {
        self.pending_drop = None;
    }

    /// Deletes the selected node (never the outcome), cascading its links.
    pub async fn delete_selected(&mut self) -> bool {
        let Some(selected) = self.selection.clone() else {
            return false;
        };
        if !self.state.delete_node(&selected) {
            return false;
        }
        self.selection = None;
        self.persist().await;
        true
    }

    /// Changes the year span; every dated node is repositioned from its
    /// year.
    pub async fn retimeline(&mut self, start_year: i32, end_year: i32) -> bool {
        if !self.state.retimeline(start_year, end_year) {
            return false;
        }
        self.persist().await;
        true
    }

    /// Renames a year on the axis, carrying every node on it along.
    pub async fn retag_year(&mut self, old_year: i32, new_year: i32) -> usize {
        let changed = self.state.retag_year(old_year, new_year);
        if changed > 0 {
            self.persist().await;
        }
        changed
    }

    /// Sends a user message to the challenger and appends the reply to the
    /// transcript. A transport failure appends the fixed fallback line
    /// instead; the user's message is kept either way.
    pub async fn submit_chat(&mut self, message: &str) -> Option<String> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.transcript.push(ChatMessage::user(trimmed));
        let reply = match self
            .chat
            .send_chat(&self.transcript, &self.case.title)
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(%err, "chat request failed");
                CHALLENGER_UNAVAILABLE.to_string()
            }
        };
        self.transcript.push(ChatMessage::assistant(reply.clone()));
        Some(reply)
    }

    async fn persist(&mut self) {
        let doc = self.state.document();
        if let Err(err) = self.persistence.save(&self.case.id, &doc).await {
            tracing::warn!(case = %self.case.id, %err, "save failed, keeping local state");
        }
    }
}
