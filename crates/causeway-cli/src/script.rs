//! JSON interaction scripts replayed through a real editor session.
//!
//! A script is an array of tagged ops mirroring the session surface. Node
//! references accept a node id, the literal `outcome`, or a case-insensitive
//! substring of a node label, so scripts stay readable without knowing
//! generated ids.

use causeway::chat::ChatGateway;
use causeway::gateway::PersistenceGateway;
use causeway::geom::point;
use causeway::map::MindMapState;
use causeway::session::{DropOutcome, EditorSession, PointerKind};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ScriptOp {
    /// Offer an evidence payload to the canvas; the session then waits for
    /// `provideYear`.
    Drop { payload: String },
    /// Answer the pending year prompt. Blank or non-numeric input falls back
    /// to the suggested year.
    ProvideYear {
        #[serde(default)]
        input: String,
    },
    /// Raw gesture stream, for exercising the drag state machine directly.
    Press {
        node: String,
        x: f64,
        y: f64,
        #[serde(rename = "atMs", default)]
        at_ms: u64,
        #[serde(default)]
        touch: bool,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(rename = "atMs", default)]
        at_ms: u64,
    },
    Release {
        x: f64,
        y: f64,
        #[serde(rename = "atMs", default)]
        at_ms: u64,
    },
    /// Tap a node: select / deselect / link, per the selection rules.
    Click { node: String },
    /// Connect two nodes via the click sequence (select `a`, tap `b`).
    /// An already-connected pair is a silent no-op, as in the editor.
    Link { a: String, b: String },
    /// Delete a node (or whatever is selected when `node` is omitted).
    /// The outcome node is refused silently.
    Delete {
        #[serde(default)]
        node: Option<String>,
    },
    Retimeline { start: i32, end: i32 },
    RetagYear { from: i32, to: i32 },
    Chat { message: String },
}

/// A script op that could not be applied; `index` is its position in the
/// script.
#[derive(Debug)]
pub struct ScriptError {
    pub index: usize,
    pub message: String,
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "script op #{}: {}", self.index, self.message)
    }
}

fn resolve_node(state: &MindMapState, needle: &str) -> Result<String, String> {
    if state.map().node(needle).is_some() {
        return Ok(needle.to_string());
    }
    let lower = needle.to_lowercase();
    state
        .map()
        .nodes
        .values()
        .find(|n| n.text.to_lowercase().contains(&lower))
        .map(|n| n.id.clone())
        .ok_or_else(|| format!("no node matches {needle:?}"))
}

/// Runs every op in order, stopping at the first one that cannot apply.
pub async fn replay<P, C>(
    session: &mut EditorSession<P, C>,
    ops: Vec<ScriptOp>,
) -> Result<(), ScriptError>
where
    P: PersistenceGateway,
    C: ChatGateway,
{
    for (index, op) in ops.into_iter().enumerate() {
        apply(session, op)
            .await
            .map_err(|message| ScriptError { index, message })?;
    }
    Ok(())
}

async fn apply<P, C>(session: &mut EditorSession<P, C>, op: ScriptOp) -> Result<(), String>
where
    P: PersistenceGateway,
    C: ChatGateway,
{
    match op {
        ScriptOp::Drop { payload } => match session.begin_drop(&payload) {
            DropOutcome::YearRequested { .. } => Ok(()),
            DropOutcome::Rejected => Err("drop rejected: blank payload".to_string()),
        },
        ScriptOp::ProvideYear { input } => {
            if session.pending_drop().is_none() {
                return Err("no drop pending".to_string());
            }
            session.provide_year(&input).await;
            Ok(())
        }
        ScriptOp::Press {
            node,
            x,
            y,
            at_ms,
            touch,
        } => {
            let id = resolve_node(session.state(), &node)?;
            let kind = if touch {
                PointerKind::Touch
            } else {
                PointerKind::Mouse
            };
            session.pointer_pressed(&id, point(x, y), at_ms, kind);
            Ok(())
        }
        ScriptOp::Move { x, y, at_ms } => {
            session.pointer_moved(point(x, y), at_ms);
            Ok(())
        }
        ScriptOp::Release { x, y, at_ms } => {
            session.pointer_released(point(x, y), at_ms).await;
            Ok(())
        }
        ScriptOp::Click { node } => {
            let id = resolve_node(session.state(), &node)?;
            session.click_node(&id).await;
            Ok(())
        }
        ScriptOp::Link { a, b } => {
            let a = resolve_node(session.state(), &a)?;
            let b = resolve_node(session.state(), &b)?;
            if let Some(selected) = session.selection().map(str::to_string) {
                session.click_node(&selected).await;
            }
            session.click_node(&a).await;
            session.click_node(&b).await;
            Ok(())
        }
        ScriptOp::Delete { node } => {
            if let Some(node) = node {
                let id = resolve_node(session.state(), &node)?;
                if session.selection() != Some(id.as_str()) {
                    if let Some(selected) = session.selection().map(str::to_string) {
                        session.click_node(&selected).await;
                    }
                    session.click_node(&id).await;
                }
            }
            session.delete_selected().await;
            Ok(())
        }
        ScriptOp::Retimeline { start, end } => {
            session.retimeline(start, end).await;
            Ok(())
        }
        ScriptOp::RetagYear { from, to } => {
            session.retag_year(from, to).await;
            Ok(())
        }
        ScriptOp::Chat { message } => {
            session.submit_chat(&message).await;
            Ok(())
        }
    }
}
