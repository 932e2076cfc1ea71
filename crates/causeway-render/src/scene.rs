//! Pure projection from editor state to a [`CanvasScene`].
//!
//! Idempotent and total: the same state always projects to the same scene,
//! and degenerate input (dangling selection, out-of-range years) never
//! panics; it just drops the affected decoration.

use causeway_core::map::MindMapState;
use unicode_width::UnicodeWidthChar;

use crate::model::{AxisTick, CanvasScene, GuideLine, SceneLink, SceneNode, SceneNodeKind};

/// X of the vertical axis line, matching the original canvas layout.
const AXIS_X: f64 = 80.0;

/// Labels wider than this many columns are cut with an ellipsis.
const LABEL_MAX_COLS: usize = 50;
const LABEL_CUT_COLS: usize = 47;

/// Truncates a label by terminal-style display width so CJK and other
/// wide text is cut at the same visual width as ASCII.
pub(crate) fn truncate_label(text: &str) -> String {
    let total: usize = text.chars().filter_map(UnicodeWidthChar::width).sum();
    if total <= LABEL_MAX_COLS {
        return text.to_string();
    }
    let mut out = String::new();
    let mut cols = 0usize;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if cols + w > LABEL_CUT_COLS {
            break;
        }
        cols += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

/// Projects the current map, selection included, into a paintable scene.
pub fn project(state: &MindMapState, selected: Option<&str>) -> CanvasScene {
    let config = state.config();
    let range = state.range();
    let map = state.map();
    let used = state.used_years();

    let axis = range
        .years_desc()
        .map(|year| AxisTick {
            year,
            y: range.year_to_y(config, year),
            used: used.contains(&year),
        })
        .collect();

    let guides = map
        .nodes
        .values()
        .filter(|n| !n.is_outcome())
        .filter_map(|n| {
            let year = n.year.filter(|y| range.contains(*y))?;
            let line_y = range.year_to_y(config, year);
            Some(GuideLine {
                node_id: n.id.clone(),
                x1: AXIS_X,
                y1: line_y,
                x2: n.x,
                y2: line_y,
            })
        })
        .collect();

    let links = map
        .links
        .iter()
        .filter_map(|link| {
            let source = map.node(&link.source)?;
            let target = map.node(&link.target)?;
            let highlighted =
                selected.is_some_and(|s| link.source == s || link.target == s);
            Some(SceneLink {
                id: link.id.clone(),
                x1: source.x + config.node_width / 2.0,
                y1: source.y + config.node_height / 2.0,
                x2: target.x + config.node_width / 2.0,
                y2: target.y + config.node_height / 2.0,
                highlighted,
            })
        })
        .collect();

    let nodes = map
        .nodes
        .values()
        .map(|n| SceneNode {
            id: n.id.clone(),
            kind: if n.is_outcome() {
                SceneNodeKind::Outcome
            } else {
                SceneNodeKind::Cause
            },
            label: truncate_label(&n.text),
            year: n.year,
            x: n.x,
            y: n.y,
            width: config.node_width,
            height: config.node_height,
            selected: selected == Some(n.id.as_str()),
        })
        .collect();

    CanvasScene {
        width: config.canvas_width,
        height: state.canvas_height(),
        axis_x: AXIS_X,
        axis,
        guides,
        links,
        nodes,
    }
}
