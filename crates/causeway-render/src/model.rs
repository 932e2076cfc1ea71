//! Typed scene model: everything a view layer needs to paint one frame,
//! with no reference back to the editor state it came from.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneNodeKind {
    Outcome,
    Cause,
}

/// One node card, already truncated and positioned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub id: String,
    pub kind: SceneNodeKind,
    /// Display label, truncated to the card width.
    pub label: String,
    /// `Some` renders the small "Year: N" caption.
    pub year: Option<i32>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub selected: bool,
}

impl SceneNode {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// A causal connection drawn center-to-center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneLink {
    pub id: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// True when either endpoint is the selected node; drawn in the
    /// highlight color.
    pub highlighted: bool,
}

/// One year mark on the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisTick {
    pub year: i32,
    pub y: f64,
    /// A cause node currently sits on this year.
    pub used: bool,
}

/// Dotted helper line from the axis to a dated node's year line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideLine {
    pub node_id: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// A fully projected frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasScene {
    pub width: f64,
    pub height: f64,
    /// X of the vertical timeline axis.
    pub axis_x: f64,
    /// Ticks ordered latest-first, top to bottom.
    pub axis: Vec<AxisTick>,
    pub guides: Vec<GuideLine>,
    pub links: Vec<SceneLink>,
    /// Insertion order of the map, which is also paint order.
    pub nodes: Vec<SceneNode>,
}
