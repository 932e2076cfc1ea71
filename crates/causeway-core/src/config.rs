//! Canvas and interaction tuning values.
//!
//! Defaults reproduce the canonical web client: a 180x60 node card, the
//! timeline starting 180 px from the top with 80 px per year, and a 300 ms
//! touch hold before a drag arms.

#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Canvas width in pixels. Height is derived from the timeline range,
    /// see [`crate::timeline::TimelineRange::required_canvas_height`].
    pub canvas_width: f64,
    /// Node card footprint in pixels.
    pub node_width: f64,
    pub node_height: f64,
    /// Distance from the canvas top to the first (latest) year line.
    pub top_offset: f64,
    /// Vertical distance between consecutive year lines.
    pub pixels_per_year: f64,
    /// Extra space below the earliest year line.
    pub bottom_margin: f64,
    /// Fixed x position cause nodes snap to, forming a single lane next to
    /// the timeline axis.
    pub lane_offset: f64,
    /// Vertical position of the outcome node.
    pub outcome_y: f64,
    /// How long a touch must hold still before it becomes a drag.
    pub touch_hold_ms: u64,
    /// Movement tolerance (px) within which a press still counts as a tap.
    pub tap_slop: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            node_width: 180.0,
            node_height: 60.0,
            top_offset: 180.0,
            pixels_per_year: 80.0,
            bottom_margin: 100.0,
            lane_offset: 250.0,
            outcome_y: 50.0,
            touch_hold_ms: 300,
            tap_slop: 4.0,
        }
    }
}

impl CanvasConfig {
    /// Clamps a node origin so the full card stays inside `canvas_w x canvas_h`.
    pub fn clamp_position(&self, x: f64, y: f64, canvas_height: f64) -> (f64, f64) {
        let max_x = (self.canvas_width - self.node_width).max(0.0);
        let max_y = (canvas_height - self.node_height).max(0.0);
        (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
    }

    /// Centered x for the outcome node.
    pub fn outcome_x(&self) -> f64 {
        ((self.canvas_width - self.node_width) / 2.0).max(0.0)
    }
}
