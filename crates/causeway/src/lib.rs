#![forbid(unsafe_code)]

//! `causeway` is a headless, timeline-synchronized causal mind-map engine:
//! the editor core of an evidence-investigation app with no DOM attached.
//!
//! The crate re-exports everything from `causeway-core` (model, timeline
//! mapper, state store, interaction session, gateway traits). Enable the
//! `render` feature for the scene projection and SVG writer
//! ([`render`]), the way a UI or CLI consumes the canvas.
//!
//! # Features
//!
//! - `render`: enable scene projection + SVG output (`causeway::render`)

pub use causeway_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use causeway_render::model::{
        AxisTick, CanvasScene, GuideLine, SceneLink, SceneNode, SceneNodeKind,
    };
    pub use causeway_render::scene::project;
    pub use causeway_render::svg::{SvgRenderOptions, render_svg};

    use causeway_core::config::CanvasConfig;
    use causeway_core::map::MindMapState;
    use causeway_core::model::MindMapDocument;
    use causeway_core::timeline::TimelineRange;

    /// Projects the current editor state and renders it in one call.
    pub fn render_state_svg(
        state: &MindMapState,
        selected: Option<&str>,
        options: &SvgRenderOptions,
    ) -> String {
        render_svg(&project(state, selected), options)
    }

    /// Renders a stored document as it would appear under `range`.
    ///
    /// The document goes through the same normalization as a session load;
    /// a document without an outcome node returns `None`.
    pub fn render_document_svg(
        doc: &MindMapDocument,
        config: CanvasConfig,
        range: TimelineRange,
        selected: Option<&str>,
        options: &SvgRenderOptions,
    ) -> Option<String> {
        let state = MindMapState::from_document(config, range, doc)?;
        Some(render_state_svg(&state, selected, options))
    }
}

#[cfg(all(test, feature = "render"))]
mod tests {
    use super::render::{SvgRenderOptions, render_document_svg, render_state_svg};
    use causeway_core::case::builtin_cases;
    use causeway_core::config::CanvasConfig;
    use causeway_core::map::MindMapState;
    use causeway_core::model::MindMapDocument;
    use causeway_core::timeline::TimelineRange;

    #[test]
    fn state_renders_end_to_end() {
        let case = builtin_cases().remove(0);
        let mut state = MindMapState::new_for_case(
            CanvasConfig::default(),
            TimelineRange::default(),
            &case,
        );
        state.add_cause_node("Severe drought ruins harvest (1987)", None);
        let svg = render_state_svg(&state, None, &SvgRenderOptions::default());
        assert!(svg.contains("Severe drought ruins harvest (1987)"));
    }

    #[test]
    fn document_without_outcome_renders_nothing() {
        let doc = MindMapDocument {
            nodes: Vec::new(),
            links: Vec::new(),
            last_updated: None,
        };
        assert!(
            render_document_svg(
                &doc,
                CanvasConfig::default(),
                TimelineRange::default(),
                None,
                &SvgRenderOptions::default(),
            )
            .is_none()
        );
    }
}
