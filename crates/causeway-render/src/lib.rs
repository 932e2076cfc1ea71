#![forbid(unsafe_code)]

//! Headless view layer for causeway mind maps.
//!
//! Two stages, both pure: [`scene::project`] turns editor state into a typed
//! [`model::CanvasScene`], and [`svg::render_svg`] writes a scene as a
//! standalone SVG document. The projection is total, so this crate exposes
//! no error type; embedders that want a different output format can stop at
//! the scene and paint it themselves.

pub mod model;
pub mod scene;
pub mod svg;

pub use model::{AxisTick, CanvasScene, GuideLine, SceneLink, SceneNode, SceneNodeKind};
pub use scene::project;
pub use svg::{SvgRenderOptions, render_svg};
