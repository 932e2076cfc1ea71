#![forbid(unsafe_code)]

//! Timeline-synchronized causal mind-map engine (headless).
//!
//! Design goals:
//! - the editor core of the investigation app with no DOM attached:
//!   canonical state, geometry, and interaction rules live here
//! - deterministic, testable behavior (pure timeline math, silent no-op
//!   rejection of invalid mutations, fire-and-continue persistence)
//! - runtime-agnostic async APIs (no specific executor required)
//!
//! The typical embedding drives an [`EditorSession`] with normalized
//! gestures and projects [`MindMapState`] through `causeway-render` (or its
//! own view layer) after every call.

pub mod case;
pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod geom;
pub mod map;
pub mod model;
pub mod session;
pub mod timeline;

pub use case::{Case, Evidence, builtin_cases, find_builtin_case};
pub use chat::{
    CHALLENGER_UNAVAILABLE, ChatGateway, ChatMessage, ChatRole, ScriptedChallenger,
    WELCOME_MESSAGE,
};
pub use config::CanvasConfig;
pub use error::{Error, Result};
pub use gateway::{FsStore, MemoryStore, PersistenceGateway, WatchHandle};
pub use map::{MapReadiness, MindMapState, OUTCOME_ID};
pub use model::{Link, MindMap, MindMapDocument, Node, NodeKind};
pub use session::{
    ClickOutcome, DropOutcome, EditorSession, Gesture, PendingDrop, PointerKind,
};
pub use timeline::{TimelineRange, embed_year, parse_embedded_year, used_years};
