//! Browser DOM layer for the flow editor input pipeline.
//!
//! This crate binds `flow-editor-core` to real DOM nodes. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `events`: `beforeinput` → core `EditEvent`, including the StaticRange binding
//! - `dom_map`: DOM ↔ flow node map and the `EditingHost` implementation
//! - `media`: `createImageBitmap` decoding and canvas placeholders
//! - `session`: one editing surface driving the dispatcher
//! - `listener`: gloo-events listeners feeding a session
//!
//! # Re-exports
//!
//! This crate re-exports `flow-editor-core` for convenience, so consumers
//! only need to depend on `flow-editor-browser`.

// Re-export core crate
pub use flow_editor_core;
pub use flow_editor_core::*;

pub mod config;
pub mod dom_map;
pub mod events;
pub mod listener;
pub mod media;
pub mod session;
pub mod telemetry;

pub use config::config_from_js;
pub use dom_map::{BrowserHost, DomFlowMap, MappedNode};
pub use events::{DomEditEvent, StaticRange, edit_event_from_dom};
pub use listener::{InputListener, attach};
pub use media::BrowserMedia;
pub use session::InputSession;
