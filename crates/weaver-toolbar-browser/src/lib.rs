//! Browser DOM layer for the weaver selection toolbar.
//!
//! This crate implements `ToolbarHost` over `web-sys` and wires DOM events
//! into the core state machine. It assumes a `wasm32-unknown-unknown` target
//! environment.
//!
//! # Architecture
//!
//! - `host`: `BrowserHost`, selection/layout/style access plus timers
//! - `commands`: native formatting commands (`execCommand`, inline code)
//! - `template`: toolbar markup and the injected stylesheet
//! - `wiring`: `MountedToolbar`, which owns the listeners
//!
//! # Re-exports
//!
//! This crate re-exports `weaver-toolbar-core` for convenience, so consumers
//! only need to depend on `weaver-toolbar-browser`.

// Re-export core crate
pub use weaver_toolbar_core;
pub use weaver_toolbar_core::*;

pub mod commands;
pub mod dom;
pub mod host;
pub mod template;
pub mod wiring;

pub use host::BrowserHost;
pub use template::ToolbarMarkup;
pub use wiring::MountedToolbar;
