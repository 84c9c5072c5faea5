//! weaver-toolbar-core: selection toolbar logic without DOM dependencies.
//!
//! This crate provides:
//! - `ToolbarHost` trait, the seam to the host document
//! - `Toolbar<H>` - one toolbar instance: selection tracking, positioning,
//!   link editing and format dispatch, all generic over the host
//! - `ToolbarConfig` - serde-deserializable options
//! - Geometry helpers and the pure placement functions

pub mod config;
pub mod elements;
pub mod error;
pub mod format;
pub mod geometry;
pub mod host;
pub mod link;
pub mod position;
pub mod registry;
pub mod selection;
pub mod state;
pub mod style;
pub mod toolbar;
pub mod url;

#[cfg(test)]
mod test_host;

pub use config::{ButtonConfig, FixedPosition, Offset, ToolbarConfig, ToolbarMode};
pub use elements::{ToolbarElements, ToolbarRole};
pub use error::{HostError, ToolbarError};
pub use format::{DropCapTable, FormatKind};
pub use geometry::{Rect, Size, Viewport, fits_above, space_above, space_below};
pub use host::{ScheduledTask, SelectionSnapshot, TimerId, ToolbarHost};
pub use link::KeyOutcome;
pub use position::{Placement, PlacementTransform, compute_anchor_slot, compute_floating_placement};
pub use registry::{PeerToolbar, ToolbarId};
pub use selection::ToolbarEvent;
pub use state::{PendingFocus, ToolbarState, ToolbarView};
pub use toolbar::{Toolbar, ToolbarHandle};
pub use crate::url::{is_valid_url, normalize_url};
