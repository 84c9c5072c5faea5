//! Class names and CSS properties shared by the core and the DOM layer.

/// Root class when the toolbar should be shown.
pub const VISIBLE: &str = "visible";
/// Hides a view panel or the visit button.
pub const HIDDEN: &str = "hidden";
/// Fixed-mode root has left its anchor slot to track a selection.
pub const FOLLOWING: &str = "following";
/// Toolbar is placed below the selection (chevron points up).
pub const BELOW: &str = "below";
/// Format button whose command is on for the current selection.
pub const ACTIVE: &str = "active";
/// Block element carrying drop-cap styling.
pub const DROP_CAP: &str = "drop-cap";

/// Width captured at selection time, held through view changes.
pub const WIDTH_VAR: &str = "--toolbar-width";
