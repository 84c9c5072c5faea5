//! Toolbar configuration.
//!
//! Deserializes from the same camelCase option object JavaScript callers pass
//! in. Every field has a default, so `{}` is a valid config.

use serde::Deserialize;

use crate::elements::ToolbarRole;
use crate::error::ToolbarError;

/// Debounce window for resize-driven repositioning.
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u32 = 150;

/// Which placement algorithm governs the toolbar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarMode {
    /// Only shown next to an active selection.
    #[default]
    Floating,
    /// Parked in an anchor slot, follows selections temporarily.
    #[serde(alias = "persistent")]
    Fixed,
}

/// Gap between the selection and the toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Default for Offset {
    fn default() -> Self {
        Self { x: 0.0, y: 10.0 }
    }
}

/// Anchor slot geometry for fixed mode.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FixedPosition {
    pub top: f64,
    pub center: bool,
}

impl Default for FixedPosition {
    fn default() -> Self {
        Self {
            top: 16.0,
            center: true,
        }
    }
}

/// Per-button enable flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonConfig {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub heading1: bool,
    pub heading2: bool,
    pub heading3: bool,
    pub quote: bool,
    pub code: bool,
    pub bullet_list: bool,
    pub numbered_list: bool,
    pub horizontal_rule: bool,
    pub drop_cap: bool,
    pub clear_formatting: bool,
    pub link: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            bold: true,
            italic: true,
            underline: true,
            strikethrough: true,
            heading1: true,
            heading2: true,
            heading3: true,
            quote: true,
            code: true,
            bullet_list: true,
            numbered_list: true,
            horizontal_rule: true,
            drop_cap: true,
            clear_formatting: true,
            link: true,
        }
    }
}

impl ButtonConfig {
    /// Whether the button for `role` should be rendered and bound.
    ///
    /// Roles that aren't format buttons (views, link form controls) follow
    /// the `link` flag or are always on.
    pub fn is_enabled(&self, role: ToolbarRole) -> bool {
        match role {
            ToolbarRole::Bold => self.bold,
            ToolbarRole::Italic => self.italic,
            ToolbarRole::Underline => self.underline,
            ToolbarRole::Strikethrough => self.strikethrough,
            ToolbarRole::Heading1 => self.heading1,
            ToolbarRole::Heading2 => self.heading2,
            ToolbarRole::Heading3 => self.heading3,
            ToolbarRole::Quote => self.quote,
            ToolbarRole::Code => self.code,
            ToolbarRole::BulletList => self.bullet_list,
            ToolbarRole::NumberedList => self.numbered_list,
            ToolbarRole::HorizontalRule => self.horizontal_rule,
            ToolbarRole::DropCap => self.drop_cap,
            ToolbarRole::ClearFormatting => self.clear_formatting,
            ToolbarRole::Link
            | ToolbarRole::LinkView
            | ToolbarRole::LinkInput
            | ToolbarRole::SaveLink
            | ToolbarRole::CancelLink
            | ToolbarRole::RemoveLink
            | ToolbarRole::VisitLink => self.link,
            ToolbarRole::Container
            | ToolbarRole::Content
            | ToolbarRole::Toolbar
            | ToolbarRole::InitialView => true,
        }
    }
}

/// Options recognized by a toolbar instance.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolbarConfig {
    /// Selector for the element the toolbar is placed in and positioned
    /// relative to.
    pub container: String,
    /// Selector for the editable region whose selections are tracked.
    #[serde(alias = "selector")]
    pub content: String,
    pub mode: ToolbarMode,
    /// Extra class on the toolbar root. No behavior attached.
    pub theme: String,
    pub debug: bool,
    /// Bind to markup already in the page instead of creating it.
    pub use_existing_toolbar: bool,
    pub buttons: ButtonConfig,
    pub offset: Offset,
    #[serde(alias = "persistentPosition")]
    pub fixed_position: FixedPosition,
    /// Id of the toolbar root; every control id is derived from it.
    pub toolbar_id: String,
    pub resize_debounce_ms: u32,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            container: "body".to_string(),
            content: "[contenteditable]".to_string(),
            mode: ToolbarMode::default(),
            theme: "light".to_string(),
            debug: false,
            use_existing_toolbar: false,
            buttons: ButtonConfig::default(),
            offset: Offset::default(),
            fixed_position: FixedPosition::default(),
            toolbar_id: "selection-toolbar".to_string(),
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
        }
    }
}

impl ToolbarConfig {
    pub fn is_fixed(&self) -> bool {
        self.mode == ToolbarMode::Fixed
    }

    /// DOM id of the element playing `role`.
    ///
    /// The root uses the toolbar id itself; everything else is
    /// `{toolbar_id}-{suffix}`. Container and content are located by
    /// selector and have no id.
    pub fn element_id(&self, role: ToolbarRole) -> Option<String> {
        match role {
            ToolbarRole::Container | ToolbarRole::Content => None,
            ToolbarRole::Toolbar => Some(self.toolbar_id.clone()),
            other => other
                .id_suffix()
                .map(|suffix| format!("{}-{}", self.toolbar_id, suffix)),
        }
    }

    pub fn validate(&self) -> Result<(), ToolbarError> {
        if self.container.trim().is_empty() {
            return Err(ToolbarError::Config("container selector is empty".into()));
        }
        if self.content.trim().is_empty() {
            return Err(ToolbarError::Config("content selector is empty".into()));
        }
        if self.toolbar_id.is_empty() {
            return Err(ToolbarError::Config("toolbarId is empty".into()));
        }
        if self.toolbar_id.chars().any(char::is_whitespace) {
            return Err(ToolbarError::Config(format!(
                "toolbarId {:?} contains whitespace",
                self.toolbar_id
            )));
        }
        if !self.offset.x.is_finite() || !self.offset.y.is_finite() {
            return Err(ToolbarError::Config("offset must be finite".into()));
        }
        if !self.fixed_position.top.is_finite() {
            return Err(ToolbarError::Config("fixedPosition.top must be finite".into()));
        }
        Ok(())
    }
}
