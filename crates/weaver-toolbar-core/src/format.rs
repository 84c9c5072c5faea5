//! Format command dispatch and active-state tracking.
//!
//! Commands themselves are the host's business (`execCommand` in a browser).
//! This module maps buttons to commands, re-applies the stored selection
//! before running one, and keeps the "active" indicators current. Drop caps
//! have no native query, so they are tracked here.

use crate::elements::ToolbarRole;
use crate::error::HostError;
use crate::host::ToolbarHost;
use crate::style;
use crate::toolbar::Toolbar;

/// A formatting command offered by the toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Heading1,
    Heading2,
    Heading3,
    Quote,
    Code,
    BulletList,
    NumberedList,
    HorizontalRule,
    DropCap,
    ClearFormatting,
}

impl FormatKind {
    pub const ALL: [FormatKind; 14] = [
        FormatKind::Bold,
        FormatKind::Italic,
        FormatKind::Underline,
        FormatKind::Strikethrough,
        FormatKind::Heading1,
        FormatKind::Heading2,
        FormatKind::Heading3,
        FormatKind::Quote,
        FormatKind::Code,
        FormatKind::BulletList,
        FormatKind::NumberedList,
        FormatKind::HorizontalRule,
        FormatKind::DropCap,
        FormatKind::ClearFormatting,
    ];

    pub fn from_role(role: ToolbarRole) -> Option<Self> {
        let kind = match role {
            ToolbarRole::Bold => FormatKind::Bold,
            ToolbarRole::Italic => FormatKind::Italic,
            ToolbarRole::Underline => FormatKind::Underline,
            ToolbarRole::Strikethrough => FormatKind::Strikethrough,
            ToolbarRole::Heading1 => FormatKind::Heading1,
            ToolbarRole::Heading2 => FormatKind::Heading2,
            ToolbarRole::Heading3 => FormatKind::Heading3,
            ToolbarRole::Quote => FormatKind::Quote,
            ToolbarRole::Code => FormatKind::Code,
            ToolbarRole::BulletList => FormatKind::BulletList,
            ToolbarRole::NumberedList => FormatKind::NumberedList,
            ToolbarRole::HorizontalRule => FormatKind::HorizontalRule,
            ToolbarRole::DropCap => FormatKind::DropCap,
            ToolbarRole::ClearFormatting => FormatKind::ClearFormatting,
            _ => return None,
        };
        Some(kind)
    }

    pub fn role(self) -> ToolbarRole {
        match self {
            FormatKind::Bold => ToolbarRole::Bold,
            FormatKind::Italic => ToolbarRole::Italic,
            FormatKind::Underline => ToolbarRole::Underline,
            FormatKind::Strikethrough => ToolbarRole::Strikethrough,
            FormatKind::Heading1 => ToolbarRole::Heading1,
            FormatKind::Heading2 => ToolbarRole::Heading2,
            FormatKind::Heading3 => ToolbarRole::Heading3,
            FormatKind::Quote => ToolbarRole::Quote,
            FormatKind::Code => ToolbarRole::Code,
            FormatKind::BulletList => ToolbarRole::BulletList,
            FormatKind::NumberedList => ToolbarRole::NumberedList,
            FormatKind::HorizontalRule => ToolbarRole::HorizontalRule,
            FormatKind::DropCap => ToolbarRole::DropCap,
            FormatKind::ClearFormatting => ToolbarRole::ClearFormatting,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Bold => "bold",
            FormatKind::Italic => "italic",
            FormatKind::Underline => "underline",
            FormatKind::Strikethrough => "strikethrough",
            FormatKind::Heading1 => "h1",
            FormatKind::Heading2 => "h2",
            FormatKind::Heading3 => "h3",
            FormatKind::Quote => "blockquote",
            FormatKind::Code => "code",
            FormatKind::BulletList => "insertUnorderedList",
            FormatKind::NumberedList => "insertOrderedList",
            FormatKind::HorizontalRule => "insertHorizontalRule",
            FormatKind::DropCap => "dropCap",
            FormatKind::ClearFormatting => "removeFormat",
        }
    }

    /// One-shot commands never show as active.
    pub fn is_stateful(self) -> bool {
        !matches!(self, FormatKind::HorizontalRule | FormatKind::ClearFormatting)
    }
}

/// Block elements with drop-cap styling applied.
#[derive(Clone, Debug)]
pub struct DropCapTable<E> {
    applied: Vec<E>,
}

impl<E> Default for DropCapTable<E> {
    fn default() -> Self {
        Self {
            applied: Vec::new(),
        }
    }
}

impl<E: PartialEq> DropCapTable<E> {
    pub fn contains(&self, element: &E) -> bool {
        self.applied.contains(element)
    }

    /// Flip membership. Returns whether the element now has a drop cap.
    pub fn toggle(&mut self, element: E) -> bool {
        if let Some(pos) = self.applied.iter().position(|e| *e == element) {
            self.applied.swap_remove(pos);
            false
        } else {
            self.applied.push(element);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

impl<E> DropCapTable<E> {
    pub fn clear(&mut self) {
        self.applied.clear();
    }
}

impl<H: ToolbarHost> Toolbar<H> {
    /// Run a format command against the stored selection.
    ///
    /// Failures leave the document as it was; the selection is re-read either
    /// way so the toolbar tracks whatever the command produced.
    pub fn apply_format(&mut self, kind: FormatKind) {
        if self.elements.is_inert() || !self.config.buttons.is_enabled(kind.role()) {
            return;
        }

        if let Some(range) = self.state.selection_range.clone() {
            if let Err(err) = self.host.restore_selection(&range) {
                tracing::warn!(
                    target: "weaver::toolbar",
                    format = kind.as_str(),
                    error = %err,
                    "could not restore selection before formatting"
                );
            }
        }

        let result = match kind {
            FormatKind::DropCap => self.toggle_drop_cap(),
            _ => self.host.exec_format(kind),
        };

        match result {
            Ok(()) => {
                tracing::debug!(target: "weaver::toolbar", format = kind.as_str(), "applied format");
            }
            Err(err) => {
                tracing::warn!(
                    target: "weaver::toolbar",
                    format = kind.as_str(),
                    error = %err,
                    "format command failed"
                );
            }
        }

        self.resnapshot_selection();
        self.refresh_formats();
        self.update_view();
    }

    fn toggle_drop_cap(&mut self) -> Result<(), HostError> {
        let range = self
            .state
            .selection_range
            .as_ref()
            .ok_or_else(|| HostError::from("no selection for drop cap"))?;
        let block = self
            .host
            .block_element(range)
            .ok_or_else(|| HostError::from("selection is not inside a block element"))?;
        let applied = self.state.drop_caps.toggle(block.clone());
        self.host.set_class(&block, style::DROP_CAP, applied);
        Ok(())
    }

    /// Re-read the live selection after a command mutated the document.
    ///
    /// Only a non-empty selection inside the content region replaces the
    /// stored one; anything else waits for the next selection event.
    fn resnapshot_selection(&mut self) {
        let Some(content) = self.elements.content().cloned() else {
            return;
        };
        if let Some(snapshot) = self.read_active_selection(&content) {
            self.state
                .store_selection(&snapshot.text, snapshot.range, snapshot.rect);
        }
    }

    /// Recompute which buttons show as active.
    pub fn refresh_formats(&mut self) {
        self.state.active_formats.clear();
        let has_selection = self.state.has_selection();
        let block = match (&self.state.selection_range, has_selection) {
            (Some(range), true) => self.host.block_element(range),
            _ => None,
        };

        for kind in FormatKind::ALL {
            let Some(button) = self.elements.get(kind.role()) else {
                continue;
            };
            let active = has_selection
                && kind.is_stateful()
                && self.config.buttons.is_enabled(kind.role())
                && match kind {
                    FormatKind::DropCap => block
                        .as_ref()
                        .is_some_and(|block| self.state.drop_caps.contains(block)),
                    _ => self.host.query_format(kind),
                };
            if active {
                self.state.active_formats.insert(kind);
            }
            self.host.set_class(button, style::ACTIVE, active);
        }
    }
}
