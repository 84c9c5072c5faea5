//! Element cache: logical toolbar roles bound to DOM nodes once.

use std::collections::HashMap;

use crate::config::ToolbarConfig;
use crate::error::ToolbarError;
use crate::host::ToolbarHost;

/// A logical part of the toolbar or its surroundings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolbarRole {
    /// Placement anchor; the toolbar is positioned relative to it.
    Container,
    /// The editable region being tracked.
    Content,
    /// Toolbar root.
    Toolbar,
    InitialView,
    LinkView,
    LinkInput,
    SaveLink,
    CancelLink,
    RemoveLink,
    VisitLink,
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
    Link,
}

impl ToolbarRole {
    /// Every role looked up by id, i.e. everything except container/content.
    pub const CONTROLS: [ToolbarRole; 23] = [
        ToolbarRole::Toolbar,
        ToolbarRole::InitialView,
        ToolbarRole::LinkView,
        ToolbarRole::LinkInput,
        ToolbarRole::SaveLink,
        ToolbarRole::CancelLink,
        ToolbarRole::RemoveLink,
        ToolbarRole::VisitLink,
        ToolbarRole::Bold,
        ToolbarRole::Italic,
        ToolbarRole::Underline,
        ToolbarRole::Strikethrough,
        ToolbarRole::Heading1,
        ToolbarRole::Heading2,
        ToolbarRole::Heading3,
        ToolbarRole::Quote,
        ToolbarRole::Code,
        ToolbarRole::BulletList,
        ToolbarRole::NumberedList,
        ToolbarRole::HorizontalRule,
        ToolbarRole::DropCap,
        ToolbarRole::ClearFormatting,
        ToolbarRole::Link,
    ];

    /// Suffix appended to the toolbar id to form this role's element id.
    pub fn id_suffix(self) -> Option<&'static str> {
        let suffix = match self {
            ToolbarRole::Container | ToolbarRole::Content | ToolbarRole::Toolbar => return None,
            ToolbarRole::InitialView => "initial-view",
            ToolbarRole::LinkView => "link-view",
            ToolbarRole::LinkInput => "link-input",
            ToolbarRole::SaveLink => "save-link-button",
            ToolbarRole::CancelLink => "cancel-link-button",
            ToolbarRole::RemoveLink => "remove-link-button",
            ToolbarRole::VisitLink => "visit-link-button",
            ToolbarRole::Bold => "bold-button",
            ToolbarRole::Italic => "italic-button",
            ToolbarRole::Underline => "underline-button",
            ToolbarRole::Strikethrough => "strikethrough-button",
            ToolbarRole::Heading1 => "h1-button",
            ToolbarRole::Heading2 => "h2-button",
            ToolbarRole::Heading3 => "h3-button",
            ToolbarRole::Quote => "quote-button",
            ToolbarRole::Code => "code-button",
            ToolbarRole::BulletList => "bullet-list-button",
            ToolbarRole::NumberedList => "numbered-list-button",
            ToolbarRole::HorizontalRule => "hr-button",
            ToolbarRole::DropCap => "drop-cap-button",
            ToolbarRole::ClearFormatting => "clear-formatting-button",
            ToolbarRole::Link => "link-button",
        };
        Some(suffix)
    }

    /// Whether clicking this role is a button action the wiring should bind.
    pub fn is_button(self) -> bool {
        !matches!(
            self,
            ToolbarRole::Container
                | ToolbarRole::Content
                | ToolbarRole::Toolbar
                | ToolbarRole::InitialView
                | ToolbarRole::LinkView
                | ToolbarRole::LinkInput
        )
    }
}

/// Role → element table for one toolbar instance.
///
/// Built once after the toolbar markup exists and never refreshed. Any role
/// may be missing; callers go through [`get`](Self::get) and skip what isn't
/// there.
#[derive(Clone, Debug)]
pub struct ToolbarElements<E> {
    elements: HashMap<ToolbarRole, E>,
}

impl<E> Default for ToolbarElements<E> {
    fn default() -> Self {
        Self {
            elements: HashMap::new(),
        }
    }
}

impl<E: Clone> ToolbarElements<E> {
    /// The table of an inert toolbar.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve every role against the host document.
    ///
    /// Container, content region and toolbar root are required; everything
    /// else is optional.
    pub fn bind<H>(host: &H, config: &ToolbarConfig) -> Result<Self, ToolbarError>
    where
        H: ToolbarHost<Element = E>,
    {
        let container = host
            .query_selector(&config.container)
            .ok_or_else(|| ToolbarError::ContainerNotFound(config.container.clone()))?;
        let content = host
            .query_selector(&config.content)
            .ok_or_else(|| ToolbarError::ContentNotFound(config.content.clone()))?;
        let root = host
            .element_by_id(&config.toolbar_id)
            .ok_or_else(|| ToolbarError::ToolbarRootNotFound(config.toolbar_id.clone()))?;

        let mut elements = HashMap::new();
        elements.insert(ToolbarRole::Container, container);
        elements.insert(ToolbarRole::Content, content);
        elements.insert(ToolbarRole::Toolbar, root);

        for role in ToolbarRole::CONTROLS {
            if role == ToolbarRole::Toolbar {
                continue;
            }
            let Some(id) = config.element_id(role) else {
                continue;
            };
            if let Some(element) = host.element_by_id(&id) {
                elements.insert(role, element);
            }
        }

        tracing::debug!(
            target: "weaver::toolbar",
            toolbar_id = %config.toolbar_id,
            bound = elements.len(),
            "bound toolbar elements"
        );

        Ok(Self { elements })
    }

    pub fn get(&self, role: ToolbarRole) -> Option<&E> {
        self.elements.get(&role)
    }

    pub fn root(&self) -> Option<&E> {
        self.get(ToolbarRole::Toolbar)
    }

    pub fn content(&self) -> Option<&E> {
        self.get(ToolbarRole::Content)
    }

    pub fn container(&self) -> Option<&E> {
        self.get(ToolbarRole::Container)
    }

    /// An inert table has no root; every handler becomes a no-op.
    pub fn is_inert(&self) -> bool {
        self.root().is_none() || self.content().is_none()
    }

    /// Bound button roles, in declaration order.
    pub fn buttons(&self) -> impl Iterator<Item = (ToolbarRole, &E)> {
        ToolbarRole::CONTROLS
            .into_iter()
            .filter(|role| role.is_button())
            .filter_map(|role| self.get(role).map(|el| (role, el)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::TestHost;

    #[test]
    fn test_suffixes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for role in ToolbarRole::CONTROLS {
            if let Some(suffix) = role.id_suffix() {
                assert!(seen.insert(suffix), "duplicate suffix {suffix}");
            }
        }
    }

    #[test]
    fn test_bind_full_markup() {
        let host = TestHost::new();
        let config = host.standard_config("tb");
        let elements = ToolbarElements::bind(&host, &config).unwrap();
        assert!(!elements.is_inert());
        assert!(elements.get(ToolbarRole::Bold).is_some());
        assert!(elements.get(ToolbarRole::LinkInput).is_some());
    }

    #[test]
    fn test_bind_missing_optional_buttons() {
        let host = TestHost::new();
        let config = host.standard_config_without("tb", &[ToolbarRole::Bold, ToolbarRole::DropCap]);
        let elements = ToolbarElements::bind(&host, &config).unwrap();
        assert!(elements.get(ToolbarRole::Bold).is_none());
        assert!(elements.get(ToolbarRole::DropCap).is_none());
        assert!(elements.get(ToolbarRole::Italic).is_some());
        assert!(elements.buttons().all(|(role, _)| role != ToolbarRole::Bold));
    }

    #[test]
    fn test_bind_missing_root_is_config_error() {
        let host = TestHost::new();
        let mut config = host.standard_config("tb");
        config.toolbar_id = "nope".into();
        let err = ToolbarElements::bind(&host, &config).unwrap_err();
        assert_eq!(err, ToolbarError::ToolbarRootNotFound("nope".into()));

        let mut config = host.standard_config("tb2");
        config.content = "#missing".into();
        let err = ToolbarElements::bind(&host, &config).unwrap_err();
        assert_eq!(err, ToolbarError::ContentNotFound("#missing".into()));
    }
}
