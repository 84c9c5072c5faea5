//! Event wiring: DOM listeners feeding a toolbar instance.
//!
//! Every listener holds a weak handle and borrows the toolbar with
//! `try_borrow_mut`. An event that arrives while the toolbar is already
//! borrowed (a synchronous focus event fired from inside a handler, say) is
//! dropped with a trace.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, FocusEvent, KeyboardEvent, Node};
use weaver_toolbar_core::{
    KeyOutcome, Toolbar, ToolbarConfig, ToolbarError, ToolbarEvent, ToolbarHandle, ToolbarRole,
    ToolbarView,
};

use crate::dom::event_node;
use crate::host::BrowserHost;
use crate::template::ToolbarMarkup;

type WeakToolbar = Weak<RefCell<Toolbar<BrowserHost>>>;

fn with_toolbar<R>(
    toolbar: &WeakToolbar,
    f: impl FnOnce(&mut Toolbar<BrowserHost>) -> R,
) -> Option<R> {
    let toolbar = toolbar.upgrade()?;
    let Ok(mut toolbar) = toolbar.try_borrow_mut() else {
        tracing::trace!(target: "weaver::toolbar", "toolbar busy, event dropped");
        return None;
    };
    Some(f(&mut toolbar))
}

/// A toolbar bound to the live page, with its markup and listeners.
///
/// Dropping it tears everything down; [`destroy`](Self::destroy) does the
/// same eagerly.
pub struct MountedToolbar {
    toolbar: ToolbarHandle<BrowserHost>,
    host: BrowserHost,
    markup: ToolbarMarkup,
    listeners: Vec<EventListener>,
    destroyed: bool,
}

impl MountedToolbar {
    /// Create markup (unless the page has its own), bind the toolbar and
    /// attach every listener.
    ///
    /// Only a missing window or a failed DOM insertion is an error. Bad
    /// selectors leave a mounted but inert toolbar, which logs why.
    pub fn mount(config: ToolbarConfig) -> Result<Self, ToolbarError> {
        let host = BrowserHost::new()?;
        let markup = ToolbarMarkup::create(host.window(), host.document(), &config)?;

        let toolbar = Toolbar::new(config, host.clone()).attach();
        host.bind(&toolbar);

        let listeners = if toolbar.borrow().is_inert() {
            Vec::new()
        } else {
            listen(&host, &toolbar)
        };
        tracing::debug!(
            target: "weaver::toolbar",
            toolbar_id = %toolbar.borrow().config().toolbar_id,
            listeners = listeners.len(),
            "toolbar mounted"
        );

        Ok(Self {
            toolbar,
            host,
            markup,
            listeners,
            destroyed: false,
        })
    }

    pub fn toolbar(&self) -> &ToolbarHandle<BrowserHost> {
        &self.toolbar
    }

    pub fn created_markup(&self) -> bool {
        self.markup.created_root()
    }

    /// Recompute placement from the live selection.
    pub fn reposition(&self) {
        if let Ok(mut toolbar) = self.toolbar.try_borrow_mut() {
            toolbar.reposition();
        }
    }

    pub fn reset_to_anchor(&self) {
        if let Ok(mut toolbar) = self.toolbar.try_borrow_mut() {
            toolbar.reset_to_anchor();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.toolbar
            .try_borrow()
            .map(|toolbar| toolbar.state().is_visible)
            .unwrap_or(false)
    }

    pub fn current_view(&self) -> ToolbarView {
        self.toolbar
            .try_borrow()
            .map(|toolbar| toolbar.state().current_view())
            .unwrap_or(ToolbarView::Initial)
    }

    /// Remove listeners, timers and created DOM. Safe to call twice.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.listeners.clear();
        match self.toolbar.try_borrow_mut() {
            Ok(mut toolbar) => toolbar.destroy(),
            Err(_) => {
                tracing::warn!(target: "weaver::toolbar", "toolbar borrowed during destroy");
            }
        }
        self.host.shutdown();
        self.markup.remove();
    }
}

impl Drop for MountedToolbar {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn listen(host: &BrowserHost, toolbar: &ToolbarHandle<BrowserHost>) -> Vec<EventListener> {
    let weak = Rc::downgrade(toolbar);
    let document = host.document();
    let window = host.window();
    let mut listeners = Vec::new();

    listeners.push(selection_listener(document, "mouseup", &weak, |target| {
        target.map(|target| ToolbarEvent::PointerUp { target })
    }));
    listeners.push(selection_listener(document, "keyup", &weak, |target| {
        target.map(|target| ToolbarEvent::KeyUp { target })
    }));
    listeners.push(selection_listener(document, "selectionchange", &weak, |_| {
        Some(ToolbarEvent::SelectionChange)
    }));

    let scroll_options = EventListenerOptions {
        phase: EventListenerPhase::Capture,
        passive: true,
    };
    let w = weak.clone();
    listeners.push(EventListener::new_with_options(
        window,
        "scroll",
        scroll_options,
        move |_| {
            with_toolbar(&w, |toolbar| toolbar.on_scroll());
        },
    ));
    let w = weak.clone();
    listeners.push(EventListener::new(window, "resize", move |_| {
        with_toolbar(&w, |toolbar| toolbar.on_resize());
    }));

    let (content, root, input, buttons) = {
        let toolbar = toolbar.borrow();
        let elements = toolbar.elements();
        let buttons: Vec<(ToolbarRole, Element)> = elements
            .buttons()
            .filter(|(role, _)| toolbar.config().buttons.is_enabled(*role))
            .map(|(role, el)| (role, el.clone()))
            .collect();
        (
            elements.content().cloned(),
            elements.root().cloned(),
            elements.get(ToolbarRole::LinkInput).cloned(),
            buttons,
        )
    };

    if let Some(content) = &content {
        let w = weak.clone();
        listeners.push(EventListener::new(content, "focus", move |_| {
            with_toolbar(&w, |toolbar| toolbar.on_content_focus());
        }));
        let w = weak.clone();
        listeners.push(EventListener::new(content, "blur", move |event| {
            let related: Option<Node> = event
                .dyn_ref::<FocusEvent>()
                .and_then(FocusEvent::related_target)
                .and_then(|target| target.dyn_into::<Node>().ok());
            with_toolbar(&w, |toolbar| toolbar.on_content_blur(related.as_ref()));
        }));
    }

    if let Some(root) = &root {
        // Keep the document selection when a toolbar button is pressed.
        let input_for_mousedown = input.clone();
        listeners.push(EventListener::new_with_options(
            root,
            "mousedown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let on_input = match (&input_for_mousedown, event_node(event)) {
                    (Some(input), Some(target)) => input.contains(Some(&target)),
                    _ => false,
                };
                if !on_input {
                    event.prevent_default();
                }
            },
        ));
    }

    for (role, button) in buttons {
        let w = weak.clone();
        listeners.push(EventListener::new(&button, "click", move |_| {
            with_toolbar(&w, |toolbar| toolbar.handle_click(role));
        }));
    }

    if let Some(input) = &input {
        let w = weak.clone();
        listeners.push(EventListener::new(input, "input", move |_| {
            with_toolbar(&w, |toolbar| toolbar.on_link_input());
        }));
        let w = weak.clone();
        listeners.push(EventListener::new_with_options(
            input,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                    return;
                };
                let outcome = with_toolbar(&w, |toolbar| toolbar.handle_link_key(&key));
                if outcome == Some(KeyOutcome::PreventDefault) {
                    event.prevent_default();
                }
            },
        ));
    }

    listeners
}

fn selection_listener(
    document: &web_sys::Document,
    event_type: &'static str,
    toolbar: &WeakToolbar,
    to_event: impl Fn(Option<Node>) -> Option<ToolbarEvent<Node>> + 'static,
) -> EventListener {
    let toolbar = toolbar.clone();
    EventListener::new(document, event_type, move |event: &Event| {
        let Some(event) = to_event(event_node(event)) else {
            return;
        };
        with_toolbar(&toolbar, |t| t.handle_selection(&event));
    })
}
