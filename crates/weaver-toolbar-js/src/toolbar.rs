//! SelectionToolbar - the toolbar wrapper for JavaScript.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use weaver_toolbar_browser::MountedToolbar;
use weaver_toolbar_core::{ToolbarConfig, ToolbarState};

use crate::logging;

/// Snapshot of the toolbar state handed to JavaScript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsToolbarState {
    pub visible: bool,
    pub view: &'static str,
    pub fixed: bool,
    pub at_fixed_position: bool,
    pub below: bool,
    pub selected_text: String,
    pub active_formats: Vec<&'static str>,
}

impl<E, R> From<&ToolbarState<E, R>> for JsToolbarState {
    fn from(state: &ToolbarState<E, R>) -> Self {
        Self {
            visible: state.is_visible,
            view: state.current_view().as_str(),
            fixed: state.is_fixed,
            at_fixed_position: state.is_at_fixed_position,
            below: state.is_below,
            selected_text: state.selected_text.clone(),
            active_formats: state.active_formats.iter().map(|kind| kind.as_str()).collect(),
        }
    }
}

/// A selection toolbar bound to one editable region.
#[wasm_bindgen]
pub struct SelectionToolbar {
    inner: Option<MountedToolbar>,
}

#[wasm_bindgen]
impl SelectionToolbar {
    /// Create and mount a toolbar.
    ///
    /// `config` is a plain options object; every field is optional.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<SelectionToolbar, JsError> {
        let config: ToolbarConfig = if config.is_undefined() || config.is_null() {
            ToolbarConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsError::new(&format!("Invalid toolbar config: {}", e)))?
        };
        logging::install(config.debug);

        let mounted = MountedToolbar::mount(config).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self {
            inner: Some(mounted),
        })
    }

    /// Remove listeners, timers and any markup the toolbar created.
    pub fn destroy(&mut self) {
        if let Some(mut mounted) = self.inner.take() {
            mounted.destroy();
        }
    }

    /// Recompute placement, e.g. after the host page changed layout.
    pub fn reposition(&self) {
        if let Some(mounted) = &self.inner {
            mounted.reposition();
        }
    }

    /// Send the toolbar back to its resting place.
    #[wasm_bindgen(js_name = resetToAnchor)]
    pub fn reset_to_anchor(&self) {
        if let Some(mounted) = &self.inner {
            mounted.reset_to_anchor();
        }
    }

    #[wasm_bindgen(js_name = isVisible)]
    pub fn is_visible(&self) -> bool {
        self.inner.as_ref().is_some_and(MountedToolbar::is_visible)
    }

    /// `"initial"` or `"link-input"`.
    #[wasm_bindgen(js_name = currentView)]
    pub fn current_view(&self) -> String {
        self.inner
            .as_ref()
            .map(|mounted| mounted.current_view())
            .unwrap_or_default()
            .as_str()
            .to_string()
    }

    /// Whether construction found its markup and content region.
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|mounted| !mounted.toolbar().borrow().is_inert())
    }

    /// Full state snapshot, for debugging and tests.
    pub fn state(&self) -> Result<JsValue, JsError> {
        let Some(mounted) = &self.inner else {
            return Ok(JsValue::NULL);
        };
        let toolbar = mounted
            .toolbar()
            .try_borrow()
            .map_err(|_| JsError::new("toolbar is busy"))?;
        let state = JsToolbarState::from(toolbar.state());
        serde_wasm_bindgen::to_value(&state).map_err(|e| JsError::new(&e.to_string()))
    }
}
