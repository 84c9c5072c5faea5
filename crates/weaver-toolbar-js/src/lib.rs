//! WASM bindings for the weaver selection toolbar.
//!
//! Provides `SelectionToolbar`, an embeddable toolbar for any
//! contenteditable region in a JavaScript/TypeScript app.

mod logging;
mod toolbar;

pub use toolbar::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}
