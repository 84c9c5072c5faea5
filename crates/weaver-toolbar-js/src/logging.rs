//! Console logging through `tracing-wasm`.

use std::sync::Once;

use tracing::Level;
use tracing::subscriber::set_global_default;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

static INSTALL: Once = Once::new();

/// Console level for a toolbar created with `debug`.
pub fn level_for(debug: bool) -> Level {
    if debug { Level::DEBUG } else { Level::WARN }
}

/// Install the global subscriber. Only the first toolbar on the page picks
/// the level; later calls do nothing.
pub fn install(debug: bool) {
    INSTALL.call_once(|| {
        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(level_for(debug))
                .build(),
        );
        let reg = Registry::default().with(wasm_layer);
        let _ = set_global_default(reg);
    });
}
