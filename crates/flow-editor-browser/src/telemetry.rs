//! Console logging for the browser.

use tracing::Level;
use tracing::subscriber::set_global_default;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

/// Install panic messages and a console tracing subscriber.
///
/// Safe to call more than once; only the first subscriber sticks.
pub fn init(max_level: Level) {
    console_error_panic_hook::set_once();

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(max_level)
            .build(),
    );

    let _ = set_global_default(Registry::default().with(wasm_layer));
}

/// [`init`] at `DEBUG` in debug builds and `INFO` otherwise.
pub fn init_default() {
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init(level);
}
