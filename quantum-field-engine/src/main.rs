mod engine;
mod error;
mod narrative;
mod rpc;

use crate::engine::core::app_setup::create_app;

fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = engine::core::window_config::verify_canvas_surface() {
            web_sys::console::error_1(&format!("Quantum field not started: {}", e).into());
            return;
        }

        let mut app = create_app();
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut app = create_app();
        app.run();
    }
}
