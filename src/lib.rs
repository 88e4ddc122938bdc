pub mod camera;
pub mod config;
pub mod debug;
pub mod error;
pub mod viewport;

pub use config::DemoConfig;
pub use error::DemoError;
pub use viewport::{compute_aspect_correction, ViewportSync, ViewportUniforms};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::{DemoConfig, DemoError};

    mod gl;
    mod gui;
    mod render;

    #[cfg(test)]
    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    #[cfg_attr(not(test), wasm_bindgen(start))]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or(DemoError::Missing("window"))?;
        let config = read_config(&window);
        if let Some(level) = config.log_level.to_level() {
            console_log::init_with_level(level).ok();
        }
        log::info!("raymarch demo starting");

        let document = window.document().ok_or(DemoError::Missing("document"))?;
        let canvas = find_canvas(&document, &config.canvas_selector)?;

        render::start(window, canvas, config)?;
        Ok(())
    }

    fn find_canvas(
        document: &web_sys::Document,
        selector: &str,
    ) -> Result<web_sys::HtmlCanvasElement, DemoError> {
        document
            .query_selector(selector)?
            .ok_or(DemoError::Missing("canvas"))?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| DemoError::Js(format!("`{selector}` is not a <canvas>")))
    }

    fn read_config(window: &web_sys::Window) -> DemoConfig {
        let params = window
            .location()
            .search()
            .ok()
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok());
        let Some(params) = params else {
            return DemoConfig::default();
        };

        let pairs: Vec<(&str, String)> = DemoConfig::QUERY_KEYS
            .iter()
            .filter_map(|&key| params.get(key).map(|value| (key, value)))
            .collect();
        let (config, rejected) =
            DemoConfig::from_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        // Logger is not up yet; report straight to the console.
        for err in rejected {
            web_sys::console::warn_1(&format!("ignoring query override: {err}").into());
        }
        config
    }

}
