//! Grid viewer: the host-side session plus its WebAssembly binding.

mod session;

pub use session::GridSession;

#[cfg(target_arch = "wasm32")]
pub use wasm::GridView;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use super::GridSession;
    use crate::render::{CanvasSurface, PolicyKind};
    use crate::types::{HoverState, RenderOptions, Theme, ViewResponse};

    fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(value)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Deserialization error: {e}")))
    }

    /// Pivot/tablix grid bound to a canvas element.
    #[wasm_bindgen]
    pub struct GridView {
        session: GridSession<CanvasSurface>,
        dpr: f32,
    }

    #[wasm_bindgen]
    impl GridView {
        /// `policy` is `"pivot"` or `"tablix"`; anything else means pivot.
        #[wasm_bindgen(constructor)]
        pub fn new(
            canvas: HtmlCanvasElement,
            dpr: f32,
            policy: Option<String>,
        ) -> Result<GridView, JsValue> {
            console_error_panic_hook::set_once();
            let kind = match policy.as_deref() {
                Some("tablix") => PolicyKind::Tablix,
                _ => PolicyKind::Pivot,
            };
            let surface = CanvasSurface::new(canvas)?;
            Ok(GridView {
                session: GridSession::new(surface, kind),
                dpr,
            })
        }

        #[wasm_bindgen]
        pub fn set_view(&mut self, view: JsValue) -> Result<(), JsValue> {
            let view: ViewResponse = from_js(view)?;
            view.validate()?;
            self.session.set_view(view);
            Ok(())
        }

        #[wasm_bindgen]
        pub fn set_view_json(&mut self, json: &str) -> Result<(), JsValue> {
            self.session.load_view_json(json)?;
            Ok(())
        }

        #[wasm_bindgen]
        pub fn clear_view(&mut self) {
            self.session.clear_view();
        }

        #[wasm_bindgen]
        pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
            let options: RenderOptions = from_js(options)?;
            self.session.set_options(options);
            Ok(())
        }

        #[wasm_bindgen]
        pub fn set_theme(&mut self, theme: JsValue) -> Result<(), JsValue> {
            let theme: Theme = from_js(theme)?;
            self.session.set_theme(theme);
            Ok(())
        }

        #[wasm_bindgen]
        pub fn set_hover(&mut self, hover: JsValue) -> Result<(), JsValue> {
            let hover: HoverState = from_js(hover)?;
            self.session.set_hover(hover);
            Ok(())
        }

        /// Resize to CSS pixels; the backing store follows the device pixel ratio.
        #[wasm_bindgen]
        pub fn resize(&mut self, css_width: f32, css_height: f32, dpr: f32) -> Result<(), JsValue> {
            self.dpr = dpr;
            self.session.surface_mut().resize(css_width, css_height, dpr)?;
            self.session.resize(css_width, css_height);
            Ok(())
        }

        /// Returns the applied `[left, top]` after clamping.
        #[wasm_bindgen]
        pub fn scroll_to(&mut self, left: f32, top: f32) -> Vec<f32> {
            let (left, top) = self.session.scroll_to(left, top);
            vec![left, top]
        }

        #[wasm_bindgen]
        pub fn scroll_by(&mut self, dx: f32, dy: f32) -> Vec<f32> {
            let (left, top) = self.session.scroll_by(dx, dy);
            vec![left, top]
        }

        #[wasm_bindgen]
        pub fn needs_render(&self) -> bool {
            self.session.needs_render()
        }

        /// Paint and return the interactive bounds of this pass.
        #[wasm_bindgen]
        pub fn render(&mut self) -> Result<JsValue, JsValue> {
            let started = js_sys::Date::now();
            self.session.surface().clear();
            let result = self.session.render();
            log::debug!(
                "render: {} cells in {:.2}ms",
                result.cells_painted,
                js_sys::Date::now() - started
            );
            to_js(&result.interactive_bounds)
        }

        /// Hit target under a CSS-pixel position, against the last paint.
        #[wasm_bindgen]
        pub fn hit_test(&self, x: f32, y: f32) -> Result<JsValue, JsValue> {
            to_js(&self.session.hit_test(x, y))
        }

        #[wasm_bindgen]
        pub fn device_pixel_ratio(&self) -> f32 {
            self.dpr
        }
    }
}
