//! WASM bridge for the sketchpad — exposes the Rust canvas engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the `<canvas>`
//! element, event listeners, and `requestAnimationFrame`; this crate owns the
//! drawing session, the raster surface, and the classify flow.
//!
//! Host loop:
//! - pointer/touch/key listeners call `handle_*` and read the JSON reply;
//!   `scheduleFrame` means "request one animation frame", `surfaceChanged`
//!   means "call `present` now".
//! - the animation frame callback calls `on_frame(ctx)`.
//! - the classify button calls `request_classify(now)`, waits the returned
//!   delay, then calls `run_classify(now)`.

mod bridge;

use bridge::{JsClassifier, classify_json, response_json};
use sc_core::config::CanvasConfig;
use sc_core::labels::LabelSet;
use sc_editor::canvas::DrawingCanvas;
use sc_editor::classify::ModelSlot;
use sc_editor::input::{InputEvent, Modifiers, SurfaceOffset};
use sc_render::export::{DEFAULT_JPEG_QUALITY, encode_jpeg, export_filename};
use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, ImageData};

/// The main WASM-facing canvas controller. One per `<canvas>` element.
#[wasm_bindgen]
pub struct ScCanvas {
    canvas: DrawingCanvas,
    labels: LabelSet,
    model: ModelSlot<JsClassifier>,
}

#[wasm_bindgen]
impl ScCanvas {
    /// Create a canvas for a category (`"digit"`, `"letter"`, `"merged"`,
    /// `"shape"`). `config_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(category: &str, config_json: &str) -> Result<ScCanvas, JsValue> {
        console_error_panic_hook_setup();

        let labels = LabelSet::from_name(category)
            .ok_or_else(|| JsValue::from_str(&format!("unknown category '{category}'")))?;
        let config = if config_json.trim().is_empty() {
            CanvasConfig::default()
        } else {
            CanvasConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e))?
        };
        let canvas = DrawingCanvas::new(config).map_err(|e| JsValue::from_str(&e))?;

        Ok(Self {
            canvas,
            labels,
            model: ModelSlot::Loading,
        })
    }

    pub fn width(&self) -> u32 {
        self.canvas.surface().width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.surface().height()
    }

    /// Update the canvas' on-screen origin (`getBoundingClientRect().left/top`).
    pub fn set_offset(&mut self, left: f32, top: f32) {
        self.canvas.set_offset(SurfaceOffset::new(left, top));
    }

    /// Set the brush radius for new strokes. Returns the clamped radius.
    pub fn set_brush_radius(&mut self, radius: f32) -> f32 {
        self.canvas.set_brush_radius(radius)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Mouse down / touch start at client coordinates.
    pub fn handle_pointer_down(&mut self, client_x: f32, client_y: f32) -> String {
        let r = self
            .canvas
            .handle(&InputEvent::from_pointer_down(client_x, client_y));
        response_json(r)
    }

    /// Mouse move / touch move at client coordinates.
    pub fn handle_pointer_move(&mut self, client_x: f32, client_y: f32) -> String {
        let r = self
            .canvas
            .handle(&InputEvent::from_pointer_move(client_x, client_y));
        response_json(r)
    }

    /// Touch start. `touches` is flattened `[x0, y0, x1, y1, ...]` client
    /// coordinates; only the first touch draws.
    pub fn handle_touch_start(&mut self, touches: Vec<f32>) -> String {
        match InputEvent::from_touch_start(&pairs(&touches)) {
            Some(event) => response_json(self.canvas.handle(&event)),
            None => response_json(Default::default()),
        }
    }

    /// Touch move, same layout as `handle_touch_start`.
    pub fn handle_touch_move(&mut self, touches: Vec<f32>) -> String {
        match InputEvent::from_touch_move(&pairs(&touches)) {
            Some(event) => response_json(self.canvas.handle(&event)),
            None => response_json(Default::default()),
        }
    }

    /// Mouse up, mouse out, or touch end.
    pub fn handle_pointer_up(&mut self) -> String {
        response_json(self.canvas.handle(&InputEvent::PointerUp))
    }

    /// Keyboard event (`KeyboardEvent.key` plus modifiers).
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        response_json(self.canvas.handle(&InputEvent::from_key(key, modifiers)))
    }

    /// Clear the canvas (reset button).
    pub fn reset(&mut self) {
        self.canvas.reset();
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Animation-frame callback: replay the session if a redraw is pending,
    /// then blit. Returns `true` if the canvas was redrawn.
    pub fn on_frame(&mut self, ctx: &CanvasRenderingContext2d) -> Result<bool, JsValue> {
        if !self.canvas.on_frame() {
            return Ok(false);
        }
        self.present(ctx)?;
        Ok(true)
    }

    /// Copy the raster surface onto the page canvas.
    pub fn present(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let surface = self.canvas.surface();
        let rgba = surface.rgba();
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(rgba.as_slice()),
            surface.width(),
            surface.height(),
        )?;
        ctx.put_image_data(&image, 0.0, 0.0)
    }

    // ─── Model & classify ────────────────────────────────────────────────

    /// Install the model's predict function: `(Float32Array) => ArrayLike<number>`.
    pub fn set_predictor(&mut self, predict: js_sys::Function) {
        self.model = ModelSlot::Ready(JsClassifier::new(predict));
    }

    /// Record that the model failed to load. Later classify calls report it.
    pub fn set_model_error(&mut self, message: &str) {
        self.model = ModelSlot::from_load(Err(message.to_string()));
    }

    /// Queue a classify request. Returns the delay in ms before
    /// `run_classify` should be called.
    pub fn request_classify(&mut self, now_ms: f64) -> f64 {
        self.canvas.request_classify(now_ms);
        self.canvas.classify_queue().delay_ms()
    }

    /// Run the pending classify request if due. Returns JSON:
    /// `{"ran":bool,"loading":bool,"label":string|null,"error":string|null}`.
    pub fn run_classify(&mut self, now_ms: f64) -> String {
        let outcome = self
            .canvas
            .poll_classify(now_ms, self.model.classifier(), self.labels);
        classify_json(outcome.as_ref(), self.canvas.is_loading())
    }

    pub fn is_loading(&self) -> bool {
        self.canvas.is_loading()
    }

    /// The normalized model input for the current drawing.
    pub fn normalized_tensor(&self) -> Result<Vec<f32>, JsValue> {
        self.canvas
            .normalized()
            .map(|t| t.into_data())
            .map_err(|e| JsValue::from_str(&e))
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// JPEG bytes of the surface, or `undefined` if encoding failed.
    pub fn export_jpeg(&self) -> Option<Vec<u8>> {
        match encode_jpeg(self.canvas.surface(), DEFAULT_JPEG_QUALITY) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::error!("export aborted: {e}");
                None
            }
        }
    }

    /// Recorded session as JSON.
    pub fn session_json(&self) -> Result<String, JsValue> {
        self.canvas
            .session()
            .to_json()
            .map_err(|e| JsValue::from_str(&e))
    }
}

/// Download name for a user-entered filename.
#[wasm_bindgen]
pub fn download_name(filename: &str) -> String {
    export_filename(filename)
}

fn pairs(flat: &[f32]) -> Vec<(f32, f32)> {
    flat.chunks_exact(2).map(|c| (c[0], c[1])).collect()
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("sketchpad WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
