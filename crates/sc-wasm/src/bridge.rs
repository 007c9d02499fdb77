//! JS ↔ Rust glue: the JS-backed classifier and JSON replies.

use js_sys::{Float32Array, Function};
use sc_core::normalize::Tensor;
use sc_editor::canvas::CanvasResponse;
use sc_editor::classify::{ClassifyError, Classifier, Prediction};
use wasm_bindgen::JsValue;

/// A classifier backed by a JS predict function. The function receives the
/// flattened `[1, 28, 28, 1]` input as a `Float32Array` and returns the
/// per-class scores as any array-like of numbers.
pub struct JsClassifier {
    predict: Function,
}

impl JsClassifier {
    pub fn new(predict: Function) -> Self {
        Self { predict }
    }
}

impl Classifier for JsClassifier {
    fn predict(&mut self, tensor: &Tensor) -> Result<Vec<f32>, String> {
        let input = Float32Array::from(tensor.data());
        let output = self
            .predict
            .call1(&JsValue::NULL, &input)
            .map_err(|e| js_error_text(&e))?;
        Ok(Float32Array::new(&output).to_vec())
    }
}

fn js_error_text(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// `{"scheduleFrame":bool,"surfaceChanged":bool}`
pub fn response_json(r: CanvasResponse) -> String {
    serde_json::json!({
        "scheduleFrame": r.schedule_frame,
        "surfaceChanged": r.surface_changed,
    })
    .to_string()
}

/// `{"error":..,"label":..,"loading":bool,"ran":bool}`
pub fn classify_json(outcome: Option<&Result<Prediction, ClassifyError>>, loading: bool) -> String {
    let (label, error) = match outcome {
        Some(Ok(p)) => (Some(p.label.clone()), None),
        Some(Err(e)) => (None, Some(e.to_string())),
        None => (None, None),
    };
    serde_json::json!({
        "ran": outcome.is_some(),
        "loading": loading,
        "label": label,
        "error": error,
    })
    .to_string()
}
