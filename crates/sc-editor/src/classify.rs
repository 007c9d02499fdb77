//! Deferred classification.
//!
//! A classify request does not run immediately: it is queued with a due time
//! so in-flight pointer handling finishes first. One request per canvas is
//! outstanding at a time. A new request before the pending one fires
//! replaces it, and a completion from a superseded ticket is dropped so it
//! cannot overwrite the newer result or clear the loading indicator.

use sc_core::labels::{LabelSet, argmax};
use sc_core::normalize::{GrayFrame, NormalizeOptions, Tensor, normalize};
use std::fmt;

/// External model executor.
pub trait Classifier {
    /// Return a probability (or logit) per class for a `[1, 28, 28, 1]` input.
    fn predict(&mut self, tensor: &Tensor) -> Result<Vec<f32>, String>;
}

impl<F> Classifier for F
where
    F: FnMut(&Tensor) -> Result<Vec<f32>, String>,
{
    fn predict(&mut self, tensor: &Tensor) -> Result<Vec<f32>, String> {
        self(tensor)
    }
}

/// A model that may have failed to load.
pub enum ModelSlot<C> {
    Loading,
    Ready(C),
    Failed(String),
}

impl<C: Classifier> ModelSlot<C> {
    /// Wrap the outcome of a model load.
    pub fn from_load(result: Result<C, String>) -> Self {
        match result {
            Ok(model) => Self::Ready(model),
            Err(e) => {
                log::error!("model load failed: {e}");
                Self::Failed(e)
            }
        }
    }

    pub fn classifier(&mut self) -> Result<&mut C, ClassifyError> {
        match self {
            Self::Ready(model) => Ok(model),
            Self::Loading => Err(ClassifyError::ModelUnavailable(
                "model is still loading".to_string(),
            )),
            Self::Failed(e) => Err(ClassifyError::ModelUnavailable(e.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyError {
    ModelUnavailable(String),
    Frame(String),
    Predict(String),
    EmptyOutput,
    UnknownClass(usize),
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelUnavailable(e) => write!(f, "model unavailable: {e}"),
            Self::Frame(e) => write!(f, "cannot read canvas: {e}"),
            Self::Predict(e) => write!(f, "prediction failed: {e}"),
            Self::EmptyOutput => write!(f, "model returned no classes"),
            Self::UnknownClass(i) => write!(f, "model predicted unknown class {i}"),
        }
    }
}

impl std::error::Error for ClassifyError {}

/// A classifier's verdict for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub index: usize,
    pub label: String,
    pub score: f32,
}

/// Normalize `frame`, run the model, and map the best class to its label.
pub fn classify_frame<C: Classifier + ?Sized>(
    classifier: &mut C,
    frame: &GrayFrame,
    opts: NormalizeOptions,
    labels: LabelSet,
) -> Result<Prediction, ClassifyError> {
    let tensor = normalize(frame, opts);
    let scores = classifier
        .predict(&tensor)
        .map_err(ClassifyError::Predict)?;
    let index = argmax(&scores).ok_or(ClassifyError::EmptyOutput)?;
    let label = labels
        .label(index)
        .ok_or(ClassifyError::UnknownClass(index))?;
    log::debug!("{} → #{index} {label:?}", labels.name());
    Ok(Prediction {
        index,
        label,
        score: scores[index],
    })
}

// ─── Queue ───────────────────────────────────────────────────────────────

/// Identifies one classify request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct ClassifyQueue {
    delay_ms: f64,
    issued: u64,
    pending: Option<(Ticket, f64)>,
    loading: bool,
    last: Option<Result<Prediction, ClassifyError>>,
}

impl ClassifyQueue {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            issued: 0,
            pending: None,
            loading: false,
            last: None,
        }
    }

    /// Queue a request at `now_ms`. Replaces any request not yet fired.
    pub fn request(&mut self, now_ms: f64) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        if let Some((old, _)) = self.pending.replace((ticket, now_ms + self.delay_ms)) {
            log::debug!("classify {old:?} superseded by {ticket:?}");
        }
        self.loading = true;
        ticket
    }

    /// Fire the pending request if its delay has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<Ticket> {
        match self.pending {
            Some((ticket, due)) if now_ms >= due => {
                self.pending = None;
                Some(ticket)
            }
            _ => None,
        }
    }

    /// When the pending request becomes due, if any.
    pub fn next_due(&self) -> Option<f64> {
        self.pending.map(|(_, due)| due)
    }

    /// Record the outcome of a fired request. Returns `false` if the ticket
    /// was superseded and the outcome was discarded.
    pub fn finish(&mut self, ticket: Ticket, outcome: Result<Prediction, ClassifyError>) -> bool {
        if ticket.0 != self.issued {
            log::debug!("dropping stale classify result for {ticket:?}");
            return false;
        }
        if let Err(e) = &outcome {
            log::warn!("classify failed: {e}");
        }
        self.loading = false;
        self.last = Some(outcome);
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Most recent accepted outcome.
    pub fn last(&self) -> Option<&Result<Prediction, ClassifyError>> {
        self.last.as_ref()
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }
}
