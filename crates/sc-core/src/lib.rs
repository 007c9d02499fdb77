pub mod config;
pub mod labels;
pub mod model;
pub mod normalize;
pub mod session;

pub use config::CanvasConfig;
pub use labels::{LabelSet, argmax};
pub use model::{Point, Stroke};
pub use normalize::{GrayFrame, MODEL_INPUT_SIZE, NormalizeOptions, TENSOR_SHAPE, Tensor, normalize};
pub use session::{DrawingSession, MIN_POINT_SPACING};
