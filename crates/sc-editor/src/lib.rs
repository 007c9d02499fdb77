pub mod canvas;
pub mod classify;
pub mod frame;
pub mod input;
pub mod shortcuts;
