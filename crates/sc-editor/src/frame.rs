//! Redraw throttling.
//!
//! Redraws run at most once per display frame. A request while one is
//! already pending is absorbed; the host only schedules a frame callback
//! when `request` reports an idle → pending transition.

#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a redraw. Returns `true` if the caller must schedule a frame
    /// callback, `false` if one is already pending.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Consume the pending request from the frame callback. Returns `true`
    /// if a redraw should run now.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Drop any pending request.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
