/// Collapses redraw requests into at most one render per pump.
///
/// A quick redraw repaints the building pass only (camera pans).
/// Any full request in the same window upgrades a pending quick one.
#[derive(Debug, Default)]
pub struct RedrawLatch {
    pending: Option<bool>,
}

impl RedrawLatch {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn request(&mut self, quick: bool) {
        self.pending = Some(match self.pending {
            Some(prev_quick) => prev_quick && quick,
            None => quick,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending request, if any. Returns `quick`.
    pub fn take(&mut self) -> Option<bool> {
        self.pending.take()
    }
}
