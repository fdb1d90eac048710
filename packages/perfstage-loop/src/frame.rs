/// Display-sync (animation frame) callbacks.
///
/// Callbacks accumulate until the loop reaches an idle paint opportunity,
/// then the whole batch runs with one shared frame timestamp. A callback
/// registered while a batch is being serviced lands in the next frame, which
/// is why `take_batch` swaps the list out instead of draining it in place.
#[derive(Default)]
pub(crate) struct FrameQueue {
    pending: Vec<(u64, Box<dyn FnOnce(f64)>)>,
    next_id: u64,
}

impl FrameQueue {
    pub fn request(&mut self, callback: Box<dyn FnOnce(f64)>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push((id, callback));
        id
    }

    pub fn take_batch(&mut self) -> Vec<(u64, Box<dyn FnOnce(f64)>)> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
