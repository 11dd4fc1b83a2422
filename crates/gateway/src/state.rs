use crate::pipeline::Pipeline;
use std::sync::Arc;

pub struct AppState<B, S> {
    pub pipeline: Arc<Pipeline<B, S>>,
}

// Derive would require `B: Clone` and `S: Clone`
impl<B, S> Clone for AppState<B, S> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}
