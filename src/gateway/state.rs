use std::sync::Arc;

use parking_lot::Mutex;

use crate::router::Session;
use crate::service::FlashQuery;

/// Shared handler state.
///
/// The server keeps one [`Session`] for every caller; per-user isolation is out of scope.
/// The lock is only ever held for synchronous work.
#[derive(Clone)]
pub struct HandlerState {
    pub service: Arc<FlashQuery>,

    pub session: Arc<Mutex<Session>>,

    /// Characters of loaded text echoed back by the context endpoint.
    pub preview_chars: usize,
}

impl HandlerState {
    pub fn new(service: FlashQuery, preview_chars: usize) -> Self {
        Self {
            service: Arc::new(service),
            session: Arc::new(Mutex::new(Session::new())),
            preview_chars,
        }
    }
}
