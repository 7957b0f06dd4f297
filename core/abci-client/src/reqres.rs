use std::sync::Arc;

use parking_lot::Mutex;

use crate::message::ResponseCheckTx;

type PerReqCallback = Box<dyn FnOnce(&ResponseCheckTx) + Send>;

struct Inner {
    response: Option<ResponseCheckTx>,
    callback: Option<PerReqCallback>,
    /// Set once the application has dropped this request instead of
    /// answering it. A dropped request never invokes any callback and
    /// never reaches the global callback, per spec §4.2.
    dropped: bool,
}

/// A handle to a single outstanding `CheckTx` request.
///
/// The caller may attach a callback before or after the response arrives;
/// either order invokes it exactly once. If the application drops the
/// request, the callback set here is simply never called -- no panic, no
/// error surfaced through this handle.
#[derive(Clone)]
pub struct ReqRes {
    inner: Arc<Mutex<Inner>>,
}

impl ReqRes {
    pub(crate) fn new() -> Self {
        ReqRes {
            inner: Arc::new(Mutex::new(Inner {
                response: None,
                callback: None,
                dropped: false,
            })),
        }
    }

    /// Register the callback to run when the response arrives. Invoked
    /// immediately, inline, if the response already arrived.
    pub fn set_callback<F>(&self, cb: F)
    where
        F: FnOnce(&ResponseCheckTx) + Send + 'static,
    {
        let mut inner = self.inner.lock();
        if inner.dropped {
            return;
        }
        if let Some(resp) = inner.response.take() {
            drop(inner);
            cb(&resp);
        } else {
            inner.callback = Some(Box::new(cb));
        }
    }

    pub(crate) fn deliver(&self, resp: ResponseCheckTx) {
        let mut inner = self.inner.lock();
        if let Some(cb) = inner.callback.take() {
            drop(inner);
            cb(&resp);
        } else {
            inner.response = Some(resp);
        }
    }

    pub(crate) fn mark_dropped(&self) {
        let mut inner = self.inner.lock();
        inner.dropped = true;
        inner.callback = None;
    }
}
