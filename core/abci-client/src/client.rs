use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use derive_more::Display;
use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::channel::oneshot;
use futures::StreamExt;
use parking_lot::Mutex;

use protocol::{ProtocolError, ProtocolErrorKind, ProtocolResult};

use crate::message::{RequestCheckTx, ResponseCheckTx, ResponseCommit, ResponseDeliverTx};
use crate::reqres::ReqRes;

pub type GlobalCallback = Box<dyn Fn(&RequestCheckTx, &ResponseCheckTx) + Send + Sync>;

/// The external application this workspace treats as a remote oracle.
/// `check_tx` returning `None` simulates the application dropping a
/// request instead of answering it (§4.2) -- a crash, a timeout, or a
/// deliberately discarded duplicate.
pub trait AbciApp: Send + Sync + 'static {
    fn check_tx(&self, req: &RequestCheckTx) -> Option<ResponseCheckTx>;

    fn deliver_tx(&self, tx: &protocol::types::Tx) -> ResponseDeliverTx;

    fn commit(&self) -> ResponseCommit;
}

#[async_trait]
pub trait AbciClient: Send + Sync {
    async fn check_tx_async(&self, req: RequestCheckTx) -> ProtocolResult<ReqRes>;

    /// Blocks until every request enqueued so far has been dispatched.
    async fn flush_async(&self) -> ProtocolResult<()>;

    fn deliver_tx_sync(&self, tx: &protocol::types::Tx) -> ProtocolResult<ResponseDeliverTx>;

    fn commit_sync(&self) -> ProtocolResult<ResponseCommit>;

    /// Invoked for every response that is not dropped, in the order its
    /// request was enqueued, after the request's own per-request callback
    /// (if any) has run.
    fn set_response_callback(&self, cb: GlobalCallback);

    /// Last fatal transport error, if the client has been closed.
    fn error(&self) -> Option<String>;
}

enum Command {
    CheckTx(RequestCheckTx, ReqRes),
    Flush(oneshot::Sender<()>),
}

/// Bridges the async `CheckTx` admission path to a single dispatcher task
/// that talks to the (in-process) application strictly in enqueue order.
/// Using one task -- rather than `tokio::spawn`-per-request -- is what
/// makes "per-request callbacks fire in enqueue order" and "global
/// callback fires in enqueue order" true without extra bookkeeping.
pub struct LocalAbciClient<A> {
    app: Arc<A>,
    cmd_tx: UnboundedSender<Command>,
    global_cb: Arc<Mutex<Option<GlobalCallback>>>,
    closed: Arc<AtomicBool>,
}

impl<A: AbciApp> LocalAbciClient<A> {
    pub fn new(app: A) -> Self {
        let app = Arc::new(app);
        let (cmd_tx, mut cmd_rx) = unbounded::<Command>();
        let global_cb: Arc<Mutex<Option<GlobalCallback>>> = Arc::new(Mutex::new(None));
        let closed = Arc::new(AtomicBool::new(false));

        let dispatch_app = Arc::clone(&app);
        let dispatch_cb = Arc::clone(&global_cb);
        let dispatch_closed = Arc::clone(&closed);

        tokio::spawn(async move {
            while let Some(cmd) = cmd_rx.next().await {
                if dispatch_closed.load(Ordering::SeqCst) {
                    continue;
                }
                match cmd {
                    Command::CheckTx(req, reqres) => match dispatch_app.check_tx(&req) {
                        Some(resp) => {
                            reqres.deliver(resp.clone());
                            if let Some(cb) = dispatch_cb.lock().as_ref() {
                                cb(&req, &resp);
                            }
                        }
                        None => {
                            log::warn!("abci client: application dropped a CheckTx response");
                            reqres.mark_dropped();
                        }
                    },
                    Command::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });

        LocalAbciClient {
            app,
            cmd_tx,
            global_cb,
            closed,
        }
    }
}

#[async_trait]
impl<A: AbciApp> AbciClient for LocalAbciClient<A> {
    async fn check_tx_async(&self, req: RequestCheckTx) -> ProtocolResult<ReqRes> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(AbciClientError::Closed.into());
        }
        let reqres = ReqRes::new();
        self.cmd_tx
            .unbounded_send(Command::CheckTx(req, reqres.clone()))
            .map_err(|_| AbciClientError::Closed)?;
        Ok(reqres)
    }

    async fn flush_async(&self) -> ProtocolResult<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.cmd_tx
            .unbounded_send(Command::Flush(done_tx))
            .map_err(|_| AbciClientError::Closed)?;
        done_rx.await.map_err(|_| AbciClientError::Closed)?;
        Ok(())
    }

    fn deliver_tx_sync(&self, tx: &protocol::types::Tx) -> ProtocolResult<ResponseDeliverTx> {
        Ok(self.app.deliver_tx(tx))
    }

    fn commit_sync(&self) -> ProtocolResult<ResponseCommit> {
        Ok(self.app.commit())
    }

    fn set_response_callback(&self, cb: GlobalCallback) {
        *self.global_cb.lock() = Some(cb);
    }

    fn error(&self) -> Option<String> {
        if self.closed.load(Ordering::SeqCst) {
            Some(AbciClientError::Closed.to_string())
        } else {
            None
        }
    }
}

impl<A> Drop for LocalAbciClient<A> {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Display)]
pub enum AbciClientError {
    #[display(fmt = "abci client: closed")]
    Closed,
}

impl Error for AbciClientError {}

impl From<AbciClientError> for ProtocolError {
    fn from(err: AbciClientError) -> ProtocolError {
        ProtocolError::new(ProtocolErrorKind::AbciClient, Box::new(err))
    }
}
