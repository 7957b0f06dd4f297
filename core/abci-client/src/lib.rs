//! The ABCI client adapter: an async request/response bridge to the
//! external application, guaranteeing in-order callback delivery per
//! request while tolerating the application dropping individual
//! responses. See spec §4.2.

mod client;
mod message;
mod reqres;

pub use client::{AbciApp, AbciClient, AbciClientError, GlobalCallback, LocalAbciClient};
pub use message::{CheckTxKind, RequestCheckTx, ResponseCheckTx, ResponseCommit, ResponseDeliverTx};
pub use reqres::ReqRes;
