use std::error::Error;

use derive_more::Display;

use protocol::types::Height;
use protocol::{ProtocolError, ProtocolErrorKind};

use crate::types::BundleId;

#[derive(Debug, Display)]
pub enum SidecarError {
    #[display(
        fmt = "Bundle targets height {}, auction is at {}",
        actual,
        expected
    )]
    WrongHeight { expected: Height, actual: Height },

    #[display(
        fmt = "Bundle {} declared size {}, first admission set {}",
        bundle_id,
        actual,
        expected
    )]
    BundleSizeConflict {
        bundle_id: BundleId,
        expected: u32,
        actual: u32,
    },

    #[display(fmt = "Bundle {} order {} already filled", bundle_id, order)]
    DuplicateBundleOrder { bundle_id: BundleId, order: u32 },

    #[display(fmt = "Order {} out of range for bundle size {}", order, size)]
    InvalidBundleOrder { order: u32, size: u32 },
}

impl Error for SidecarError {}

impl From<SidecarError> for ProtocolError {
    fn from(error: SidecarError) -> ProtocolError {
        ProtocolError::new(ProtocolErrorKind::Sidecar, Box::new(error))
    }
}
