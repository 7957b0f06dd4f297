use serde::{Deserialize, Serialize};

use protocol::types::Height;

/// The sidecar's only cross-cutting knob (spec §6 names none of its own
/// beyond what `AddTx` inputs already constrain): the auction height it
/// accepts admissions for before any block has been committed through it.
/// Height 0 is never a legal auction height (spec §4.4 rule 1 explicitly
/// rejects it), so genesis deployments should start this at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SidecarConfig {
    pub initial_height_for_firing_auction: Height,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        SidecarConfig {
            initial_height_for_firing_auction: 1,
        }
    }
}
