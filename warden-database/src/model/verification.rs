use serde::{Deserialize, Serialize};

/// The message whose reactions drive verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMessage {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
}
