//! Startup and periodic housekeeping.

use tracing::info;

use warden_core::GuildGateway;
use warden_database::ModerationStore;
use warden_database::model::levels::UserPermission;
use warden_utils::permissions::MAX_LEVEL;

use crate::moderation::escalation::WARN_WINDOW_SECS;

/// Grant the guild owner the top level. Returns the owner id.
pub async fn bootstrap_owner(
    store: &dyn ModerationStore,
    gateway: &dyn GuildGateway,
    now: u64,
) -> anyhow::Result<u64> {
    let owner_id = gateway.owner_id().await?;
    if store.get_level(owner_id).await? < MAX_LEVEL {
        store
            .set_level(
                UserPermission {
                    user_id: owner_id,
                    level: MAX_LEVEL,
                },
                now,
            )
            .await?;
        info!(owner_id, "guild owner granted level {}", MAX_LEVEL);
    }

    Ok(owner_id)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub warnings_removed: u64,
    pub keys_expired: u64,
}

/// Drop warnings that fell out of the escalation window and flag expired keys.
pub async fn purge_expired(store: &dyn ModerationStore, now: u64) -> anyhow::Result<PurgeReport> {
    let warnings_removed = store
        .purge_warns_before(now.saturating_sub(WARN_WINDOW_SECS))
        .await?;
    let keys_expired = store.expire_keys(now).await?;

    Ok(PurgeReport {
        warnings_removed,
        keys_expired,
    })
}
