use tracing::error;

use warden_database::ModerationStore;
use warden_database::model::logs::{ModerationAction, NewModerationLog};

use crate::router::Invocation;

/// Write an audit row. A failed write is logged and never fails the command.
pub(crate) async fn record_action(store: &dyn ModerationStore, entry: NewModerationLog<'_>) {
    if let Err(source) = store.insert_log(entry).await {
        error!(?source, action = entry.action.as_str(), "failed to write moderation log");
    }
}

/// Audit an action taken by the invoking moderator.
pub(crate) async fn record(
    inv: &Invocation<'_>,
    action: ModerationAction,
    target_user_id: u64,
    reason: &str,
    duration_ms: Option<u64>,
    successful: bool,
) {
    record_action(
        inv.store,
        NewModerationLog {
            action,
            moderator_id: inv.author_id,
            target_user_id: Some(target_user_id),
            reason,
            duration_ms,
            successful,
            created_at: inv.now,
        },
    )
    .await;
}
