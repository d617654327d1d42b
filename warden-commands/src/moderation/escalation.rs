//! Warning ledger and automatic escalation.
//!
//! A warning stays active for seven days. The third active warning bans the
//! member; the ledger is cleared only once the ban went through.

use tracing::{error, info, warn};

use warden_core::{GuildGateway, MemberInfo};
use warden_database::ModerationStore;
use warden_database::model::logs::{ModerationAction, NewModerationLog};
use warden_database::model::warnings::{NewWarning, WarningEntry};
use warden_utils::permissions::is_admin_protected;
use warden_utils::time::SECS_PER_DAY;

use crate::moderation::logging::record_action;

pub const WARN_WINDOW_SECS: u64 = 7 * SECS_PER_DAY;
pub const WARN_BAN_THRESHOLD: usize = 3;
pub const AUTO_BAN_REASON: &str = "3 warns in 7 days";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarnOutcome {
    Recorded { active: usize },
    Banned { active: usize },
    /// Threshold reached but the ban was refused or failed; warnings are kept.
    BanRefused { active: usize },
}

/// Warnings created within the window ending at `now`, oldest first.
pub async fn active_warnings(
    store: &dyn ModerationStore,
    user_id: u64,
    now: u64,
) -> anyhow::Result<Vec<WarningEntry>> {
    store
        .warns_after(user_id, now.saturating_sub(WARN_WINDOW_SECS))
        .await
}

/// Append a warning and ban the member once the active count reaches the threshold.
///
/// Callers serialize invocations per target (see `UserLocks`).
pub async fn warn_and_escalate(
    store: &dyn ModerationStore,
    gateway: &dyn GuildGateway,
    target: &MemberInfo,
    moderator_id: u64,
    reason: &str,
    now: u64,
) -> anyhow::Result<WarnOutcome> {
    store
        .add_warn(NewWarning {
            user_id: target.user_id,
            moderator_id,
            reason,
            created_at: now,
        })
        .await?;

    record_action(
        store,
        audit_entry(ModerationAction::Warn, moderator_id, target, reason, true, now),
    )
    .await;

    let active = active_warnings(store, target.user_id, now).await?.len();
    if active < WARN_BAN_THRESHOLD {
        return Ok(WarnOutcome::Recorded { active });
    }

    info!(user_id = target.user_id, active, "warning threshold reached");

    let protected = is_admin_protected(store.get_level(target.user_id).await?);
    if !target.bannable || protected {
        warn!(
            user_id = target.user_id,
            protected, "escalation ban refused, keeping warnings"
        );
        record_action(
            store,
            audit_entry(ModerationAction::AutoBan, moderator_id, target, AUTO_BAN_REASON, false, now),
        )
        .await;
        return Ok(WarnOutcome::BanRefused { active });
    }

    if let Err(source) = gateway.ban_member(target.user_id, AUTO_BAN_REASON).await {
        error!(?source, user_id = target.user_id, "escalation ban failed");
        record_action(
            store,
            audit_entry(ModerationAction::AutoBan, moderator_id, target, AUTO_BAN_REASON, false, now),
        )
        .await;
        return Ok(WarnOutcome::BanRefused { active });
    }

    let cleared = store.clear_warns(target.user_id).await?;
    info!(user_id = target.user_id, cleared, "escalation ban applied");
    record_action(
        store,
        audit_entry(ModerationAction::AutoBan, moderator_id, target, AUTO_BAN_REASON, true, now),
    )
    .await;

    Ok(WarnOutcome::Banned { active })
}

fn audit_entry<'a>(
    action: ModerationAction,
    moderator_id: u64,
    target: &MemberInfo,
    reason: &'a str,
    successful: bool,
    now: u64,
) -> NewModerationLog<'a> {
    NewModerationLog {
        action,
        moderator_id,
        target_user_id: Some(target.user_id),
        reason,
        duration_ms: None,
        successful,
        created_at: now,
    }
}
