pub mod ban;
pub mod banlist;
pub mod escalation;
pub mod kick;
pub mod levels;
pub mod mute;
pub mod unban;
pub mod unmute;
pub mod warn;

mod logging;

use warden_core::MemberInfo;
use warden_utils::permissions::is_admin_protected;

use crate::router::Invocation;

/// Resolve the command target: explicit mention first, then the raw first argument.
pub(crate) async fn resolve_target(inv: &Invocation<'_>) -> anyhow::Result<Option<MemberInfo>> {
    let Some(target) = inv.target() else {
        return Ok(None);
    };
    inv.gateway.resolve_member(&target).await
}

/// Level 3 members are immune to disciplinary actions.
pub(crate) async fn is_protected(inv: &Invocation<'_>, target: &MemberInfo) -> anyhow::Result<bool> {
    Ok(is_admin_protected(inv.store.get_level(target.user_id).await?))
}
