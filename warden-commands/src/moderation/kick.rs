use tracing::error;

use warden_database::model::logs::ModerationAction;

use crate::CommandMeta;
use crate::moderation::logging::record;
use crate::moderation::{is_protected, resolve_target};
use crate::router::Invocation;
use crate::texts::Reply;

pub const META: CommandMeta = CommandMeta {
    name: "kick",
    alias: "кик",
    desc: "Kick a member from the server.",
    desc_ru: "кикнуть участника",
    category: "moderation",
    usage: "<@user|id> [reason]",
    usage_ru: "<@пользователь|id> [причина]",
};

pub async fn kick(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    let Some(target) = resolve_target(inv).await? else {
        return Ok(inv.say(Reply::MemberNotFound { input: inv.raw_target() }));
    };

    let reason = inv.reason_from(1);

    if !target.kickable || is_protected(inv, &target).await? {
        record(inv, ModerationAction::Kick, target.user_id, &reason, None, false).await;
        return Ok(inv.say(Reply::CannotKick));
    }

    if let Err(source) = inv.gateway.kick_member(target.user_id, &reason).await {
        error!(?source, user_id = target.user_id, "kick request failed");
        record(inv, ModerationAction::Kick, target.user_id, &reason, None, false).await;
        return Ok(inv.say(Reply::KickFailed));
    }

    record(inv, ModerationAction::Kick, target.user_id, &reason, None, true).await;

    Ok(inv.say(Reply::Kicked {
        user: &target.display_name,
        reason: &reason,
    }))
}
