use crate::CommandMeta;
use crate::moderation::escalation::{WarnOutcome, warn_and_escalate};
use crate::moderation::resolve_target;
use crate::router::Invocation;
use crate::texts::Reply;

pub const META: CommandMeta = CommandMeta {
    name: "warn",
    alias: "варн",
    desc: "Warn a member. Three warnings within 7 days mean a ban.",
    desc_ru: "выдать предупреждение. 3 предупреждения за 7 дней = бан",
    category: "moderation",
    usage: "<@user|id> [reason]",
    usage_ru: "<@пользователь|id> [причина]",
};

pub async fn warn(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    let Some(target) = resolve_target(inv).await? else {
        return Ok(inv.say(Reply::MemberNotFound { input: inv.raw_target() }));
    };

    let reason = inv.reason_from(1);

    let _guard = inv.locks.lock(target.user_id).await;
    let outcome = warn_and_escalate(
        inv.store,
        inv.gateway,
        &target,
        inv.author_id,
        &reason,
        inv.now,
    )
    .await?;

    let user = target.display_name.as_str();
    Ok(match outcome {
        WarnOutcome::Recorded { active } => inv.say(Reply::Warned {
            user,
            count: active,
            reason: &reason,
        }),
        WarnOutcome::Banned { .. } => inv.say(Reply::AutoBanned { user }),
        WarnOutcome::BanRefused { active } => inv.say(Reply::AutoBanRefused {
            user,
            count: active,
        }),
    })
}
