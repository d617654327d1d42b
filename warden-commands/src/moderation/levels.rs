use warden_database::model::levels::UserPermission;
use warden_database::model::logs::ModerationAction;
use warden_utils::permissions::{LevelChange, demote_level, promote_level};

use crate::CommandMeta;
use crate::moderation::logging::record;
use crate::moderation::resolve_target;
use crate::router::Invocation;
use crate::texts::Reply;

pub const PROMOTE_META: CommandMeta = CommandMeta {
    name: "promote",
    alias: "повысить",
    desc: "Raise a member's level by one.",
    desc_ru: "повысить уровень участника на 1",
    category: "moderation",
    usage: "<@user|id>",
    usage_ru: "<@пользователь|id>",
};

pub const DEMOTE_META: CommandMeta = CommandMeta {
    name: "demote",
    alias: "понизить",
    desc: "Lower a member's level by one.",
    desc_ru: "понизить уровень участника на 1",
    category: "moderation",
    usage: "<@user|id>",
    usage_ru: "<@пользователь|id>",
};

pub async fn promote(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    change_level(inv, ModerationAction::Promote, promote_level).await
}

pub async fn demote(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    change_level(inv, ModerationAction::Demote, demote_level).await
}

async fn change_level(
    inv: &Invocation<'_>,
    action: ModerationAction,
    step: fn(u8) -> LevelChange,
) -> anyhow::Result<Option<String>> {
    let Some(target) = resolve_target(inv).await? else {
        return Ok(inv.say(Reply::MemberNotFound { input: inv.raw_target() }));
    };

    let user = target.display_name.as_str();
    let current = inv.store.get_level(target.user_id).await?;

    let (from, to) = match step(current) {
        LevelChange::AtMaximum => return Ok(inv.say(Reply::AlreadyMax { user })),
        LevelChange::AtMinimum => return Ok(inv.say(Reply::AlreadyMin { user })),
        LevelChange::Changed { from, to } => (from, to),
    };

    inv.store
        .set_level(
            UserPermission {
                user_id: target.user_id,
                level: to,
            },
            inv.now,
        )
        .await?;

    let reason = format!("level {} -> {}", from, to);
    record(inv, action, target.user_id, &reason, None, true).await;

    Ok(match action {
        ModerationAction::Demote => inv.say(Reply::Demoted { user, level: to }),
        _ => inv.say(Reply::Promoted { user, level: to }),
    })
}
