use tracing::error;

use warden_database::model::logs::ModerationAction;

use crate::CommandMeta;
use crate::moderation::logging::record;
use crate::moderation::resolve_target;
use crate::router::Invocation;
use crate::texts::Reply;

pub const META: CommandMeta = CommandMeta {
    name: "unmute",
    alias: "снятьмут",
    desc: "Lift an active timeout.",
    desc_ru: "снять мут с участника",
    category: "moderation",
    usage: "<@user|id>",
    usage_ru: "<@пользователь|id>",
};

pub async fn unmute(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    let Some(target) = resolve_target(inv).await? else {
        return Ok(inv.say(Reply::MemberNotFound { input: inv.raw_target() }));
    };

    if !target.timed_out {
        return Ok(inv.say(Reply::NotMuted { user: &target.display_name }));
    }

    let reason = inv.reason_from(1);
    if let Err(source) = inv.gateway.set_timeout(target.user_id, None, &reason).await {
        error!(?source, user_id = target.user_id, "untimeout request failed");
        record(inv, ModerationAction::Unmute, target.user_id, &reason, None, false).await;
        return Ok(inv.say(Reply::UnmuteFailed));
    }

    record(inv, ModerationAction::Unmute, target.user_id, &reason, None, true).await;

    Ok(inv.say(Reply::Unmuted { user: &target.display_name }))
}

#[cfg(test)]
mod tests {
    use warden_core::UserLocks;
    use warden_database::MemoryStore;
    use warden_utils::lang::Lang;

    use super::unmute;
    use crate::testing::{FakeGateway, invocation, member};

    #[tokio::test]
    async fn members_without_timeout_are_not_muted() {
        let store = MemoryStore::new();
        let gateway = FakeGateway::new(10, 99).with_member(member(7, "free"));
        let locks = UserLocks::default();

        let reply = unmute(&invocation(&store, &gateway, &locks, Lang::Ru, vec!["7"]))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("пользователь free не замучен"));
        assert!(gateway.timeouts().is_empty());
        assert!(store.logs().await.is_empty());
    }

    #[tokio::test]
    async fn lifts_active_timeouts() {
        let store = MemoryStore::new();
        let mut target = member(7, "quiet");
        target.timed_out = true;
        let gateway = FakeGateway::new(10, 99).with_member(target);
        let locks = UserLocks::default();

        let reply = unmute(&invocation(&store, &gateway, &locks, Lang::En, vec!["7"]))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("user quiet has been unmuted"));
        assert_eq!(gateway.timeouts(), vec![(7, None)]);

        let logs = store.logs().await;
        assert_eq!(logs[0].action, "unmute");
        assert!(logs[0].successful);
    }
}
