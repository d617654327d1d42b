use tracing::error;

use warden_database::model::logs::ModerationAction;

use crate::CommandMeta;
use crate::moderation::logging::record;
use crate::moderation::{is_protected, resolve_target};
use crate::router::Invocation;
use crate::texts::Reply;

pub const META: CommandMeta = CommandMeta {
    name: "ban",
    alias: "бан",
    desc: "Ban a member from the server.",
    desc_ru: "забанить участника",
    category: "moderation",
    usage: "<@user|id> [reason]",
    usage_ru: "<@пользователь|id> [причина]",
};

pub async fn ban(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    let Some(target) = resolve_target(inv).await? else {
        return Ok(inv.say(Reply::MemberNotFound { input: inv.raw_target() }));
    };

    let reason = inv.reason_from(1);

    if !target.bannable || is_protected(inv, &target).await? {
        record(inv, ModerationAction::Ban, target.user_id, &reason, None, false).await;
        return Ok(inv.say(Reply::CannotBan));
    }

    if let Err(source) = inv.gateway.ban_member(target.user_id, &reason).await {
        error!(?source, user_id = target.user_id, "ban request failed");
        record(inv, ModerationAction::Ban, target.user_id, &reason, None, false).await;
        return Ok(inv.say(Reply::BanFailed));
    }

    record(inv, ModerationAction::Ban, target.user_id, &reason, None, true).await;

    Ok(inv.say(Reply::Banned {
        user: &target.display_name,
        reason: &reason,
    }))
}

#[cfg(test)]
mod tests {
    use warden_core::UserLocks;
    use warden_database::model::levels::UserPermission;
    use warden_database::{MemoryStore, ModerationStore};
    use warden_utils::lang::Lang;

    use super::ban;
    use crate::testing::{FakeGateway, invocation, member};

    #[tokio::test]
    async fn bans_with_default_reason_and_audits() {
        let store = MemoryStore::new();
        let gateway = FakeGateway::new(10, 99).with_member(member(7, "нарушитель"));
        let locks = UserLocks::default();

        let reply = ban(&invocation(&store, &gateway, &locks, Lang::Ru, vec!["7"]))
            .await
            .unwrap();
        assert_eq!(
            reply.as_deref(),
            Some("пользователь нарушитель был забанен. причина: без причины")
        );
        assert_eq!(gateway.bans(), vec![7]);

        let logs = store.logs().await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, "ban");
        assert!(logs[0].successful);
        assert_eq!(logs[0].target_user_id, Some(7));
    }

    #[tokio::test]
    async fn admin_protected_targets_are_refused() {
        let store = MemoryStore::new();
        store
            .set_level(UserPermission { user_id: 7, level: 3 }, 0)
            .await
            .unwrap();
        let gateway = FakeGateway::new(10, 99).with_member(member(7, "admin"));
        let locks = UserLocks::default();

        let reply = ban(&invocation(&store, &gateway, &locks, Lang::Ru, vec!["7", "spam"]))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("невозможно забанить этого пользователя"));
        assert!(gateway.bans().is_empty());

        let logs = store.logs().await;
        assert_eq!(logs.len(), 1);
        assert!(!logs[0].successful);
        assert_eq!(logs[0].reason, "spam");
    }

    #[tokio::test]
    async fn platform_failure_is_reported_and_audited() {
        let store = MemoryStore::new();
        let mut gateway = FakeGateway::new(10, 99).with_member(member(7, "target"));
        gateway.fail_bans = true;
        let locks = UserLocks::default();

        let reply = ban(&invocation(&store, &gateway, &locks, Lang::Ru, vec!["7"]))
            .await
            .unwrap();
        assert_eq!(
            reply.as_deref(),
            Some("не удалось забанить пользователя. проверьте права бота.")
        );
        assert!(!store.logs().await[0].successful);
    }
}
