use tracing::error;

use warden_database::model::logs::ModerationAction;

use crate::CommandMeta;
use crate::moderation::logging::record;
use crate::router::Invocation;
use crate::texts::Reply;

pub const META: CommandMeta = CommandMeta {
    name: "unban",
    alias: "разбан",
    desc: "Lift a ban by user id.",
    desc_ru: "разбанить пользователя по id",
    category: "moderation",
    usage: "<id>",
    usage_ru: "<id>",
};

pub async fn unban(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    let Some(raw) = inv.args.first() else {
        return Ok(inv.say(Reply::MissingUnbanId));
    };

    let id: String = raw
        .chars()
        .filter(|c| !matches!(c, '<' | '@' | '!' | '>'))
        .collect();

    let bans = inv.gateway.fetch_bans().await?;
    let Some(entry) = id
        .parse::<u64>()
        .ok()
        .and_then(|user_id| bans.iter().find(|ban| ban.user_id == user_id))
    else {
        return Ok(inv.say(Reply::NotInBanList { id: &id }));
    };

    let reason = inv.reason_from(1);
    if let Err(source) = inv.gateway.unban_member(entry.user_id).await {
        error!(?source, user_id = entry.user_id, "unban request failed");
        record(inv, ModerationAction::Unban, entry.user_id, &reason, None, false).await;
        return Ok(inv.say(Reply::UnbanFailed));
    }

    record(inv, ModerationAction::Unban, entry.user_id, &reason, None, true).await;

    Ok(inv.say(Reply::Unbanned { user: &entry.display_name }))
}

#[cfg(test)]
mod tests {
    use warden_core::UserLocks;
    use warden_database::MemoryStore;
    use warden_utils::lang::Lang;

    use super::unban;
    use crate::testing::{FakeGateway, invocation};

    #[tokio::test]
    async fn lifts_listed_bans() {
        let store = MemoryStore::new();
        let gateway = FakeGateway::new(10, 99).with_ban(7, "sinner");
        let locks = UserLocks::default();

        let reply = unban(&invocation(&store, &gateway, &locks, Lang::Ru, vec!["7"]))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("пользователь sinner был разбанен"));
        assert!(gateway.bans().is_empty());
        assert_eq!(store.logs().await[0].action, "unban");
    }

    #[tokio::test]
    async fn missing_and_unknown_ids() {
        let store = MemoryStore::new();
        let gateway = FakeGateway::new(10, 99).with_ban(7, "sinner");
        let locks = UserLocks::default();

        let reply = unban(&invocation(&store, &gateway, &locks, Lang::En, vec![]))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("specify the id to unban"));

        let reply = unban(&invocation(&store, &gateway, &locks, Lang::En, vec!["8"]))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("user with id 8 is not in the ban list"));
        assert_eq!(gateway.bans(), vec![7]);
        assert!(store.logs().await.is_empty());
    }
}
