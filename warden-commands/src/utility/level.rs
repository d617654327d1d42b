use tracing::warn;

use crate::CommandMeta;
use crate::router::Invocation;
use crate::texts::{Reply, render};

pub const META: CommandMeta = CommandMeta {
    name: "level",
    alias: "уровень",
    desc: "Get your permission level in DMs.",
    desc_ru: "узнать свой уровень (в лс)",
    category: "utility",
    usage: "",
    usage_ru: "",
};

pub async fn level(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    let text = render(inv.lang, Reply::YourLevel { level: inv.author_level });

    if let Err(source) = inv.gateway.send_direct(inv.author_id, &text).await {
        warn!(?source, user_id = inv.author_id, "could not deliver level by DM");
        return Ok(inv.say(Reply::DeliveryFailed));
    }

    Ok(inv.say(Reply::LevelSent))
}

#[cfg(test)]
mod tests {
    use warden_core::UserLocks;
    use warden_database::MemoryStore;
    use warden_utils::lang::Lang;

    use super::level;
    use crate::testing::{FakeGateway, MODERATOR, invocation};

    #[tokio::test]
    async fn sends_the_level_privately() {
        let store = MemoryStore::new();
        let gateway = FakeGateway::new(10, 99);
        let locks = UserLocks::default();

        let mut inv = invocation(&store, &gateway, &locks, Lang::Ru, vec![]);
        inv.author_level = 2;
        let reply = level(&inv).await.unwrap();

        assert_eq!(reply.as_deref(), Some("уровень отправлен в лс"));
        assert_eq!(
            gateway.direct(),
            vec![(MODERATOR, "ваш текущий уровень 2".to_owned())]
        );
    }

    #[tokio::test]
    async fn closed_dms_are_reported() {
        let store = MemoryStore::new();
        let mut gateway = FakeGateway::new(10, 99);
        gateway.closed_direct = true;
        let locks = UserLocks::default();

        let reply = level(&invocation(&store, &gateway, &locks, Lang::En, vec![]))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("i couldn't send you a direct message"));
    }
}
