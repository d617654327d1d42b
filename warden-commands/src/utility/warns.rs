use tracing::warn;

use crate::CommandMeta;
use crate::moderation::escalation::active_warnings;
use crate::router::Invocation;
use crate::texts::{Reply, render};

pub const META: CommandMeta = CommandMeta {
    name: "warns",
    alias: "варны",
    desc: "Get your active warnings in DMs.",
    desc_ru: "посмотреть свои предупреждения (в лс)",
    category: "utility",
    usage: "",
    usage_ru: "",
};

pub async fn warns(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    let entries = active_warnings(inv.store, inv.author_id, inv.now).await?;
    let text = if entries.is_empty() {
        render(inv.lang, Reply::WarnsNone)
    } else {
        render(inv.lang, Reply::WarnsList { entries: &entries })
    };

    if let Err(source) = inv.gateway.send_direct(inv.author_id, &text).await {
        warn!(?source, user_id = inv.author_id, "could not deliver warnings by DM");
        return Ok(inv.say(Reply::DeliveryFailed));
    }

    Ok(inv.say(Reply::WarnsSent))
}
