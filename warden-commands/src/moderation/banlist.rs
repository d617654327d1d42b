use crate::CommandMeta;
use crate::router::Invocation;
use crate::texts::Reply;

pub const META: CommandMeta = CommandMeta {
    name: "banlist",
    alias: "банлист",
    desc: "List banned users.",
    desc_ru: "список забаненных",
    category: "moderation",
    usage: "",
    usage_ru: "",
};

pub async fn banlist(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    let bans = inv.gateway.fetch_bans().await?;
    if bans.is_empty() {
        return Ok(inv.say(Reply::BanListEmpty));
    }

    Ok(inv.say(Reply::BanList { entries: &bans }))
}
