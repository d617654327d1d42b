use crate::CommandMeta;
use crate::router::Invocation;
use crate::texts::Reply;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    alias: "пинг",
    desc: "Check that the bot is alive.",
    desc_ru: "проверить, что бот работает",
    category: "utility",
    usage: "",
    usage_ru: "",
};

pub async fn ping(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    Ok(inv.say(Reply::Pong))
}
