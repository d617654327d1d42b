use crate::CommandMeta;
use crate::router::Invocation;
use crate::texts::Reply;

pub const META: CommandMeta = CommandMeta {
    name: "hello",
    alias: "привет",
    desc: "Say hello.",
    desc_ru: "поздороваться",
    category: "utility",
    usage: "",
    usage_ru: "",
};

pub async fn hello(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    Ok(inv.say(Reply::Hello {
        name: inv.author_name,
    }))
}
