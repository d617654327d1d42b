use crate::CommandMeta;
use crate::router::Invocation;
use crate::texts::Reply;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    alias: "команды",
    desc: "Show this list.",
    desc_ru: "показать этот список",
    category: "utility",
    usage: "",
    usage_ru: "",
};

pub async fn help(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    Ok(inv.say(Reply::Help))
}
