use poise::serenity_prelude as serenity;

use crate::lang::Lang;

pub const NOTICE_COLOR: u32 = 0x2E_86_C1;
pub const FAILURE_COLOR: u32 = 0xC0_39_2B;

pub fn notice_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(NOTICE_COLOR)
        .description(description)
}

/// Shown when an interaction command fails unexpectedly.
pub fn command_failure_embed(lang: Lang) -> serenity::CreateEmbed {
    let (title, description) = command_failure_text(lang);
    notice_embed(title, description).color(FAILURE_COLOR)
}

fn command_failure_text(lang: Lang) -> (&'static str, &'static str) {
    match lang {
        Lang::Ru => ("ошибка команды", "при выполнении команды что-то пошло не так"),
        Lang::En => (
            "command error",
            "something went wrong while running this command",
        ),
    }
}
