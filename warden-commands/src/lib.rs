pub mod access;
pub mod gateway;
pub mod keys;
pub mod maintenance;
pub mod moderation;
pub mod router;
pub mod texts;
pub mod utility;
pub mod verification;

#[cfg(test)]
mod testing;

use warden_core::{Data, Error};

pub use gateway::DiscordGateway;
pub use router::{Command, IncomingMessage, Invocation, Scope, handle_message};

pub struct CommandMeta {
    pub name: &'static str,
    /// Russian synonym, accepted everywhere the English name is.
    pub alias: &'static str,
    pub desc: &'static str,
    pub desc_ru: &'static str,
    pub category: &'static str,
    /// Arguments after the command name, empty when it takes none.
    pub usage: &'static str,
    pub usage_ru: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::hello::META,
    utility::help::META,
    utility::level::META,
    utility::warns::META,
    moderation::ban::META,
    moderation::unban::META,
    moderation::banlist::META,
    moderation::kick::META,
    moderation::mute::META,
    moderation::unmute::META,
    moderation::warn::META,
    moderation::levels::PROMOTE_META,
    moderation::levels::DEMOTE_META,
];

/// Interaction commands. Text commands go through [`router::handle_message`].
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![keys::generatekey(), verification::setupverify()]
}
