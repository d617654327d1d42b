//! Text command dispatch.
//!
//! Every guild message passes through [`handle_message`], which filters by
//! origin, resolves the command and its channel scope, authorizes the author
//! and hands an [`Invocation`] to the matching handler. Handlers return the
//! reply text; the caller owns delivery.

use tracing::debug;

use warden_core::{BotConfig, Data, GuildGateway, TargetRef, UserLocks};
use warden_database::ModerationStore;
use warden_utils::COMMAND_PREFIX;
use warden_utils::lang::Lang;
use warden_utils::permissions::{LEVEL_ADMIN, LEVEL_MODERATOR, LEVEL_OPEN, LEVEL_SENIOR, can_use};

use crate::texts::{Reply, render};
use crate::{CommandMeta, moderation, utility};

/// A chat message reduced to what the router needs.
#[derive(Clone, Copy, Debug)]
pub struct IncomingMessage<'a> {
    /// `None` for direct messages.
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub author_id: u64,
    pub author_name: &'a str,
    pub author_is_bot: bool,
    pub content: &'a str,
    /// Users mentioned in the message, in order.
    pub mentions: &'a [u64],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Any configured channel.
    Open,
    HelpOnly,
    ModerationOnly,
}

impl Scope {
    pub fn allows(self, config: &BotConfig, channel_id: u64) -> bool {
        match self {
            Self::Open => config.is_open_channel(channel_id),
            Self::HelpOnly => config.is_help_channel(channel_id),
            Self::ModerationOnly => config.is_moderation_channel(channel_id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Ping,
    Hello,
    Help,
    Level,
    Warns,
    Ban,
    Unban,
    BanList,
    Kick,
    Mute,
    Unmute,
    Warn,
    Promote,
    Demote,
}

impl Command {
    pub const ALL: [Self; 14] = [
        Self::Ping,
        Self::Hello,
        Self::Help,
        Self::Level,
        Self::Warns,
        Self::Ban,
        Self::Unban,
        Self::BanList,
        Self::Kick,
        Self::Mute,
        Self::Unmute,
        Self::Warn,
        Self::Promote,
        Self::Demote,
    ];

    /// Resolve the first token of a message, prefix included.
    pub fn parse(token: &str) -> Option<Self> {
        let name = token.strip_prefix(COMMAND_PREFIX)?.to_lowercase();
        if name.is_empty() {
            return None;
        }

        Self::ALL.into_iter().find(|command| {
            let meta = command.meta();
            meta.name == name || meta.alias == name
        })
    }

    pub fn meta(self) -> &'static CommandMeta {
        match self {
            Self::Ping => &utility::ping::META,
            Self::Hello => &utility::hello::META,
            Self::Help => &utility::help::META,
            Self::Level => &utility::level::META,
            Self::Warns => &utility::warns::META,
            Self::Ban => &moderation::ban::META,
            Self::Unban => &moderation::unban::META,
            Self::BanList => &moderation::banlist::META,
            Self::Kick => &moderation::kick::META,
            Self::Mute => &moderation::mute::META,
            Self::Unmute => &moderation::unmute::META,
            Self::Warn => &moderation::warn::META,
            Self::Promote => &moderation::levels::PROMOTE_META,
            Self::Demote => &moderation::levels::DEMOTE_META,
        }
    }

    pub fn scope(self) -> Scope {
        match self {
            Self::Help => Scope::HelpOnly,
            Self::Ban
            | Self::Unban
            | Self::BanList
            | Self::Kick
            | Self::Mute
            | Self::Unmute
            | Self::Warn
            | Self::Promote
            | Self::Demote => Scope::ModerationOnly,
            Self::Ping | Self::Hello | Self::Level | Self::Warns => Scope::Open,
        }
    }

    pub fn required_level(self) -> u8 {
        match self {
            Self::Ping | Self::Hello | Self::Help | Self::Level | Self::Warns => LEVEL_OPEN,
            Self::Kick | Self::Mute | Self::Unmute | Self::Warn => LEVEL_MODERATOR,
            Self::Ban | Self::Unban | Self::BanList => LEVEL_SENIOR,
            Self::Promote | Self::Demote => LEVEL_ADMIN,
        }
    }
}

/// Everything a text command handler may touch.
pub struct Invocation<'a> {
    pub store: &'a dyn ModerationStore,
    pub gateway: &'a dyn GuildGateway,
    pub locks: &'a UserLocks,
    pub lang: Lang,
    pub author_id: u64,
    pub author_name: &'a str,
    pub author_level: u8,
    pub mentions: &'a [u64],
    /// Whitespace separated tokens after the command name.
    pub args: Vec<&'a str>,
    /// Unix seconds at dispatch.
    pub now: u64,
}

impl Invocation<'_> {
    pub fn say(&self, reply: Reply<'_>) -> Option<String> {
        Some(render(self.lang, reply))
    }

    pub fn target(&self) -> Option<TargetRef> {
        TargetRef::from_command(self.mentions, self.args.as_slice())
    }

    /// Raw first argument, echoed back when resolution fails.
    pub fn raw_target(&self) -> &str {
        self.args.first().copied().unwrap_or_default()
    }

    /// Arguments from `start` joined back together, or the default reason.
    pub fn reason_from(&self, start: usize) -> String {
        let reason = self.args.get(start..).unwrap_or_default().join(" ");
        if reason.trim().is_empty() {
            render(self.lang, Reply::DefaultReason)
        } else {
            reason
        }
    }
}

/// Route one chat message. Returns the reply to post in the same channel.
pub async fn handle_message(
    data: &Data,
    gateway: &dyn GuildGateway,
    message: &IncomingMessage<'_>,
    now: u64,
) -> anyhow::Result<Option<String>> {
    if message.author_is_bot {
        return Ok(None);
    }

    let content = message.content.trim();
    let lang = Lang::detect(content);

    match message.guild_id {
        None => return Ok(Some(render(lang, Reply::OfficialChannelsOnly))),
        Some(guild_id) if guild_id != data.config.guild_id => {
            return Ok(content
                .starts_with(COMMAND_PREFIX)
                .then(|| render(lang, Reply::OfficialChannelsOnly)));
        }
        Some(_) => {}
    }

    let mut tokens = content.split_whitespace();
    let Some(command) = tokens.next().and_then(Command::parse) else {
        return Ok(None);
    };

    if !command.scope().allows(&data.config, message.channel_id) {
        debug!(
            command = command.meta().name,
            channel_id = message.channel_id,
            "command used outside its channel scope"
        );
        return Ok(None);
    }

    let author_level = data.store.get_level(message.author_id).await?;
    let required = command.required_level();
    let is_owner = author_level < required && gateway.owner_id().await? == message.author_id;
    if !can_use(author_level, required, is_owner) {
        return Ok(Some(render(lang, Reply::NoPermission)));
    }

    let invocation = Invocation {
        store: data.store.as_ref(),
        gateway,
        locks: &data.user_locks,
        lang,
        author_id: message.author_id,
        author_name: message.author_name,
        author_level,
        mentions: message.mentions,
        args: tokens.collect(),
        now,
    };

    match command {
        Command::Ping => utility::ping::ping(&invocation).await,
        Command::Hello => utility::hello::hello(&invocation).await,
        Command::Help => utility::help::help(&invocation).await,
        Command::Level => utility::level::level(&invocation).await,
        Command::Warns => utility::warns::warns(&invocation).await,
        Command::Ban => moderation::ban::ban(&invocation).await,
        Command::Unban => moderation::unban::unban(&invocation).await,
        Command::BanList => moderation::banlist::banlist(&invocation).await,
        Command::Kick => moderation::kick::kick(&invocation).await,
        Command::Mute => moderation::mute::mute(&invocation).await,
        Command::Unmute => moderation::unmute::unmute(&invocation).await,
        Command::Warn => moderation::warn::warn(&invocation).await,
        Command::Promote => moderation::levels::promote(&invocation).await,
        Command::Demote => moderation::levels::demote(&invocation).await,
    }
}
