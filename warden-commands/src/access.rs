//! Shared plumbing for interaction (slash) commands.

use warden_core::{Context, Error, GuildGateway};
use warden_utils::lang::Lang;
use warden_utils::permissions::can_use;

use crate::gateway::DiscordGateway;
use crate::texts::{Reply, render};

/// Interaction locale when it maps to a supported language, else the configured default.
pub fn interaction_lang(ctx: Context<'_>) -> Lang {
    ctx.locale()
        .and_then(|locale| locale.split('-').next())
        .and_then(Lang::from_code)
        .unwrap_or(ctx.data().config.default_lang)
}

pub async fn reply_ephemeral(ctx: Context<'_>, text: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(text)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Gateway for the configured guild, or `None` (after replying) when invoked elsewhere.
pub async fn guild_gateway(ctx: Context<'_>, lang: Lang) -> Result<Option<DiscordGateway>, Error> {
    let guild_id = ctx.data().config.guild_id;
    if ctx.guild_id().map(|id| id.get()) != Some(guild_id) {
        reply_ephemeral(ctx, render(lang, Reply::OfficialChannelsOnly)).await?;
        return Ok(None);
    }

    Ok(Some(DiscordGateway::from_context(ctx.serenity_context(), guild_id)?))
}

/// Level check with the guild owner override. Replies with the refusal itself.
pub async fn authorize(
    ctx: Context<'_>,
    gateway: &dyn GuildGateway,
    lang: Lang,
    required: u8,
) -> Result<bool, Error> {
    let author_id = ctx.author().id.get();
    let level = ctx.data().store.get_level(author_id).await?;
    let is_owner = level < required && gateway.owner_id().await? == author_id;

    if !can_use(level, required, is_owner) {
        reply_ephemeral(ctx, render(lang, Reply::NoPermission)).await?;
        return Ok(false);
    }

    Ok(true)
}
