pub mod members;
pub mod messages;
pub mod reactions;

use poise::serenity_prelude as serenity;

use warden_commands::DiscordGateway;
use warden_core::Data;

/// Gateway for events from the configured guild, `None` for any other guild.
fn configured_gateway(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: Option<serenity::GuildId>,
) -> Option<DiscordGateway> {
    let guild_id = guild_id?;
    if guild_id.get() != data.config.guild_id {
        return None;
    }

    Some(DiscordGateway::new(
        ctx.http.clone(),
        guild_id,
        ctx.cache.current_user().id,
    ))
}
