use poise::serenity_prelude as serenity;
use tracing::{error, info};

use warden_commands::verification::on_member_joined;
use warden_core::Data;

use super::configured_gateway;

pub async fn handle_member_join(ctx: &serenity::Context, data: &Data, member: &serenity::Member) {
    let Some(gateway) = configured_gateway(ctx, data, Some(member.guild_id)) else {
        return;
    };

    info!(user_id = %member.user.id, "member joined");
    if let Err(source) = on_member_joined(
        &gateway,
        &data.config,
        data.config.default_lang,
        member.user.id.get(),
        member.user.bot,
    )
    .await
    {
        error!(?source, user_id = %member.user.id, "failed to onboard new member");
    }
}

pub fn handle_member_leave(data: &Data, guild_id: serenity::GuildId, user: &serenity::User) {
    if guild_id.get() == data.config.guild_id {
        info!(user_id = %user.id, name = %user.name, "member left");
    }
}
