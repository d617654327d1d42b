use poise::serenity_prelude as serenity;
use tracing::error;

use warden_commands::{DiscordGateway, IncomingMessage, handle_message};
use warden_core::Data;
use warden_utils::time::now_unix_secs;

/// Run text commands and post the reply in the same channel.
pub async fn handle_message_command(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) {
    if message.author.bot || message.webhook_id.is_some() {
        return;
    }

    // Direct messages and foreign guilds still need a gateway to reach the
    // configured guild's owner; the router answers them without touching it.
    let gateway = DiscordGateway::new(
        ctx.http.clone(),
        serenity::GuildId::new(data.config.guild_id),
        ctx.cache.current_user().id,
    );

    let mentions: Vec<u64> = message.mentions.iter().map(|user| user.id.get()).collect();
    let incoming = IncomingMessage {
        guild_id: message.guild_id.map(|id| id.get()),
        channel_id: message.channel_id.get(),
        author_id: message.author.id.get(),
        author_name: message.author.display_name(),
        author_is_bot: message.author.bot,
        content: &message.content,
        mentions: &mentions,
    };

    let reply = match handle_message(data, &gateway, &incoming, now_unix_secs()).await {
        Ok(Some(reply)) => reply,
        Ok(None) => return,
        Err(source) => {
            error!(
                ?source,
                channel_id = incoming.channel_id,
                author_id = incoming.author_id,
                "text command failed"
            );
            return;
        }
    };

    if let Err(source) = message.reply(&ctx.http, reply).await {
        error!(?source, channel_id = incoming.channel_id, "failed to post command reply");
    }
}
