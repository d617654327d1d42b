use poise::serenity_prelude as serenity;
use tracing::{debug, error};

use warden_commands::verification::{
    ReactionEvent, VerificationOutcome, on_reaction_added, on_reaction_removed,
};
use warden_core::Data;

use super::configured_gateway;

#[derive(Clone, Copy)]
pub enum ReactionChange {
    Added,
    Removed,
}

/// Apply verification role changes for reactions on the verification message.
pub async fn handle_reaction(
    ctx: &serenity::Context,
    data: &Data,
    reaction: &serenity::Reaction,
    change: ReactionChange,
) {
    let Some(gateway) = configured_gateway(ctx, data, reaction.guild_id) else {
        return;
    };
    let Some(user_id) = reaction.user_id else {
        return;
    };

    let event = ReactionEvent {
        user_id: user_id.get(),
        user_is_bot: user_id == ctx.cache.current_user().id
            || reaction.member.as_ref().is_some_and(|member| member.user.bot),
        channel_id: reaction.channel_id.get(),
        message_id: reaction.message_id.get(),
        emoji: match &reaction.emoji {
            serenity::ReactionType::Unicode(emoji) => Some(emoji.clone()),
            _ => None,
        },
    };

    let store = data.store.as_ref();
    let lang = data.config.default_lang;
    let outcome = match change {
        ReactionChange::Added => on_reaction_added(store, &gateway, lang, &event).await,
        ReactionChange::Removed => on_reaction_removed(store, &gateway, lang, &event).await,
    };

    match outcome {
        Ok(VerificationOutcome::Ignored) => {}
        Ok(outcome) => debug!(?outcome, user_id = event.user_id, "verification reaction handled"),
        Err(source) => error!(?source, user_id = event.user_id, "verification reaction failed"),
    }
}
