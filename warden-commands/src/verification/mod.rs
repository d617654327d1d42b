//! Reaction-based member verification.
//!
//! New members receive the `Unverified` role. Reacting with ✅ on the
//! designated message swaps it for `Verified`; removing the reaction swaps
//! it back.

mod setup;

pub use setup::{setup_verification, setupverify};

use tracing::{info, warn};

use warden_core::{BotConfig, GuildGateway, RoleSpec};
use warden_database::ModerationStore;
use warden_utils::lang::Lang;

use crate::texts::{Reply, render};

pub const VERIFY_EMOJI: &str = "✅";

pub const UNVERIFIED_ROLE: RoleSpec = RoleSpec {
    name: "Unverified",
    colour: 0x95_A5_A6,
    below_bot: false,
};

pub const VERIFIED_ROLE: RoleSpec = RoleSpec {
    name: "Verified",
    colour: 0x2E_CC_71,
    below_bot: true,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReactionEvent {
    pub user_id: u64,
    pub user_is_bot: bool,
    pub channel_id: u64,
    pub message_id: u64,
    /// Unicode emoji, `None` for custom guild emoji.
    pub emoji: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Not a verification reaction.
    Ignored,
    Verified,
    Unverified,
    /// The bot cannot grant the verified role; nothing changed.
    Aborted,
}

/// Whether the reaction targets the designated verification message.
async fn is_verification_reaction(
    store: &dyn ModerationStore,
    gateway: &dyn GuildGateway,
    event: &ReactionEvent,
) -> anyhow::Result<bool> {
    if event.user_is_bot || event.emoji.as_deref() != Some(VERIFY_EMOJI) {
        return Ok(false);
    }

    let Some(message) = store.verification_message(gateway.guild_id()).await? else {
        return Ok(false);
    };

    Ok(message.channel_id == event.channel_id && message.message_id == event.message_id)
}

pub async fn on_reaction_added(
    store: &dyn ModerationStore,
    gateway: &dyn GuildGateway,
    lang: Lang,
    event: &ReactionEvent,
) -> anyhow::Result<VerificationOutcome> {
    if !is_verification_reaction(store, gateway, event).await? {
        return Ok(VerificationOutcome::Ignored);
    }

    let verified = gateway.ensure_role(VERIFIED_ROLE).await?;
    if !gateway.can_grant_role(verified).await? {
        warn!(
            user_id = event.user_id,
            role_id = verified,
            "verified role sits above the bot's highest role"
        );
        notify(gateway, event.user_id, lang, Reply::VerificationAdminError).await;
        return Ok(VerificationOutcome::Aborted);
    }

    let unverified = gateway.ensure_role(UNVERIFIED_ROLE).await?;
    if let Err(source) = gateway.remove_role(event.user_id, unverified).await {
        warn!(?source, user_id = event.user_id, "failed to remove unverified role");
    }

    gateway.add_role(event.user_id, verified).await?;
    info!(user_id = event.user_id, "member verified");
    notify(gateway, event.user_id, lang, Reply::VerifiedNotice).await;

    Ok(VerificationOutcome::Verified)
}

pub async fn on_reaction_removed(
    store: &dyn ModerationStore,
    gateway: &dyn GuildGateway,
    lang: Lang,
    event: &ReactionEvent,
) -> anyhow::Result<VerificationOutcome> {
    if !is_verification_reaction(store, gateway, event).await? {
        return Ok(VerificationOutcome::Ignored);
    }

    let verified = gateway.ensure_role(VERIFIED_ROLE).await?;
    let unverified = gateway.ensure_role(UNVERIFIED_ROLE).await?;

    gateway.remove_role(event.user_id, verified).await?;
    gateway.add_role(event.user_id, unverified).await?;
    info!(user_id = event.user_id, "member unverified");
    notify(gateway, event.user_id, lang, Reply::UnverifiedNotice).await;

    Ok(VerificationOutcome::Unverified)
}

/// Mark a new member unverified and greet them in the welcome channel.
pub async fn on_member_joined(
    gateway: &dyn GuildGateway,
    config: &BotConfig,
    lang: Lang,
    user_id: u64,
    is_bot: bool,
) -> anyhow::Result<()> {
    if is_bot {
        return Ok(());
    }

    let unverified = gateway.ensure_role(UNVERIFIED_ROLE).await?;
    gateway.add_role(user_id, unverified).await?;

    if let Some(channel_id) = config.welcome_channel {
        let text = render(
            lang,
            Reply::Welcome {
                user_id,
                verification_channel: config.verification_channel,
            },
        );
        gateway.send_message(channel_id, &text).await?;
    }

    Ok(())
}

async fn notify(gateway: &dyn GuildGateway, user_id: u64, lang: Lang, reply: Reply<'_>) {
    if let Err(source) = gateway.send_direct(user_id, &render(lang, reply)).await {
        warn!(?source, user_id, "could not deliver verification notice");
    }
}
