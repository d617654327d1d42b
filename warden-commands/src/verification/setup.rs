use tracing::{error, info};

use warden_core::{BotConfig, Context, Error, GuildGateway};
use warden_database::ModerationStore;
use warden_database::model::verification::VerificationMessage;
use warden_utils::lang::Lang;
use warden_utils::permissions::LEVEL_ADMIN;

use crate::access::{authorize, guild_gateway, interaction_lang, reply_ephemeral};
use crate::texts::{Reply, render};
use crate::verification::{UNVERIFIED_ROLE, VERIFIED_ROLE, VERIFY_EMOJI};

/// Post the verification message, react to it and remember it.
///
/// Returns `None` when no verification channel is configured.
pub async fn setup_verification(
    store: &dyn ModerationStore,
    gateway: &dyn GuildGateway,
    config: &BotConfig,
    lang: Lang,
) -> anyhow::Result<Option<VerificationMessage>> {
    let Some(channel_id) = config.verification_channel else {
        return Ok(None);
    };

    gateway.ensure_role(UNVERIFIED_ROLE).await?;
    gateway.ensure_role(VERIFIED_ROLE).await?;

    let message_id = gateway
        .send_message(channel_id, &render(lang, Reply::VerificationPrompt))
        .await?;
    gateway
        .add_reaction(channel_id, message_id, VERIFY_EMOJI)
        .await?;

    let message = VerificationMessage {
        guild_id: gateway.guild_id(),
        channel_id,
        message_id,
    };
    store.set_verification_message(message).await?;
    info!(channel_id, message_id, "verification message posted");

    Ok(Some(message))
}

/// Post the verification message in the configured channel.
#[poise::command(slash_command, guild_only, category = "Verification")]
pub async fn setupverify(ctx: Context<'_>) -> Result<(), Error> {
    let lang = interaction_lang(ctx);
    let Some(gateway) = guild_gateway(ctx, lang).await? else {
        return Ok(());
    };

    if !authorize(ctx, &gateway, lang, LEVEL_ADMIN).await? {
        return Ok(());
    }

    let data = ctx.data();
    let reply = match setup_verification(data.store.as_ref(), &gateway, &data.config, lang).await {
        Ok(Some(message)) => Reply::VerificationReady {
            channel_id: message.channel_id,
        },
        Ok(None) => Reply::VerificationChannelMissing,
        Err(source) => {
            error!(?source, "verification setup failed");
            Reply::VerificationSetupFailed
        }
    };

    reply_ephemeral(ctx, render(lang, reply)).await
}

#[cfg(test)]
mod tests {
    use warden_core::BotConfig;
    use warden_database::{MemoryStore, ModerationStore};
    use warden_utils::lang::Lang;

    use super::setup_verification;
    use crate::testing::FakeGateway;

    #[tokio::test]
    async fn posts_reacts_and_persists() {
        let store = MemoryStore::new();
        let gateway = FakeGateway::new(10, 99);
        let config = BotConfig {
            guild_id: 10,
            verification_channel: Some(20),
            ..BotConfig::default()
        };

        let message = setup_verification(&store, &gateway, &config, Lang::Ru)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(message.channel_id, 20);
        assert_eq!(gateway.sent().len(), 1);
        assert_eq!(gateway.reactions(), vec![(20, message.message_id, "✅".to_owned())]);
        assert_eq!(store.verification_message(10).await.unwrap(), Some(message));
        assert!(gateway.role_id("Verified").is_some());
        assert!(gateway.role_id("Unverified").is_some());
    }

    #[tokio::test]
    async fn missing_channel_is_reported() {
        let store = MemoryStore::new();
        let gateway = FakeGateway::new(10, 99);

        let outcome = setup_verification(&store, &gateway, &BotConfig::default(), Lang::En)
            .await
            .unwrap();
        assert_eq!(outcome, None);
        assert!(gateway.sent().is_empty());
    }
}
