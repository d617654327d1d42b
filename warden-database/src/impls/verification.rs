use anyhow::Context as _;

use crate::cache::{
    CONFIG_CACHE_TTL, invalidate_verification_message, verification_message_key,
};
use crate::database::Database;
use crate::model::verification::VerificationMessage;

pub async fn get_verification_message(
    db: &Database,
    guild_id: u64,
) -> anyhow::Result<Option<VerificationMessage>> {
    let cache_key = verification_message_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, CONFIG_CACHE_TTL, || async {
            let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

            let row = sqlx::query_as::<_, (i64, i64)>(
                "SELECT channel_id, message_id FROM verification_config WHERE guild_id = $1",
            )
            .bind(guild_id_i64)
            .fetch_optional(db.pool())
            .await?;

            let Some((channel_id, message_id)) = row else {
                return Ok(None);
            };

            Ok(Some(VerificationMessage {
                guild_id,
                channel_id: u64::try_from(channel_id).context("channel_id out of u64 range")?,
                message_id: u64::try_from(message_id).context("message_id out of u64 range")?,
            }))
        })
        .await
}

pub async fn set_verification_message(
    db: &Database,
    message: VerificationMessage,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(message.guild_id).context("guild_id out of i64 range")?;
    let channel_id_i64 =
        i64::try_from(message.channel_id).context("channel_id out of i64 range")?;
    let message_id_i64 =
        i64::try_from(message.message_id).context("message_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO verification_config (guild_id, channel_id, message_id)
         VALUES ($1, $2, $3)
         ON CONFLICT (guild_id) DO UPDATE
            SET channel_id = EXCLUDED.channel_id, message_id = EXCLUDED.message_id",
    )
    .bind(guild_id_i64)
    .bind(channel_id_i64)
    .bind(message_id_i64)
    .execute(db.pool())
    .await?;

    invalidate_verification_message(db.cache(), message.guild_id).await;

    Ok(())
}
