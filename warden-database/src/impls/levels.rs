use anyhow::Context as _;

use crate::cache::{LEVEL_CACHE_TTL, invalidate_level, level_key};
use crate::database::Database;
use crate::model::levels::UserPermission;

/// Stored level for a user, or 0 when no record exists.
pub async fn get_level(db: &Database, user_id: u64) -> anyhow::Result<u8> {
    let cache_key = level_key(db.cache(), user_id);
    db.cache()
        .get_or_load_json(&cache_key, LEVEL_CACHE_TTL, || async {
            let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

            let level: Option<i16> =
                sqlx::query_scalar("SELECT level FROM user_levels WHERE user_id = $1")
                    .bind(user_id_i64)
                    .fetch_optional(db.pool())
                    .await?;

            level
                .map(u8::try_from)
                .transpose()
                .context("stored level out of u8 range")
                .map(Option::unwrap_or_default)
        })
        .await
}

pub async fn set_level(
    db: &Database,
    permission: UserPermission,
    updated_at: u64,
) -> anyhow::Result<()> {
    let user_id_i64 = i64::try_from(permission.user_id).context("user_id out of i64 range")?;
    let updated_at_i64 = i64::try_from(updated_at).context("updated_at out of i64 range")?;

    sqlx::query(
        "INSERT INTO user_levels (user_id, level, updated_at)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id) DO UPDATE SET level = EXCLUDED.level, updated_at = EXCLUDED.updated_at",
    )
    .bind(user_id_i64)
    .bind(i16::from(permission.level))
    .bind(updated_at_i64)
    .execute(db.pool())
    .await?;

    invalidate_level(db.cache(), permission.user_id).await;

    Ok(())
}
