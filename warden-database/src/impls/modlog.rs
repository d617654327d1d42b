use anyhow::Context as _;

use crate::database::Database;
use crate::model::logs::NewModerationLog;

/// Append one row to the moderation audit trail.
pub async fn insert_log(db: &Database, entry: NewModerationLog<'_>) -> anyhow::Result<()> {
    let moderator_id_i64 =
        i64::try_from(entry.moderator_id).context("moderator_id out of i64 range")?;
    let target_user_id_i64 = entry
        .target_user_id
        .map(i64::try_from)
        .transpose()
        .context("target_user_id out of i64 range")?;
    let duration_ms_i64 = entry
        .duration_ms
        .map(i64::try_from)
        .transpose()
        .context("duration_ms out of i64 range")?;
    let created_at_i64 = i64::try_from(entry.created_at).context("created_at out of i64 range")?;

    sqlx::query(
        "INSERT INTO moderation_logs
            (action, moderator_id, target_user_id, reason, duration_ms, successful, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(entry.action.as_str())
    .bind(moderator_id_i64)
    .bind(target_user_id_i64)
    .bind(entry.reason)
    .bind(duration_ms_i64)
    .bind(entry.successful)
    .bind(created_at_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}
