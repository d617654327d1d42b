use anyhow::Context as _;

use crate::{
    database::Database,
    model::warnings::{NewWarning, WarningEntry},
};

#[derive(sqlx::FromRow)]
struct WarningRow {
    user_id: i64,
    moderator_id: i64,
    reason: String,
    created_at: i64,
}

pub async fn record_warning(db: &Database, warning: NewWarning<'_>) -> anyhow::Result<()> {
    let user_id_i64 = i64::try_from(warning.user_id).context("user_id out of i64 range")?;
    let moderator_id_i64 =
        i64::try_from(warning.moderator_id).context("moderator_id out of i64 range")?;
    let created_at_i64 = i64::try_from(warning.created_at).context("created_at out of i64 range")?;

    sqlx::query(
        "INSERT INTO warnings (user_id, moderator_id, reason, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id_i64)
    .bind(moderator_id_i64)
    .bind(warning.reason)
    .bind(created_at_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Warnings for a user created strictly after `after`, oldest first.
pub async fn warnings_after(
    db: &Database,
    user_id: u64,
    after: u64,
) -> anyhow::Result<Vec<WarningEntry>> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let after_i64 = i64::try_from(after).context("after out of i64 range")?;

    let rows: Vec<WarningRow> = sqlx::query_as(
        "SELECT user_id, moderator_id, reason, created_at
         FROM warnings
         WHERE user_id = $1 AND created_at > $2
         ORDER BY created_at ASC, id ASC",
    )
    .bind(user_id_i64)
    .bind(after_i64)
    .fetch_all(db.pool())
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        entries.push(WarningEntry {
            user_id: u64::try_from(row.user_id).context("user_id row out of u64 range")?,
            moderator_id: u64::try_from(row.moderator_id)
                .context("moderator_id row out of u64 range")?,
            reason: row.reason,
            created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
        });
    }

    Ok(entries)
}

pub async fn clear_warnings(db: &Database, user_id: u64) -> anyhow::Result<u64> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    let deleted = sqlx::query("DELETE FROM warnings WHERE user_id = $1")
        .bind(user_id_i64)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted)
}

/// Delete every warning created at or before `cutoff`.
pub async fn purge_warnings_before(db: &Database, cutoff: u64) -> anyhow::Result<u64> {
    let cutoff_i64 = i64::try_from(cutoff).context("cutoff out of i64 range")?;

    let deleted = sqlx::query("DELETE FROM warnings WHERE created_at <= $1")
        .bind(cutoff_i64)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted)
}
