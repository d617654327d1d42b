use async_trait::async_trait;

use crate::database::Database;
use crate::impls::{keys, levels, modlog, verification, warnings};
use crate::model::keys::ActivationKey;
use crate::model::levels::UserPermission;
use crate::model::logs::NewModerationLog;
use crate::model::verification::VerificationMessage;
use crate::model::warnings::{NewWarning, WarningEntry};

/// Persistence operations the moderation engine depends on.
///
/// Timestamps are unix seconds supplied by the caller so that time-window
/// decisions stay deterministic.
#[async_trait]
pub trait ModerationStore: Send + Sync + std::fmt::Debug {
    /// Stored level, 0 when the user has no record.
    async fn get_level(&self, user_id: u64) -> anyhow::Result<u8>;
    async fn set_level(&self, permission: UserPermission, now: u64) -> anyhow::Result<()>;

    async fn add_warn(&self, warning: NewWarning<'_>) -> anyhow::Result<()>;
    /// Warnings created strictly after `after`, oldest first.
    async fn warns_after(&self, user_id: u64, after: u64) -> anyhow::Result<Vec<WarningEntry>>;
    async fn clear_warns(&self, user_id: u64) -> anyhow::Result<u64>;
    async fn purge_warns_before(&self, cutoff: u64) -> anyhow::Result<u64>;

    async fn key_exists(&self, key: &str) -> anyhow::Result<bool>;
    async fn insert_key(&self, key: &ActivationKey) -> anyhow::Result<()>;
    async fn expire_keys(&self, now: u64) -> anyhow::Result<u64>;

    async fn insert_log(&self, entry: NewModerationLog<'_>) -> anyhow::Result<()>;

    async fn verification_message(
        &self,
        guild_id: u64,
    ) -> anyhow::Result<Option<VerificationMessage>>;
    async fn set_verification_message(&self, message: VerificationMessage) -> anyhow::Result<()>;
}

#[async_trait]
impl ModerationStore for Database {
    async fn get_level(&self, user_id: u64) -> anyhow::Result<u8> {
        levels::get_level(self, user_id).await
    }

    async fn set_level(&self, permission: UserPermission, now: u64) -> anyhow::Result<()> {
        levels::set_level(self, permission, now).await
    }

    async fn add_warn(&self, warning: NewWarning<'_>) -> anyhow::Result<()> {
        warnings::record_warning(self, warning).await
    }

    async fn warns_after(&self, user_id: u64, after: u64) -> anyhow::Result<Vec<WarningEntry>> {
        warnings::warnings_after(self, user_id, after).await
    }

    async fn clear_warns(&self, user_id: u64) -> anyhow::Result<u64> {
        warnings::clear_warnings(self, user_id).await
    }

    async fn purge_warns_before(&self, cutoff: u64) -> anyhow::Result<u64> {
        warnings::purge_warnings_before(self, cutoff).await
    }

    async fn key_exists(&self, key: &str) -> anyhow::Result<bool> {
        keys::key_exists(self, key).await
    }

    async fn insert_key(&self, key: &ActivationKey) -> anyhow::Result<()> {
        keys::insert_key(self, key).await
    }

    async fn expire_keys(&self, now: u64) -> anyhow::Result<u64> {
        keys::expire_keys(self, now).await
    }

    async fn insert_log(&self, entry: NewModerationLog<'_>) -> anyhow::Result<()> {
        modlog::insert_log(self, entry).await
    }

    async fn verification_message(
        &self,
        guild_id: u64,
    ) -> anyhow::Result<Option<VerificationMessage>> {
        verification::get_verification_message(self, guild_id).await
    }

    async fn set_verification_message(&self, message: VerificationMessage) -> anyhow::Result<()> {
        verification::set_verification_message(self, message).await
    }
}
