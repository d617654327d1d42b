//! Process-local store.
//!
//! Only suitable for a single bot instance (local development without
//! PostgreSQL) and for tests; state is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::keys::ActivationKey;
use crate::model::levels::UserPermission;
use crate::model::logs::{ModerationLogEntry, NewModerationLog};
use crate::model::verification::VerificationMessage;
use crate::model::warnings::{NewWarning, WarningEntry};
use crate::store::ModerationStore;

#[derive(Debug, Default)]
struct MemoryState {
    levels: HashMap<u64, u8>,
    warnings: Vec<WarningEntry>,
    keys: HashMap<String, ActivationKey>,
    logs: Vec<ModerationLogEntry>,
    verification: HashMap<u64, VerificationMessage>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the audit trail, oldest first.
    pub async fn logs(&self) -> Vec<ModerationLogEntry> {
        self.state.read().await.logs.clone()
    }

    pub async fn key(&self, key: &str) -> Option<ActivationKey> {
        self.state.read().await.keys.get(key).cloned()
    }
}

#[async_trait]
impl ModerationStore for MemoryStore {
    async fn get_level(&self, user_id: u64) -> anyhow::Result<u8> {
        Ok(self
            .state
            .read()
            .await
            .levels
            .get(&user_id)
            .copied()
            .unwrap_or_default())
    }

    async fn set_level(&self, permission: UserPermission, _now: u64) -> anyhow::Result<()> {
        self.state
            .write()
            .await
            .levels
            .insert(permission.user_id, permission.level);
        Ok(())
    }

    async fn add_warn(&self, warning: NewWarning<'_>) -> anyhow::Result<()> {
        self.state.write().await.warnings.push(WarningEntry {
            user_id: warning.user_id,
            moderator_id: warning.moderator_id,
            reason: warning.reason.to_owned(),
            created_at: warning.created_at,
        });
        Ok(())
    }

    async fn warns_after(&self, user_id: u64, after: u64) -> anyhow::Result<Vec<WarningEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<WarningEntry> = state
            .warnings
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.created_at > after)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        entries.sort_by_key(|entry| entry.created_at);
        Ok(entries)
    }

    async fn clear_warns(&self, user_id: u64) -> anyhow::Result<u64> {
        let mut state = self.state.write().await;
        let before = state.warnings.len();
        state.warnings.retain(|entry| entry.user_id != user_id);
        Ok((before - state.warnings.len()) as u64)
    }

    async fn purge_warns_before(&self, cutoff: u64) -> anyhow::Result<u64> {
        let mut state = self.state.write().await;
        let before = state.warnings.len();
        state.warnings.retain(|entry| entry.created_at > cutoff);
        Ok((before - state.warnings.len()) as u64)
    }

    async fn key_exists(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.state.read().await.keys.contains_key(key))
    }

    async fn insert_key(&self, key: &ActivationKey) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        if state.keys.contains_key(&key.key) {
            anyhow::bail!("activation key `{}` already exists", key.key);
        }
        state.keys.insert(key.key.clone(), key.clone());
        Ok(())
    }

    async fn expire_keys(&self, now: u64) -> anyhow::Result<u64> {
        let mut state = self.state.write().await;
        let mut flagged = 0;
        for key in state.keys.values_mut() {
            if !key.expired && key.expires_at.is_some_and(|at| at <= now) {
                key.expired = true;
                flagged += 1;
            }
        }
        Ok(flagged)
    }

    async fn insert_log(&self, entry: NewModerationLog<'_>) -> anyhow::Result<()> {
        self.state.write().await.logs.push(ModerationLogEntry {
            action: entry.action.as_str().to_owned(),
            moderator_id: entry.moderator_id,
            target_user_id: entry.target_user_id,
            reason: entry.reason.to_owned(),
            duration_ms: entry.duration_ms,
            successful: entry.successful,
            created_at: entry.created_at,
        });
        Ok(())
    }

    async fn verification_message(
        &self,
        guild_id: u64,
    ) -> anyhow::Result<Option<VerificationMessage>> {
        Ok(self.state.read().await.verification.get(&guild_id).copied())
    }

    async fn set_verification_message(&self, message: VerificationMessage) -> anyhow::Result<()> {
        self.state
            .write()
            .await
            .verification
            .insert(message.guild_id, message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::model::keys::ActivationKey;
    use crate::model::levels::UserPermission;
    use crate::model::logs::{ModerationAction, NewModerationLog};
    use crate::model::warnings::NewWarning;
    use crate::store::ModerationStore;

    fn warning(user_id: u64, created_at: u64) -> NewWarning<'static> {
        NewWarning {
            user_id,
            moderator_id: 1,
            reason: "spam",
            created_at,
        }
    }

    #[tokio::test]
    async fn levels_default_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.get_level(10).await.unwrap(), 0);

        store
            .set_level(
                UserPermission {
                    user_id: 10,
                    level: 2,
                },
                0,
            )
            .await
            .unwrap();
        assert_eq!(store.get_level(10).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn warns_after_is_exclusive_and_ordered() {
        let store = MemoryStore::new();
        store.add_warn(warning(5, 300)).await.unwrap();
        store.add_warn(warning(5, 100)).await.unwrap();
        store.add_warn(warning(5, 200)).await.unwrap();
        store.add_warn(warning(6, 250)).await.unwrap();

        let active = store.warns_after(5, 100).await.unwrap();
        let stamps: Vec<u64> = active.iter().map(|entry| entry.created_at).collect();
        assert_eq!(stamps, vec![200, 300]);
    }

    #[tokio::test]
    async fn clear_and_purge_remove_rows() {
        let store = MemoryStore::new();
        store.add_warn(warning(5, 100)).await.unwrap();
        store.add_warn(warning(5, 200)).await.unwrap();
        store.add_warn(warning(6, 50)).await.unwrap();

        assert_eq!(store.purge_warns_before(100).await.unwrap(), 2);
        assert_eq!(store.clear_warns(5).await.unwrap(), 1);
        assert!(store.warns_after(5, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn keys_are_unique_and_expire() {
        let store = MemoryStore::new();
        let key = ActivationKey {
            key: "WRD-AAAAA-BBBBBB-CCCCC".to_owned(),
            created_by: 1,
            created_at: 10,
            is_used: false,
            duration: Some("PT1H".to_owned()),
            expires_at: Some(3_610),
            expired: false,
        };

        store.insert_key(&key).await.unwrap();
        assert!(store.key_exists(&key.key).await.unwrap());
        assert!(store.insert_key(&key).await.is_err());

        assert_eq!(store.expire_keys(3_600).await.unwrap(), 0);
        assert_eq!(store.expire_keys(3_610).await.unwrap(), 1);
        assert!(store.key(&key.key).await.unwrap().expired);
    }

    #[tokio::test]
    async fn logs_are_appended() {
        let store = MemoryStore::new();
        store
            .insert_log(NewModerationLog {
                action: ModerationAction::Kick,
                moderator_id: 1,
                target_user_id: Some(2),
                reason: "rude",
                duration_ms: None,
                successful: false,
                created_at: 9,
            })
            .await
            .unwrap();

        let logs = store.logs().await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, "kick");
        assert!(!logs[0].successful);
    }
}
