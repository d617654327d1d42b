use async_trait::async_trait;

/// How a command names its target member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetRef {
    /// A platform mention attached to the message.
    Mention(u64),
    /// The first argument, with any mention syntax stripped.
    RawId(String),
}

impl TargetRef {
    /// Prefer an explicit mention, otherwise treat the first argument as an id.
    pub fn from_command<S: AsRef<str>>(mentions: &[u64], args: &[S]) -> Option<Self> {
        if let Some(user_id) = mentions.first() {
            return Some(Self::Mention(*user_id));
        }

        args.first().map(|raw| {
            Self::RawId(
                raw.as_ref()
                    .chars()
                    .filter(|c| !matches!(c, '<' | '@' | '!' | '>'))
                    .collect(),
            )
        })
    }

    pub fn user_id(&self) -> Option<u64> {
        match self {
            Self::Mention(user_id) => Some(*user_id),
            Self::RawId(raw) => raw.trim().parse::<u64>().ok(),
        }
    }
}

/// A guild member as seen by the moderation engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberInfo {
    pub user_id: u64,
    pub display_name: String,
    /// Whether the bot outranks the member enough to ban them.
    pub bannable: bool,
    pub kickable: bool,
    pub moderatable: bool,
    /// Whether a communication timeout is currently active.
    pub timed_out: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BanEntry {
    pub user_id: u64,
    pub display_name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoleSpec {
    pub name: &'static str,
    pub colour: u32,
    /// Place the role directly below the bot's highest role when creating it.
    pub below_bot: bool,
}

/// Capabilities the engine needs from the chat platform, scoped to one guild.
#[async_trait]
pub trait GuildGateway: Send + Sync {
    fn guild_id(&self) -> u64;
    async fn owner_id(&self) -> anyhow::Result<u64>;

    /// `Ok(None)` when the target does not name a member of this guild.
    async fn resolve_member(&self, target: &TargetRef) -> anyhow::Result<Option<MemberInfo>>;

    /// Post a message and return its id.
    async fn send_message(&self, channel_id: u64, text: &str) -> anyhow::Result<u64>;
    /// Deliver a private message. Errors mean the user cannot be reached.
    async fn send_direct(&self, user_id: u64, text: &str) -> anyhow::Result<()>;
    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str)
    -> anyhow::Result<()>;

    async fn ban_member(&self, user_id: u64, reason: &str) -> anyhow::Result<()>;
    async fn kick_member(&self, user_id: u64, reason: &str) -> anyhow::Result<()>;
    /// `None` lifts an active timeout.
    async fn set_timeout(
        &self,
        user_id: u64,
        duration_ms: Option<u64>,
        reason: &str,
    ) -> anyhow::Result<()>;
    async fn fetch_bans(&self) -> anyhow::Result<Vec<BanEntry>>;
    async fn unban_member(&self, user_id: u64) -> anyhow::Result<()>;

    /// Find a role by name or create it. Returns the role id.
    async fn ensure_role(&self, spec: RoleSpec) -> anyhow::Result<u64>;
    /// Whether the bot's own role hierarchy allows granting `role_id`.
    async fn can_grant_role(&self, role_id: u64) -> anyhow::Result<bool>;
    async fn add_role(&self, user_id: u64, role_id: u64) -> anyhow::Result<()>;
    async fn remove_role(&self, user_id: u64, role_id: u64) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::TargetRef;

    #[test]
    fn mentions_win_over_arguments() {
        assert_eq!(
            TargetRef::from_command(&[42], &["<@7>"]),
            Some(TargetRef::Mention(42))
        );
    }

    #[test]
    fn raw_ids_are_stripped_of_mention_syntax() {
        let target = TargetRef::from_command::<&str>(&[], &["<@!123>", "spam"]).unwrap();
        assert_eq!(target, TargetRef::RawId("123".to_owned()));
        assert_eq!(target.user_id(), Some(123));
    }

    #[test]
    fn garbage_ids_do_not_resolve() {
        let target = TargetRef::from_command(&[], &["bob"]).unwrap();
        assert_eq!(target.user_id(), None);
        assert_eq!(TargetRef::from_command::<&str>(&[], &[]), None);
    }
}
