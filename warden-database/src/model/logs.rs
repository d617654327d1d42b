/// Moderation actions recorded in the audit trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModerationAction {
    Ban,
    AutoBan,
    Unban,
    Kick,
    Mute,
    Unmute,
    Warn,
    Promote,
    Demote,
}

impl ModerationAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ban => "ban",
            Self::AutoBan => "auto_ban",
            Self::Unban => "unban",
            Self::Kick => "kick",
            Self::Mute => "mute",
            Self::Unmute => "unmute",
            Self::Warn => "warn",
            Self::Promote => "promote",
            Self::Demote => "demote",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModerationLogEntry {
    pub action: String,
    pub moderator_id: u64,
    pub target_user_id: Option<u64>,
    pub reason: String,
    pub duration_ms: Option<u64>,
    pub successful: bool,
    pub created_at: u64,
}

#[derive(Clone, Copy, Debug)]
pub struct NewModerationLog<'a> {
    pub action: ModerationAction,
    pub moderator_id: u64,
    pub target_user_id: Option<u64>,
    pub reason: &'a str,
    pub duration_ms: Option<u64>,
    pub successful: bool,
    pub created_at: u64,
}
