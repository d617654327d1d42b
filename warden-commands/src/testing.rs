//! Recording `GuildGateway` double for handler tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use warden_core::{BanEntry, GuildGateway, MemberInfo, RoleSpec, TargetRef, UserLocks};
use warden_database::MemoryStore;
use warden_utils::lang::Lang;

use crate::router::Invocation;

pub const MODERATOR: u64 = 1;
pub const NOW: u64 = 1_700_000_000;

/// A level 3 moderator invoking a command at [`NOW`].
pub fn invocation<'a>(
    store: &'a MemoryStore,
    gateway: &'a FakeGateway,
    locks: &'a UserLocks,
    lang: Lang,
    args: Vec<&'a str>,
) -> Invocation<'a> {
    Invocation {
        store,
        gateway,
        locks,
        lang,
        author_id: MODERATOR,
        author_name: "moderator",
        author_level: 3,
        mentions: &[],
        args,
        now: NOW,
    }
}

pub fn member(user_id: u64, display_name: &str) -> MemberInfo {
    MemberInfo {
        user_id,
        display_name: display_name.to_owned(),
        bannable: true,
        kickable: true,
        moderatable: true,
        timed_out: false,
    }
}

#[derive(Debug, Default)]
struct State {
    members: HashMap<u64, MemberInfo>,
    bans: Vec<BanEntry>,
    kicked: Vec<u64>,
    timeouts: Vec<(u64, Option<u64>)>,
    roles: HashMap<&'static str, u64>,
    member_roles: HashMap<u64, HashSet<u64>>,
    sent: Vec<(u64, String)>,
    direct: Vec<(u64, String)>,
    reactions: Vec<(u64, u64, String)>,
}

#[derive(Debug, Default)]
pub struct FakeGateway {
    guild_id: u64,
    owner_id: u64,
    pub fail_bans: bool,
    pub fail_timeouts: bool,
    pub closed_direct: bool,
    pub fail_role_removals: bool,
    /// Role names the bot sits below in the hierarchy.
    pub ungrantable_roles: HashSet<&'static str>,
    state: Mutex<State>,
}

impl FakeGateway {
    pub fn new(guild_id: u64, owner_id: u64) -> Self {
        Self {
            guild_id,
            owner_id,
            ..Self::default()
        }
    }

    pub fn with_member(self, member: MemberInfo) -> Self {
        self.state.lock().unwrap().members.insert(member.user_id, member);
        self
    }

    pub fn with_ban(self, user_id: u64, display_name: &str) -> Self {
        self.state.lock().unwrap().bans.push(BanEntry {
            user_id,
            display_name: display_name.to_owned(),
        });
        self
    }

    pub fn bans(&self) -> Vec<u64> {
        self.state.lock().unwrap().bans.iter().map(|ban| ban.user_id).collect()
    }

    pub fn kicked(&self) -> Vec<u64> {
        self.state.lock().unwrap().kicked.clone()
    }

    pub fn timeouts(&self) -> Vec<(u64, Option<u64>)> {
        self.state.lock().unwrap().timeouts.clone()
    }

    pub fn sent(&self) -> Vec<(u64, String)> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn direct(&self) -> Vec<(u64, String)> {
        self.state.lock().unwrap().direct.clone()
    }

    pub fn reactions(&self) -> Vec<(u64, u64, String)> {
        self.state.lock().unwrap().reactions.clone()
    }

    pub fn role_id(&self, name: &str) -> Option<u64> {
        self.state.lock().unwrap().roles.get(name).copied()
    }

    pub fn has_role(&self, user_id: u64, role_name: &str) -> bool {
        let state = self.state.lock().unwrap();
        let Some(role_id) = state.roles.get(role_name) else {
            return false;
        };
        state
            .member_roles
            .get(&user_id)
            .is_some_and(|roles| roles.contains(role_id))
    }
}

#[async_trait]
impl GuildGateway for FakeGateway {
    fn guild_id(&self) -> u64 {
        self.guild_id
    }

    async fn owner_id(&self) -> anyhow::Result<u64> {
        Ok(self.owner_id)
    }

    async fn resolve_member(&self, target: &TargetRef) -> anyhow::Result<Option<MemberInfo>> {
        let Some(user_id) = target.user_id() else {
            return Ok(None);
        };
        Ok(self.state.lock().unwrap().members.get(&user_id).cloned())
    }

    async fn send_message(&self, channel_id: u64, text: &str) -> anyhow::Result<u64> {
        let mut state = self.state.lock().unwrap();
        state.sent.push((channel_id, text.to_owned()));
        Ok(1_000 + state.sent.len() as u64)
    }

    async fn send_direct(&self, user_id: u64, text: &str) -> anyhow::Result<()> {
        anyhow::ensure!(!self.closed_direct, "cannot send messages to this user");
        self.state.lock().unwrap().direct.push((user_id, text.to_owned()));
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> anyhow::Result<()> {
        self.state
            .lock()
            .unwrap()
            .reactions
            .push((channel_id, message_id, emoji.to_owned()));
        Ok(())
    }

    async fn ban_member(&self, user_id: u64, _reason: &str) -> anyhow::Result<()> {
        anyhow::ensure!(!self.fail_bans, "missing permissions");
        let mut state = self.state.lock().unwrap();
        let display_name = state
            .members
            .remove(&user_id)
            .map(|member| member.display_name)
            .unwrap_or_default();
        state.bans.push(BanEntry {
            user_id,
            display_name,
        });
        Ok(())
    }

    async fn kick_member(&self, user_id: u64, _reason: &str) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.members.remove(&user_id);
        state.kicked.push(user_id);
        Ok(())
    }

    async fn set_timeout(
        &self,
        user_id: u64,
        duration_ms: Option<u64>,
        _reason: &str,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(!self.fail_timeouts, "missing permissions");
        let mut state = self.state.lock().unwrap();
        if let Some(member) = state.members.get_mut(&user_id) {
            member.timed_out = duration_ms.is_some();
        }
        state.timeouts.push((user_id, duration_ms));
        Ok(())
    }

    async fn fetch_bans(&self) -> anyhow::Result<Vec<BanEntry>> {
        Ok(self.state.lock().unwrap().bans.clone())
    }

    async fn unban_member(&self, user_id: u64) -> anyhow::Result<()> {
        self.state
            .lock()
            .unwrap()
            .bans
            .retain(|ban| ban.user_id != user_id);
        Ok(())
    }

    async fn ensure_role(&self, spec: RoleSpec) -> anyhow::Result<u64> {
        let mut state = self.state.lock().unwrap();
        let next_id = 500 + state.roles.len() as u64;
        Ok(*state.roles.entry(spec.name).or_insert(next_id))
    }

    async fn can_grant_role(&self, role_id: u64) -> anyhow::Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(!state
            .roles
            .iter()
            .any(|(name, id)| *id == role_id && self.ungrantable_roles.contains(name)))
    }

    async fn add_role(&self, user_id: u64, role_id: u64) -> anyhow::Result<()> {
        self.state
            .lock()
            .unwrap()
            .member_roles
            .entry(user_id)
            .or_default()
            .insert(role_id);
        Ok(())
    }

    async fn remove_role(&self, user_id: u64, role_id: u64) -> anyhow::Result<()> {
        anyhow::ensure!(!self.fail_role_removals, "missing permissions");
        if let Some(roles) = self.state.lock().unwrap().member_roles.get_mut(&user_id) {
            roles.remove(&role_id);
        }
        Ok(())
    }
}
