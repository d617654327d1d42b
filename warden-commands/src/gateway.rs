//! Discord implementation of [`GuildGateway`] on top of serenity's HTTP client.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tracing::info;

use warden_core::{BanEntry, GuildGateway, MemberInfo, RoleSpec, TargetRef};
use warden_utils::time::now_unix_secs;

#[derive(Clone)]
pub struct DiscordGateway {
    http: Arc<serenity::Http>,
    guild_id: serenity::GuildId,
    bot_user_id: serenity::UserId,
}

impl DiscordGateway {
    pub fn new(
        http: Arc<serenity::Http>,
        guild_id: serenity::GuildId,
        bot_user_id: serenity::UserId,
    ) -> Self {
        Self {
            http,
            guild_id,
            bot_user_id,
        }
    }

    pub fn from_context(ctx: &serenity::Context, guild_id: u64) -> anyhow::Result<Self> {
        let bot_user_id = ctx.cache.current_user().id;
        Ok(Self::new(ctx.http.clone(), snowflake(guild_id, serenity::GuildId::new)?, bot_user_id))
    }

    fn http(&self) -> &serenity::Http {
        &self.http
    }

    async fn bot_top_position(
        &self,
        roles: &HashMap<serenity::RoleId, serenity::Role>,
    ) -> anyhow::Result<u16> {
        let bot = self.guild_id.member(self.http(), self.bot_user_id).await?;
        Ok(top_position(roles, &bot.roles))
    }
}

#[async_trait]
impl GuildGateway for DiscordGateway {
    fn guild_id(&self) -> u64 {
        self.guild_id.get()
    }

    async fn owner_id(&self) -> anyhow::Result<u64> {
        let guild = self.guild_id.to_partial_guild(self.http()).await?;
        Ok(guild.owner_id.get())
    }

    async fn resolve_member(&self, target: &TargetRef) -> anyhow::Result<Option<MemberInfo>> {
        let Some(user_id) = target
            .user_id()
            .filter(|id| *id != 0)
            .map(serenity::UserId::new)
        else {
            return Ok(None);
        };

        let member = match self.guild_id.member(self.http(), user_id).await {
            Ok(member) => member,
            Err(source) if is_unknown_member_error(&source) => return Ok(None),
            Err(source) => return Err(source.into()),
        };

        let guild = self.guild_id.to_partial_guild(self.http()).await?;
        let bot = self.guild_id.member(self.http(), self.bot_user_id).await?;
        let outranked = member.user.id != guild.owner_id
            && member.user.id != self.bot_user_id
            && top_position(&guild.roles, &bot.roles) > top_position(&guild.roles, &member.roles);
        let actions = Actionability::new(
            outranked,
            permissions_of(&guild, &bot),
            permissions_of(&guild, &member),
        );

        let now = i64::try_from(now_unix_secs()).context("clock out of i64 range")?;
        let timed_out = member
            .communication_disabled_until
            .is_some_and(|until| until.unix_timestamp() > now);

        Ok(Some(MemberInfo {
            user_id: member.user.id.get(),
            display_name: member.display_name().to_owned(),
            bannable: actions.bannable,
            kickable: actions.kickable,
            moderatable: actions.moderatable,
            timed_out,
        }))
    }

    async fn send_message(&self, channel_id: u64, text: &str) -> anyhow::Result<u64> {
        let channel = snowflake(channel_id, serenity::ChannelId::new)?;
        let message = channel.say(self.http(), text).await?;
        Ok(message.id.get())
    }

    async fn send_direct(&self, user_id: u64, text: &str) -> anyhow::Result<()> {
        let user = snowflake(user_id, serenity::UserId::new)?;
        user.direct_message(self.http(), serenity::CreateMessage::new().content(text))
            .await?;
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> anyhow::Result<()> {
        let channel = snowflake(channel_id, serenity::ChannelId::new)?;
        let message = snowflake(message_id, serenity::MessageId::new)?;
        channel
            .create_reaction(
                self.http(),
                message,
                serenity::ReactionType::Unicode(emoji.to_owned()),
            )
            .await?;
        Ok(())
    }

    async fn ban_member(&self, user_id: u64, reason: &str) -> anyhow::Result<()> {
        let user = snowflake(user_id, serenity::UserId::new)?;
        self.guild_id
            .ban_with_reason(self.http(), user, 0, reason)
            .await
            .map_err(describe)
    }

    async fn kick_member(&self, user_id: u64, reason: &str) -> anyhow::Result<()> {
        let user = snowflake(user_id, serenity::UserId::new)?;
        self.guild_id
            .kick_with_reason(self.http(), user, reason)
            .await
            .map_err(describe)
    }

    async fn set_timeout(
        &self,
        user_id: u64,
        duration_ms: Option<u64>,
        reason: &str,
    ) -> anyhow::Result<()> {
        let user = snowflake(user_id, serenity::UserId::new)?;
        let edit = match duration_ms {
            Some(ms) => {
                let until = now_unix_secs().saturating_add(ms.div_ceil(1_000));
                let until = i64::try_from(until).context("timeout end out of i64 range")?;
                serenity::EditMember::new()
                    .disable_communication_until_datetime(serenity::Timestamp::from_unix_timestamp(
                        until,
                    )?)
            }
            None => serenity::EditMember::new().enable_communication(),
        };

        self.guild_id
            .edit_member(self.http(), user, edit.audit_log_reason(reason))
            .await
            .map_err(describe)?;
        Ok(())
    }

    async fn fetch_bans(&self) -> anyhow::Result<Vec<BanEntry>> {
        let bans = self.guild_id.bans(self.http(), None, None).await?;
        Ok(bans
            .into_iter()
            .map(|ban| BanEntry {
                user_id: ban.user.id.get(),
                display_name: ban.user.global_name.clone().unwrap_or_else(|| ban.user.name.clone()),
            })
            .collect())
    }

    async fn unban_member(&self, user_id: u64) -> anyhow::Result<()> {
        let user = snowflake(user_id, serenity::UserId::new)?;
        self.guild_id
            .unban(self.http(), user)
            .await
            .map_err(describe)
    }

    async fn ensure_role(&self, spec: RoleSpec) -> anyhow::Result<u64> {
        let roles = self.guild_id.roles(self.http()).await?;
        if let Some(role) = roles.values().find(|role| role.name == spec.name) {
            return Ok(role.id.get());
        }

        let mut builder = serenity::EditRole::new().name(spec.name).colour(spec.colour);
        if spec.below_bot {
            let bot_top = self.bot_top_position(&roles).await?;
            builder = builder.position(bot_top.saturating_sub(1).max(1));
        }

        let role = self
            .guild_id
            .create_role(self.http(), builder)
            .await
            .map_err(describe)?;
        info!(role_id = %role.id, name = spec.name, "role created");
        Ok(role.id.get())
    }

    async fn can_grant_role(&self, role_id: u64) -> anyhow::Result<bool> {
        let role_id = snowflake(role_id, serenity::RoleId::new)?;
        let roles = self.guild_id.roles(self.http()).await?;
        let bot_top = self.bot_top_position(&roles).await?;
        Ok(roles
            .get(&role_id)
            .is_some_and(|role| role.position < bot_top))
    }

    async fn add_role(&self, user_id: u64, role_id: u64) -> anyhow::Result<()> {
        self.http()
            .add_member_role(
                self.guild_id,
                snowflake(user_id, serenity::UserId::new)?,
                snowflake(role_id, serenity::RoleId::new)?,
                Some("verification"),
            )
            .await
            .map_err(describe)
    }

    async fn remove_role(&self, user_id: u64, role_id: u64) -> anyhow::Result<()> {
        self.http()
            .remove_member_role(
                self.guild_id,
                snowflake(user_id, serenity::UserId::new)?,
                snowflake(role_id, serenity::RoleId::new)?,
                Some("verification"),
            )
            .await
            .map_err(describe)
    }
}

/// Checked id construction; serenity's `new` panics on zero.
fn snowflake<T>(raw: u64, make: fn(u64) -> T) -> anyhow::Result<T> {
    anyhow::ensure!(raw != 0, "discord ids are never zero");
    Ok(make(raw))
}

/// What the bot may do to a member it has already compared ranks with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Actionability {
    bannable: bool,
    kickable: bool,
    moderatable: bool,
}

impl Actionability {
    fn new(outranked: bool, bot: serenity::Permissions, target: serenity::Permissions) -> Self {
        Self {
            bannable: outranked && bot.contains(serenity::Permissions::BAN_MEMBERS),
            kickable: outranked && bot.contains(serenity::Permissions::KICK_MEMBERS),
            // Discord refuses timeouts on administrators.
            moderatable: outranked
                && bot.contains(serenity::Permissions::MODERATE_MEMBERS)
                && !target.contains(serenity::Permissions::ADMINISTRATOR),
        }
    }
}

/// Guild-level permissions from `@everyone` plus the member's roles.
fn permissions_of(
    guild: &serenity::PartialGuild,
    member: &serenity::Member,
) -> serenity::Permissions {
    let everyone = serenity::RoleId::new(guild.id.get());
    let granted = member
        .roles
        .iter()
        .chain(std::iter::once(&everyone))
        .filter_map(|id| guild.roles.get(id))
        .map(|role| role.permissions);
    combine_permissions(granted, member.user.id == guild.owner_id)
}

fn combine_permissions(
    granted: impl IntoIterator<Item = serenity::Permissions>,
    is_owner: bool,
) -> serenity::Permissions {
    let combined = granted
        .into_iter()
        .fold(serenity::Permissions::empty(), |acc, perms| acc | perms);
    if is_owner || combined.contains(serenity::Permissions::ADMINISTRATOR) {
        serenity::Permissions::all()
    } else {
        combined
    }
}

/// Highest position among `member_roles`, 0 for `@everyone` only.
fn top_position(
    roles: &HashMap<serenity::RoleId, serenity::Role>,
    member_roles: &[serenity::RoleId],
) -> u16 {
    member_roles
        .iter()
        .filter_map(|id| roles.get(id))
        .map(|role| role.position)
        .max()
        .unwrap_or(0)
}

fn describe(source: serenity::Error) -> anyhow::Error {
    if is_missing_permissions_error(&source) {
        anyhow::Error::new(source).context("missing permissions (check role hierarchy)")
    } else {
        source.into()
    }
}

fn is_missing_permissions_error(source: &serenity::Error) -> bool {
    matches!(
        source,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 403 || response.error.code == 50013
    )
}

fn is_unknown_member_error(source: &serenity::Error) -> bool {
    matches!(
        source,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 404
                || response.error.code == 10007
                || response.error.code == 10013
    )
}
