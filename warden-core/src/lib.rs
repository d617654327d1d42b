pub mod config;
pub mod gateway;
pub mod locks;

use std::sync::Arc;

use warden_database::ModerationStore;

pub use config::BotConfig;
pub use gateway::{BanEntry, GuildGateway, MemberInfo, RoleSpec, TargetRef};
pub use locks::UserLocks;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub store: Arc<dyn ModerationStore>,
    pub config: Arc<BotConfig>,
    pub user_locks: UserLocks,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
