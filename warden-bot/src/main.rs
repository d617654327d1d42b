mod events;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use warden_commands::DiscordGateway;
use warden_commands::access::interaction_lang;
use warden_commands::maintenance::{bootstrap_owner, purge_expired};
use warden_core::{BotConfig, Data, Error, UserLocks};
use warden_database::{CacheService, Database, MIGRATOR, MemoryStore, ModerationStore};
use warden_utils::embed::command_failure_embed;
use warden_utils::time::now_unix_secs;

use events::reactions::ReactionChange;

const PURGE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN")?;
    let config = Arc::new(BotConfig::from_env()?);
    let store = connect_store().await?;

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::DIRECT_MESSAGES;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: warden_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let store = store.clone();
            let config = config.clone();
            Box::pin(async move {
                info!("Warden is on duty.");

                let guild_id = serenity::GuildId::new(config.guild_id);
                poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                    .await?;

                let gateway =
                    DiscordGateway::new(ctx.http.clone(), guild_id, ctx.cache.current_user().id);
                match bootstrap_owner(store.as_ref(), &gateway, now_unix_secs()).await {
                    Ok(owner_id) => info!(owner_id, "guild owner bootstrapped"),
                    Err(source) => warn!(?source, "failed to bootstrap guild owner level"),
                }

                tokio::spawn(purge_loop(store.clone()));

                Ok(Data {
                    store,
                    config,
                    user_locks: UserLocks::default(),
                })
            })
        })
        .build();

    info!("Warden is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, an in-memory store otherwise.
async fn connect_store() -> anyhow::Result<Arc<dyn ModerationStore>> {
    let Ok(database_url) = env::var("DATABASE_URL") else {
        warn!("DATABASE_URL is missing; using the in-memory store, data is lost on restart.");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let db = Database::with_cache(db_pool, connect_cache().await);

    if env_bool("AUTO_RUN_MIGRATIONS", true) {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    Ok(Arc::new(db))
}

async fn connect_cache() -> CacheService {
    let redis_key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "warden:prod".to_string());

    if !env_bool("REDIS_ENABLED", false) {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        return CacheService::disabled(redis_key_prefix);
    }

    let cache = match env::var("REDIS_URL") {
        Ok(redis_url) => match CacheService::redis(&redis_url, redis_key_prefix.clone()) {
            Ok(cache) => {
                info!(key_prefix = %redis_key_prefix, "Redis cache enabled.");
                cache
            }
            Err(err) => {
                warn!(?err, key_prefix = %redis_key_prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
                return CacheService::disabled(redis_key_prefix);
            }
        },
        Err(_) => {
            warn!(key_prefix = %redis_key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
            return CacheService::disabled(redis_key_prefix);
        }
    };

    if let Err(err) = cache.ping().await {
        warn!(
            ?err,
            "Redis cache ping failed; cache operations will continue with fallback behavior."
        );
    } else {
        info!("Redis cache health check passed.");
    }

    cache
}

async fn purge_loop(store: Arc<dyn ModerationStore>) {
    let mut interval = tokio::time::interval(PURGE_INTERVAL);
    loop {
        interval.tick().await;
        match purge_expired(store.as_ref(), now_unix_secs()).await {
            Ok(report) => info!(
                warnings_removed = report.warnings_removed,
                keys_expired = report.keys_expired,
                "expired records purged"
            ),
            Err(source) => error!(?source, "periodic purge failed"),
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = command_failure_embed(interaction_lang(ctx));
            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = format!("Usage: `/{}`", ctx.command().qualified_name);
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\n{}", input, usage)
            } else {
                format!("Missing required argument.\n{}", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::UnknownInteraction { interaction, .. } => {
            debug!(name = %interaction.data.name, "unknown interaction");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            events::messages::handle_message_command(ctx, data, new_message).await;
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            events::reactions::handle_reaction(ctx, data, add_reaction, ReactionChange::Added)
                .await;
        }
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            events::reactions::handle_reaction(
                ctx,
                data,
                removed_reaction,
                ReactionChange::Removed,
            )
            .await;
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            events::members::handle_member_join(ctx, data, new_member).await;
        }
        serenity::FullEvent::GuildMemberRemoval { guild_id, user, .. } => {
            events::members::handle_member_leave(data, *guild_id, user);
        }
        _ => {}
    }

    Ok(())
}
