use tracing::error;

use warden_database::model::logs::ModerationAction;
use warden_utils::formatting::{DurationUnit, format_duration_label};
use warden_utils::lang::Lang;
use warden_utils::parse::{ParsedDuration, parse_duration_tokens, strip_duration_phrases};

use crate::CommandMeta;
use crate::moderation::logging::record;
use crate::moderation::{is_protected, resolve_target};
use crate::router::Invocation;
use crate::texts::{Reply, render};

pub const META: CommandMeta = CommandMeta {
    name: "mute",
    alias: "мут",
    desc: "Time out a member (default 1 hour, at most 28 days).",
    desc_ru: "замутить участника (по умолчанию на 1 час, максимум 28 дней)",
    category: "moderation",
    usage: "<@user|id> [duration] [reason]",
    usage_ru: "<@пользователь|id> [время] [причина]",
};

pub const DEFAULT_MUTE_MS: u64 = 3_600_000;
/// Platform ceiling for communication timeouts.
pub const MAX_MUTE_MS: u64 = 28 * 86_400_000;
const MAX_MUTE_DAYS: f64 = 28.0;

#[derive(Clone, Debug, PartialEq)]
pub struct MuteDuration {
    pub millis: u64,
    pub label: String,
}

impl MuteDuration {
    /// Apply the default and the ceiling to a parsed phrase.
    pub fn resolve(parsed: Option<ParsedDuration>, lang: Lang) -> Self {
        let Some(parsed) = parsed.filter(|p| p.millis().is_finite() && p.millis() > 0.0) else {
            return Self {
                millis: DEFAULT_MUTE_MS,
                label: format_duration_label(1.0, DurationUnit::Hours, lang),
            };
        };

        let millis = parsed.millis();
        if millis >= MAX_MUTE_MS as f64 {
            return Self {
                millis: MAX_MUTE_MS,
                label: format_duration_label(MAX_MUTE_DAYS, DurationUnit::Days, lang),
            };
        }

        Self {
            millis: (millis.round() as u64).max(1),
            label: parsed.label(lang),
        }
    }
}

pub async fn mute(inv: &Invocation<'_>) -> anyhow::Result<Option<String>> {
    let Some(target) = resolve_target(inv).await? else {
        return Ok(inv.say(Reply::MemberNotFound { input: inv.raw_target() }));
    };

    let rest = inv.args.get(1..).unwrap_or_default();
    let duration = MuteDuration::resolve(parse_duration_tokens(rest, 0), inv.lang);
    let mut reason = strip_duration_phrases(&rest.join(" "));
    if reason.is_empty() {
        reason = render(inv.lang, Reply::DefaultReason);
    }

    if !target.moderatable || is_protected(inv, &target).await? {
        record(inv, ModerationAction::Mute, target.user_id, &reason, Some(duration.millis), false)
            .await;
        return Ok(inv.say(Reply::CannotMute));
    }

    if let Err(source) = inv
        .gateway
        .set_timeout(target.user_id, Some(duration.millis), &reason)
        .await
    {
        error!(?source, user_id = target.user_id, "timeout request failed");
        record(inv, ModerationAction::Mute, target.user_id, &reason, Some(duration.millis), false)
            .await;
        return Ok(inv.say(Reply::MuteFailed));
    }

    record(inv, ModerationAction::Mute, target.user_id, &reason, Some(duration.millis), true).await;

    Ok(inv.say(Reply::Muted {
        user: &target.display_name,
        duration: &duration.label,
        reason: &reason,
    }))
}
