//! Every user-facing string, keyed by language and reply kind.

use warden_core::BanEntry;
use warden_database::model::warnings::WarningEntry;
use warden_utils::lang::Lang;

use crate::{COMMANDS, CommandMeta};

/// Discord rejects messages above 2000 characters.
const MESSAGE_BUDGET: usize = 1_900;

#[derive(Clone, Copy, Debug)]
pub enum Reply<'a> {
    OfficialChannelsOnly,
    NoPermission,
    MemberNotFound { input: &'a str },
    DefaultReason,

    Pong,
    Hello { name: &'a str },
    Help,

    BanListEmpty,
    BanList { entries: &'a [BanEntry] },
    Banned { user: &'a str, reason: &'a str },
    CannotBan,
    BanFailed,
    MissingUnbanId,
    NotInBanList { id: &'a str },
    Unbanned { user: &'a str },
    UnbanFailed,

    Kicked { user: &'a str, reason: &'a str },
    CannotKick,
    KickFailed,

    Muted { user: &'a str, duration: &'a str, reason: &'a str },
    CannotMute,
    MuteFailed,
    NotMuted { user: &'a str },
    Unmuted { user: &'a str },
    UnmuteFailed,

    Warned { user: &'a str, count: usize, reason: &'a str },
    AutoBanned { user: &'a str },
    AutoBanRefused { user: &'a str, count: usize },
    WarnsList { entries: &'a [WarningEntry] },
    WarnsNone,
    WarnsSent,

    YourLevel { level: u8 },
    LevelSent,
    DeliveryFailed,
    Promoted { user: &'a str, level: u8 },
    Demoted { user: &'a str, level: u8 },
    AlreadyMax { user: &'a str },
    AlreadyMin { user: &'a str },

    Welcome { user_id: u64, verification_channel: Option<u64> },
    VerificationPrompt,
    VerifiedNotice,
    UnverifiedNotice,
    VerificationAdminError,
    VerificationReady { channel_id: u64 },
    VerificationChannelMissing,
    VerificationSetupFailed,

    KeyGenerated { key: &'a str, duration: Option<&'a str> },
    KeyInvalidDuration { error: &'a str },
    KeyGenerationFailed,
}

pub fn render(lang: Lang, reply: Reply<'_>) -> String {
    use Lang::{En, Ru};

    match (reply, lang) {
        (Reply::OfficialChannelsOnly, Ru) => {
            "я могу отвечать только в официальных каналах сервера.".to_owned()
        }
        (Reply::OfficialChannelsOnly, En) => {
            "i can only respond in the official server channels.".to_owned()
        }
        (Reply::NoPermission, Ru) => "у вас нет прав для этой команды".to_owned(),
        (Reply::NoPermission, En) => "you don't have permission to use this command".to_owned(),
        (Reply::MemberNotFound { input }, Ru) => {
            format!("пользователь {} не найден на сервере", input)
        }
        (Reply::MemberNotFound { input }, En) => {
            format!("user {} was not found on this server", input)
        }
        (Reply::DefaultReason, Ru) => "без причины".to_owned(),
        (Reply::DefaultReason, En) => "no reason given".to_owned(),

        (Reply::Pong, Ru) => "понг! бот работает".to_owned(),
        (Reply::Pong, En) => "pong! the bot is up".to_owned(),
        (Reply::Hello { name }, Ru) => format!("привет {}", name),
        (Reply::Hello { name }, En) => format!("hello {}", name),
        (Reply::Help, lang) => help_text(lang),

        (Reply::BanListEmpty, Ru) => "банлист пуст".to_owned(),
        (Reply::BanListEmpty, En) => "the ban list is empty".to_owned(),
        (Reply::BanList { entries }, lang) => {
            let header = match lang {
                Ru => "забаненные пользователи:",
                En => "banned users:",
            };
            bounded_list(header, entries.iter().map(|ban| {
                format!("{} (id: {})", ban.display_name, ban.user_id)
            }), lang)
        }
        (Reply::Banned { user, reason }, Ru) => {
            format!("пользователь {} был забанен. причина: {}", user, reason)
        }
        (Reply::Banned { user, reason }, En) => {
            format!("user {} has been banned. reason: {}", user, reason)
        }
        (Reply::CannotBan, Ru) => "невозможно забанить этого пользователя".to_owned(),
        (Reply::CannotBan, En) => "this user can't be banned".to_owned(),
        (Reply::BanFailed, Ru) => "не удалось забанить пользователя. проверьте права бота.".to_owned(),
        (Reply::BanFailed, En) => "i couldn't ban that user. check the bot's permissions.".to_owned(),
        (Reply::MissingUnbanId, Ru) => "укажите id для разбана".to_owned(),
        (Reply::MissingUnbanId, En) => "specify the id to unban".to_owned(),
        (Reply::NotInBanList { id }, Ru) => {
            format!("пользователь с id {} отсутствует в банлисте", id)
        }
        (Reply::NotInBanList { id }, En) => format!("user with id {} is not in the ban list", id),
        (Reply::Unbanned { user }, Ru) => format!("пользователь {} был разбанен", user),
        (Reply::Unbanned { user }, En) => format!("user {} has been unbanned", user),
        (Reply::UnbanFailed, Ru) => "не удалось разбанить пользователя. проверьте права бота.".to_owned(),
        (Reply::UnbanFailed, En) => "i couldn't unban that user. check the bot's permissions.".to_owned(),

        (Reply::Kicked { user, reason }, Ru) => {
            format!("пользователь {} был кикнут. причина: {}", user, reason)
        }
        (Reply::Kicked { user, reason }, En) => {
            format!("user {} has been kicked. reason: {}", user, reason)
        }
        (Reply::CannotKick, Ru) => "невозможно кикнуть этого пользователя".to_owned(),
        (Reply::CannotKick, En) => "this user can't be kicked".to_owned(),
        (Reply::KickFailed, Ru) => "не удалось кикнуть пользователя. проверьте права бота.".to_owned(),
        (Reply::KickFailed, En) => "i couldn't kick that user. check the bot's permissions.".to_owned(),

        (Reply::Muted { user, duration, reason }, Ru) => {
            format!("пользователь {} был замучен на {}. причина: {}", user, duration, reason)
        }
        (Reply::Muted { user, duration, reason }, En) => {
            format!("user {} has been muted for {}. reason: {}", user, duration, reason)
        }
        (Reply::CannotMute, Ru) => "невозможно замутить этого пользователя".to_owned(),
        (Reply::CannotMute, En) => "this user can't be muted".to_owned(),
        (Reply::MuteFailed, Ru) => {
            "ошибка при выдаче мута. убедитесь, что у бота есть права и корректное время.".to_owned()
        }
        (Reply::MuteFailed, En) => {
            "couldn't mute that user. make sure the bot has permission and the duration is valid."
                .to_owned()
        }
        (Reply::NotMuted { user }, Ru) => format!("пользователь {} не замучен", user),
        (Reply::NotMuted { user }, En) => format!("user {} is not muted", user),
        (Reply::Unmuted { user }, Ru) => format!("пользователь {} был размучен", user),
        (Reply::Unmuted { user }, En) => format!("user {} has been unmuted", user),
        (Reply::UnmuteFailed, Ru) => "не удалось снять мут. проверьте права бота.".to_owned(),
        (Reply::UnmuteFailed, En) => "couldn't remove the mute. check the bot's permissions.".to_owned(),

        (Reply::Warned { user, count, reason }, Ru) => format!(
            "пользователь {} получил предупреждение. причина: {}. всего: {}",
            user, reason, count
        ),
        (Reply::Warned { user, count, reason }, En) => format!(
            "user {} has been warned. reason: {}. active warnings: {}",
            user, reason, count
        ),
        (Reply::AutoBanned { user }, Ru) => {
            format!("пользователь {} получил 3 предупреждения за 7 дней и был забанен", user)
        }
        (Reply::AutoBanned { user }, En) => {
            format!("user {} received 3 warnings within 7 days and has been banned", user)
        }
        (Reply::AutoBanRefused { user, count }, Ru) => format!(
            "пользователь {} набрал {} предупреждений за 7 дней, но забанить его не удалось. предупреждения сохранены.",
            user, count
        ),
        (Reply::AutoBanRefused { user, count }, En) => format!(
            "user {} has {} warnings within 7 days but could not be banned. the warnings were kept.",
            user, count
        ),
        (Reply::WarnsList { entries }, lang) => {
            let header = match lang {
                Ru => "ваши активные предупреждения (за последние 7 дней):",
                En => "your active warnings (last 7 days):",
            };
            bounded_list(
                header,
                entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| format!("{}. {}", index + 1, entry.reason)),
                lang,
            )
        }
        (Reply::WarnsNone, Ru) => "у вас нет активных предупреждений".to_owned(),
        (Reply::WarnsNone, En) => "you have no active warnings".to_owned(),
        (Reply::WarnsSent, Ru) => "предупреждения отправлены в лс".to_owned(),
        (Reply::WarnsSent, En) => "your warnings were sent to your DMs".to_owned(),

        (Reply::YourLevel { level }, Ru) => format!("ваш текущий уровень {}", level),
        (Reply::YourLevel { level }, En) => format!("your current level is {}", level),
        (Reply::LevelSent, Ru) => "уровень отправлен в лс".to_owned(),
        (Reply::LevelSent, En) => "your level was sent to your DMs".to_owned(),
        (Reply::DeliveryFailed, Ru) => "не удалось отправить сообщение в лс".to_owned(),
        (Reply::DeliveryFailed, En) => "i couldn't send you a direct message".to_owned(),
        (Reply::Promoted { user, level }, Ru) => {
            format!("пользователь {} был повышен, текущий уровень {}", user, level)
        }
        (Reply::Promoted { user, level }, En) => {
            format!("user {} has been promoted, current level {}", user, level)
        }
        (Reply::Demoted { user, level }, Ru) => {
            format!("пользователь {} был понижен, текущий уровень {}", user, level)
        }
        (Reply::Demoted { user, level }, En) => {
            format!("user {} has been demoted, current level {}", user, level)
        }
        (Reply::AlreadyMax { user }, Ru) => format!("у пользователя {} уже максимальный уровень", user),
        (Reply::AlreadyMax { user }, En) => format!("user {} is already at the maximum level", user),
        (Reply::AlreadyMin { user }, Ru) => format!("у пользователя {} уже минимальный уровень", user),
        (Reply::AlreadyMin { user }, En) => format!("user {} is already at the minimum level", user),

        (Reply::Welcome { user_id, verification_channel }, Ru) => match verification_channel {
            Some(channel_id) => format!(
                "добро пожаловать, <@{}>! пройдите верификацию в канале <#{}>.",
                user_id, channel_id
            ),
            None => format!("добро пожаловать, <@{}>!", user_id),
        },
        (Reply::Welcome { user_id, verification_channel }, En) => match verification_channel {
            Some(channel_id) => format!(
                "welcome, <@{}>! please verify yourself in <#{}>.",
                user_id, channel_id
            ),
            None => format!("welcome, <@{}>!", user_id),
        },
        (Reply::VerificationPrompt, Ru) => {
            "нажмите ✅ под этим сообщением, чтобы пройти верификацию и получить доступ к серверу.".to_owned()
        }
        (Reply::VerificationPrompt, En) => {
            "react with ✅ to this message to verify and unlock the server.".to_owned()
        }
        (Reply::VerifiedNotice, Ru) => "вы прошли верификацию. добро пожаловать!".to_owned(),
        (Reply::VerifiedNotice, En) => "you are now verified. welcome!".to_owned(),
        (Reply::UnverifiedNotice, Ru) => {
            "вы убрали реакцию и снова не верифицированы.".to_owned()
        }
        (Reply::UnverifiedNotice, En) => {
            "you removed your reaction and are no longer verified.".to_owned()
        }
        (Reply::VerificationAdminError, Ru) => {
            "не удалось выдать роль: ошибка настройки сервера. сообщите администрации.".to_owned()
        }
        (Reply::VerificationAdminError, En) => {
            "couldn't grant the role because of a server configuration error. please tell an admin."
                .to_owned()
        }
        (Reply::VerificationReady { channel_id }, Ru) => {
            format!("сообщение для верификации опубликовано в <#{}>", channel_id)
        }
        (Reply::VerificationReady { channel_id }, En) => {
            format!("verification message posted in <#{}>", channel_id)
        }
        (Reply::VerificationChannelMissing, Ru) => "канал верификации не настроен".to_owned(),
        (Reply::VerificationChannelMissing, En) => {
            "no verification channel is configured".to_owned()
        }
        (Reply::VerificationSetupFailed, Ru) => {
            "не удалось настроить верификацию. проверьте права бота.".to_owned()
        }
        (Reply::VerificationSetupFailed, En) => {
            "couldn't set up verification. check the bot's permissions.".to_owned()
        }

        (Reply::KeyGenerated { key, duration }, Ru) => match duration {
            Some(duration) => format!("ключ создан: `{}` (срок: {})", key, duration),
            None => format!("ключ создан: `{}` (бессрочный)", key),
        },
        (Reply::KeyGenerated { key, duration }, En) => match duration {
            Some(duration) => format!("key generated: `{}` (valid for {})", key, duration),
            None => format!("key generated: `{}` (no expiry)", key),
        },
        (Reply::KeyInvalidDuration { error }, Ru) => format!("неверная длительность: {}", error),
        (Reply::KeyInvalidDuration { error }, En) => format!("invalid duration: {}", error),
        (Reply::KeyGenerationFailed, Ru) => "не удалось создать уникальный ключ".to_owned(),
        (Reply::KeyGenerationFailed, En) => "couldn't generate a unique key".to_owned(),
    }
}

fn help_text(lang: Lang) -> String {
    let header = match lang {
        Lang::Ru => "команды:",
        Lang::En => "commands:",
    };

    let mut categories: Vec<&str> = Vec::new();
    for command in COMMANDS {
        if !categories.contains(&command.category) {
            categories.push(command.category);
        }
    }

    let mut out = String::from(header);
    for category in categories {
        out.push_str("\n\n");
        out.push_str(category_title(category, lang));
        for command in COMMANDS.iter().filter(|c| c.category == category) {
            out.push('\n');
            out.push_str(&help_line(command, lang));
        }
    }
    out
}

fn category_title(category: &str, lang: Lang) -> &str {
    match (category, lang) {
        ("utility", Lang::Ru) => "общие:",
        ("utility", Lang::En) => "general:",
        ("moderation", Lang::Ru) => "модерация:",
        ("moderation", Lang::En) => "moderation:",
        (other, _) => other,
    }
}

fn help_line(command: &CommandMeta, lang: Lang) -> String {
    let (name, usage, desc) = match lang {
        Lang::Ru => (command.alias, command.usage_ru, command.desc_ru),
        Lang::En => (command.name, command.usage, command.desc),
    };

    if usage.is_empty() {
        format!("!{} — {}", name, desc)
    } else {
        format!("!{} {} — {}", name, usage, desc)
    }
}

fn bounded_list(header: &str, lines: impl ExactSizeIterator<Item = String>, lang: Lang) -> String {
    let total = lines.len();
    let mut out = String::from(header);

    for (shown, line) in lines.enumerate() {
        if out.chars().count() + line.chars().count() + 1 > MESSAGE_BUDGET {
            let remaining = total - shown;
            out.push_str(&match lang {
                Lang::Ru => format!("\n…и ещё {}", remaining),
                Lang::En => format!("\n…and {} more", remaining),
            });
            break;
        }
        out.push('\n');
        out.push_str(&line);
    }

    out
}

#[cfg(test)]
mod tests {
    use warden_core::BanEntry;
    use warden_utils::lang::Lang;

    use super::{Reply, render};

    #[test]
    fn replies_follow_the_language() {
        assert_eq!(render(Lang::Ru, Reply::DefaultReason), "без причины");
        assert_eq!(render(Lang::En, Reply::DefaultReason), "no reason given");
        assert_eq!(
            render(Lang::Ru, Reply::MemberNotFound { input: "123" }),
            "пользователь 123 не найден на сервере"
        );
    }

    #[test]
    fn help_lists_localized_synonyms() {
        let ru = render(Lang::Ru, Reply::Help);
        assert!(ru.starts_with("команды:"));
        assert!(ru.contains("!мут"));
        assert!(ru.contains("!повысить"));

        let en = render(Lang::En, Reply::Help);
        assert!(en.contains("!mute"));
        assert!(en.contains("!demote"));
    }

    #[test]
    fn help_groups_commands_by_category() {
        let en = render(Lang::En, Reply::Help);
        let general = en.find("general:").unwrap();
        let moderation = en.find("moderation:").unwrap();
        assert!(general < en.find("!ping").unwrap());
        assert!(en.find("!warns").unwrap() < moderation);
        assert!(moderation < en.find("!ban").unwrap());

        let ru = render(Lang::Ru, Reply::Help);
        assert!(ru.find("общие:").unwrap() < ru.find("модерация:").unwrap());
    }

    #[test]
    fn long_ban_lists_are_truncated() {
        let entries: Vec<BanEntry> = (1..=200)
            .map(|id| BanEntry {
                user_id: 100_000_000_000_000_000 + id,
                display_name: format!("someone_with_a_long_name_{}", id),
            })
            .collect();

        let text = render(Lang::En, Reply::BanList { entries: &entries });
        assert!(text.chars().count() <= 2_000);
        assert!(text.starts_with("banned users:"));
        assert!(text.contains("more"));
    }
}
