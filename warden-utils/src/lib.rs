/// Generic embed builders shared across commands.
pub mod embed;
/// Duration labels and plural forms.
pub mod formatting;
/// Response language detection.
pub mod lang;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Pure parser helpers.
pub mod parse;
/// Level-based permission model.
pub mod permissions;
/// Shared time helpers.
pub mod time;
