/// Highest permission tier. Reserved for the server owner and trusted admins.
pub const MAX_LEVEL: u8 = 3;
pub const MIN_LEVEL: u8 = 0;

/// Level required for informational commands (ping, hello, level, warns, help).
pub const LEVEL_OPEN: u8 = 0;
/// Level required for kick, mute, unmute and warn.
pub const LEVEL_MODERATOR: u8 = 1;
/// Level required for ban, unban and banlist.
pub const LEVEL_SENIOR: u8 = 2;
/// Level required for promote, demote, key generation and verification setup.
pub const LEVEL_ADMIN: u8 = MAX_LEVEL;

/// The guild owner passes every check regardless of the stored level.
pub fn can_use(actor_level: u8, required_level: u8, is_guild_owner: bool) -> bool {
    actor_level >= required_level || is_guild_owner
}

/// Level-3 users are immune to ban, kick and mute.
pub fn is_admin_protected(target_level: u8) -> bool {
    target_level == MAX_LEVEL
}

pub fn clamp_level(level: i64) -> u8 {
    level.clamp(i64::from(MIN_LEVEL), i64::from(MAX_LEVEL)) as u8
}

/// Result of a one-step level change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelChange {
    Changed { from: u8, to: u8 },
    AtMaximum,
    AtMinimum,
}

pub fn promote_level(current: u8) -> LevelChange {
    let current = clamp_level(i64::from(current));
    if current >= MAX_LEVEL {
        LevelChange::AtMaximum
    } else {
        LevelChange::Changed {
            from: current,
            to: current + 1,
        }
    }
}

pub fn demote_level(current: u8) -> LevelChange {
    let current = clamp_level(i64::from(current));
    if current <= MIN_LEVEL {
        LevelChange::AtMinimum
    } else {
        LevelChange::Changed {
            from: current,
            to: current - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        LevelChange, can_use, clamp_level, demote_level, is_admin_protected, promote_level,
    };

    #[test]
    fn can_use_truth_table() {
        for level in 0..=3 {
            for required in 0..=3 {
                assert_eq!(can_use(level, required, false), level >= required);
                assert!(can_use(level, required, true));
            }
        }
    }

    #[test]
    fn only_level_three_is_protected() {
        assert!(is_admin_protected(3));
        assert!(!is_admin_protected(2));
        assert!(!is_admin_protected(0));
    }

    #[test]
    fn levels_are_clamped() {
        assert_eq!(clamp_level(-4), 0);
        assert_eq!(clamp_level(2), 2);
        assert_eq!(clamp_level(9), 3);
    }

    #[test]
    fn promote_and_demote_respect_bounds() {
        assert_eq!(promote_level(0), LevelChange::Changed { from: 0, to: 1 });
        assert_eq!(promote_level(3), LevelChange::AtMaximum);
        assert_eq!(demote_level(3), LevelChange::Changed { from: 3, to: 2 });
        assert_eq!(demote_level(0), LevelChange::AtMinimum);
    }
}
