use std::sync::LazyLock;

use regex::Regex;

use crate::formatting::{DurationUnit, format_duration_label};
use crate::lang::Lang;

/// Duration picked out of free-form command arguments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParsedDuration {
    pub value: f64,
    pub unit: DurationUnit,
}

impl ParsedDuration {
    pub fn millis(&self) -> f64 {
        self.value * self.unit.millis() as f64
    }

    pub fn label(&self, lang: Lang) -> String {
        format_duration_label(self.value, self.unit, lang)
    }
}

/// Scan `tokens` from `start` for the first token beginning with a number.
///
/// The unit is read from the rest of that token, or from the next token when
/// the number stands alone. Unknown units fall back to hours.
pub fn parse_duration_tokens<S: AsRef<str>>(tokens: &[S], start: usize) -> Option<ParsedDuration> {
    for index in start..tokens.len() {
        let token = tokens[index].as_ref();
        let Some((value, rest)) = leading_number(token) else {
            continue;
        };

        let unit_token = if rest.is_empty() {
            tokens
                .get(index + 1)
                .map(|next| next.as_ref().to_lowercase())
                .unwrap_or_default()
        } else {
            rest.to_lowercase()
        };

        return Some(ParsedDuration {
            value,
            unit: classify_unit(&unit_token),
        });
    }

    None
}

fn leading_number(token: &str) -> Option<(f64, &str)> {
    let bytes = token.as_bytes();
    let mut cursor = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        cursor += 1;
    }

    let digits_start = cursor;
    while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
        cursor += 1;
    }
    if cursor == digits_start {
        return None;
    }

    if cursor + 1 < bytes.len() && bytes[cursor] == b'.' && bytes[cursor + 1].is_ascii_digit() {
        cursor += 1;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
    }

    let value = token[..cursor].parse::<f64>().ok()?;
    Some((value, &token[cursor..]))
}

fn classify_unit(unit: &str) -> DurationUnit {
    if unit.starts_with('ч') || unit.starts_with('h') || unit.contains("час") {
        DurationUnit::Hours
    } else if unit.starts_with('м') || unit.starts_with('m') || unit.contains("мин") {
        DurationUnit::Minutes
    } else if unit.starts_with('с') || unit.starts_with('s') || unit.contains("сек") {
        DurationUnit::Seconds
    } else {
        DurationUnit::Hours
    }
}

// Longer spellings first: alternation is leftmost-first.
const PHRASE_UNITS: &str = "секунды|секунда|секунду|секунд|seconds|second|\
минуты|минута|минуту|минут|minutes|minute|\
часов|часа|час|hours|hour|\
дней|день|дня|days|day|\
secs|sec|mins|min|hrs|hr|сек|мин|дн|s|m|h|d|с|м|ч|д";

static DURATION_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?i)\b\d+(?:[.,]\d+)?\s*(?:{units})(?:\s*\d+(?:[.,]\d+)?\s*(?:{units}))*\b",
        units = PHRASE_UNITS
    );
    Regex::new(&pattern).expect("duration phrase pattern is valid")
});

/// Remove every duration phrase (`2ч`, `30 min`, `1д2ч`, ...) from `input`
/// and collapse the remaining whitespace. Separators left dangling at either
/// end (`2ч, спам`) are dropped too.
pub fn strip_duration_phrases(input: &str) -> String {
    let stripped = DURATION_PHRASE.replace_all(input, " ");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '-') || c.is_whitespace())
        .to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationFormatError {
    #[error("invalid duration `{input}`; accepted formats: <number>d, <number>h, <number>m (e.g. 1d, 2h, 30m)")]
    Invalid { input: String },
}

/// Duration accepted by the strict `<integer><d|h|m>` grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrictDuration {
    pub amount: u64,
    pub unit: DurationUnit,
    pub iso: String,
    pub millis: u64,
}

impl StrictDuration {
    pub fn label(&self, lang: Lang) -> String {
        format_duration_label(self.amount as f64, self.unit, lang)
    }
}

static STRICT_DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([dhm])$").expect("strict duration pattern is valid"));

pub fn parse_strict_duration(raw: &str) -> Result<StrictDuration, DurationFormatError> {
    let invalid = || DurationFormatError::Invalid {
        input: raw.to_owned(),
    };

    let captures = STRICT_DURATION.captures(raw.trim()).ok_or_else(invalid)?;
    let amount = captures[1].parse::<u64>().map_err(|_| invalid())?;
    if amount == 0 {
        return Err(invalid());
    }

    let (unit, iso) = match &captures[2] {
        "d" => (DurationUnit::Days, format!("P{}D", amount)),
        "h" => (DurationUnit::Hours, format!("PT{}H", amount)),
        _ => (DurationUnit::Minutes, format!("PT{}M", amount)),
    };
    let millis = amount.checked_mul(unit.millis()).ok_or_else(invalid)?;

    Ok(StrictDuration {
        amount,
        unit,
        iso,
        millis,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        DurationFormatError, parse_duration_tokens, parse_strict_duration, strip_duration_phrases,
    };
    use crate::formatting::DurationUnit;
    use crate::lang::Lang;

    fn parse(tokens: &[&str]) -> Option<(f64, DurationUnit)> {
        parse_duration_tokens(tokens, 0).map(|parsed| (parsed.millis(), parsed.unit))
    }

    #[test]
    fn attached_units() {
        assert_eq!(parse(&["2ч"]), Some((7_200_000.0, DurationUnit::Hours)));
        assert_eq!(parse(&["30m"]), Some((1_800_000.0, DurationUnit::Minutes)));
        assert_eq!(parse(&["45сек"]), Some((45_000.0, DurationUnit::Seconds)));
        assert_eq!(parse(&["10s"]), Some((10_000.0, DurationUnit::Seconds)));
        assert_eq!(parse(&["15мин"]), Some((900_000.0, DurationUnit::Minutes)));
    }

    #[test]
    fn unit_in_next_token() {
        assert_eq!(
            parse(&["3", "часа", "флуд"]),
            Some((10_800_000.0, DurationUnit::Hours))
        );
        assert_eq!(
            parse(&["5", "minutes"]),
            Some((300_000.0, DurationUnit::Minutes))
        );
    }

    #[test]
    fn unknown_or_missing_unit_defaults_to_hours() {
        assert_eq!(parse(&["4"]), Some((14_400_000.0, DurationUnit::Hours)));
        assert_eq!(parse(&["2x"]), Some((7_200_000.0, DurationUnit::Hours)));
        assert_eq!(parse(&["1д2ч"]), Some((3_600_000.0, DurationUnit::Hours)));
    }

    #[test]
    fn fractional_and_signed_values() {
        assert_eq!(parse(&["1.5h"]), Some((5_400_000.0, DurationUnit::Hours)));
        assert_eq!(parse(&["-2ч"]), Some((-7_200_000.0, DurationUnit::Hours)));
    }

    #[test]
    fn skips_tokens_without_leading_number_and_honours_start() {
        assert_eq!(
            parse(&["спам", "10м"]),
            Some((600_000.0, DurationUnit::Minutes))
        );
        assert_eq!(parse(&["спам", "флуд"]), None);
        assert_eq!(parse(&["abc5"]), None);
        assert!(parse_duration_tokens(&["2ч", "reason"], 1).is_none());
    }

    #[test]
    fn labels_follow_the_parsed_unit() {
        let parsed = parse_duration_tokens(&["21ч"], 0).unwrap();
        assert_eq!(parsed.label(Lang::Ru), "21 час");
        assert_eq!(parsed.label(Lang::En), "21 hours");
    }

    #[test]
    fn strips_duration_phrases_from_reason() {
        assert_eq!(strip_duration_phrases("2ч спам в чате"), "спам в чате");
        assert_eq!(strip_duration_phrases("1д2ч флуд"), "флуд");
        assert_eq!(strip_duration_phrases("флуд 1д 2ч в войсе"), "флуд в войсе");
        assert_eq!(strip_duration_phrases("30 minutes spamming"), "spamming");
        assert_eq!(strip_duration_phrases("2 часа"), "");
        assert_eq!(strip_duration_phrases("read rule 5"), "read rule 5");
        assert_eq!(strip_duration_phrases("2чата"), "2чата");
        assert_eq!(strip_duration_phrases("2ч, спам"), "спам");
        assert_eq!(strip_duration_phrases("-2ч спам"), "спам");
        assert_eq!(strip_duration_phrases("флуд; 30m"), "флуд");
    }

    #[test]
    fn strict_grammar_accepts_exact_tokens() {
        let day = parse_strict_duration("1d").unwrap();
        assert_eq!(day.iso, "P1D");
        assert_eq!(day.millis, 86_400_000);
        assert_eq!(day.label(Lang::Ru), "1 день");

        let hours = parse_strict_duration("2h").unwrap();
        assert_eq!(hours.iso, "PT2H");
        assert_eq!(hours.millis, 7_200_000);
        assert_eq!(hours.label(Lang::Ru), "2 часа");

        let minutes = parse_strict_duration("30m").unwrap();
        assert_eq!(minutes.iso, "PT30M");
        assert_eq!(minutes.millis, 1_800_000);
        assert_eq!(minutes.label(Lang::Ru), "30 минут");
    }

    #[test]
    fn strict_grammar_rejects_everything_else() {
        for raw in ["", "1", "d", "1.5h", "2 h", "1w", "1D", "-1d", "0m", "1h30m", "abc"] {
            assert_eq!(
                parse_strict_duration(raw),
                Err(DurationFormatError::Invalid {
                    input: raw.to_owned()
                }),
                "{raw:?} should be rejected"
            );
        }
    }
}
