use crate::lang::Lang;

/// Units a duration phrase can be expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl DurationUnit {
    pub fn millis(self) -> u64 {
        match self {
            Self::Days => 86_400_000,
            Self::Hours => 3_600_000,
            Self::Minutes => 60_000,
            Self::Seconds => 1_000,
        }
    }
}

/// Slavic plural category of a whole number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PluralForm {
    One,
    Few,
    Many,
}

pub fn plural_form(value: u64) -> PluralForm {
    let last = value % 10;
    let last_two = value % 100;

    if last == 1 && last_two != 11 {
        PluralForm::One
    } else if (2..=4).contains(&last) && !(12..=14).contains(&last_two) {
        PluralForm::Few
    } else {
        PluralForm::Many
    }
}

/// Format a duration amount as a human label, e.g. `21 час`, `3 минуты`, `1 hour`.
///
/// The value is rounded and taken by absolute value before choosing a form.
pub fn format_duration_label(value: f64, unit: DurationUnit, lang: Lang) -> String {
    let rounded = value.round().abs();
    let v = if rounded.is_finite() { rounded as u64 } else { 0 };

    let word = match lang {
        Lang::Ru => {
            let [one, few, many] = match unit {
                DurationUnit::Days => ["день", "дня", "дней"],
                DurationUnit::Hours => ["час", "часа", "часов"],
                DurationUnit::Minutes => ["минуту", "минуты", "минут"],
                DurationUnit::Seconds => ["секунду", "секунды", "секунд"],
            };
            match plural_form(v) {
                PluralForm::One => one,
                PluralForm::Few => few,
                PluralForm::Many => many,
            }
        }
        Lang::En => {
            let (one, other) = match unit {
                DurationUnit::Days => ("day", "days"),
                DurationUnit::Hours => ("hour", "hours"),
                DurationUnit::Minutes => ("minute", "minutes"),
                DurationUnit::Seconds => ("second", "seconds"),
            };
            if v == 1 { one } else { other }
        }
    };

    format!("{} {}", v, word)
}

#[cfg(test)]
mod tests {
    use super::{DurationUnit, PluralForm, format_duration_label, plural_form};
    use crate::lang::Lang;

    #[test]
    fn plural_categories() {
        assert_eq!(plural_form(1), PluralForm::One);
        assert_eq!(plural_form(21), PluralForm::One);
        assert_eq!(plural_form(11), PluralForm::Many);
        assert_eq!(plural_form(3), PluralForm::Few);
        assert_eq!(plural_form(13), PluralForm::Many);
        assert_eq!(plural_form(24), PluralForm::Few);
        assert_eq!(plural_form(0), PluralForm::Many);
        assert_eq!(plural_form(112), PluralForm::Many);
    }

    #[test]
    fn russian_hour_labels() {
        let label = |v| format_duration_label(v, DurationUnit::Hours, Lang::Ru);
        assert_eq!(label(1.0), "1 час");
        assert_eq!(label(2.0), "2 часа");
        assert_eq!(label(5.0), "5 часов");
        assert_eq!(label(11.0), "11 часов");
        assert_eq!(label(21.0), "21 час");
    }

    #[test]
    fn russian_minute_second_and_day_labels() {
        assert_eq!(
            format_duration_label(1.0, DurationUnit::Minutes, Lang::Ru),
            "1 минуту"
        );
        assert_eq!(
            format_duration_label(22.0, DurationUnit::Minutes, Lang::Ru),
            "22 минуты"
        );
        assert_eq!(
            format_duration_label(30.0, DurationUnit::Seconds, Lang::Ru),
            "30 секунд"
        );
        assert_eq!(
            format_duration_label(2.0, DurationUnit::Days, Lang::Ru),
            "2 дня"
        );
    }

    #[test]
    fn rounds_and_drops_sign() {
        assert_eq!(
            format_duration_label(1.6, DurationUnit::Hours, Lang::Ru),
            "2 часа"
        );
        assert_eq!(
            format_duration_label(-5.0, DurationUnit::Hours, Lang::Ru),
            "5 часов"
        );
    }

    #[test]
    fn english_labels() {
        assert_eq!(
            format_duration_label(1.0, DurationUnit::Hours, Lang::En),
            "1 hour"
        );
        assert_eq!(
            format_duration_label(30.0, DurationUnit::Minutes, Lang::En),
            "30 minutes"
        );
    }
}
