/// Response language picked per inbound event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lang {
    #[default]
    Ru,
    En,
}

impl Lang {
    /// Russian when the text contains any Cyrillic letter, English otherwise.
    pub fn detect(text: &str) -> Self {
        if text.chars().any(is_cyrillic_letter) {
            Self::Ru
        } else {
            Self::En
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ru" => Some(Self::Ru),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

fn is_cyrillic_letter(ch: char) -> bool {
    matches!(ch, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

#[cfg(test)]
mod tests {
    use super::Lang;

    #[test]
    fn detects_cyrillic() {
        assert_eq!(Lang::detect("!бан @user"), Lang::Ru);
        assert_eq!(Lang::detect("!ban @user спам"), Lang::Ru);
        assert_eq!(Lang::detect("!ban @user"), Lang::En);
        assert_eq!(Lang::detect("ЁЖИК"), Lang::Ru);
        assert_eq!(Lang::detect(""), Lang::En);
    }

    #[test]
    fn parses_codes() {
        assert_eq!(Lang::from_code(" RU "), Some(Lang::Ru));
        assert_eq!(Lang::from_code("en"), Some(Lang::En));
        assert_eq!(Lang::from_code("de"), None);
    }
}
