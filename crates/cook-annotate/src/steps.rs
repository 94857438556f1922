use std::fmt;

/// Paragraph break the markup dialect uses between steps.
pub const STEP_BREAK: &str = ".\n\n";

/// Token the user chose to delimit instruction steps in the raw text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepSeparator {
    #[default]
    Period,
    Semicolon,
    Newline,
}

impl StepSeparator {
    pub fn as_str(self) -> &'static str {
        match self {
            StepSeparator::Period => ".",
            StepSeparator::Semicolon => ";",
            StepSeparator::Newline => "\n",
        }
    }
}

impl fmt::Display for StepSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepSeparator::Period => "period",
            StepSeparator::Semicolon => "semicolon",
            StepSeparator::Newline => "newline",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for StepSeparator {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "." | "period" => Ok(StepSeparator::Period),
            ";" | "semicolon" => Ok(StepSeparator::Semicolon),
            "\n" | "\\n" | "newline" => Ok(StepSeparator::Newline),
            _ => Err(()),
        }
    }
}

/// Rewrite every exact `separator + space` sequence into the paragraph
/// break convention. A separator at end-of-string, or followed by anything
/// other than a single space, stays untouched. Apply exactly once per
/// fresh input: the output itself still contains `". "`-free breaks that a
/// second pass must not see.
pub fn normalize_steps(text: &str, separator: StepSeparator) -> String {
    let pattern = format!("{} ", separator.as_str());
    text.replace(&pattern, STEP_BREAK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn period_separator_produces_paragraph_breaks() {
        let normalized = normalize_steps("Waschen. Schneiden. Kochen.", StepSeparator::Period);
        assert_eq!(normalized, "Waschen.\n\nSchneiden.\n\nKochen.");
    }

    #[test]
    fn semicolon_separator_rewrites_to_period_break() {
        let normalized = normalize_steps("Waschen; Schneiden", StepSeparator::Semicolon);
        assert_eq!(normalized, "Waschen.\n\nSchneiden");
    }

    #[test]
    fn newline_separator_matches_newline_space() {
        let normalized = normalize_steps("Waschen\n Schneiden", StepSeparator::Newline);
        assert_eq!(normalized, "Waschen.\n\nSchneiden");
    }

    #[test]
    fn separator_at_end_of_string_is_untouched() {
        let normalized = normalize_steps("Kochen.", StepSeparator::Period);
        assert_eq!(normalized, "Kochen.");
    }

    #[test]
    fn separator_before_punctuation_is_untouched() {
        let normalized = normalize_steps("Waschen.- Schneiden.", StepSeparator::Period);
        assert_eq!(normalized, "Waschen.- Schneiden.");
    }

    #[test]
    fn parses_user_facing_tokens() {
        assert_eq!(".".parse(), Ok(StepSeparator::Period));
        assert_eq!("newline".parse(), Ok(StepSeparator::Newline));
        assert_eq!("\\n".parse(), Ok(StepSeparator::Newline));
        assert!("|".parse::<StepSeparator>().is_err());
    }
}
