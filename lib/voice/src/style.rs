use std::fmt;
use std::str::FromStr;

use crate::exception::Exception;
use crate::exception::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Cheerful,
    Excited,
    Enthusiastic,
    Friendly,
    Prompt,
}

/// Rate and pitch change in percent, `None` means the attribute is not emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProsodyAdjustment {
    pub rate_percent: Option<i32>,
    pub pitch_percent: Option<i32>,
}

impl ProsodyAdjustment {
    pub fn is_absent(&self) -> bool {
        self.rate_percent.is_none() && self.pitch_percent.is_none()
    }
}

impl Style {
    pub const ALL: [Style; 5] = [Style::Cheerful, Style::Excited, Style::Enthusiastic, Style::Friendly, Style::Prompt];

    pub fn name(&self) -> &'static str {
        match self {
            Style::Cheerful => "Cheerful",
            Style::Excited => "Excited",
            Style::Enthusiastic => "Enthusiastic",
            Style::Friendly => "Friendly",
            Style::Prompt => "Prompt",
        }
    }

    pub fn prosody(&self) -> ProsodyAdjustment {
        let (rate, pitch) = match self {
            Style::Cheerful => (8, 5),
            Style::Excited => (12, 8),
            Style::Enthusiastic => (10, 6),
            Style::Friendly => (5, 3),
            Style::Prompt => return ProsodyAdjustment::default(),
        };
        ProsodyAdjustment {
            rate_percent: Some(rate),
            pitch_percent: Some(pitch),
        }
    }
}

// case insensitive, surrounding whitespace ignored
impl FromStr for Style {
    type Err = Exception;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        Style::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| Exception::UnknownStyle(value.to_string()))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn resolve_prosody(style: &str) -> Result<ProsodyAdjustment> {
    Ok(style.parse::<Style>()?.prosody())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjustment(rate: i32, pitch: i32) -> ProsodyAdjustment {
        ProsodyAdjustment {
            rate_percent: Some(rate),
            pitch_percent: Some(pitch),
        }
    }

    #[test]
    fn prosody_table() {
        assert_eq!(resolve_prosody("Cheerful").unwrap(), adjustment(8, 5));
        assert_eq!(resolve_prosody("Excited").unwrap(), adjustment(12, 8));
        assert_eq!(resolve_prosody("Enthusiastic").unwrap(), adjustment(10, 6));
        assert_eq!(resolve_prosody("Friendly").unwrap(), adjustment(5, 3));

        let prompt = resolve_prosody("Prompt").unwrap();
        assert!(prompt.is_absent());
        assert_eq!(prompt.rate_percent, None);
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!("cheerful".parse::<Style>().unwrap(), Style::Cheerful);
        assert_eq!(" EXCITED ".parse::<Style>().unwrap(), Style::Excited);
        assert_eq!(Style::Enthusiastic.to_string(), "Enthusiastic");
    }

    #[test]
    fn unknown_style_does_not_fall_back() {
        let error = resolve_prosody("loud").unwrap_err();
        assert!(matches!(error, Exception::UnknownStyle(style) if style == "loud"));
        assert!(matches!(resolve_prosody(""), Err(Exception::UnknownStyle(_))));
        assert!(matches!(resolve_prosody("narration-relaxed"), Err(Exception::UnknownStyle(_))));
    }
}
