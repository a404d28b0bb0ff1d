use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

/// How many display units a character occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WidthRule {
    /// Code points below U+0100 count 1, everything else 2.
    #[default]
    #[value(name = "latin1")]
    Latin1,
    /// East Asian Width as reported by `unicode-width`.
    #[value(name = "unicode")]
    Unicode,
}

impl WidthRule {
    pub fn char_width(self, c: char) -> i32 {
        match self {
            Self::Latin1 => {
                if (c as u32) < 0x100 {
                    1
                } else {
                    2
                }
            }
            Self::Unicode => UnicodeWidthChar::width(c).unwrap_or(0) as i32,
        }
    }

    pub fn width(self, text: &str) -> i32 {
        text.chars().map(|c| self.char_width(c)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextMetrics {
    /// Pixels per display unit.
    pub char_width: i32,
    pub font_size: i32,
    pub margin: i32,
    pub padding: i32,
    pub width_rule: WidthRule,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 8,
            font_size: 16,
            margin: 2,
            padding: 2,
            width_rule: WidthRule::Latin1,
        }
    }
}

impl TextMetrics {
    /// Width of `text` in display units.
    pub fn units(&self, text: &str) -> i32 {
        self.width_rule.width(text)
    }

    pub fn row_height(&self) -> i32 {
        self.font_size + self.padding * 2
    }

    /// Distance from a row's bottom edge to the text baseline.
    pub fn baseline(&self) -> i32 {
        2 + self.padding
    }

    pub fn corner_radius(&self) -> i32 {
        self.font_size >> 2
    }
}
