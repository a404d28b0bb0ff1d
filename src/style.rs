//! Drawing styles as ordered key/value pairs.

use std::fmt;

/// A small set of presentation attributes (`fill`, `stroke`, `font-family`, ...).
///
/// Keys keep insertion order so the rendered output is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    entries: Vec<(&'static str, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn fill(self, value: impl Into<String>) -> Self {
        self.set("fill", value)
    }

    pub fn stroke(self, value: impl Into<String>) -> Self {
        self.set("stroke", value)
    }

    pub fn font_family(self, value: impl Into<String>) -> Self {
        self.set("font-family", value)
    }

    pub fn font_size(self, px: i32) -> Self {
        self.set("font-size", format!("{}px", px))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}:{}", key, value)?;
        }
        Ok(())
    }
}
