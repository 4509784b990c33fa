use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("text is {actual} characters long, the limit is {max}")]
pub struct TextTooLong {
    pub max: usize,
    pub actual: usize,
}

/// A string holding at most `MAX` Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoundedText<const MAX: usize>(String);

/// Free-text weather conditions, up to 100 characters.
pub type WeatherText = BoundedText<100>;

/// Free-text field notes, up to 500 characters.
pub type NotesText = BoundedText<500>;

impl<const MAX: usize> BoundedText<MAX> {
    pub fn new(text: impl Into<String>) -> Result<Self, TextTooLong> {
        let text = text.into();
        let actual = text.chars().count();
        if actual > MAX {
            return Err(TextTooLong { max: MAX, actual });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> TryFrom<String> for BoundedText<MAX> {
    type Error = TextTooLong;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<const MAX: usize> From<BoundedText<MAX>> for String {
    fn from(value: BoundedText<MAX>) -> Self {
        value.0
    }
}

impl<const MAX: usize> fmt::Display for BoundedText<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
