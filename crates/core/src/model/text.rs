use std::fmt;
use std::marker::PhantomData;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("text must not be empty")]
    Empty,
}

/// Trimmed, non-empty text tagged with the slot it fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text<T>(String, PhantomData<T>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Front;
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Back;
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Title;

pub type FrontText = Text<Front>;
pub type BackText = Text<Back>;
pub type DeckTitle = Text<Title>;

impl<T> Text<T> {
    /// Parses and trims the given text.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for empty or whitespace-only input.
    pub fn parse(s: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned(), PhantomData))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T> fmt::Display for Text<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
