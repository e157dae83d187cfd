use std::borrow::Cow;
use std::str::FromStr;

pub trait QuoteNormalization {
    fn normalize<'a>(&self, line: &'a str) -> Cow<'a, str>;
}

/// Replaces every apostrophe with a double quote so Python-style dict
/// literals parse as JSON. Corrupts string values that contain apostrophes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApostropheToDoubleQuote;

impl QuoteNormalization for ApostropheToDoubleQuote {
    fn normalize<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if line.contains('\'') {
            Cow::Owned(line.replace('\'', "\""))
        } else {
            Cow::Borrowed(line)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verbatim;

impl QuoteNormalization for Verbatim {
    fn normalize<'a>(&self, line: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(line)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QuoteNormalizationKind {
    #[default]
    Apostrophe,
    Verbatim,
}

impl QuoteNormalization for QuoteNormalizationKind {
    fn normalize<'a>(&self, line: &'a str) -> Cow<'a, str> {
        match self {
            Self::Apostrophe => ApostropheToDoubleQuote.normalize(line),
            Self::Verbatim => Verbatim.normalize(line),
        }
    }
}

impl FromStr for QuoteNormalizationKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "apostrophe" => Ok(Self::Apostrophe),
            "verbatim" => Ok(Self::Verbatim),
            _ => Err(format!("unknown quote normalization '{value}'")),
        }
    }
}
