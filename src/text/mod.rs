//! Phrase normalisation and translation for spoken prompts.
//!
//! Prompts and direction phrases are authored in English. [`translate`]
//! first looks the whole phrase up in the locale table; on a miss it falls
//! back to word-by-word translation, leaving unknown words untouched.

pub mod distance;
mod translations;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spoken language of prompts and narration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "es-CO")]
    EsCo,
}

impl Locale {
    /// Locale selected by the `spanish` preference.
    pub fn from_spanish(spanish: bool) -> Self {
        if spanish { Self::EsCo } else { Self::EnGb }
    }

    /// BCP-47 tag handed to the speech collaborators.
    pub fn code(self) -> &'static str {
        match self {
            Self::EnGb => "en-GB",
            Self::EsCo => "es-CO",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Trim surrounding whitespace and lowercase.
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Translate `phrase` into `locale`. Never fails: unknown text comes back unchanged.
pub fn translate(phrase: &str, locale: Locale) -> String {
    let lookup = match locale {
        Locale::EnGb => return phrase.to_owned(),
        Locale::EsCo => translations::spanish,
    };

    if let Some(direct) = lookup(&normalize(phrase)) {
        return direct.to_owned();
    }

    phrase
        .split(' ')
        .map(|word| lookup(&normalize(word)).unwrap_or(word))
        .collect::<Vec<_>>()
        .join(" ")
}
