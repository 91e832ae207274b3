//! Recognised phrases per input category.
//!
//! `yes`, `no` and `config` are fixed word lists. `place` mirrors the named
//! waypoints on the backend and is rebuilt before every resolution in the
//! `start` phase, because destinations are managed server-side and change
//! between sessions. A [`Lexicon`] is an immutable snapshot: refreshing
//! produces a new value instead of mutating a shared table.

use tracing::debug;

use crate::error::Result;
use crate::services::PlacesService;

const YES: &[&str] = &[
    "yes",
    "yeah",
    "yep",
    "sure",
    "ok",
    "okay",
    "of course",
    "sí",
    "si",
    "claro",
    "dale",
    "vale",
    "por supuesto",
];

const NO: &[&str] = &[
    "no",
    "nope",
    "nah",
    "no thanks",
    "not really",
    "no gracias",
    "negativo",
    "para nada",
];

const CONFIG: &[&str] = &[
    "config",
    "configure",
    "configurar",
    "configuración",
    "settings",
    "ajustes",
];

/// Input category a phrase belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Yes,
    No,
    Config,
    Place,
}

/// Snapshot of every recognised phrase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    places: Vec<String>,
}

impl Lexicon {
    /// Lexicon with the static categories only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lexicon whose `place` category is `names` (blank and duplicate names dropped).
    pub fn with_places<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut places: Vec<String> = Vec::new();
        for name in names {
            let name: String = name.into();
            let trimmed = name.trim();
            if trimmed.is_empty() || places.iter().any(|p| p.eq_ignore_ascii_case(trimmed)) {
                continue;
            }
            places.push(trimmed.to_owned());
        }
        Self { places }
    }

    /// Fetch the current place names and build a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns the places service error; the caller decides whether to fall
    /// back to the static categories.
    pub async fn refreshed(service: &dyn PlacesService) -> Result<Self> {
        let lexicon = Self::with_places(service.list_place_names().await?);
        debug!(places = lexicon.places.len(), "lexicon refreshed");
        Ok(lexicon)
    }

    pub fn places(&self) -> &[String] {
        &self.places
    }

    /// Phrases of one category, in lexicon order.
    pub fn phrases(&self, category: Category) -> Vec<&str> {
        match category {
            Category::Yes => YES.to_vec(),
            Category::No => NO.to_vec(),
            Category::Config => CONFIG.to_vec(),
            Category::Place => self.places.iter().map(String::as_str).collect(),
        }
    }
}
