//! Map a raw transcript to a typed [`Input`].
//!
//! Two passes over the candidate phrases valid for the current phase:
//!
//! 1. **Exact**: the normalised transcript contains a candidate as a
//!    substring. When several match, the longest phrase wins so "cafeteria
//!    norte" beats "cafeteria" and "nope" beats "no".
//! 2. **Fuzzy**: otherwise the candidate with the smallest Levenshtein
//!    distance to the whole transcript is accepted if that distance is
//!    strictly below the configured threshold.
//!
//! Resolution is a pure function of `(transcript, phase, lexicon snapshot)`.

use std::fmt;

use tracing::debug;

use crate::config::ResolverConfig;
use crate::conversation::Phase;
use crate::conversation::lexicon::{Category, Lexicon};
use crate::text::distance::levenshtein;
use crate::text::normalize;

/// A resolved user answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Yes/no answer in the `config` phase.
    Answer(bool),
    /// The global "go to settings" command.
    Config,
    /// A recognised destination, spelled as the backend names it.
    Place(String),
    /// Nothing close enough was heard.
    Unrecognized,
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Answer(b) => write!(f, "{b}"),
            Input::Config => f.write_str("config"),
            Input::Place(p) => f.write_str(p),
            Input::Unrecognized => f.write_str("null"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputResolver {
    fuzzy_threshold: usize,
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::from_config(&ResolverConfig::default())
    }
}

impl InputResolver {
    pub fn new(fuzzy_threshold: usize) -> Self {
        Self { fuzzy_threshold }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.fuzzy_threshold)
    }

    pub fn resolve(&self, transcript: &str, phase: Phase, lexicon: &Lexicon) -> Input {
        let heard = normalize(transcript);
        if heard.is_empty() {
            return Input::Unrecognized;
        }

        let candidates = candidates(phase, lexicon);

        let matched = exact_match(&heard, &candidates).or_else(|| {
            let (category, phrase, distance) = closest(&heard, &candidates)?;
            debug!(phrase, distance, threshold = self.fuzzy_threshold, "fuzzy candidate");
            (distance < self.fuzzy_threshold).then_some((category, phrase))
        });

        let input = match matched {
            Some((Category::Yes, _)) => Input::Answer(true),
            Some((Category::No, _)) => Input::Answer(false),
            Some((Category::Config, _)) => Input::Config,
            Some((Category::Place, name)) => Input::Place(name.to_owned()),
            None => Input::Unrecognized,
        };
        debug!(?phase, transcript = %heard, %input, "input resolved");
        input
    }
}

fn candidates(phase: Phase, lexicon: &Lexicon) -> Vec<(Category, &str)> {
    let categories: &[Category] = match phase {
        Phase::Config => &[Category::Yes, Category::No],
        Phase::Start => &[Category::Place, Category::Config],
    };
    categories
        .iter()
        .flat_map(|&c| lexicon.phrases(c).into_iter().map(move |p| (c, p)))
        .collect()
}

fn exact_match<'a>(heard: &str, candidates: &[(Category, &'a str)]) -> Option<(Category, &'a str)> {
    let mut best: Option<(Category, &'a str, usize)> = None;
    for &(category, phrase) in candidates {
        let needle = normalize(phrase);
        if needle.is_empty() || !heard.contains(needle.as_str()) {
            continue;
        }
        let len = needle.chars().count();
        if best.is_none_or(|(_, _, best_len)| len > best_len) {
            best = Some((category, phrase, len));
        }
    }
    best.map(|(c, p, _)| (c, p))
}

fn closest<'a>(heard: &str, candidates: &[(Category, &'a str)]) -> Option<(Category, &'a str, usize)> {
    let mut best: Option<(Category, &'a str, usize)> = None;
    for &(category, phrase) in candidates {
        let distance = levenshtein(heard, &normalize(phrase));
        if best.is_none_or(|(_, _, d)| distance < d) {
            best = Some((category, phrase, distance));
        }
    }
    best
}
