//! Match scoring for a single sailboat against a search term.
//!
//! Each field of a boat is ranked against each token of the term using a
//! tiered scheme (exact, prefix, word prefix, substring, acronym, fuzzy).
//! Tiers map to a score in `[0, 1]` where lower is better, so results can be
//! sorted ascending with the best match first.

use crate::dataset::Sailboat;
use once_cell::sync::Lazy;
use regex::Regex;
use std::rc::Rc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static NON_ALNUM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

/// Worst possible score for a match that still counts.
pub const MAX_SCORE: f64 = 1.0;

/// How well a token matched one candidate string, best tier first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ranking {
    Equal,
    StartsWith,
    WordStartsWith,
    Contains,
    Acronym,
    /// In-order subsequence match; the value is the closeness in `(0, 1]`.
    Fuzzy(f64),
    NoMatch,
}

impl Ranking {
    /// Base score of the tier before any field penalty.
    pub fn base_score(&self) -> Option<f64> {
        match *self {
            Ranking::Equal => Some(0.0),
            Ranking::StartsWith => Some(0.1),
            Ranking::WordStartsWith => Some(0.2),
            Ranking::Contains => Some(0.3),
            Ranking::Acronym => Some(0.45),
            Ranking::Fuzzy(closeness) => Some(0.9 - 0.4 * closeness.clamp(0.0, 1.0)),
            Ranking::NoMatch => None,
        }
    }
}

/// A boat that matched, with its score (lower is better).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub score: f64,
    pub item: Rc<Sailboat>,
}

/// Lowercase and strip diacritics, so "Sundén" and "sunden" compare equal.
///
/// Decomposes to NFD and drops the combining marks.
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// [`fold`] for a single character, keeping a one-to-one mapping.
pub fn fold_char(c: char) -> char {
    std::iter::once(c)
        .nfd()
        .find(|d| !is_combining_mark(*d))
        .and_then(|d| d.to_lowercase().next())
        .unwrap_or(c)
}

/// Fold, then collapse every run of punctuation/whitespace into a single space.
pub fn normalize(text: &str) -> String {
    NON_ALNUM_REGEX
        .replace_all(&fold(text), " ")
        .trim()
        .to_string()
}

/// `normalize` without separators, so "J/24" and "j24" meet.
pub fn compact(text: &str) -> String {
    NON_ALNUM_REGEX.replace_all(&fold(text), "").into_owned()
}

fn acronym(normalized: &str) -> String {
    normalized
        .split(' ')
        .filter_map(|word| word.chars().next())
        .collect()
}

/// Greedy in-order character match; closeness is `1 / spread` of the match.
fn closeness(candidate: &str, token: &str) -> Option<f64> {
    let mut chars = candidate.chars().enumerate();
    let mut first: Option<usize> = None;
    let mut last = 0;

    for wanted in token.chars() {
        let (pos, _) = chars.find(|&(_, c)| c == wanted)?;
        first.get_or_insert(pos);
        last = pos;
    }

    let spread = last - first.unwrap_or(0);
    if spread == 0 {
        Some(1.0)
    } else {
        Some(1.0 / spread as f64)
    }
}

/// Rank one already-normalized token against a raw candidate string.
pub fn rank(candidate: &str, token: &str) -> Ranking {
    if token.is_empty() {
        return Ranking::NoMatch;
    }

    let words = normalize(candidate);
    if words == token {
        return Ranking::Equal;
    }
    if words.starts_with(token) {
        return Ranking::StartsWith;
    }
    if words.contains(&format!(" {}", token)) {
        return Ranking::WordStartsWith;
    }
    if words.contains(token) {
        return Ranking::Contains;
    }

    // Tokens never contain separators, but candidates might split what the
    // user typed as one word ("j24" vs "J/24").
    let joined = compact(candidate);
    if joined == token {
        return Ranking::Equal;
    }
    if joined.starts_with(token) {
        return Ranking::StartsWith;
    }
    if joined.contains(token) {
        return Ranking::Contains;
    }

    if token.chars().count() > 1 && acronym(&words).contains(token) {
        return Ranking::Acronym;
    }

    match closeness(&joined, token) {
        Some(c) => Ranking::Fuzzy(c),
        None => Ranking::NoMatch,
    }
}

/// Fields searched on each boat with the penalty added to their tier score.
fn weighted_fields(boat: &Sailboat) -> Vec<(String, f64)> {
    let mut fields = vec![
        (boat.name.clone(), 0.0),
        (boat.designer.clone(), 0.05),
        (boat.builder.clone(), 0.05),
        (boat.rig.clone(), 0.1),
        (boat.hull.clone(), 0.1),
    ];
    if let Some(year) = boat.first_built {
        fields.push((year.to_string(), 0.1));
    }
    fields
}

/// Score `boat` against `term`, or `None` when some token matches nothing.
///
/// Every token must match at least one field. A token's score is its best
/// field score; the boat's score is the mean over all tokens.
pub fn score_match(boat: &Rc<Sailboat>, term: &str) -> Option<SearchResult> {
    let normalized = normalize(term);
    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return None;
    }

    let fields = weighted_fields(boat);
    let mut total = 0.0;

    for token in &tokens {
        let best = fields
            .iter()
            .filter_map(|(value, penalty)| {
                rank(value, token)
                    .base_score()
                    .map(|base| (base + penalty).min(MAX_SCORE))
            })
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.min(s))))?;
        total += best;
    }

    Some(SearchResult {
        score: total / tokens.len() as f64,
        item: boat.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boat(name: &str, designer: &str) -> Rc<Sailboat> {
        Rc::new(Sailboat {
            id: name.to_lowercase(),
            name: name.to_string(),
            designer: designer.to_string(),
            builder: "Various".to_string(),
            first_built: Some(1977),
            loa_ft: Some(24.0),
            rig: "Fractional sloop".to_string(),
            hull: "Monohull".to_string(),
        })
    }

    #[test]
    fn normalizes_punctuation_and_case() {
        assert_eq!(normalize("  Hallberg-Rassy 42 "), "hallberg rassy 42");
        assert_eq!(normalize("J/24"), "j 24");
        assert_eq!(compact("J/24"), "j24");
        assert_eq!(normalize("Nautor's Swan"), "nautor s swan");
    }

    #[test]
    fn folds_diacritics() {
        assert_eq!(fold("Tord Sundén"), "tord sunden");
        assert_eq!(normalize("André Cornu"), "andre cornu");
        assert_eq!(compact("Per Brohäll"), "perbrohall");
        assert_eq!(fold_char('É'), 'e');
        assert_eq!(fold_char('/'), '/');
    }

    #[test]
    fn plain_spelling_finds_accented_names() {
        let folkboat = boat("Nordic Folkboat", "Tord Sundén");
        assert!(score_match(&folkboat, "sunden").is_some());
        assert!(score_match(&folkboat, "Sundén").is_some());
        assert!(score_match(&boat("470", "André Cornu"), "andre cornu").is_some());
    }

    #[test]
    fn ranking_tiers() {
        assert_eq!(rank("Laser", "laser"), Ranking::Equal);
        assert_eq!(rank("Catalina 22", "cat"), Ranking::StartsWith);
        assert_eq!(rank("Santa Cruz 27", "cruz"), Ranking::WordStartsWith);
        assert_eq!(rank("Sunfish", "fish"), Ranking::Contains);
        assert_eq!(rank("J/24", "j24"), Ranking::Equal);
        assert_eq!(rank("Island Packet 35", "ip"), Ranking::Acronym);
        assert!(matches!(rank("Flying Scot", "fscot"), Ranking::Fuzzy(_)));
        assert_eq!(rank("Laser", "xyz"), Ranking::NoMatch);
        assert_eq!(rank("Laser", ""), Ranking::NoMatch);
    }

    #[test]
    fn tier_scores_are_ordered() {
        let scores: Vec<f64> = [
            Ranking::Equal,
            Ranking::StartsWith,
            Ranking::WordStartsWith,
            Ranking::Contains,
            Ranking::Acronym,
            Ranking::Fuzzy(1.0),
            Ranking::Fuzzy(0.1),
        ]
        .iter()
        .map(|r| r.base_score().unwrap())
        .collect();
        assert!(scores.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Ranking::NoMatch.base_score(), None);
    }

    #[test]
    fn exact_name_scores_zero() {
        let result = score_match(&boat("Laser", "Bruce Kirby"), "LASER").unwrap();
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn name_beats_designer() {
        let by_name = score_match(&boat("Kirby 25", "Someone"), "kirby").unwrap();
        let by_designer = score_match(&boat("Laser", "Bruce Kirby"), "kirby").unwrap();
        assert!(by_name.score < by_designer.score);
    }

    #[test]
    fn every_token_must_match() {
        let laser = boat("Laser", "Bruce Kirby");
        assert!(score_match(&laser, "laser kirby").is_some());
        assert!(score_match(&laser, "laser qqq").is_none());
    }

    #[test]
    fn year_is_searchable() {
        assert!(score_match(&boat("J/24", "Rod Johnstone"), "1977").is_some());
    }

    #[test]
    fn blank_term_matches_nothing() {
        assert!(score_match(&boat("Laser", "Bruce Kirby"), " / ").is_none());
    }

    #[test]
    fn scores_stay_in_range() {
        let b = boat("Westsail 32", "William Crealock");
        for term in ["w", "ws", "wsl", "crealock", "monohull", "sloop 1977", "w3"] {
            if let Some(r) = score_match(&b, term) {
                assert!((0.0..=MAX_SCORE).contains(&r.score), "{} -> {}", term, r.score);
            }
        }
    }
}
