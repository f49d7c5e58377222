use std::cmp::Reverse;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Place;

/// Travel intents mapped to their trigger words. A bucket contributes +3 when
/// the query mentions one of its triggers and the place text carries either
/// the bucket name or one of the triggers.
pub const SEMANTIC_BUCKETS: &[(&str, &[&str])] = &[
    (
        "brunch",
        &[
            "brunch",
            "breakfast",
            "eggs",
            "pancake",
            "avocado",
            "sourdough",
            "cafe",
        ],
    ),
    (
        "coffee",
        &["coffee", "latte", "roastery", "espresso", "flat", "white"],
    ),
    (
        "attraction",
        &[
            "attraction",
            "landmark",
            "museum",
            "gallery",
            "park",
            "garden",
            "opera",
            "harbour",
        ],
    ),
    (
        "restaurant",
        &[
            "restaurant",
            "dinner",
            "lunch",
            "eat",
            "food",
            "thai",
            "malaysian",
            "fine",
            "dining",
        ],
    ),
    ("views", &["view", "harbour", "skyline", "rooftop"]),
    ("cbd", &["cbd", "city", "downtown", "central"]),
];

const CBD_TRIGGERS: &[&str] = &["cbd", "city", "downtown", "central"];

const LOCALITY_CUES: &[&str] = &[
    "cbd",
    "haymarket",
    "circular quay",
    "surry hills",
    "potts point",
    "alexandria",
];

const DIRECT_HIT_POINTS: u32 = 2;
const BUCKET_POINTS: u32 = 3;
const CBD_NUDGE_POINTS: u32 = 2;

/// Maximum scored places kept before the variety shuffle.
pub const TOP_POOL: usize = 8;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+").expect("valid token regex"));

/// Lower-case alphabetic runs; everything else is a separator.
pub fn tokenize(input: &str) -> Vec<String> {
    let lowered = input.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Name, type, area and tags joined into one lower-cased haystack for
/// substring scoring.
pub fn searchable_text(place: &Place) -> String {
    format!(
        "{} {} {} {}",
        place.name,
        place.kind,
        place.area,
        place.tags.join(" ")
    )
    .to_lowercase()
}

/// Deterministic integer relevance of one place against the query tokens.
/// Only tests set membership of tokens, so word order never changes the
/// score.
pub fn score_place(tokens: &[String], place: &Place) -> u32 {
    let text = searchable_text(place);
    let mut score = 0;

    for token in tokens {
        if text.contains(token.as_str()) {
            score += DIRECT_HIT_POINTS;
        }
    }

    for (bucket, triggers) in SEMANTIC_BUCKETS {
        let queried = triggers.iter().any(|word| has_token(tokens, word));
        if queried && (text.contains(bucket) || triggers.iter().any(|word| text.contains(word))) {
            score += BUCKET_POINTS;
        }
    }

    if CBD_TRIGGERS.iter().any(|word| has_token(tokens, word))
        && LOCALITY_CUES.iter().any(|cue| text.contains(cue))
    {
        score += CBD_NUDGE_POINTS;
    }

    score
}

/// Score every candidate, keep positive scores in descending order (stable,
/// so ties preserve catalog order) capped at [`TOP_POOL`]. When nothing
/// scores, fall back to the first candidates in catalog order.
pub fn rank_candidates<'a>(message: &str, candidates: &[&'a Place]) -> Vec<&'a Place> {
    let tokens = tokenize(message);

    let mut scored: Vec<(u32, &Place)> = candidates
        .iter()
        .map(|place| (score_place(&tokens, place), *place))
        .collect();
    scored.sort_by_key(|(score, _)| Reverse(*score));

    let top: Vec<&Place> = scored
        .iter()
        .filter(|(score, _)| *score > 0)
        .take(TOP_POOL)
        .map(|(_, place)| *place)
        .collect();

    if top.is_empty() {
        scored
            .into_iter()
            .take(TOP_POOL)
            .map(|(_, place)| place)
            .collect()
    } else {
        top
    }
}

fn has_token(tokens: &[String], word: &str) -> bool {
    tokens.iter().any(|token| token == word)
}
