use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::SeedableRng;
use sha2::{Digest, Sha256};

use crate::intent::rank_candidates;
use crate::models::Place;

/// Places kept after the variety shuffle.
pub const FINAL_PICKS: usize = 5;

const TAGS_SHOWN: usize = 3;

const REPLY_TEMPLATES: &[&str] = &[
    "Here are a few good picks in {city_title}:\n{list}\n\nWant more like these or a different vibe?",
    "Top options in {city_title} right now:\n{list}\n\nTell me if you prefer views, quick bites, or sit-down.",
    "Based on your message, try these in {city_title}:\n{list}\n\nI can narrow by price, cuisine, or distance.",
    "Locals like these in {city_title}:\n{list}\n\nSay \u{201c}more cafes\u{201d}, \u{201c}late-night\u{201d}, or \u{201c}kid-friendly\u{201d}.",
    "Shortlist for {city_title}:\n{list}\n\nI can map them or find spots near your location.",
];

#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: String,
    /// False when the requested city had no catalog entries and the fixed
    /// fallback reply was returned instead of a scored shortlist.
    pub matched_city: bool,
}

/// Lower-cased requested city, falling back to the configured default.
pub fn resolve_city(city: Option<&str>, default_city: &str) -> String {
    city.map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default_city)
        .to_lowercase()
}

pub fn candidates_for_city<'a>(places: &'a [Place], city: &str) -> Vec<&'a Place> {
    places
        .iter()
        .filter(|place| place.city.to_lowercase() == city)
        .collect()
}

pub fn no_data_reply(city: &str) -> String {
    format!("I don't have data for {city} yet. Try Sydney or Melbourne.")
}

/// Full chat pipeline over the catalog: resolve the city, score and rank the
/// candidates, apply the message-seeded variety shuffle, render one of the
/// reply templates.
pub fn chat_reply(
    places: &[Place],
    message: &str,
    city: Option<&str>,
    default_city: &str,
) -> ChatOutcome {
    let city = resolve_city(city, default_city);
    let candidates = candidates_for_city(places, &city);

    if candidates.is_empty() {
        return ChatOutcome {
            reply: no_data_reply(&city),
            matched_city: false,
        };
    }

    let mut picks = rank_candidates(message, &candidates);
    variety_shuffle(message, &mut picks);

    ChatOutcome {
        reply: render_reply(&city, &picks),
        matched_city: true,
    }
}

/// Reorder the ranked pool with an RNG seeded from the message text, then keep
/// [`FINAL_PICKS`]. The seed depends only on the message, so the permutation
/// is reproducible across runs and across concurrent requests.
pub fn variety_shuffle(message: &str, picks: &mut Vec<&Place>) {
    let mut rng = StdRng::seed_from_u64(message_seed(message));
    picks.shuffle(&mut rng);
    picks.truncate(FINAL_PICKS);
}

/// Pick a template (fresh randomness, template choice is allowed to vary
/// between identical requests) and fill in the city and the bulleted list.
pub fn render_reply(city: &str, picks: &[&Place]) -> String {
    let template = REPLY_TEMPLATES
        .choose(&mut rand::rng())
        .unwrap_or(&REPLY_TEMPLATES[0]);

    template
        .replace("{city_title}", &title_case(city))
        .replace("{list}", &format_place_lines(picks))
}

/// `- Name (type, area) — tag1, tag2, tag3`, first three tags only; the dash
/// segment is dropped for untagged places.
pub fn format_place_lines(picks: &[&Place]) -> String {
    picks
        .iter()
        .map(|place| {
            let tags = place
                .tags
                .iter()
                .take(TAGS_SHOWN)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");

            let mut line = format!("- {} ({}, {})", place.name, place.kind, place.area);
            if !tags.is_empty() {
                line.push_str(" \u{2014} ");
                line.push_str(&tags);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn message_seed(message: &str) -> u64 {
    let digest = Sha256::digest(message.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

fn title_case(city: &str) -> String {
    let mut chars = city.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
