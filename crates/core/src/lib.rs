pub mod geo;
pub mod intent;
pub mod models;
pub mod reply;

pub use geo::{haversine_km, nearest};
pub use intent::{rank_candidates, score_place, searchable_text, tokenize};
pub use models::{NearbyPlace, Place};
pub use reply::{candidates_for_city, chat_reply, no_data_reply, resolve_city, ChatOutcome};
