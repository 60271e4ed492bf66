//! Timed effects: durations, expiry, and the world-level tracker.
//!
//! Effects with a time-tracked unit are kept in an [`EffectTracker`] sorted by
//! remaining duration so that expiry checks only ever look at the front of the
//! list. Unlimited and encounter-length effects are never time-tracked.
mod duration;
mod tracker;

pub use duration::{
    DurationUnit, EffectDuration, EffectSource, EffectStart, ExpiryTiming, Remaining,
    RemainingDuration,
};
pub use tracker::{EffectTracker, EncounterEndAction, TrackedEffect, encounter_end_changes};

/// Roll option set by an active effect, e.g. `self:effect:rage` for
/// `effect-rage` or `spell-effect-bless` becoming `self:effect:bless`.
pub fn effect_roll_option(slug: &str) -> String {
    format!("self:effect:{}", strip_effect_prefix(slug))
}

fn strip_effect_prefix(slug: &str) -> &str {
    const MARKERS: [&str; 2] = ["effect-", "stance-"];
    for marker in MARKERS {
        if let Some(rest) = slug.strip_prefix(marker) {
            return rest;
        }
    }
    if let Some((head, tail)) = slug.split_once('-')
        && !head.is_empty()
        && head.chars().all(|c| c.is_ascii_lowercase())
    {
        for marker in MARKERS {
            if let Some(rest) = tail.strip_prefix(marker) {
                return rest;
            }
        }
    }
    slug
}
