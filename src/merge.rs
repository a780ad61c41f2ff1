use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::{DrawRecord, GameFetchResult, Period};

/// Union of `archived` and `live` keyed by period. On a shared period the
/// live draw replaces the archived one. Output is newest first.
pub fn merge_draws(archived: &[DrawRecord], live: &[DrawRecord]) -> Vec<DrawRecord> {
    let mut by_period: HashMap<String, DrawRecord> = HashMap::new();
    for draw in archived.iter().chain(live) {
        by_period.insert(draw.period.to_string(), draw.clone());
    }

    let mut merged: Vec<DrawRecord> = by_period.into_values().collect();
    merged.sort_by(newest_first);
    merged
}

/// Applies [`merge_draws`] per game. Games present on only one side are kept
/// as they are (still sorted newest first).
pub fn merge_results(archived: &GameFetchResult, live: &GameFetchResult) -> GameFetchResult {
    let mut merged = GameFetchResult::new();
    for game in archived.keys().chain(live.keys()) {
        if merged.contains_key(game) {
            continue;
        }
        let old = archived.get(game).map(Vec::as_slice).unwrap_or_default();
        let new = live.get(game).map(Vec::as_slice).unwrap_or_default();
        merged.insert(*game, merge_draws(old, new));
    }
    merged
}

fn newest_first(a: &DrawRecord, b: &DrawRecord) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| compare_periods(&b.period, &a.period))
}

fn compare_periods(a: &Period, b: &Period) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
