//! Turns a results API response body into [`DrawRecord`]s.

use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::games::Game;
use crate::types::{DrawRecord, LotteryEnvelope, RawDraw};
use crate::utils::parse_draw_date;

/// Parses a response body into the envelope. A body that is not JSON, or an
/// envelope carrying a non-zero `rtCode`, fails the attempt that produced it.
pub fn parse_envelope(body: &str) -> Result<LotteryEnvelope, FetchError> {
    let envelope: LotteryEnvelope = serde_json::from_str(body)?;
    match envelope.rt_code {
        Some(code) if code != 0 => Err(FetchError::Payload(format!("rtCode={}", code))),
        _ => Ok(envelope),
    }
}

/// This game's record array. Missing `content`, a missing key, or an empty
/// or non-array value is [`FetchError::NoRecords`].
pub fn records_for(game: Game, envelope: &LotteryEnvelope) -> Result<&[Value], FetchError> {
    let content = envelope
        .content
        .as_ref()
        .and_then(Value::as_object)
        .ok_or_else(|| FetchError::NoRecords("no content object".to_string()))?;

    game.response_keys()
        .iter()
        .find_map(|key| content.get(*key).and_then(Value::as_array))
        .filter(|records| !records.is_empty())
        .map(Vec::as_slice)
        .ok_or_else(|| {
            FetchError::NoRecords(format!("content has no records under {:?}", game.response_keys()))
        })
}

/// Full pipeline for one response body, used to accept or reject an attempt.
pub fn normalize_body(game: Game, body: &str) -> Result<Vec<DrawRecord>, FetchError> {
    let envelope = parse_envelope(body)?;
    let records = records_for(game, &envelope)?;
    Ok(normalize_records(game, records))
}

pub fn normalize_records(game: Game, records: &[Value]) -> Vec<DrawRecord> {
    records
        .iter()
        .filter_map(|raw| match serde_json::from_value::<RawDraw>(raw.clone()) {
            Ok(draw) => draw.into_record(game),
            Err(e) => {
                debug!("{} skipping malformed record: {}", game, e);
                None
            }
        })
        .collect()
}

impl RawDraw {
    pub fn into_record(self, game: Game) -> Option<DrawRecord> {
        let period = self.resolved_period()?.clone();
        let raw_date = self.resolved_date().unwrap_or_default();
        let Some(date) = parse_draw_date(raw_date) else {
            debug!("{} period {} has unparseable date {:?}", game, period, raw_date);
            return None;
        };

        let appearance = self.draw_number_appear.or(self.winning_numbers);
        let numbers = parse_numbers(game, appearance.as_deref().unwrap_or_default());
        if numbers.is_empty() {
            debug!("{} period {} has no usable numbers", game, period);
            return None;
        }

        let numbers_by_size = self
            .draw_number_size
            .map(|values| parse_numbers(game, &values))
            .filter(|values| !values.is_empty());

        Some(DrawRecord {
            period,
            date,
            numbers,
            numbers_by_size,
        })
    }
}

/// Keeps entries that are integers inside the game's pool, in their original
/// order. Anything else is dropped.
pub fn parse_numbers(game: Game, values: &[Value]) -> Vec<u32> {
    values
        .iter()
        .filter_map(parse_number)
        .filter(|n| game.accepts(*n))
        .collect()
}

fn parse_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}
