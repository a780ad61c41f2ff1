use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::games::Game;

/// Upstream draw identifier. The provider has sent it both as a JSON number
/// and as a string, so both are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Period {
    Number(i64),
    Text(String),
}

impl Period {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Period::Number(n) => Some(*n),
            Period::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Period::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Number(n) => write!(f, "{}", n),
            Period::Text(s) => f.write_str(s.trim()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRecord {
    pub period: Period,
    pub date: NaiveDate,
    /// Winning numbers in the order they were drawn.
    pub numbers: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbers_by_size: Option<Vec<u32>>,
}

/// Draws per game for one acquisition cycle, most recent first. A game that
/// failed this cycle has no entry.
pub type GameFetchResult = BTreeMap<Game, Vec<DrawRecord>>;

/// Top-level shape of every results API response.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LotteryEnvelope {
    #[serde(default)]
    pub rt_code: Option<i64>,
    #[serde(default)]
    pub content: Option<Value>,
}

/// One raw record as the provider sends it. The provider has used two names
/// for the period (`drawTerm`, `period`) and for the date (`lotteryDate`,
/// `date`), and records have been seen mixing them, so each is resolved on
/// its own.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawDraw {
    #[serde(default)]
    pub draw_term: Option<Period>,
    #[serde(default)]
    pub period: Option<Period>,
    #[serde(default)]
    pub lottery_date: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub draw_number_appear: Option<Vec<Value>>,
    #[serde(default)]
    pub draw_number_size: Option<Vec<Value>>,
    #[serde(default)]
    pub winning_numbers: Option<Vec<Value>>,
}

impl RawDraw {
    /// `drawTerm` first, then `period`; blank values are skipped.
    pub fn resolved_period(&self) -> Option<&Period> {
        self.draw_term
            .iter()
            .chain(self.period.iter())
            .find(|p| !p.is_blank())
    }

    /// `lotteryDate` first, then `date`; blank values are skipped.
    pub fn resolved_date(&self) -> Option<&str> {
        self.lottery_date
            .iter()
            .chain(self.date.iter())
            .map(|d| d.trim())
            .find(|d| !d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_period_accepts_number_and_string() {
        let n: Period = serde_json::from_value(json!(113000123)).unwrap();
        let s: Period = serde_json::from_value(json!("113000123")).unwrap();
        assert_eq!(n, Period::Number(113000123));
        assert_eq!(s, Period::Text("113000123".to_string()));
        assert_eq!(n.to_string(), s.to_string());
        assert_eq!(s.as_number(), Some(113000123));
    }

    #[test]
    fn test_raw_draw_resolves_each_field_on_its_own() {
        let current: RawDraw = serde_json::from_value(json!({
            "period": 114000001,
            "lotteryDate": "2025-01-02T00:00:00"
        }))
        .unwrap();
        assert_eq!(current.resolved_period(), Some(&Period::Number(114000001)));
        assert_eq!(current.resolved_date(), Some("2025-01-02T00:00:00"));

        let mixed: RawDraw = serde_json::from_value(json!({
            "drawTerm": "114000002",
            "date": "2025-01-03"
        }))
        .unwrap();
        assert_eq!(mixed.resolved_period(), Some(&Period::Text("114000002".to_string())));
        assert_eq!(mixed.resolved_date(), Some("2025-01-03"));
    }

    #[test]
    fn test_raw_draw_prefers_draw_term_and_lottery_date() {
        let both: RawDraw = serde_json::from_value(json!({
            "drawTerm": 7,
            "period": 8,
            "lotteryDate": "2025-01-07",
            "date": "2025-01-08"
        }))
        .unwrap();
        assert_eq!(both.resolved_period(), Some(&Period::Number(7)));
        assert_eq!(both.resolved_date(), Some("2025-01-07"));

        let blank_first: RawDraw = serde_json::from_value(json!({
            "drawTerm": "",
            "period": 8,
            "lotteryDate": " ",
            "date": "2025-01-08"
        }))
        .unwrap();
        assert_eq!(blank_first.resolved_period(), Some(&Period::Number(8)));
        assert_eq!(blank_first.resolved_date(), Some("2025-01-08"));

        let missing: RawDraw = serde_json::from_value(json!({ "foo": 1 })).unwrap();
        assert_eq!(missing.resolved_period(), None);
        assert_eq!(missing.resolved_date(), None);
    }

    #[test]
    fn test_draw_record_json_shape() {
        let record = DrawRecord {
            period: Period::Number(1),
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            numbers: vec![3, 1, 2],
            numbers_by_size: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({ "period": 1, "date": "2025-03-04", "numbers": [3, 1, 2] }));
    }
}
