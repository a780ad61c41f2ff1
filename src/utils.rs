use chrono::{NaiveDate, Utc};

/// `YYYY-MM`, the month format the results API takes.
pub fn format_month_for_api(year: i32, month: u32) -> String {
    format!("{}-{:02}", year, month)
}

/// Upstream dates come either as `2025-01-03` or `2025-01-03T00:00:00`.
pub fn parse_draw_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn cache_bust_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_month_pads() {
        assert_eq!(format_month_for_api(2025, 1), "2025-01");
        assert_eq!(format_month_for_api(2025, 12), "2025-12");
    }

    #[test]
    fn test_parse_draw_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 3);
        assert_eq!(parse_draw_date("2025-01-03"), expected);
        assert_eq!(parse_draw_date("2025-01-03T00:00:00"), expected);
        assert_eq!(parse_draw_date(" 2025-01-03T20:30:00+08:00 "), expected);
        assert_eq!(parse_draw_date("114/01/03"), None);
        assert_eq!(parse_draw_date(""), None);
    }
}
