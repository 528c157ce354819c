use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::schedule::Meta;

static DATE_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+ \d+, \d{4})\s*-\s*(\w+ \d+, \d{4})").unwrap());
static SEASON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"selected="selected" value="\d+">([^<]+)</option>"#).unwrap()
});

/// Page-level metadata: session dates and the selected season.
pub fn extract(html: &str) -> Meta {
    let (start_date, end_date) = date_range(html).unwrap_or_default();
    Meta {
        season: season(html).unwrap_or_default(),
        start_date,
        end_date,
        ..Meta::default()
    }
}

/// First "January 5, 2026 - March 29, 2026" range, as ISO dates.
fn date_range(html: &str) -> Option<(String, String)> {
    let caps = DATE_RANGE_RE.captures(html)?;
    let start = parse_long_date(&caps[1]);
    let end = parse_long_date(&caps[2]);
    match (start, end) {
        (Some(s), Some(e)) => Some((iso(s), iso(e))),
        _ => {
            debug!("Unparseable session dates: {:?}", &caps[0]);
            None
        }
    }
}

fn parse_long_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%B %d, %Y").ok()
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn season(html: &str) -> Option<String> {
    let caps = SEASON_RE.captures(html)?;
    let season = caps[1].trim();
    (!season.is_empty()).then(|| season.to_string())
}
