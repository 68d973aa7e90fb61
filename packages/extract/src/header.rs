//! Header block parsing.
//!
//! The header lives on the first page as `LABEL: value` lines. Each field
//! has a documented fallback, so parsing a header never fails: a page with
//! no recognisable labels yields a [`HeaderInfo`] built entirely from
//! [`ExtractorConfig`] defaults.

use std::sync::LazyLock;

use regex::Regex;
use unico_order_models::{HeaderInfo, Location};

use crate::config::ExtractorConfig;
use crate::dates::{add_days, normalize_date};

static ISSUED_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ISSUED DATE:\s*(\d{1,2}\s+\w{3}\s+\d{4})").expect("valid regex")
});

static SHIP_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Ship Date:\s*(\d{1,2}\s+\w{3}\s+\d{4})").expect("valid regex")
});

/// Well-formed order numbers, e.g. `HDM-UB-12-2025-0227`.
static MPO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"MPO-NO:\s*([A-Z0-9-]+)").expect("valid regex"));

/// Anything after the label, for order numbers with unexpected characters.
static MPO_LOOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"MPO-NO:\s*([^\n]+)").expect("valid regex"));

static SEASON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"SEASON:\s*([^\n-]+)").expect("valid regex"));

static BUYER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"BUYER:\s*([^\n-]+)").expect("valid regex"));

/// Ship-to markers, checked in order. The first group with any marker
/// present in the text decides the region.
pub const LOCATION_MARKERS: &[(&[&str], Location)] = &[
    (&["BAC NINH", "UNICO GLOBAL VN"], Location::BacGiang),
    (&["LAO CAI", "YEN BAI", "UNICO GLOBAL YB"], Location::YenBai),
];

/// Parses the header fields from the first page's text.
#[must_use]
pub fn parse_header(text: &str, config: &ExtractorConfig) -> HeaderInfo {
    let issued_date = capture(&ISSUED_DATE_RE, text).map_or_else(
        || {
            log::warn!(
                "No ISSUED DATE found, using default {}",
                config.default_issued_date
            );
            config.default_issued_date.clone()
        },
        normalize_date,
    );

    let ship_date = capture(&SHIP_DATE_RE, text).map_or_else(
        || add_days(&issued_date, 1).unwrap_or_else(|| issued_date.clone()),
        normalize_date,
    );

    let purchase_order_number = capture(&MPO_RE, text)
        .filter(|s| !s.is_empty())
        .or_else(|| capture(&MPO_LOOSE_RE, text))
        .unwrap_or_default()
        .to_owned();

    let season = capture(&SEASON_RE, text).unwrap_or_default().to_owned();

    let buyer = capture(&BUYER_RE, text)
        .filter(|s| !s.is_empty())
        .map_or_else(|| config.default_buyer.clone(), str::to_owned);

    let location = infer_location(text, config.default_location);

    log::debug!(
        "Parsed header: po={purchase_order_number} issued={issued_date} ship={ship_date} \
         location={location}"
    );

    HeaderInfo {
        issued_date,
        ship_date,
        purchase_order_number,
        season,
        buyer,
        location,
    }
}

/// Infers the shipping region from marker substrings (case-insensitive).
#[must_use]
pub fn infer_location(text: &str, default: Location) -> Location {
    let upper = text.to_uppercase();
    LOCATION_MARKERS
        .iter()
        .find(|(markers, _)| contains_any(&upper, markers))
        .map_or(default, |(_, location)| *location)
}

/// Returns the trimmed first capture group of the first match.
fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
