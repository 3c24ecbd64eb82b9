//! Stored hop records.
//!
//! One or more hops per line, separated by ` || `. Each hop reads
//! `ip asn rtt (city, region, country, continent)`, for example:
//!
//! ```text
//! 192.0.2.1 AS64500 10.42 (Chicago, Illinois, US, NA) || 198.51.100.7 64501 None (None, None, CA, NA)
//! ```

use std::path::Path;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use super::types::{CapturedHop, PlaceDescriptor};
use crate::error_handling::{HopParseError, SourceError};

const HOP_SEPARATOR: &str = " || ";
const HOP_PATTERN: &str = r"^(?P<ip>\S+)\s+(?P<asn>\S+)\s+(?P<rtt>\S+)\s+\((?P<place>[^()]*)\)$";

/// Markers meaning "no value" in any field.
const UNKNOWN_MARKERS: &[&str] = &["none", "null", "unknown", "n/a", "-", "*"];

fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

static HOP_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(HOP_PATTERN, "HOP_RE"));

/// Hops read from a source, in path order, plus the ones that were skipped.
#[derive(Debug, Default)]
pub struct ParsedHops {
    pub hops: Vec<CapturedHop>,
    pub skipped: Vec<HopParseError>,
}

/// Reads and parses a stored hop file.
pub async fn load_hop_file(path: &Path) -> Result<ParsedHops, SourceError> {
    let content = tokio::fs::read_to_string(path).await?;
    let parsed = parse_hop_lines(&content);
    debug!(
        "Parsed {} hops from {} ({} skipped)",
        parsed.hops.len(),
        path.display(),
        parsed.skipped.len()
    );
    Ok(parsed)
}

/// Parses every hop of a stored file. Blank lines and `#` comments are ignored;
/// malformed hops are skipped with a warning.
pub fn parse_hop_lines(content: &str) -> ParsedHops {
    let mut parsed = ParsedHops::default();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for text in line.split(HOP_SEPARATOR) {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            match parse_hop(text) {
                Ok(hop) => parsed.hops.push(hop),
                Err(e) => {
                    warn!("Skipping hop on line {}: {}", line_no + 1, e);
                    parsed.skipped.push(e);
                }
            }
        }
    }
    parsed
}

/// Parses a single `ip asn rtt (city, region, country, continent)` hop.
pub fn parse_hop(text: &str) -> Result<CapturedHop, HopParseError> {
    if text.split_whitespace().count() < 4 {
        return Err(HopParseError::TooFewFields(text.to_string()));
    }
    let caps = HOP_RE
        .captures(text)
        .ok_or_else(|| HopParseError::InvalidDescriptor(text.to_string()))?;

    Ok(CapturedHop {
        ip_address: caps["ip"].to_string(),
        asn: parse_asn(&caps["asn"]),
        min_rtt: parse_rtt(&caps["rtt"])?,
        place: Some(parse_place(&caps["place"])?),
    })
}

/// `AS64500`, `as64500` or `64500`. Anything else is treated as unknown.
pub fn parse_asn(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("AS")
        .or_else(|| token.strip_prefix("as"))
        .unwrap_or(token);
    digits.parse().ok()
}

/// RTT in milliseconds. Unknown markers, infinities, NaN and negative values
/// all mean the hop could not be measured.
pub fn parse_rtt(token: &str) -> Result<Option<f64>, HopParseError> {
    let token = token.trim_end_matches("ms");
    if is_unknown(token) {
        return Ok(None);
    }
    let value: f64 = token
        .parse()
        .map_err(|_| HopParseError::InvalidRtt(token.to_string()))?;
    Ok((value.is_finite() && value >= 0.0).then_some(value))
}

fn parse_place(text: &str) -> Result<PlaceDescriptor, HopParseError> {
    let fields: Vec<Option<String>> = text
        .split(',')
        .map(|field| {
            let field = field.trim();
            (!is_unknown(field)).then(|| field.to_string())
        })
        .collect();
    let [city, region, country, continent] = <[Option<String>; 4]>::try_from(fields)
        .map_err(|_| HopParseError::InvalidDescriptor(format!("({})", text)))?;
    Ok(PlaceDescriptor {
        city,
        region,
        country,
        continent,
    })
}

fn is_unknown(field: &str) -> bool {
    field.is_empty()
        || UNKNOWN_MARKERS
            .iter()
            .any(|marker| field.eq_ignore_ascii_case(marker))
}
