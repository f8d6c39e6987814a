//! MRMS index discovery for the latest RALA scan.
//!
//! The MRMS server publishes plain directory listings; the newest
//! `RALA_YYYYMMDD-HHMM`-shaped filename in the product directory tells us
//! the latest scan time. Fetching the GRIB2 payload itself is a separate
//! concern and not wired up yet.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use radar_common::{RadarError, RadarResult};
use tracing::debug;

/// Client for the MRMS data server's directory listings.
pub struct MrmsClient {
    base_url: String,
    http: reqwest::Client,
}

impl MrmsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Candidate index directories for the RALA product; the path has moved
    /// between deployments, so both spellings are probed.
    fn candidate_urls(&self) -> [String; 2] {
        [
            format!("{}/data/2D/RALA/", self.base_url),
            format!("{}/data/2D/ReflectivityAtLowestAltitude/", self.base_url),
        ]
    }

    /// Discover the newest RALA scan time, or `None` when no listing
    /// mentions one.
    pub async fn latest_rala_timestamp(&self) -> RadarResult<Option<DateTime<Utc>>> {
        for url in self.candidate_urls() {
            let response = match self
                .http
                .get(&url)
                .timeout(Duration::from_secs(10))
                .send()
                .await
            {
                Ok(r) if r.status().is_success() => r,
                Ok(r) => {
                    debug!(url = %url, status = %r.status(), "index probe rejected");
                    continue;
                }
                Err(err) => {
                    debug!(url = %url, error = %err, "index probe failed");
                    continue;
                }
            };

            let body = response
                .text()
                .await
                .map_err(|e| RadarError::Upstream(e.to_string()))?;

            if let Some(ts) = parse_rala_timestamps(&body).into_iter().max() {
                return Ok(Some(ts));
            }
        }
        Ok(None)
    }
}

/// Scan a directory listing for `RALA_YYYYMMDD-HHMM` (or `RALA-YYYYMMDDTHHMM`)
/// shaped names and return every scan time found.
pub fn parse_rala_timestamps(listing: &str) -> Vec<DateTime<Utc>> {
    let bytes = listing.as_bytes();
    let mut found = Vec::new();

    let mut search_from = 0;
    while let Some(offset) = find_from(bytes, b"RALA", search_from) {
        let after = offset + 4;
        search_from = after;

        if let Some(ts) = parse_timestamp_suffix(&bytes[after..]) {
            found.push(ts);
        }
    }
    found
}

/// Parse `[_-]YYYYMMDD[T-]?HHMM` immediately following a product name.
fn parse_timestamp_suffix(rest: &[u8]) -> Option<DateTime<Utc>> {
    let rest = match rest.first() {
        Some(b'_') | Some(b'-') => &rest[1..],
        _ => return None,
    };

    let date = digit_str(rest, 8)?;
    let mut time_part = &rest[8..];
    if matches!(time_part.first(), Some(b'T') | Some(b'-')) {
        time_part = &time_part[1..];
    }
    let time = digit_str(time_part, 4)?;

    let year: i32 = date[..4].parse().ok()?;
    let month: u32 = date[4..6].parse().ok()?;
    let day: u32 = date[6..8].parse().ok()?;
    let hour: u32 = time[..2].parse().ok()?;
    let minute: u32 = time[2..4].parse().ok()?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)?;
    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

fn digit_str(bytes: &[u8], n: usize) -> Option<&str> {
    if bytes.len() >= n && bytes[..n].iter().all(|b| b.is_ascii_digit()) {
        std::str::from_utf8(&bytes[..n]).ok()
    } else {
        None
    }
}

fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_underscore_dash_form() {
        let listing = r#"<a href="RALA_20240115-1230.grib2.gz">RALA_20240115-1230.grib2.gz</a>"#;
        let found = parse_rala_timestamps(listing);
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).unwrap();
        assert_eq!(found, vec![expected, expected]); // name appears twice in the anchor
    }

    #[test]
    fn test_parse_t_separated_form() {
        let found = parse_rala_timestamps("RALA-20231201T0605.grib2");
        assert_eq!(
            found,
            vec![Utc.with_ymd_and_hms(2023, 12, 1, 6, 5, 0).unwrap()]
        );
    }

    #[test]
    fn test_newest_of_many() {
        let listing = "\
            RALA_20240115-1200.grib2\n\
            RALA_20240115-1230.grib2\n\
            RALA_20240115-1215.grib2\n";
        let newest = parse_rala_timestamps(listing).into_iter().max().unwrap();
        assert_eq!(newest, Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_ignores_malformed_names() {
        assert!(parse_rala_timestamps("RALA_2024-incomplete").is_empty());
        assert!(parse_rala_timestamps("RALA without timestamp").is_empty());
        assert!(parse_rala_timestamps("no product here").is_empty());
        // Month 13 fails chrono validation
        assert!(parse_rala_timestamps("RALA_20241301-0000").is_empty());
    }
}
