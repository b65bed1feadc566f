//! Snapshot data model.
//!
//! Field names serialize to the camelCase document the API layer serves, so
//! a stored snapshot and an API response are the same bytes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Description used when a source names a flavor but does not describe it.
pub const PLACEHOLDER_DESCRIPTION: &str = "No description available";

/// Display string of the empty snapshot returned before the first run.
pub const NO_DATA_DISPLAY: &str = "No data available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    Open,
    Closed,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    pub name: String,
    pub description: String,
}

impl Flavor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Builds a flavor from scraped text.
    ///
    /// Whitespace runs are collapsed. Returns `None` when the name is blank;
    /// a blank or missing description becomes [`PLACEHOLDER_DESCRIPTION`].
    #[must_use]
    pub fn from_scraped(name: &str, description: Option<&str>) -> Option<Self> {
        let name = collapse_whitespace(name);
        if name.is_empty() {
            return None;
        }
        let description = description
            .map(collapse_whitespace)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_owned());
        Some(Self { name, description })
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Calendar position of a [`FlavorDay`].
///
/// Serializes as a bare string: an ISO date when the source gave a
/// resolvable date, otherwise the raw label the source used.
///
/// Deserialization tries the ISO form first, so a `Label` must never hold
/// an ISO date. Build labels with [`CalendarDate::label`] to keep the
/// stored form lossless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalendarDate {
    Resolved(NaiveDate),
    Label(String),
}

impl CalendarDate {
    /// Trimmed raw label, or the date itself when the label is an ISO date.
    pub fn label(raw: &str) -> Self {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_or_else(|_| CalendarDate::Label(raw.to_owned()), CalendarDate::Resolved)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarDate::Resolved(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            CalendarDate::Label(label) => f.write_str(label),
        }
    }
}

/// Coarse, advisory classification of a calendar entry. Never used for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayLabel {
    Today,
    Tomorrow,
    Weekday(Weekday),
    Always,
    Closed,
}

impl DayLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            DayLabel::Today => "today",
            DayLabel::Tomorrow => "tomorrow",
            DayLabel::Always => "always",
            DayLabel::Closed => "closed",
            DayLabel::Weekday(day) => match day {
                Weekday::Mon => "monday",
                Weekday::Tue => "tuesday",
                Weekday::Wed => "wednesday",
                Weekday::Thu => "thursday",
                Weekday::Fri => "friday",
                Weekday::Sat => "saturday",
                Weekday::Sun => "sunday",
            },
        }
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(DayLabel::Today),
            "tomorrow" => Ok(DayLabel::Tomorrow),
            "always" => Ok(DayLabel::Always),
            "closed" => Ok(DayLabel::Closed),
            other => other
                .parse::<Weekday>()
                .map(DayLabel::Weekday)
                .map_err(|_| format!("unrecognised day label \"{s}\"")),
        }
    }
}

impl TryFrom<String> for DayLabel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayLabel> for String {
    fn from(label: DayLabel) -> Self {
        label.as_str().to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorDay {
    pub date: CalendarDate,
    pub day_label: DayLabel,
    pub flavors: Vec<Flavor>,
}

/// One physical or virtual storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Deterministic `source[-sub-location]` slug, unique within a snapshot.
    pub id: String,
    pub name: String,
    /// Sub-location display name, e.g. the neighbourhood of a chain store.
    pub location: String,
    pub address: String,
    pub phone: String,
    pub status: LocationStatus,
    pub hours: String,
    pub website: String,
    #[serde(rename = "flavors")]
    pub flavor_calendar: Vec<FlavorDay>,
}

/// A source whose whole extraction failed during one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceError {
    pub source: String,
    #[serde(rename = "error")]
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate result of one orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// `None` only for the empty snapshot served before the first run.
    pub timestamp: Option<DateTime<Utc>>,
    pub last_updated_display: String,
    pub total_locations: usize,
    pub locations: Vec<Location>,
    pub errors: Vec<SourceError>,
}

impl Snapshot {
    /// Assembles a snapshot; `total_locations` is always derived from `locations`.
    pub fn new(
        timestamp: DateTime<Utc>,
        last_updated_display: impl Into<String>,
        locations: Vec<Location>,
        errors: Vec<SourceError>,
    ) -> Self {
        Self {
            timestamp: Some(timestamp),
            last_updated_display: last_updated_display.into(),
            total_locations: locations.len(),
            locations,
            errors,
        }
    }

    pub fn empty() -> Self {
        Self {
            timestamp: None,
            last_updated_display: NO_DATA_DISPLAY.to_owned(),
            total_locations: 0,
            locations: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Direct equality lookup on [`Location::id`].
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|loc| loc.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_location() -> Location {
        Location {
            id: "kopps-brookfield".to_owned(),
            name: "Kopp's Frozen Custard".to_owned(),
            location: "Brookfield".to_owned(),
            address: "18880 W Bluemound Rd, Brookfield, WI".to_owned(),
            phone: "(262) 789-1393".to_owned(),
            status: LocationStatus::Open,
            hours: "10:30 AM - 11 PM".to_owned(),
            website: "https://www.kopps.com".to_owned(),
            flavor_calendar: vec![FlavorDay {
                date: CalendarDate::Resolved(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()),
                day_label: DayLabel::Today,
                flavors: vec![Flavor::new("Butter Pecan", "Buttery custard")],
            }],
        }
    }

    #[test]
    fn from_scraped_rejects_blank_name() {
        assert!(Flavor::from_scraped("   ", Some("desc")).is_none());
    }

    #[test]
    fn from_scraped_falls_back_to_placeholder_description() {
        let flavor = Flavor::from_scraped(" Mint   Chip\n", Some("  ")).unwrap();
        assert_eq!(flavor.name, "Mint Chip");
        assert_eq!(flavor.description, PLACEHOLDER_DESCRIPTION);
    }

    #[test]
    fn day_label_parses_weekday_names() {
        assert_eq!(
            "Tuesday".parse::<DayLabel>().unwrap(),
            DayLabel::Weekday(Weekday::Tue)
        );
        assert_eq!(DayLabel::Weekday(Weekday::Tue).as_str(), "tuesday");
        assert!("someday".parse::<DayLabel>().is_err());
    }

    #[test]
    fn location_serializes_calendar_under_flavors_key() {
        let json = serde_json::to_value(sample_location()).unwrap();
        assert_eq!(json["status"], "open");
        assert_eq!(json["flavors"][0]["date"], "2026-01-05");
        assert_eq!(json["flavors"][0]["dayLabel"], "today");
        assert_eq!(json["flavors"][0]["flavors"][0]["name"], "Butter Pecan");
        assert!(json.get("flavorCalendar").is_none());
    }

    #[test]
    fn calendar_date_keeps_unparseable_labels() {
        let day: FlavorDay = serde_json::from_str(
            r#"{"date":"Every day","dayLabel":"always","flavors":[]}"#,
        )
        .unwrap();
        assert_eq!(day.date, CalendarDate::Label("Every day".to_owned()));
        assert_eq!(day.day_label, DayLabel::Always);
    }

    #[test]
    fn iso_looking_label_becomes_resolved_date() {
        assert_eq!(
            CalendarDate::label(" 2026-01-07 "),
            CalendarDate::Resolved(NaiveDate::from_ymd_opt(2026, 1, 7).unwrap())
        );
        assert_eq!(
            CalendarDate::label(" Tue Jan 6 "),
            CalendarDate::Label("Tue Jan 6".to_owned())
        );
    }

    #[test]
    fn labels_built_by_constructor_survive_json() {
        for raw in ["2026-01-07", "Every day", "Friday 2/30", "Closed for winter"] {
            let date = CalendarDate::label(raw);
            let json = serde_json::to_string(&date).unwrap();
            let back: CalendarDate = serde_json::from_str(&json).unwrap();
            assert_eq!(back, date, "{raw}");
        }
    }

    #[test]
    fn snapshot_total_matches_locations() {
        let snapshot = Snapshot::new(Utc::now(), "now", vec![sample_location()], vec![]);
        assert_eq!(snapshot.total_locations, snapshot.locations.len());
        assert!(snapshot.location("kopps-brookfield").is_some());
        assert!(snapshot.location("kopps").is_none());
    }

    #[test]
    fn source_error_serializes_message_as_error() {
        let err = SourceError {
            source: "gilles".to_owned(),
            message: "browser unavailable".to_owned(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"], "browser unavailable");
        assert_eq!(json["source"], "gilles");
    }

    #[test]
    fn empty_snapshot_has_fixed_display() {
        let snapshot = Snapshot::empty();
        assert_eq!(snapshot.total_locations, 0);
        assert_eq!(snapshot.last_updated_display, NO_DATA_DISPLAY);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["timestamp"].is_null());
        assert_eq!(json["totalLocations"], 0);
    }
}
