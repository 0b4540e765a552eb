use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ReportBoardError;

// --- Taxonomies ---
//
// Each closed set declares its members once in `ALL`. That order is the
// iteration order for zero-filled distributions and the only accepted
// spelling when a label is parsed.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Category {
    #[serde(rename = "Physical Abuse")]
    PhysicalAbuse,
    #[serde(rename = "Verbal Abuse")]
    VerbalAbuse,
    #[serde(rename = "Economic Abuse")]
    EconomicAbuse,
    Rape,
    Negligence,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::PhysicalAbuse,
        Category::VerbalAbuse,
        Category::EconomicAbuse,
        Category::Rape,
        Category::Negligence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PhysicalAbuse => "Physical Abuse",
            Category::VerbalAbuse => "Verbal Abuse",
            Category::EconomicAbuse => "Economic Abuse",
            Category::Rape => "Rape",
            Category::Negligence => "Negligence",
        }
    }

    /// Exact, case-sensitive lookup against the declared labels.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = ReportBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| ReportBoardError::UnknownLabel {
            kind: "category",
            label: s.to_string(),
        })
    }
}

/// Workflow position of a report. Declared in workflow order, but the
/// dashboard treats it as a plain label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Status {
    Pending,
    Assigned,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Under Review")]
    UnderReview,
    Completed,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Pending,
        Status::Assigned,
        Status::InProgress,
        Status::UnderReview,
        Status::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Assigned => "Assigned",
            Status::InProgress => "In Progress",
            Status::UnderReview => "Under Review",
            Status::Completed => "Completed",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == label)
    }

    /// Colour of the status badge in the reports table.
    pub fn badge_color(&self) -> &'static str {
        match self {
            Status::Pending => "yellow",
            Status::Assigned => "blue",
            Status::InProgress => "purple",
            Status::UnderReview => "orange",
            Status::Completed => "green",
        }
    }

    /// Badge colour for a raw label; unrecognized labels render gray.
    pub fn badge_color_for(label: &str) -> &'static str {
        Self::from_label(label).map_or("gray", |s| s.badge_color())
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = ReportBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| ReportBoardError::UnknownLabel {
            kind: "status",
            label: s.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Location {
    #[serde(rename = "Central District")]
    CentralDistrict,
    #[serde(rename = "East Ward")]
    EastWard,
    #[serde(rename = "South Zone")]
    SouthZone,
    #[serde(rename = "North Sector")]
    NorthSector,
    #[serde(rename = "West End")]
    WestEnd,
    Downtown,
    Riverside,
    Uptown,
}

impl Location {
    pub const ALL: [Location; 8] = [
        Location::CentralDistrict,
        Location::EastWard,
        Location::SouthZone,
        Location::NorthSector,
        Location::WestEnd,
        Location::Downtown,
        Location::Riverside,
        Location::Uptown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::CentralDistrict => "Central District",
            Location::EastWard => "East Ward",
            Location::SouthZone => "South Zone",
            Location::NorthSector => "North Sector",
            Location::WestEnd => "West End",
            Location::Downtown => "Downtown",
            Location::Riverside => "Riverside",
            Location::Uptown => "Uptown",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == label)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Location {
    type Err = ReportBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| ReportBoardError::UnknownLabel {
            kind: "location",
            label: s.to_string(),
        })
    }
}

// --- Report ---

/// A single incident report as it arrives in a records snapshot.
///
/// Labels and the timestamp are kept raw so that a snapshot containing an
/// unrecognized tag or an unparseable timestamp still loads; the typed
/// accessors resolve them against the taxonomies on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    /// Local wall-clock time, e.g. `2025-05-16T10:23:00`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
}

impl Report {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        location: impl Into<String>,
        timestamp: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            location: location.into(),
            timestamp: timestamp.into(),
            status: status.into(),
        }
    }

    pub fn category_tag(&self) -> Option<Category> {
        Category::from_label(&self.category)
    }

    pub fn status_tag(&self) -> Option<Status> {
        Status::from_label(&self.status)
    }

    pub fn location_tag(&self) -> Option<Location> {
        Location::from_label(&self.location)
    }

    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }

    /// True when every label belongs to its taxonomy and the timestamp parses.
    pub fn is_well_formed(&self) -> bool {
        self.category_tag().is_some()
            && self.status_tag().is_some()
            && self.location_tag().is_some()
            && self.parsed_timestamp().is_some()
    }
}

/// Accept any JSON value for a raw report field. Numbers and booleans keep
/// their text, `null` and nested values become empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct LenientString;

    impl<'de> Visitor<'de> for LenientString {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a report field value")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<String, D2::Error> {
            d.deserialize_any(self)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<String, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(String::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<String, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(LenientString)
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse a report timestamp into local wall-clock time.
///
/// Offset-free values are taken as already local. RFC 3339 values are
/// converted into the local zone. A bare date means local midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
