use crate::utils::error::{Result, SurgeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One hospital row of the facility registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
    pub total_beds: u32,
    /// `None` when the registry left the cell blank.
    pub beds_available: Option<u32>,
    pub icu_beds: u32,
    pub icu_beds_available: Option<u32>,
    pub oxygen_available: Option<u32>,
    pub ambulance_count: u32,
    pub emergency_contact: String,
}

impl FacilityRecord {
    pub fn available(&self, kind: ResourceKind) -> Option<u32> {
        match kind {
            ResourceKind::BedsAvailable => self.beds_available,
            ResourceKind::IcuBedsAvailable => self.icu_beds_available,
            ResourceKind::OxygenAvailable => self.oxygen_available,
        }
    }

    pub fn full_address(&self) -> String {
        format!("{}, {}, {}", self.address, self.city, self.state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    BedsAvailable,
    IcuBedsAvailable,
    OxygenAvailable,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::BedsAvailable => "beds_available",
            ResourceKind::IcuBedsAvailable => "icu_beds_available",
            ResourceKind::OxygenAvailable => "oxygen_available",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum counts a facility must hold. Kinds not present are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequirement {
    thresholds: BTreeMap<ResourceKind, u32>,
}

impl ResourceRequirement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ResourceKind, minimum: u32) -> Self {
        self.thresholds.insert(kind, minimum);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        self.thresholds.iter().map(|(kind, min)| (*kind, *min))
    }

    /// A facility that did not report a required count fails that threshold.
    pub fn is_met_by(&self, facility: &FacilityRecord) -> bool {
        self.iter().all(|(kind, minimum)| {
            facility
                .available(kind)
                .is_some_and(|count| count >= minimum)
        })
    }
}

/// Crowd danger level reported by the behavior classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SeverityLevel {
    Calm,
    Dispersing,
    Aggressive,
    Stampede,
    Unrecognized(String),
}

impl SeverityLevel {
    /// Never fails: labels outside the known set become `Unrecognized`.
    /// Matching is exact, so `"calm"` is not `Calm`.
    pub fn parse(label: &str) -> Self {
        match label {
            "Calm" => SeverityLevel::Calm,
            "Dispersing" => SeverityLevel::Dispersing,
            "Aggressive" => SeverityLevel::Aggressive,
            "Stampede" => SeverityLevel::Stampede,
            _ => SeverityLevel::Unrecognized(label.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SeverityLevel::Calm => "Calm",
            SeverityLevel::Dispersing => "Dispersing",
            SeverityLevel::Aggressive => "Aggressive",
            SeverityLevel::Stampede => "Stampede",
            SeverityLevel::Unrecognized(label) => label,
        }
    }
}

impl From<&str> for SeverityLevel {
    fn from(label: &str) -> Self {
        SeverityLevel::parse(label)
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SeverityLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for SeverityLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(SeverityLevel::parse(&label))
    }
}

/// Latitude/longitude in degrees, range-checked on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        check_axis("latitude", latitude, 90.0)?;
        check_axis("longitude", longitude, 180.0)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

fn check_axis(field: &str, value: f64, limit: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SurgeError::InvalidCoordinate {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if value < -limit || value > limit {
        return Err(SurgeError::InvalidCoordinate {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("must be within [-{}, {}]", limit, limit),
        });
    }
    Ok(())
}

/// Shortest round-trip text that always shows a fractional part ("19.0",
/// "72.8258"), with `1e-05` style exponents below 1e-4.
fn degrees_text(value: f64) -> String {
    if value != 0.0 && value.abs() < 1e-4 {
        let sci = format!("{:e}", value);
        return match sci.split_once('e') {
            Some((mantissa, exponent)) => {
                let exp: i32 = exponent.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            None => sci,
        };
    }
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}",
            degrees_text(self.latitude),
            degrees_text(self.longitude)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventContext {
    pub severity: SeverityLevel,
    pub location: Coordinate,
}

impl EventContext {
    pub fn new(severity: SeverityLevel, location: Coordinate) -> Self {
        Self { severity, location }
    }
}

/// A facility that passed the requirement filter, with its distance to the event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedFacility {
    #[serde(flatten)]
    pub facility: FacilityRecord,
    /// Meters, rounded to one decimal place.
    pub distance_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "facilities", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Severity does not call for any hospital preparation.
    NoActionRequired,
    /// Matching ran; empty means no facility met the thresholds.
    Candidates(Vec<MatchedFacility>),
}

impl MatchOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, MatchOutcome::NoActionRequired)
    }

    pub fn facilities(&self) -> &[MatchedFacility] {
        match self {
            MatchOutcome::NoActionRequired => &[],
            MatchOutcome::Candidates(facilities) => facilities,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub target_name: String,
    pub message_text: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchReport {
    NoActionRequired,
    NoFacilityAvailable,
    Alerts { notifications: Vec<Notification> },
}

impl DispatchReport {
    pub fn notifications(&self) -> &[Notification] {
        match self {
            DispatchReport::Alerts { notifications } => notifications,
            _ => &[],
        }
    }

    pub fn summary(&self) -> String {
        match self {
            DispatchReport::NoActionRequired => {
                "No emergency risk detected. Hospitals not notified.".to_string()
            }
            DispatchReport::NoFacilityAvailable => {
                "No hospitals with required resources found nearby.".to_string()
            }
            DispatchReport::Alerts { notifications } => match notifications.first() {
                Some(primary) => format!(
                    "Alert prepared for {} hospital(s); nearest: {}",
                    notifications.len(),
                    primary.target_name
                ),
                None => "No hospitals with required resources found nearby.".to_string(),
            },
        }
    }
}
