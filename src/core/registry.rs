use crate::domain::model::{Coordinate, FacilityRecord};
use crate::utils::error::{Result, SurgeError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// One untyped registry row: trimmed header -> cell text.
pub type RawRow = HashMap<String, String>;

pub const COL_NAME: &str = "Hospital Name";
pub const COL_ADDRESS: &str = "Address";
pub const COL_CITY: &str = "City";
pub const COL_STATE: &str = "State";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";
pub const COL_TOTAL_BEDS: &str = "Total Beds";
pub const COL_BEDS_AVAILABLE: &str = "Beds Available";
pub const COL_ICU_BEDS: &str = "ICU Beds";
pub const COL_ICU_BEDS_AVAILABLE: &str = "ICU Beds Available";
pub const COL_OXYGEN_AVAILABLE: &str = "Oxygen Cylinders Available";
pub const COL_AMBULANCE_COUNT: &str = "Ambulance Count";
pub const COL_EMERGENCY_CONTACT: &str = "Emergency Contact";

pub const REQUIRED_COLUMNS: [&str; 13] = [
    COL_NAME,
    COL_ADDRESS,
    COL_CITY,
    COL_STATE,
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_TOTAL_BEDS,
    COL_BEDS_AVAILABLE,
    COL_ICU_BEDS,
    COL_ICU_BEDS_AVAILABLE,
    COL_OXYGEN_AVAILABLE,
    COL_AMBULANCE_COUNT,
    COL_EMERGENCY_CONTACT,
];

/// Immutable snapshot of candidate hospitals, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityRegistry {
    facilities: Vec<FacilityRecord>,
    sites: Vec<Coordinate>,
}

impl FacilityRegistry {
    /// Fails on the first record whose coordinates are out of range, naming
    /// its 1-based row.
    pub fn new(facilities: Vec<FacilityRecord>) -> Result<Self> {
        let sites = facilities
            .iter()
            .enumerate()
            .map(|(idx, facility)| site_of(idx + 1, facility))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { facilities, sites })
    }

    /// Checks the header set once, then types every row.
    ///
    /// `headers` is the header row as read from the source; surrounding
    /// whitespace is ignored. All missing columns are reported together.
    pub fn from_rows(headers: &[String], rows: Vec<RawRow>) -> Result<Self> {
        validate_schema(headers)?;

        let mut facilities = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            let facility = parse_row(idx + 1, row)?;
            warn_on_inconsistent_counts(idx + 1, &facility);
            facilities.push(facility);
        }

        tracing::info!("Loaded {} facilities into registry", facilities.len());
        Self::new(facilities)
    }

    pub fn facilities(&self) -> &[FacilityRecord] {
        &self.facilities
    }

    /// Facilities paired with their validated locations.
    pub fn sites(&self) -> impl Iterator<Item = (&FacilityRecord, Coordinate)> + '_ {
        self.facilities.iter().zip(self.sites.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

pub fn validate_schema(headers: &[String]) -> Result<()> {
    let present: Vec<&str> = headers.iter().map(|h| h.trim()).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !present.contains(*col))
        .map(|col| col.to_string())
        .collect();

    if !missing.is_empty() {
        tracing::error!("Registry schema check failed, missing: {:?}", missing);
        return Err(SurgeError::MissingColumns { missing });
    }

    // rows are keyed by header, so a repeated column would shadow its twin
    let duplicated: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| present.iter().filter(|h| *h == *col).count() > 1)
        .map(|col| col.to_string())
        .collect();
    if !duplicated.is_empty() {
        tracing::error!("Registry schema check failed, repeated: {:?}", duplicated);
        return Err(SurgeError::DuplicateColumns { duplicated });
    }

    Ok(())
}

fn parse_row(row_no: usize, row: &RawRow) -> Result<FacilityRecord> {
    let cell = |column: &str| cell_text(row, column);

    let name = cell(COL_NAME);
    if name.is_empty() {
        return Err(invalid(row_no, COL_NAME, name, "hospital name cannot be empty"));
    }

    Ok(FacilityRecord {
        name: name.to_string(),
        address: cell(COL_ADDRESS).to_string(),
        city: cell(COL_CITY).to_string(),
        state: cell(COL_STATE).to_string(),
        latitude: parse_degrees(row_no, COL_LATITUDE, cell(COL_LATITUDE), 90.0)?,
        longitude: parse_degrees(row_no, COL_LONGITUDE, cell(COL_LONGITUDE), 180.0)?,
        total_beds: parse_count(row_no, COL_TOTAL_BEDS, cell(COL_TOTAL_BEDS))?,
        beds_available: parse_optional_count(row_no, COL_BEDS_AVAILABLE, cell(COL_BEDS_AVAILABLE))?,
        icu_beds: parse_count(row_no, COL_ICU_BEDS, cell(COL_ICU_BEDS))?,
        icu_beds_available: parse_optional_count(
            row_no,
            COL_ICU_BEDS_AVAILABLE,
            cell(COL_ICU_BEDS_AVAILABLE),
        )?,
        oxygen_available: parse_optional_count(
            row_no,
            COL_OXYGEN_AVAILABLE,
            cell(COL_OXYGEN_AVAILABLE),
        )?,
        ambulance_count: parse_count(row_no, COL_AMBULANCE_COUNT, cell(COL_AMBULANCE_COUNT))?,
        emergency_contact: cell(COL_EMERGENCY_CONTACT).to_string(),
    })
}

fn site_of(row: usize, facility: &FacilityRecord) -> Result<Coordinate> {
    Coordinate::new(facility.latitude, facility.longitude).map_err(|e| match e {
        SurgeError::InvalidCoordinate { field, value, reason } => {
            let column = if field == "latitude" { COL_LATITUDE } else { COL_LONGITUDE };
            invalid(row, column, &value, &reason)
        }
        other => other,
    })
}

fn cell_text<'a>(row: &'a RawRow, column: &str) -> &'a str {
    row.get(column).map(|v| v.trim()).unwrap_or("")
}

fn invalid(row: usize, column: &str, value: &str, reason: &str) -> SurgeError {
    SurgeError::InvalidField {
        row,
        column: column.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_degrees(row: usize, column: &str, value: &str, limit: f64) -> Result<f64> {
    let degrees: f64 = value
        .parse()
        .map_err(|_| invalid(row, column, value, "expected decimal degrees"))?;
    if !degrees.is_finite() || degrees < -limit || degrees > limit {
        return Err(invalid(
            row,
            column,
            value,
            &format!("must be within [-{}, {}]", limit, limit),
        ));
    }
    Ok(degrees)
}

/// Accepts "12" as well as spreadsheet-style "12.0".
fn parse_count(row: usize, column: &str, value: &str) -> Result<u32> {
    if let Ok(count) = value.parse::<u32>() {
        return Ok(count);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => {
            Ok(f as u32)
        }
        _ => Err(invalid(row, column, value, "expected a non-negative whole number")),
    }
}

fn parse_optional_count(row: usize, column: &str, value: &str) -> Result<Option<u32>> {
    if value.is_empty() {
        tracing::warn!("Row {}: '{}' not reported", row, column);
        return Ok(None);
    }
    parse_count(row, column, value).map(Some)
}

fn warn_on_inconsistent_counts(row: usize, facility: &FacilityRecord) {
    if facility.beds_available.is_some_and(|n| n > facility.total_beds) {
        tracing::warn!(
            "Row {} ({}): available beds exceed total beds",
            row,
            facility.name
        );
    }
    if facility.icu_beds_available.is_some_and(|n| n > facility.icu_beds) {
        tracing::warn!(
            "Row {} ({}): available ICU beds exceed total ICU beds",
            row,
            facility.name
        );
    }
}

/// Registry handle for long-running processes: queries take an `Arc`
/// snapshot, reloads swap the whole table.
#[derive(Debug, Default)]
pub struct SharedRegistry {
    current: RwLock<Arc<FacilityRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: FacilityRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    pub fn snapshot(&self) -> Arc<FacilityRegistry> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    pub fn replace(&self, registry: FacilityRegistry) {
        let next = Arc::new(registry);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        tracing::info!("Facility registry replaced");
    }
}
