use crate::domain::model::Coordinate;
use crate::utils::error::{Result, SurgeError};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

/// Location of the most recent observation in a crowd event CSV.
///
/// Returns `Ok(None)` when the file has no `Latitude`/`Longitude` columns or
/// no data rows, so the caller can fall back to a configured location.
pub fn last_event_location<R: Read>(reader: R) -> Result<Option<Coordinate>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);
    let (Some(lat_idx), Some(lon_idx)) = (position("Latitude"), position("Longitude")) else {
        tracing::debug!("Event file has no Latitude/Longitude columns");
        return Ok(None);
    };

    let mut last = None;
    for record in reader.records() {
        last = Some(record?);
    }
    let Some(record) = last else {
        return Ok(None);
    };

    let axis = |idx: usize, field: &str| -> Result<f64> {
        let raw = record.get(idx).unwrap_or("").trim();
        raw.parse().map_err(|_| SurgeError::InvalidCoordinate {
            field: field.to_string(),
            value: raw.to_string(),
            reason: "not a number".to_string(),
        })
    };

    Coordinate::new(axis(lat_idx, "latitude")?, axis(lon_idx, "longitude")?).map(Some)
}

pub fn last_event_location_from_path(path: &Path) -> Result<Option<Coordinate>> {
    last_event_location(std::fs::File::open(path)?)
}
