use crate::core::registry::{FacilityRegistry, RawRow};
use crate::domain::ports::RegistrySource;
use crate::utils::error::{Result, SurgeError};
use async_trait::async_trait;
use csv::ReaderBuilder;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Header row plus data rows, both trimmed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let row: RawRow = self
            .headers
            .iter()
            .cloned()
            .zip(cells.into_iter().map(|c| c.as_ref().trim().to_string()))
            .collect();

        if row.values().all(|v| v.is_empty()) {
            return;
        }
        self.rows.push(row);
    }

    pub fn into_registry(self) -> Result<FacilityRegistry> {
        FacilityRegistry::from_rows(&self.headers, self.rows)
    }
}

pub fn parse_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut table = RawTable {
        headers: reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
        rows: Vec::new(),
    };

    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter());
    }

    Ok(table)
}

#[cfg(feature = "xlsx")]
pub fn parse_xlsx(path: &Path) -> Result<RawTable> {
    use calamine::{open_workbook_auto, Reader};

    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SurgeError::ExcelError("workbook has no sheets".to_string()))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| SurgeError::ExcelError("sheet has no header row".to_string()))?;

    let mut table = RawTable {
        headers: header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        rows: Vec::new(),
    };

    for data_row in rows {
        table.push_row(data_row.iter().map(|cell| cell.to_string()));
    }

    Ok(table)
}

pub fn read_table(path: &Path) -> Result<RawTable> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => parse_csv(std::fs::File::open(path)?),
        #[cfg(feature = "xlsx")]
        "xlsx" | "xls" => parse_xlsx(path),
        _ => Err(SurgeError::UnsupportedFormat { extension }),
    }
}

/// Registry loaded from a `.csv` or `.xlsx` export.
#[derive(Debug, Clone)]
pub struct FileRegistrySource {
    path: PathBuf,
}

impl FileRegistrySource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RegistrySource for FileRegistrySource {
    async fn load(&self) -> Result<FacilityRegistry> {
        tracing::info!("Loading facility registry from {}", self.path.display());
        let table = read_table(&self.path)?;
        tracing::debug!(
            "Read {} columns and {} rows",
            table.headers.len(),
            table.rows.len()
        );
        table.into_registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = " Hospital Name ,Address,City,State,Latitude,Longitude,Total Beds,Beds Available,ICU Beds,ICU Beds Available,Oxygen Cylinders Available,Ambulance Count,Emergency Contact";

    #[test]
    fn test_parse_csv_trims_and_skips_blank_rows() {
        let data = format!(
            "{}\nSion Hospital, Sion ,Mumbai,Maharashtra,19.0390,72.8619,1400,22,80,3,18,5,022-24076381\n,,,,,,,,,,,,\n",
            HEADER
        );
        let table = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(table.headers[0], "Hospital Name");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("Address"), Some(&"Sion".to_string()));
    }

    #[test]
    fn test_csv_into_registry() {
        let data = format!(
            "{}\nSion Hospital,Sion,Mumbai,Maharashtra,19.0390,72.8619,1400,22,80,3,18,5,022-24076381\n",
            HEADER
        );
        let registry = parse_csv(data.as_bytes()).unwrap().into_registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.facilities()[0].oxygen_available, Some(18));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = read_table(Path::new("hospitals.json"));
        assert!(matches!(
            result,
            Err(SurgeError::UnsupportedFormat { extension }) if extension == "json"
        ));
    }
}
