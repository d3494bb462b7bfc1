use std::io::Write;
use surge_readiness::core::geo::distance_meters;
use surge_readiness::core::requirements::requirements_for;
use surge_readiness::domain::ports::RegistrySource;
use surge_readiness::{
    Coordinate, FacilityRecord, FacilityRegistry, FileRegistrySource, MatchOutcome, SeverityLevel,
    SurgeEngine,
};
use proptest::prelude::*;
use tempfile::NamedTempFile;

const HEADER: &str = "Hospital Name,Address,City,State,Latitude,Longitude,Total Beds,Beds Available,ICU Beds,ICU Beds Available,Oxygen Cylinders Available,Ambulance Count,Emergency Contact";

fn registry_file(rows: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}

async fn engine_for(rows: &[&str]) -> SurgeEngine {
    let file = registry_file(rows);
    let source = FileRegistrySource::new(file.path());
    SurgeEngine::from_source(&source).await.unwrap()
}

#[tokio::test]
async fn test_stampede_matches_capable_hospital() {
    let engine = engine_for(&[
        "City Care,1 Marine Dr,Mumbai,Maharashtra,19.00,72.85,30,10,8,5,5,3,022-1111",
    ])
    .await;

    let outcome = engine
        .recommend(&SeverityLevel::parse("Stampede"), 18.95, 72.8258, 3)
        .unwrap();

    let facilities = outcome.facilities();
    assert_eq!(facilities.len(), 1);
    assert_eq!(facilities[0].facility.name, "City Care");
    assert!(facilities[0].distance_meters > 0.0);
    assert_eq!(
        facilities[0].distance_meters,
        (facilities[0].distance_meters * 10.0).round() / 10.0
    );
}

#[tokio::test]
async fn test_calm_is_skipped_not_no_capacity() {
    let engine = engine_for(&[
        "City Care,1 Marine Dr,Mumbai,Maharashtra,19.00,72.85,30,10,8,5,5,3,022-1111",
    ])
    .await;

    let outcome = engine
        .recommend(&SeverityLevel::parse("Calm"), 18.95, 72.8258, 3)
        .unwrap();
    assert!(outcome.is_skipped());
    assert_eq!(outcome, MatchOutcome::NoActionRequired);
}

#[tokio::test]
async fn test_insufficient_beds_yields_empty_match() {
    let engine = engine_for(&[
        "Clinic,2 Hill Rd,Mumbai,Maharashtra,19.00,72.85,10,3,4,4,9,1,022-2222",
    ])
    .await;

    let outcome = engine
        .recommend(&SeverityLevel::Stampede, 18.95, 72.8258, 3)
        .unwrap();
    assert!(!outcome.is_skipped());
    assert!(outcome.facilities().is_empty());
}

#[tokio::test]
async fn test_blank_oxygen_excluded_from_constrained_match() {
    let engine = engine_for(&[
        "Unreported,3 Bay Rd,Mumbai,Maharashtra,18.951,72.826,40,20,10,6,,2,022-3333",
        "Reported,4 Fort Rd,Mumbai,Maharashtra,19.00,72.85,40,20,10,6,6,2,022-4444",
    ])
    .await;

    let outcome = engine
        .recommend(&SeverityLevel::Aggressive, 18.95, 72.8258, 3)
        .unwrap();
    let names: Vec<&str> = outcome.facilities().iter().map(|m| m.facility.name.as_str()).collect();
    assert_eq!(names, vec!["Reported"]);
}

#[tokio::test]
async fn test_reload_swaps_registry() {
    let engine = engine_for(&[
        "Old,1 Rd,Mumbai,Maharashtra,19.00,72.85,30,10,8,5,5,3,022-1111",
    ])
    .await;
    let before = engine.registry();

    let file = registry_file(&[
        "New A,1 Rd,Mumbai,Maharashtra,19.00,72.85,30,10,8,5,5,3,022-1111",
        "New B,2 Rd,Mumbai,Maharashtra,19.01,72.86,30,10,8,5,5,3,022-2222",
    ]);
    let count = engine.reload(&FileRegistrySource::new(file.path())).await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(before.len(), 1);
    assert_eq!(engine.registry().len(), 2);
}

fn hospital_strategy() -> impl Strategy<Value = FacilityRecord> {
    (
        18.85f64..19.30,
        72.75f64..73.05,
        0u32..15,
        0u32..7,
        prop::option::weighted(0.9, 0u32..7),
        0u32..5,
    )
        .prop_map(|(lat, lon, beds, icu, oxygen, ambulances)| FacilityRecord {
            name: format!("Hospital {:.4}/{:.4}", lat, lon),
            address: "Ring Rd".to_string(),
            city: "Mumbai".to_string(),
            state: "Maharashtra".to_string(),
            latitude: lat,
            longitude: lon,
            total_beds: 50,
            beds_available: Some(beds),
            icu_beds: 10,
            icu_beds_available: Some(icu),
            oxygen_available: oxygen,
            ambulance_count: ambulances,
            emergency_contact: "022-0000".to_string(),
        })
}

fn coordinate_strategy() -> impl Strategy<Value = Coordinate> {
    (-80.0f64..80.0, -179.0f64..179.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon).unwrap())
}

proptest! {
    #[test]
    fn prop_match_respects_filter_order_and_limit(
        facilities in prop::collection::vec(hospital_strategy(), 0..40),
        label in prop::sample::select(vec!["Calm", "Dispersing", "Aggressive", "Stampede", "Unknown"]),
        top_n in 1usize..10,
    ) {
        let registry = FacilityRegistry::new(facilities).unwrap();
        let engine = SurgeEngine::new(registry.clone());
        let event = Coordinate::new(18.95, 72.8258).unwrap();
        let severity = SeverityLevel::parse(label);

        let outcome = engine.recommend(&severity, 18.95, 72.8258, top_n).unwrap();

        let Some(requirement) = requirements_for(&severity) else {
            prop_assert!(outcome.is_skipped());
            return Ok(());
        };

        let matched = outcome.facilities();
        prop_assert!(matched.len() <= top_n);
        prop_assert!(matched.windows(2).all(|w| w[0].distance_meters <= w[1].distance_meters));
        prop_assert!(matched.iter().all(|m| requirement.is_met_by(&m.facility)));

        let eligible = registry
            .facilities()
            .iter()
            .filter(|f| requirement.is_met_by(f))
            .count();
        prop_assert_eq!(matched.len(), eligible.min(top_n));

        // nothing eligible was skipped in favour of a farther facility
        if let Some(last) = matched.last() {
            let cutoff = last.distance_meters;
            let closer_eligible = registry
                .facilities()
                .iter()
                .filter(|f| requirement.is_met_by(f))
                .filter(|f| {
                    let site = Coordinate::new(f.latitude, f.longitude).unwrap();
                    distance_meters(event, site) < cutoff - 0.05
                })
                .count();
            prop_assert!(closer_eligible <= matched.len());
        }
    }

    #[test]
    fn prop_distance_is_a_metric(
        a in coordinate_strategy(),
        b in coordinate_strategy(),
        c in coordinate_strategy(),
    ) {
        let ab = distance_meters(a, b);
        prop_assert!(ab >= 0.0);
        prop_assert_eq!(ab, distance_meters(b, a));
        prop_assert_eq!(distance_meters(a, a), 0.0);
        prop_assert!(distance_meters(a, c) <= ab + distance_meters(b, c) + 1e-3);
    }
}

#[tokio::test]
async fn test_file_source_reports_path() {
    let file = registry_file(&[]);
    let source = FileRegistrySource::new(file.path());
    assert_eq!(source.path(), file.path());
    let registry = source.load().await.unwrap();
    assert!(registry.is_empty());
}
