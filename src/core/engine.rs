use crate::core::matcher::{MatchingEngine, DEFAULT_TOP_N};
use crate::core::notifier::format_notification;
use crate::core::registry::{FacilityRegistry, SharedRegistry};
use crate::domain::model::{
    Coordinate, DispatchReport, EventContext, MatchOutcome, SeverityLevel,
};
use crate::domain::ports::RegistrySource;
use crate::utils::error::Result;
use std::sync::Arc;

/// Query surface for the surrounding application.
pub struct SurgeEngine {
    registry: SharedRegistry,
    default_top_n: usize,
}

impl SurgeEngine {
    pub fn new(registry: FacilityRegistry) -> Self {
        Self {
            registry: SharedRegistry::new(registry),
            default_top_n: DEFAULT_TOP_N,
        }
    }

    pub async fn from_source<R: RegistrySource>(source: &R) -> Result<Self> {
        let registry = source.load().await?;
        Ok(Self::new(registry))
    }

    pub fn with_default_top_n(mut self, top_n: usize) -> Self {
        self.default_top_n = top_n;
        self
    }

    pub fn registry(&self) -> Arc<FacilityRegistry> {
        self.registry.snapshot()
    }

    /// Swaps in a freshly loaded registry; in-flight queries keep their snapshot.
    pub async fn reload<R: RegistrySource>(&self, source: &R) -> Result<usize> {
        let registry = source.load().await?;
        let count = registry.len();
        self.registry.replace(registry);
        Ok(count)
    }

    pub fn recommend(
        &self,
        severity: &SeverityLevel,
        latitude: f64,
        longitude: f64,
        top_n: usize,
    ) -> Result<MatchOutcome> {
        let event = Coordinate::new(latitude, longitude)?;
        let snapshot = self.registry.snapshot();
        MatchingEngine::new(&snapshot).match_facilities(severity, event, top_n)
    }

    /// Recommends with the default top-N and formats one alert per hospital.
    /// Delivery is left to the caller.
    pub fn notify(
        &self,
        severity: &SeverityLevel,
        latitude: f64,
        longitude: f64,
    ) -> Result<DispatchReport> {
        let outcome = self.recommend(severity, latitude, longitude, self.default_top_n)?;
        let event = EventContext::new(severity.clone(), Coordinate::new(latitude, longitude)?);

        let report = match outcome {
            MatchOutcome::NoActionRequired => DispatchReport::NoActionRequired,
            MatchOutcome::Candidates(matched) if matched.is_empty() => {
                DispatchReport::NoFacilityAvailable
            }
            MatchOutcome::Candidates(matched) => DispatchReport::Alerts {
                notifications: matched
                    .iter()
                    .map(|m| format_notification(&event, m))
                    .collect(),
            },
        };

        tracing::info!("Dispatch for '{}': {}", severity, report.summary());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FacilityRecord;
    use crate::utils::error::SurgeError;

    fn registry() -> FacilityRegistry {
        let site = |name: &str, lat: f64, lon: f64| FacilityRecord {
            name: name.to_string(),
            address: "Road".to_string(),
            city: "Mumbai".to_string(),
            state: "MH".to_string(),
            latitude: lat,
            longitude: lon,
            total_beds: 50,
            beds_available: Some(12),
            icu_beds: 10,
            icu_beds_available: Some(5),
            oxygen_available: Some(6),
            ambulance_count: 2,
            emergency_contact: "100".to_string(),
        };
        FacilityRegistry::new(vec![
            site("A", 19.00, 72.85),
            site("B", 18.96, 72.83),
            site("C", 19.10, 72.90),
            site("D", 19.30, 73.00),
        ])
        .unwrap()
    }

    #[test]
    fn test_notify_caps_at_default_top_n() {
        let engine = SurgeEngine::new(registry());
        let report = engine.notify(&SeverityLevel::Stampede, 18.95, 72.8258).unwrap();
        let targets: Vec<&str> = report.notifications().iter().map(|n| n.target_name.as_str()).collect();
        assert_eq!(targets, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_notify_calm_is_no_action() {
        let engine = SurgeEngine::new(registry());
        let report = engine.notify(&SeverityLevel::Calm, 18.95, 72.8258).unwrap();
        assert_eq!(report, DispatchReport::NoActionRequired);
    }

    #[test]
    fn test_notify_without_capacity() {
        let engine = SurgeEngine::new(FacilityRegistry::default());
        let report = engine.notify(&SeverityLevel::Aggressive, 18.95, 72.8258).unwrap();
        assert_eq!(report, DispatchReport::NoFacilityAvailable);
        assert_eq!(report.summary(), "No hospitals with required resources found nearby.");
    }

    #[test]
    fn test_recommend_rejects_bad_coordinates() {
        let engine = SurgeEngine::new(registry());
        let result = engine.recommend(&SeverityLevel::Stampede, 123.0, 72.8, 3);
        assert!(matches!(result, Err(SurgeError::InvalidCoordinate { .. })));
    }

    #[test]
    fn test_recommend_custom_top_n() {
        let engine = SurgeEngine::new(registry()).with_default_top_n(1);
        let outcome = engine.recommend(&SeverityLevel::Dispersing, 18.95, 72.8258, 4).unwrap();
        assert_eq!(outcome.facilities().len(), 4);
        let report = engine.notify(&SeverityLevel::Dispersing, 18.95, 72.8258).unwrap();
        assert_eq!(report.notifications().len(), 1);
    }
}
