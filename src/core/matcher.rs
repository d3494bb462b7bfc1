use crate::core::geo::{distance_meters, round_to_decimeter};
use crate::core::registry::FacilityRegistry;
use crate::core::requirements::requirements_for;
use crate::domain::model::{Coordinate, MatchOutcome, MatchedFacility, SeverityLevel};
use crate::utils::error::{Result, SurgeError};

pub const DEFAULT_TOP_N: usize = 3;

/// Ranks registry facilities that can absorb casualties for an event.
pub struct MatchingEngine<'a> {
    registry: &'a FacilityRegistry,
}

impl<'a> MatchingEngine<'a> {
    pub fn new(registry: &'a FacilityRegistry) -> Self {
        Self { registry }
    }

    /// Nearest `top_n` facilities meeting the severity's requirement, closest
    /// first. Equal distances keep registry order.
    pub fn match_facilities(
        &self,
        severity: &SeverityLevel,
        event: Coordinate,
        top_n: usize,
    ) -> Result<MatchOutcome> {
        if top_n == 0 {
            return Err(SurgeError::InvalidInput {
                field: "top_n".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let Some(requirement) = requirements_for(severity) else {
            tracing::info!("Severity '{}' requires no action, skipping match", severity);
            return Ok(MatchOutcome::NoActionRequired);
        };

        let mut candidates: Vec<(f64, usize)> = self
            .registry
            .sites()
            .enumerate()
            .filter(|(_, (facility, _))| requirement.is_met_by(facility))
            .map(|(idx, (_, site))| (distance_meters(event, site), idx))
            .collect();

        tracing::debug!(
            "{} of {} facilities meet requirement for '{}'",
            candidates.len(),
            self.registry.len(),
            severity
        );

        if candidates.is_empty() {
            tracing::warn!("No facility meets the requirement for '{}'", severity);
            return Ok(MatchOutcome::Candidates(Vec::new()));
        }

        // stable, so ties keep registry order
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.truncate(top_n);

        let facilities = self.registry.facilities();
        let matched = candidates
            .into_iter()
            .map(|(meters, idx)| MatchedFacility {
                facility: facilities[idx].clone(),
                distance_meters: round_to_decimeter(meters),
            })
            .collect();

        Ok(MatchOutcome::Candidates(matched))
    }
}
