use crate::domain::model::{EventContext, MatchedFacility, Notification};

pub const CLOSING_INSTRUCTION: &str =
    "Please prepare paramedics and necessary resources for potential incoming cases.";

fn count_or_unknown(count: Option<u32>) -> String {
    count.map_or_else(|| "unknown".to_string(), |n| n.to_string())
}

/// Builds the alert for one matched hospital. Pure: same inputs, same text.
pub fn format_notification(event: &EventContext, matched: &MatchedFacility) -> Notification {
    let facility = &matched.facility;
    let lines = [
        format!(
            "ALERT to {} ({:.1} m away):",
            facility.name, matched.distance_meters
        ),
        format!("Situation: {}", event.severity),
        format!("Location: {}", event.location),
        format!(
            "Beds Available: {} / Total: {}",
            count_or_unknown(facility.beds_available),
            facility.total_beds
        ),
        format!(
            "ICU Beds Available: {} / Total: {}",
            count_or_unknown(facility.icu_beds_available),
            facility.icu_beds
        ),
        format!(
            "Oxygen Cylinders Available: {}",
            count_or_unknown(facility.oxygen_available)
        ),
        format!("Ambulances: {}", facility.ambulance_count),
        format!("Address: {}", facility.full_address()),
        format!("CONTACT: {}", facility.emergency_contact),
        CLOSING_INSTRUCTION.to_string(),
    ];

    Notification {
        target_name: facility.name.clone(),
        message_text: lines.join("\n"),
        contact: facility.emergency_contact.clone(),
    }
}
