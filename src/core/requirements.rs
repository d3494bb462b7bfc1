use crate::domain::model::{ResourceKind, ResourceRequirement, SeverityLevel};

/// Minimum capacity a hospital needs for the given crowd severity.
///
/// `None` means no hospital preparation is needed and matching is skipped.
/// Labels the classifier emits outside the known set still get a one-bed
/// requirement rather than being ignored.
pub fn requirements_for(severity: &SeverityLevel) -> Option<ResourceRequirement> {
    let (beds, icu, oxygen) = match severity {
        SeverityLevel::Calm => return None,
        SeverityLevel::Dispersing => (2, 1, 1),
        SeverityLevel::Aggressive => (4, 2, 2),
        SeverityLevel::Stampede => (8, 4, 4),
        SeverityLevel::Unrecognized(_) => {
            return Some(ResourceRequirement::new().with(ResourceKind::BedsAvailable, 1));
        }
    };

    Some(
        ResourceRequirement::new()
            .with(ResourceKind::BedsAvailable, beds)
            .with(ResourceKind::IcuBedsAvailable, icu)
            .with(ResourceKind::OxygenAvailable, oxygen),
    )
}
