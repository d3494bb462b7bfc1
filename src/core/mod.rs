pub mod engine;
pub mod geo;
pub mod matcher;
pub mod notifier;
pub mod registry;
pub mod requirements;

pub use crate::domain::model::{
    Coordinate, DispatchReport, EventContext, FacilityRecord, MatchOutcome, MatchedFacility,
    Notification, ResourceKind, ResourceRequirement, SeverityLevel,
};
pub use crate::domain::ports::{ConfigProvider, RegistrySource, Storage};
pub use crate::utils::error::Result;
