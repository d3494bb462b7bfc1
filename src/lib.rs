pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FileRegistrySource, LocalStorage};
pub use config::{RunSettings, TomlConfig};
pub use crate::core::engine::SurgeEngine;
pub use crate::core::registry::{FacilityRegistry, SharedRegistry};
pub use domain::model::{
    Coordinate, DispatchReport, EventContext, FacilityRecord, MatchOutcome, MatchedFacility,
    Notification, SeverityLevel,
};
pub use utils::error::{Result, SurgeError};
