// Domain layer: registry records, matching results and the ports the adapters implement.

pub mod model;
pub mod ports;
