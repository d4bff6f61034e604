// Domain layer - Readings, severity scale and the projections derived from them
pub mod dashboard;
pub mod projection;
pub mod reading;
pub mod severity;
pub mod telemetry;
