// CalmPulse - vitals simulation and panic-support engine

pub mod coping;
pub mod session;
pub mod telemetry;
pub mod vitals;
