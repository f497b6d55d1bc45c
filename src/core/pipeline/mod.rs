//! The five-stage pipeline: inter-stage latches, hazard detection,
//! forwarding, and the stage functions themselves.

pub mod forwarding;
pub mod hazards;
pub mod latches;
pub mod stages;
