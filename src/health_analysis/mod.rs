/// Domain layer: dependency records, scoring policy and the pure services
/// that derive health scores, abandonment risk and upgrade advice.
pub mod domain;
pub mod policies;
pub mod services;
