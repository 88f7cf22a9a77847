/// Application layer - Use cases, read models and DTOs
///
/// This layer contains the application logic that orchestrates
/// domain services and coordinates with infrastructure through ports.
pub mod dto;
pub mod factories;
pub mod read_models;
pub mod run_coordinator;
pub mod use_cases;

pub use run_coordinator::{RunCoordinator, RunGuard};
