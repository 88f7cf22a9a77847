/// Inbound ports (Driving ports) - Use case interfaces
///
/// These ports define the interfaces that external adapters (e.g., CLI)
/// use to interact with the application core.
pub mod analysis_control_port;

pub use analysis_control_port::{AnalysisControlPort, AnalysisStatus, RunSummary, StartOutcome};
