/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports,
/// providing the actual integration with registries, repository hosts,
/// the advisory database, the file system and the console. The inbound
/// side is driven directly by the binary through `AnalysisControlPort`.
pub mod outbound;
