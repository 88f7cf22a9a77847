mod formatter_factory;
mod monitor_factory;
mod registry_selector;

pub use formatter_factory::FormatterFactory;
pub use monitor_factory::MonitorFactory;
pub use registry_selector::RegistrySelector;
