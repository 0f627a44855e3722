mod config_loader;
#[cfg(test)]
mod tests;

pub use config_loader::{ConfigLoader, ErrorLogSettings, ReportingConfig};
