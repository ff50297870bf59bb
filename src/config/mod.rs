//! Configuration module for the scan dashboard.

mod debug;
mod filters;
mod scan;
mod server;

pub use debug::DF;
pub use filters::{FILTERS, FilterLimit, FilterLimits};
pub use scan::{SCAN, ScanConfig};
pub use server::{ReconnectPolicy, SERVER, ServerConfig};
