//! geofloor library: speed-of-light plausibility checks for hop geolocations
//!
//! Given the hops of a network path (IP, ASN, minimum RTT and a claimed place),
//! this library geolocates each hop and checks that every claimed location is
//! reachable from the last trusted hop within the RTT growth, at the speed of
//! light in optical fiber. Hops that fail the check are reported as wrong IP
//! mappings.
//!
//! # Example
//!
//! ```no_run
//! use geofloor::{run_floor_test, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     source: "hops.txt".to_string(),
//!     reference_country: Some("US".to_string()),
//!     boundaries: Some("countries.geojson".to_string()),
//!     ..Default::default()
//! };
//!
//! let report = run_floor_test(config).await?;
//! println!(
//!     "{} hops checked: {} accepted, {} rejected",
//!     report.summary.verified, report.summary.accepted, report.summary.rejected
//! );
//! # Ok(())
//! # }
//! ```
//!
//! The building blocks ([`geo`], [`border`], [`validator`]) are synchronous and
//! free of I/O; everything that talks to the network goes through the traits in
//! [`gateway`].
//!
//! # Requirements
//!
//! The pipeline and the gateways require a Tokio runtime.

mod app;
pub mod border;
pub mod config;
pub mod error_handling;
pub mod export;
pub mod gateway;
pub mod geo;
pub mod hop;
pub mod initialization;
pub mod resolve;
mod run;
pub mod validator;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use export::{ExportFormat, FloorTestReport, ReportSummary};
pub use run::{init_resolver, run_floor_test, GatewayResolver};
