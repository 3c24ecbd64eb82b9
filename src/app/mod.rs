//! End-of-run reporting for the command-line application.

mod statistics;

pub use statistics::print_final_summary;
