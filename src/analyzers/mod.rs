//! Yearly trend analysis of air-quality measurements.
//!
//! Records are bucketed into yearly means, a least-squares line is fitted over
//! those means, the line is extrapolated a few periods ahead, and observed and
//! projected values are laid out on a shared axis for charting.

pub mod aggregate;
pub mod analyzer;
pub mod compose;
pub mod forecast;
pub mod grade;
pub mod regression;
pub mod types;
pub mod utility;
