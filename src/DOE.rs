//! eng
//! Design-of-experiments generators for high-throughput LNP formulation screening.
//! A design method turns factor ranges into a matrix of design points, the run sheet
//! module expands those points into lab-ready pipetting recipes with replicates and
//! blocks.
pub mod design;
pub mod run_sheet;
#[cfg(test)]
mod doe_tests;
