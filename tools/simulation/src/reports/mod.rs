//! Report modules for simulation output
//!
//! Depth charts, price impact curves, and profitability reports.

pub mod depth;
pub mod impact;
pub mod profitability;
