//! # Wages Common Library
//!
//! Shared code for the salary calculator server and command line tool:
//! - Shift and salary types
//! - Calculator settings and configuration loading
//! - The salary calculation pipeline
//! - CSV timesheet parsing
//! - Report grouping for display

pub mod calculator;
pub mod config;
pub mod csv;
pub mod error;
pub mod model;
pub mod report;
pub mod settings;

pub use calculator::SalaryCalculator;
pub use error::{Error, Result};
pub use model::{SalaryDetails, ShiftDetails};
pub use settings::CalculatorSettings;
