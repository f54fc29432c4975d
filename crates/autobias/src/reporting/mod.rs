//! Report generation module.
//!
//! [`AuditReport`] is the serializable record of one audit run. It backs
//! the JSON written to stdout (`--json`), the report file
//! (`--emit-report`), and programmatic access in library mode.
//!
//! # Example
//!
//! ```rust,ignore
//! use autobias::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_report("data/adult.csv", None, &session, None);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new("output");
//! generator.write_report_to_file(&report, "adult")?;
//! ```

mod generator;

pub use generator::{AuditReport, DatasetShape, ReportGenerator};
