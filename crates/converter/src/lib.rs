//! tgsrender Converter
//!
//! Drives a batch of sticker conversions through one rendering session.
//! Each job is a linear pipeline; a failure ends that job only.
//!
//! ```text
//! paths ──expand_inputs──▶ [a.tgs, c.tgs, …] ──plan_jobs──▶ [ConversionJob]
//!                                                                │
//!                  ┌─────────────── per job, in order ───────────┘
//!                  ▼
//!            decompress ──▶ probe ──▶ session.render ──▶ JobOutcome
//!                                                            │
//!                                                            ▼
//!                                                       BatchReport
//! ```

pub mod driver;
pub mod expand;
pub mod job;
pub mod report;

pub use driver::*;
pub use expand::*;
pub use job::*;
pub use report::*;
