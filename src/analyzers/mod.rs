//! Survey aggregation, CSAT detection, period bucketing and trend views.
//!
//! Everything here is synchronous and pure over normalized responses; the
//! only I/O is [`writetos3`], which publishes a finished report.

pub mod analyzer;
pub mod csat;
pub mod grade;
pub mod period;
pub mod survey;
pub mod tier;
pub mod trend;
pub mod types;
pub mod utility;
pub mod writetos3;
