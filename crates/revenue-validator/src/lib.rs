//! Revenue Observation Model and Validation
//!
//! Provides the country/month revenue record consumed by the scoring engine,
//! the month value type, and all-or-nothing input validation.

mod error;
mod month;
mod observation;
mod validator;

pub use error::ValidationError;
pub use month::Month;
pub use observation::{RawRevenueRow, RevenueObservation};
pub use validator::{ValidationResult, Validator};
