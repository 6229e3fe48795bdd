//! Lending rules: renewal window, overdue derivation and copy status lifecycle.
//!
//! Everything in here is pure. The reference date is always passed in by the
//! caller; handlers read it once per request from the application [`Clock`].

pub mod clock;
pub mod overdue;
pub mod renewal;
pub mod status;

pub use clock::{Clock, FixedClock, SystemClock};
pub use overdue::is_overdue;
pub use renewal::{validate_renewal_date, RenewalError, RenewalPolicy, RenewalWindow};
pub use status::{LoanStatus, TransitionError};
