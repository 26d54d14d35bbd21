//! Items most modules of the crate need.

pub use crate::{CalendarError, GregorianDate};
pub use derive_more::Display;
