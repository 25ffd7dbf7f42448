//! # Skylift Schedule
//!
//! Validation and cron-spec construction for scheduled analysis jobs.
//!
//! A submitted schedule form is validated as a whole: every check runs even
//! when earlier checks fail, and all failures come back in one
//! [`ValidationErrors`] map so the form can be redisplayed with every
//! problem flagged at once. Only a fully valid form produces a
//! [`ScheduleRequest`] and its derived [`CronSpec`].
//!
//! This crate is pure computation: no I/O, no shared state, no async.

mod cron_spec;
mod request;
mod validator;

pub use cron_spec::{CronSpec, display_day_of_month, display_day_of_week, hour_to_time};
pub use request::{Frequency, ScheduleRequest, fields};
pub use validator::{FieldError, ScheduleValidator, ValidationErrors};
