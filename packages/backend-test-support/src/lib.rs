//! Test helpers shared by the auth service's unit and integration tests.
//!
//! Kept free of any dependency on the service crate so both test kinds can
//! use it.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;

pub use problem_details::{assert_problem_details, ProblemDetailsLike};
pub use unique_helpers::{unique_email, unique_str};
