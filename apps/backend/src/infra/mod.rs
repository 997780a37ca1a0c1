//! Infrastructure layer: state assembly and store error translation.

pub mod graphql_errors;
pub mod state;
