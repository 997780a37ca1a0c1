pub mod graphql;
pub mod settings;

pub use graphql::{GraphQLConfig, UserIdType};
pub use settings::{LogFormat, Settings};
