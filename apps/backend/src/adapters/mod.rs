//! Concrete user-store adapters.

pub mod graphql;
pub mod users_graphql;
pub mod users_memory;

pub use graphql::GraphQLClient;
pub use users_graphql::GraphQLUserRepository;
pub use users_memory::InMemoryUserRepository;
