//! GraphQL adapter for the user repository.
//!
//! Every operation is a static document with variables; nothing is ever
//! spliced into query text.

use async_trait::async_trait;
use tracing::debug;

use crate::adapters::graphql::GraphQLClient;
use crate::config::graphql::UserIdType;
use crate::errors::domain::{BackendErrorKind, DomainError};
use crate::repos::users::{
    NewUser, Page, UserCredentials, UserProfile, UserRepository, UserWithLocation,
};

pub mod dto;

use dto::{
    CredentialRow, EmailVars, IdVars, InsertUserData, NoVars, OffsetVars, PageVars, ProfileRow,
    RegisterVars, TrackedUserRow, UserInsertInput, UsersData,
};

pub const FIND_USER_BY_EMAIL: &str = r#"
query getUserByEmail($email: String!) {
  user(where: { email: { _eq: $email } }) {
    id
    password
  }
}"#;

// One document per id scalar; variable types must match the schema exactly.
macro_rules! find_user_by_id {
    ($ty:literal) => {
        concat!(
            r#"
query getUserById($id: "#,
            $ty,
            r#"!) {
  user(where: { id: { _eq: $id } }, limit: 1) {
    id
    first_name
    last_name
    gender
  }
}"#
        )
    };
}

pub const FIND_USER_BY_UUID: &str = find_user_by_id!("uuid");
pub const FIND_USER_BY_TEXT_ID: &str = find_user_by_id!("String");
pub const FIND_USER_BY_INT_ID: &str = find_user_by_id!("Int");
pub const FIND_USER_BY_BIGINT_ID: &str = find_user_by_id!("bigint");

fn find_user_by_id_query(id_type: UserIdType) -> &'static str {
    match id_type {
        UserIdType::Uuid => FIND_USER_BY_UUID,
        UserIdType::Text => FIND_USER_BY_TEXT_ID,
        UserIdType::Int => FIND_USER_BY_INT_ID,
        UserIdType::Bigint => FIND_USER_BY_BIGINT_ID,
    }
}

pub const REGISTER_USER: &str = r#"
mutation registerUser($user: user_insert_input!) {
  insert_user_one(object: $user) {
    id
  }
}"#;

pub const LIST_USERS: &str = r#"
query getUsers($offset: Int!) {
  user(offset: $offset) {
    id
    first_name
    last_name
    gender
  }
}"#;

pub const LIST_USERS_PAGE: &str = r#"
query getUsersPage($offset: Int!, $limit: Int!) {
  user(offset: $offset, limit: $limit) {
    id
    first_name
    last_name
    gender
  }
}"#;

pub const LIST_USERS_WITH_LOCATIONS: &str = r#"
query getUsersWithLocations {
  user {
    id
    first_name
    last_name
    gender
    user_trackings(order_by: { id: asc }, limit: 1) {
      lat
      lng
    }
  }
}"#;

#[derive(Debug, Clone)]
pub struct GraphQLUserRepository {
    client: GraphQLClient,
    id_type: UserIdType,
}

impl GraphQLUserRepository {
    pub fn new(client: GraphQLClient) -> Self {
        Self {
            client,
            id_type: UserIdType::default(),
        }
    }

    pub fn with_id_type(mut self, id_type: UserIdType) -> Self {
        self.id_type = id_type;
        self
    }
}

#[async_trait]
impl UserRepository for GraphQLUserRepository {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let data: UsersData<CredentialRow> = self
            .client
            .execute("getUserByEmail", FIND_USER_BY_EMAIL, EmailVars { email })
            .await?;

        if data.user.len() > 1 {
            debug!(matches = data.user.len(), "several users share an email; using the first");
        }
        Ok(data
            .user
            .into_iter()
            .next()
            .and_then(CredentialRow::into_credentials))
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<UserProfile>, DomainError> {
        // A non-numeric id can never match a numeric key
        let Some(vars) = IdVars::encode(id, self.id_type) else {
            return Ok(None);
        };
        let data: UsersData<ProfileRow> = self
            .client
            .execute("getUserById", find_user_by_id_query(self.id_type), vars)
            .await?;
        Ok(data.user.into_iter().next().map(UserProfile::from))
    }

    async fn create_user(&self, user: NewUser) -> Result<String, DomainError> {
        let vars = RegisterVars {
            user: UserInsertInput::from(&user),
        };
        let data: InsertUserData = self
            .client
            .execute("registerUser", REGISTER_USER, vars)
            .await?;

        data.insert_user_one.map(|row| row.id).ok_or_else(|| {
            DomainError::backend(
                BackendErrorKind::Rejected,
                "registerUser: store did not return the inserted row",
            )
        })
    }

    async fn list_users(&self, page: Page) -> Result<Vec<UserProfile>, DomainError> {
        let data: UsersData<ProfileRow> = match page.limit {
            Some(limit) => {
                let vars = PageVars {
                    offset: page.offset,
                    limit,
                };
                self.client
                    .execute("getUsersPage", LIST_USERS_PAGE, vars)
                    .await?
            }
            None => {
                let vars = OffsetVars {
                    offset: page.offset,
                };
                self.client.execute("getUsers", LIST_USERS, vars).await?
            }
        };
        Ok(data.user.into_iter().map(UserProfile::from).collect())
    }

    async fn list_users_with_locations(&self) -> Result<Vec<UserWithLocation>, DomainError> {
        let data: UsersData<TrackedUserRow> = self
            .client
            .execute("getUsersWithLocations", LIST_USERS_WITH_LOCATIONS, NoVars {})
            .await?;
        Ok(data.user.into_iter().map(UserWithLocation::from).collect())
    }
}
