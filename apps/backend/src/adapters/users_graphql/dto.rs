//! Wire shapes for the users_graphql adapter.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::graphql::UserIdType;
use crate::geo::Coordinates;
use crate::repos::users::{NewUser, UserCredentials, UserProfile, UserWithLocation};

/// Hasura ids may be uuids (strings) or serial integers.
fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(d)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

// ---- variables ----

#[derive(Debug, Serialize)]
pub struct EmailVars<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct IdVars {
    pub id: Value,
}

impl IdVars {
    /// Numeric id columns need a JSON number; `None` if `id` is not one.
    pub fn encode(id: &str, id_type: UserIdType) -> Option<Self> {
        let id = if id_type.is_numeric() {
            Value::from(id.parse::<i64>().ok()?)
        } else {
            Value::from(id)
        };
        Some(Self { id })
    }
}

#[derive(Debug, Serialize)]
pub struct UserInsertInput<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub gender: &'a str,
}

impl<'a> From<&'a NewUser> for UserInsertInput<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            email: &user.email,
            password: &user.password_hash,
            first_name: &user.first_name,
            last_name: &user.last_name,
            gender: &user.gender,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterVars<'a> {
    pub user: UserInsertInput<'a>,
}

#[derive(Debug, Serialize)]
pub struct OffsetVars {
    pub offset: u32,
}

#[derive(Debug, Serialize)]
pub struct PageVars {
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct NoVars {}

// ---- responses ----

#[derive(Debug, Deserialize)]
pub struct UsersData<T> {
    pub user: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct InsertUserData {
    pub insert_user_one: Option<IdRow>,
}

#[derive(Debug, Deserialize)]
pub struct IdRow {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CredentialRow {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialRow {
    /// Rows without a stored digest cannot log in.
    pub fn into_credentials(self) -> Option<UserCredentials> {
        let password_hash = self.password.filter(|p| !p.is_empty())?;
        Some(UserCredentials {
            id: self.id,
            password_hash,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfileRow {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name.unwrap_or_default(),
            last_name: row.last_name.unwrap_or_default(),
            gender: row.gender.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TrackingRow {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct TrackedUserRow {
    #[serde(flatten)]
    pub profile: ProfileRow,
    #[serde(default)]
    pub user_trackings: Vec<TrackingRow>,
}

impl From<TrackedUserRow> for UserWithLocation {
    fn from(row: TrackedUserRow) -> Self {
        // Out-of-range points from the store are treated as "no position".
        let location = row
            .user_trackings
            .first()
            .and_then(|t| Coordinates::new(t.lat, t.lng).ok());
        Self {
            profile: row.profile.into(),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ids_accept_strings_and_integers() {
        let a: IdRow = serde_json::from_value(json!({"id": "7f1c"})).unwrap();
        let b: IdRow = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(a.id, "7f1c");
        assert_eq!(b.id, "42");
    }

    #[test]
    fn first_tracking_is_the_current_position() {
        let row: TrackedUserRow = serde_json::from_value(json!({
            "id": 1,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "gender": "f",
            "user_trackings": [{"lat": 51.5, "lng": -0.12}, {"lat": 0.0, "lng": 0.0}]
        }))
        .unwrap();

        let user = UserWithLocation::from(row);
        assert_eq!(user.profile.first_name, "Ada");
        assert_eq!(
            user.current_position(),
            Some(Coordinates { lat: 51.5, lng: -0.12 })
        );
    }

    #[test]
    fn missing_trackings_and_nulls_are_tolerated() {
        let row: TrackedUserRow = serde_json::from_value(json!({
            "id": "u-1",
            "first_name": null,
            "last_name": "X",
            "gender": "m"
        }))
        .unwrap();

        let user = UserWithLocation::from(row);
        assert_eq!(user.profile.first_name, "");
        assert_eq!(user.current_position(), None);
    }

    #[test]
    fn credential_rows_without_digest_are_dropped() {
        let row: CredentialRow =
            serde_json::from_value(json!({"id": "u-1", "password": null})).unwrap();
        assert!(row.into_credentials().is_none());
    }

    #[test]
    fn id_variables_follow_the_column_type() {
        let uuid = IdVars::encode("7f1c", UserIdType::Uuid).unwrap();
        assert_eq!(uuid.id, json!("7f1c"));

        let int = IdVars::encode("42", UserIdType::Int).unwrap();
        assert_eq!(int.id, json!(42));

        assert!(IdVars::encode("not-a-number", UserIdType::Bigint).is_none());
    }

    #[test]
    fn insert_input_uses_store_column_names() {
        let user = NewUser {
            email: "a@x.com".into(),
            password_hash: "$argon2id$digest".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            gender: "x".into(),
        };
        let vars = serde_json::to_value(RegisterVars {
            user: UserInsertInput::from(&user),
        })
        .unwrap();
        assert_eq!(vars["user"]["password"], "$argon2id$digest");
        assert_eq!(vars["user"]["email"], "a@x.com");
    }
}
