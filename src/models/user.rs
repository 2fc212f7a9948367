use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use wither::bson::DateTime;
use wither::bson::{doc, oid::ObjectId};
use wither::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Role {
  Member,
  Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum ClaimType {
  FullName,
  Email,
  Role,
  Subscription,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
  pub kind: ClaimType,
  pub value: String,
}

impl Claim {
  pub fn new<V: Into<String>>(kind: ClaimType, value: V) -> Self {
    Self {
      kind,
      value: value.into(),
    }
  }
}

// Association between a local account and an identity on an external
// provider. The (provider, provider_key) pair belongs to at most one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLogin {
  pub provider: String,
  pub provider_key: String,
  pub display_name: String,
}

#[derive(Debug, Clone, Model, Serialize, Deserialize)]
#[model(index(keys = r#"doc!{"email": 1}"#, options = r#"doc!{"unique": true}"#))]
#[model(index(
  keys = r#"doc!{"logins.provider": 1, "logins.provider_key": 1}"#,
  options = r#"doc!{"unique": true, "partialFilterExpression": {"logins.provider": {"$exists": true}}}"#
))]
pub struct User {
  #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
  pub id: Option<ObjectId>,

  pub email: String,
  pub first_name: String,
  pub last_name: String,
  pub subscribe: bool,

  // Accounts created through an external provider have no password.
  pub password: Option<String>,

  #[serde(default)]
  pub roles: Vec<Role>,
  #[serde(default)]
  pub claims: Vec<Claim>,
  #[serde(default)]
  pub logins: Vec<ExternalLogin>,

  pub created_at: DateTime,
  pub updated_at: DateTime,
}

impl User {
  pub fn new(email: &str, first_name: &str, last_name: &str, subscribe: bool) -> Self {
    let now = chrono::Utc::now().into();

    Self {
      id: None,
      email: normalize_email(email),
      first_name: first_name.trim().to_owned(),
      last_name: last_name.trim().to_owned(),
      subscribe,
      password: None,
      roles: vec![],
      claims: vec![],
      logins: vec![],
      created_at: now,
      updated_at: now,
    }
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
      .trim()
      .to_owned()
  }

  pub fn is_in_role(&self, role: Role) -> bool {
    self.roles.contains(&role)
  }

  pub fn has_login(&self, provider: &str, provider_key: &str) -> bool {
    self
      .logins
      .iter()
      .any(|login| login.provider == provider && login.provider_key == provider_key)
  }

  pub fn id_hex(&self) -> Option<String> {
    self.id.as_ref().map(|id| id.to_hex())
  }
}

// Emails double as user names and are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}
