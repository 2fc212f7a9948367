pub mod external;
pub mod google;
pub mod password;
pub mod registration;
pub mod sign_in;

use actix_web::web;
use std::sync::Arc;

use crate::errors::Error;
use crate::models::store::UserStore;
use crate::models::user::{normalize_email, Claim, ExternalLogin, Role, User};
use password::PasswordPolicy;

// Outcome of an account operation that can be refused for business reasons.
// Infrastructure failures are reported through `Error` instead.
#[derive(Debug)]
pub enum IdentityResult<T = ()> {
  Succeeded(T),
  Failed(Vec<String>),
}

#[derive(Clone)]
pub struct UserManager {
  store: Arc<dyn UserStore>,
  policy: PasswordPolicy,
  password_cost: u32,
}

impl UserManager {
  pub fn new(store: Arc<dyn UserStore>, policy: PasswordPolicy, password_cost: u32) -> Self {
    Self {
      store,
      policy,
      password_cost,
    }
  }

  // Persists a new user. A `None` password creates an account that can only
  // sign in through an external provider.
  pub async fn create(
    &self,
    mut user: User,
    password: Option<&str>,
  ) -> Result<IdentityResult<User>, Error> {
    user.email = normalize_email(&user.email);

    if let Some(password) = password {
      let errors = self.policy.validate(password);
      if !errors.is_empty() {
        debug!("Password for {} does not satisfy the policy", &user.email);
        return Ok(IdentityResult::Failed(errors));
      }
    }

    if self.store.find_by_email(&user.email).await?.is_some() {
      debug!("Email {} is already registered", &user.email);
      return Ok(IdentityResult::Failed(vec![format!(
        "Email '{}' is already taken.",
        &user.email
      )]));
    }

    if let Some(password) = password {
      user.password = Some(self.hash_password(password).await?);
    }

    match self.store.create(user).await {
      Ok(user) => Ok(IdentityResult::Succeeded(user)),
      // Lost a race against a concurrent registration with the same email.
      Err(Error::DuplicateEmail(email)) => Ok(IdentityResult::Failed(vec![format!(
        "Email '{}' is already taken.",
        email
      )])),
      Err(err) => Err(err),
    }
  }

  pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
    self.store.find_by_email(&normalize_email(email)).await
  }

  pub async fn find_by_login(
    &self,
    provider: &str,
    provider_key: &str,
  ) -> Result<Option<User>, Error> {
    self.store.find_by_login(provider, provider_key).await
  }

  pub async fn check_password(&self, user: &User, password: &str) -> Result<bool, Error> {
    let hash = match user.password {
      Some(ref hash) => hash.clone(),
      None => return Ok(false),
    };
    let password = password.to_owned();

    let matches = web::block(move || bcrypt::verify(password, &hash)).await?;
    Ok(matches)
  }

  pub async fn add_claims(&self, user: &mut User, claims: Vec<Claim>) -> Result<(), Error> {
    user.claims.extend(claims);
    self.update(user).await
  }

  pub async fn add_to_role(&self, user: &mut User, role: Role) -> Result<(), Error> {
    if user.is_in_role(role) {
      return Ok(());
    }

    user.roles.push(role);
    self.update(user).await
  }

  pub fn is_in_role(&self, user: &User, role: Role) -> bool {
    user.is_in_role(role)
  }

  // Links an external identity to the user. Fails when the identity already
  // belongs to a different account.
  pub async fn add_login(
    &self,
    user: &mut User,
    login: ExternalLogin,
  ) -> Result<IdentityResult, Error> {
    let owner = self
      .store
      .find_by_login(&login.provider, &login.provider_key)
      .await?;

    if let Some(owner) = owner {
      if owner.id == user.id {
        return Ok(IdentityResult::Succeeded(()));
      }

      debug!(
        "{} login {} already belongs to another user",
        &login.provider, &login.provider_key
      );
      return Ok(IdentityResult::Failed(vec![format!(
        "A user with this {} login already exists.",
        &login.provider
      )]));
    }

    user.logins.push(login);
    self.update(user).await?;

    Ok(IdentityResult::Succeeded(()))
  }

  async fn update(&self, user: &mut User) -> Result<(), Error> {
    user.updated_at = chrono::Utc::now().into();
    self.store.update(user).await
  }

  async fn hash_password(&self, password: &str) -> Result<String, Error> {
    let password = password.to_owned();
    let cost = self.password_cost;

    let hash = web::block(move || bcrypt::hash(password, cost)).await?;
    Ok(hash)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::store::MemoryUserStore;
  use async_trait::async_trait;

  // Misses every lookup, so a duplicate only shows up when inserting, the
  // way a concurrent registration reaches the database unique index.
  struct RacingStore(MemoryUserStore);

  #[async_trait]
  impl UserStore for RacingStore {
    async fn create(&self, user: User) -> Result<User, Error> {
      self.0.create(user).await
    }

    async fn update(&self, user: &User) -> Result<(), Error> {
      self.0.update(user).await
    }

    async fn find_by_email(&self, _: &str) -> Result<Option<User>, Error> {
      Ok(None)
    }

    async fn find_by_login(&self, provider: &str, key: &str) -> Result<Option<User>, Error> {
      self.0.find_by_login(provider, key).await
    }
  }

  fn manager() -> UserManager {
    UserManager::new(
      Arc::new(MemoryUserStore::new()),
      PasswordPolicy::default(),
      4,
    )
  }

  fn google_login(key: &str) -> ExternalLogin {
    ExternalLogin {
      provider: "Google".to_owned(),
      provider_key: key.to_owned(),
      display_name: "Jane Doe".to_owned(),
    }
  }

  async fn create(users: &UserManager, email: &str, password: Option<&str>) -> User {
    match users
      .create(User::new(email, "Jane", "Doe", false), password)
      .await
      .unwrap()
    {
      IdentityResult::Succeeded(user) => user,
      IdentityResult::Failed(errors) => panic!("user creation failed {:?}", errors),
    }
  }

  #[actix_rt::test]
  async fn create_hashes_the_password() {
    let users = manager();
    let user = create(&users, "jane@example.com", Some("Passw0rd!")).await;

    let hash = user.password.clone().unwrap();
    assert_ne!(hash, "Passw0rd!");
    assert!(users.check_password(&user, "Passw0rd!").await.unwrap());
    assert!(!users.check_password(&user, "wrong").await.unwrap());
  }

  #[actix_rt::test]
  async fn create_rejects_weak_passwords() {
    let users = manager();
    let result = users
      .create(User::new("jane@example.com", "Jane", "Doe", false), Some("weak"))
      .await
      .unwrap();

    assert!(matches!(result, IdentityResult::Failed(_)));
    assert!(users.find_by_email("jane@example.com").await.unwrap().is_none());
  }

  #[actix_rt::test]
  async fn create_rejects_duplicate_emails_ignoring_case() {
    let users = manager();
    create(&users, "jane@example.com", Some("Passw0rd!")).await;

    let result = users
      .create(User::new("JANE@example.com", "Jane", "Doe", false), Some("Passw0rd!"))
      .await
      .unwrap();

    match result {
      IdentityResult::Failed(errors) => assert!(errors[0].contains("already taken")),
      IdentityResult::Succeeded(_) => panic!("duplicate email was accepted"),
    }
  }

  #[actix_rt::test]
  async fn users_without_password_never_match() {
    let users = manager();
    let user = create(&users, "jane@example.com", None).await;

    assert!(user.password.is_none());
    assert!(!users.check_password(&user, "").await.unwrap());
  }

  #[actix_rt::test]
  async fn roles_are_added_once() {
    let users = manager();
    let mut user = create(&users, "jane@example.com", None).await;

    users.add_to_role(&mut user, Role::Member).await.unwrap();
    users.add_to_role(&mut user, Role::Member).await.unwrap();

    let stored = users.find_by_email("jane@example.com").await.unwrap().unwrap();
    assert_eq!(stored.roles, vec![Role::Member]);
    assert!(users.is_in_role(&stored, Role::Member));
    assert!(!users.is_in_role(&stored, Role::Admin));
  }

  #[actix_rt::test]
  async fn external_login_belongs_to_a_single_user() {
    let users = manager();
    let mut jane = create(&users, "jane@example.com", None).await;
    let mut john = create(&users, "john@example.com", None).await;

    let linked = users.add_login(&mut jane, google_login("42")).await.unwrap();
    assert!(matches!(linked, IdentityResult::Succeeded(())));

    let again = users.add_login(&mut jane, google_login("42")).await.unwrap();
    assert!(matches!(again, IdentityResult::Succeeded(())));
    assert_eq!(jane.logins.len(), 1);

    let stolen = users.add_login(&mut john, google_login("42")).await.unwrap();
    assert!(matches!(stolen, IdentityResult::Failed(_)));

    let owner = users.find_by_login("Google", "42").await.unwrap().unwrap();
    assert_eq!(owner.email, "jane@example.com");
  }

  #[actix_rt::test]
  async fn duplicate_rejected_by_the_store_is_a_failed_result() {
    let memory = MemoryUserStore::new();
    memory
      .create(User::new("jane@example.com", "Jane", "Doe", false))
      .await
      .unwrap();
    let users = UserManager::new(
      Arc::new(RacingStore(memory)),
      PasswordPolicy::default(),
      4,
    );

    let result = users
      .create(User::new("Jane@example.com", "Jane", "Doe", false), Some("Passw0rd!"))
      .await
      .unwrap();

    match result {
      IdentityResult::Failed(errors) => assert!(errors[0].contains("already taken")),
      IdentityResult::Succeeded(_) => panic!("duplicate email was accepted"),
    }
  }
}
