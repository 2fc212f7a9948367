use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use wither::bson::oid::ObjectId;

use crate::errors::Error;
use crate::models::store::UserStore;
use crate::models::user::User;

// Process local store, selected with a `memory://` database URI.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
  users: Arc<Mutex<Vec<User>>>,
}

impl MemoryUserStore {
  pub fn new() -> Self {
    Self::default()
  }

  #[cfg(test)]
  pub fn users(&self) -> Vec<User> {
    self.lock().map(|users| users.clone()).unwrap_or_default()
  }

  fn lock(&self) -> Result<MutexGuard<Vec<User>>, Error> {
    self.users.lock().map_err(|_| Error::LockStore)
  }
}

#[async_trait]
impl UserStore for MemoryUserStore {
  async fn create(&self, mut user: User) -> Result<User, Error> {
    let mut users = self.lock()?;

    if users.iter().any(|existing| existing.email == user.email) {
      return Err(Error::DuplicateEmail(user.email));
    }

    user.id = Some(ObjectId::new());
    users.push(user.clone());

    Ok(user)
  }

  async fn update(&self, user: &User) -> Result<(), Error> {
    let id = user.id.clone().ok_or(Error::MissingUserId)?;
    let mut users = self.lock()?;

    match users.iter_mut().find(|existing| existing.id.as_ref() == Some(&id)) {
      Some(existing) => {
        *existing = user.clone();
        Ok(())
      }
      None => Err(Error::MissingUserId),
    }
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
    let users = self.lock()?;
    Ok(users.iter().find(|user| user.email == email).cloned())
  }

  async fn find_by_login(
    &self,
    provider: &str,
    provider_key: &str,
  ) -> Result<Option<User>, Error> {
    let users = self.lock()?;
    Ok(
      users
        .iter()
        .find(|user| user.has_login(provider, provider_key))
        .cloned(),
    )
  }
}
