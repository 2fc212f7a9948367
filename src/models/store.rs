mod memory;
mod mongo;

use async_trait::async_trait;
use std::sync::Arc;

use crate::database::Database;
use crate::errors::Error;
use crate::models::user::User;
use crate::settings::Settings;

pub use memory::MemoryUserStore;
pub use mongo::MongoUserStore;

// Persistence for user accounts. Implementations are expected to treat
// emails as already normalized and to reject duplicates on `create`.
#[async_trait]
pub trait UserStore: Send + Sync {
  async fn create(&self, user: User) -> Result<User, Error>;

  async fn update(&self, user: &User) -> Result<(), Error>;

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error>;

  async fn find_by_login(&self, provider: &str, provider_key: &str)
    -> Result<Option<User>, Error>;
}

pub async fn connect(settings: &Settings) -> Result<Arc<dyn UserStore>, Error> {
  if settings.is_memory_database() {
    warn!("Using the in-memory user store, accounts are lost on restart");
    return Ok(Arc::new(MemoryUserStore::new()));
  }

  let database = Database::new(settings).await?;
  let store = MongoUserStore::new(database).await?;
  Ok(Arc::new(store))
}
