use async_trait::async_trait;
use wither::bson::doc;
use wither::Model;

use crate::database::Database;
use crate::errors::{is_duplicate_key, Error};
use crate::models::store::UserStore;
use crate::models::user::User;

#[derive(Clone)]
pub struct MongoUserStore {
  database: Database,
}

impl MongoUserStore {
  pub async fn new(database: Database) -> Result<Self, Error> {
    debug!("Syncing user collection indexes");
    User::sync(&database.conn).await.map_err(Error::Wither)?;

    Ok(Self { database })
  }
}

#[async_trait]
impl UserStore for MongoUserStore {
  async fn create(&self, mut user: User) -> Result<User, Error> {
    match user.save(&self.database.conn, None).await {
      Ok(()) => Ok(user),
      Err(err) if is_duplicate_key(&err) => Err(Error::DuplicateEmail(user.email)),
      Err(err) => Err(Error::Wither(err)),
    }
  }

  async fn update(&self, user: &User) -> Result<(), Error> {
    if user.id.is_none() {
      return Err(Error::MissingUserId);
    }

    // Saving a model that already has an id replaces the stored document.
    let mut user = user.clone();
    user
      .save(&self.database.conn, None)
      .await
      .map_err(Error::Wither)
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
    User::find_one(&self.database.conn, doc! { "email": email }, None)
      .await
      .map_err(Error::Wither)
  }

  async fn find_by_login(
    &self,
    provider: &str,
    provider_key: &str,
  ) -> Result<Option<User>, Error> {
    let query = doc! {
      "logins": {
        "$elemMatch": { "provider": provider, "provider_key": provider_key }
      }
    };

    User::find_one(&self.database.conn, query, None)
      .await
      .map_err(Error::Wither)
  }
}
