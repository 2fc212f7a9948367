use std::time::Duration;
use wither::mongodb;

use crate::settings::Settings;

#[derive(Clone)]
pub struct Database {
  pub conn: mongodb::Database,
}

impl Database {
  pub async fn new(settings: &Settings) -> Result<Self, mongodb::error::Error> {
    let db_uri = settings.database.uri.as_str();
    let db_name = settings.database.name.as_str();

    let mut client_options = mongodb::options::ClientOptions::parse(db_uri).await?;
    client_options.app_name = Some("rucksack".to_owned());

    // Sign-in requests block on user lookups, fail fast when the cluster is
    // unreachable instead of waiting for the 30 seconds default.
    client_options.server_selection_timeout = Some(Duration::from_secs(5));

    let connection = mongodb::Client::with_options(client_options)?.database(db_name);
    info!("Connected to database {}", db_name);

    Ok(Self { conn: connection })
  }
}
