use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::Error;
use crate::lib::util::split_full_name;
use crate::models::user::ExternalLogin;

// Identity asserted by an external provider after a successful handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLoginInfo {
  pub provider: String,
  pub provider_key: String,
  pub email: String,
  pub display_name: String,
}

impl ExternalLoginInfo {
  pub fn first_and_last_name(&self) -> (String, String) {
    split_full_name(&self.display_name)
  }

  pub fn to_login(&self) -> ExternalLogin {
    ExternalLogin {
      provider: self.provider.clone(),
      provider_key: self.provider_key.clone(),
      display_name: self.display_name.clone(),
    }
  }
}

#[async_trait]
pub trait ExternalProvider: Send + Sync {
  fn name(&self) -> &str;

  fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String, Error>;

  async fn exchange_code(&self, code: &str, redirect_uri: &str)
    -> Result<ExternalLoginInfo, Error>;
}

#[derive(Clone, Default)]
pub struct Providers {
  providers: Vec<Arc<dyn ExternalProvider>>,
}

impl Providers {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(mut self, provider: Arc<dyn ExternalProvider>) -> Self {
    info!("Enabling {} external login", provider.name());
    self.providers.push(provider);
    self
  }

  // Provider names are matched case-insensitively.
  pub fn find(&self, name: &str) -> Option<Arc<dyn ExternalProvider>> {
    self
      .providers
      .iter()
      .find(|provider| provider.name().eq_ignore_ascii_case(name.trim()))
      .cloned()
  }

  pub fn names(&self) -> Vec<String> {
    self
      .providers
      .iter()
      .map(|provider| provider.name().to_owned())
      .collect()
  }
}
