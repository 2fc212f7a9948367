use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::errors::Error;
use crate::identity::external::{ExternalLoginInfo, ExternalProvider};
use crate::lib::google;
use crate::settings::GoogleOAuth;

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
  id_token: Option<String>,
}

#[derive(Clone)]
pub struct GoogleProvider {
  client_id: String,
  client_secret: String,
  http: reqwest::Client,
}

impl GoogleProvider {
  pub fn new(settings: &GoogleOAuth) -> Self {
    Self {
      client_id: settings.client_id.clone(),
      client_secret: settings.client_secret.clone(),
      http: reqwest::Client::new(),
    }
  }

  fn error(&self) -> Error {
    Error::ExternalAuthentication(self.name().to_owned())
  }
}

#[async_trait]
impl ExternalProvider for GoogleProvider {
  fn name(&self) -> &str {
    "Google"
  }

  fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String, Error> {
    let url = Url::parse_with_params(
      AUTHORIZATION_ENDPOINT,
      &[
        ("client_id", self.client_id.as_str()),
        ("redirect_uri", redirect_uri),
        ("response_type", "code"),
        ("scope", "openid email profile"),
        ("state", state),
      ],
    )
    .map_err(|_| Error::ParseURL())?;

    Ok(url.to_string())
  }

  async fn exchange_code(
    &self,
    code: &str,
    redirect_uri: &str,
  ) -> Result<ExternalLoginInfo, Error> {
    let params = [
      ("code", code),
      ("client_id", self.client_id.as_str()),
      ("client_secret", self.client_secret.as_str()),
      ("redirect_uri", redirect_uri),
      ("grant_type", "authorization_code"),
    ];

    let res = self
      .http
      .post(TOKEN_ENDPOINT)
      .form(&params)
      .send()
      .await?
      .error_for_status()?
      .json::<TokenResponse>()
      .await?;

    let id_token = match res.id_token {
      Some(id_token) => id_token,
      None => {
        debug!("Google token response has no id_token");
        return Err(self.error());
      }
    };

    let token = google::validate(&id_token, &self.client_id).await?;

    let email = match token.verified_email() {
      Some(email) => email.to_owned(),
      None => {
        debug!("Google account {} has no verified email", &token.sub);
        return Err(self.error());
      }
    };
    let display_name = token.display_name().unwrap_or_else(|| email.clone());

    Ok(ExternalLoginInfo {
      provider: self.name().to_owned(),
      provider_key: token.sub,
      email,
      display_name,
    })
  }
}
