use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::errors::Error;

// Read more about this implementation
// https://developers.google.com/identity/sign-in/web/backend-auth

const CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

// https://github.com/wyyerd/google-signin-rs/blob/master/src/token.rs
#[derive(Debug, Deserialize)]
pub struct GoogleToken {
  // These fields are included in all Google ID Tokens.
  pub iss: String,
  pub sub: String,
  pub aud: String,

  // Only included when the user has granted the "profile" and "email" OAuth
  // scopes to the application.
  pub email: Option<String>,
  pub email_verified: Option<bool>,
  pub name: Option<String>,
  pub given_name: Option<String>,
  pub family_name: Option<String>,
}

impl GoogleToken {
  // Check the issuer and audience of the token. Returns false if no audience
  // is configured.
  pub fn is_valid(&self, audiences: &[&str]) -> bool {
    if !ISSUERS.contains(&self.iss.as_str()) {
      return false;
    }

    !audiences.is_empty() && audiences.contains(&self.aud.as_str())
  }

  pub fn display_name(&self) -> Option<String> {
    if let Some(ref name) = self.name {
      return Some(name.clone());
    }

    match (self.given_name.as_deref(), self.family_name.as_deref()) {
      (Some(given), Some(family)) => Some(format!("{} {}", given, family)),
      (Some(given), None) => Some(given.to_owned()),
      _ => None,
    }
  }

  pub fn verified_email(&self) -> Option<&str> {
    match (self.email.as_deref(), self.email_verified) {
      (Some(email), Some(true)) => Some(email),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
struct Cert {
  kid: String,
  e: String,
  n: String,
}

#[derive(Debug, Deserialize)]
struct Certs {
  keys: Vec<Cert>,
}

pub async fn validate(token: &str, client_id: &str) -> Result<GoogleToken, Error> {
  let unverified_header = jsonwebtoken::decode_header(token).map_err(|_| google_error())?;
  let kid = match unverified_header.kid {
    Some(kid) => kid,
    None => return Err(google_error()),
  };

  let certs = get_certs().await?;
  let cert = match certs.into_iter().find(|cert| cert.kid == kid) {
    Some(cert) => cert,
    None => {
      debug!("No Google certificate matches key id {}", &kid);
      return Err(google_error());
    }
  };

  let audiences = [client_id];
  let mut validation = Validation::new(Algorithm::RS256);
  validation.set_audience(&audiences);

  let token_data = jsonwebtoken::decode::<GoogleToken>(
    token,
    &DecodingKey::from_rsa_components(&cert.n, &cert.e),
    &validation,
  )
  .map_err(|err| {
    debug!("Google ID token rejected {}", err);
    google_error()
  })?;

  let google_token = token_data.claims;

  if google_token.is_valid(&audiences) {
    Ok(google_token)
  } else {
    Err(google_error())
  }
}

async fn get_certs() -> Result<Vec<Cert>, reqwest::Error> {
  let res = reqwest::get(CERTS_URL).await?.json::<Certs>().await;

  res.map(|res| res.keys)
}

fn google_error() -> Error {
  Error::ExternalAuthentication("Google".to_owned())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn token(iss: &str, aud: &str) -> GoogleToken {
    GoogleToken {
      iss: iss.to_owned(),
      sub: "110169484474386276334".to_owned(),
      aud: aud.to_owned(),
      email: Some("jane@example.com".to_owned()),
      email_verified: Some(true),
      name: Some("Jane Doe".to_owned()),
      given_name: Some("Jane".to_owned()),
      family_name: Some("Doe".to_owned()),
    }
  }

  #[test]
  fn accepts_google_issuers_for_the_configured_audience() {
    assert!(token("accounts.google.com", "client").is_valid(&["client"]));
    assert!(token("https://accounts.google.com", "client").is_valid(&["client"]));
  }

  #[test]
  fn rejects_foreign_issuers_and_audiences() {
    assert!(!token("evil.example.com", "client").is_valid(&["client"]));
    assert!(!token("accounts.google.com", "other").is_valid(&["client"]));
    assert!(!token("accounts.google.com", "client").is_valid(&[]));
  }

  #[test]
  fn display_name_falls_back_to_given_and_family_names() {
    let mut google_token = token("accounts.google.com", "client");
    assert_eq!(google_token.display_name().as_deref(), Some("Jane Doe"));

    google_token.name = None;
    google_token.family_name = Some("Smith".to_owned());
    assert_eq!(google_token.display_name().as_deref(), Some("Jane Smith"));

    google_token.given_name = None;
    assert_eq!(google_token.display_name(), None);
  }

  #[test]
  fn unverified_emails_are_ignored() {
    let mut google_token = token("accounts.google.com", "client");
    assert_eq!(google_token.verified_email(), Some("jane@example.com"));

    google_token.email_verified = Some(false);
    assert_eq!(google_token.verified_email(), None);
  }
}
