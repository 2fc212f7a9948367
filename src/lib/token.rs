use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

type TokenResult<T> = Result<T, jsonwebtoken::errors::Error>;

// Each cookie carries its own audience so a token minted for one purpose is
// rejected everywhere else.
pub const SESSION_AUDIENCE: &str = "session";
pub const EXTERNAL_LOGIN_AUDIENCE: &str = "external_login";
pub const CORRELATION_AUDIENCE: &str = "correlation";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims<T> {
  aud: String,
  exp: usize, // Expiration time (as UTC timestamp). validate_exp defaults to true in validation
  iat: usize, // Issued at (as UTC timestamp)
  #[serde(flatten)]
  pub payload: T,
}

impl<T> Claims<T> {
  pub fn new(audience: &str, payload: T, lifetime: chrono::Duration) -> Self {
    let now = chrono::Utc::now();

    Self {
      aud: audience.to_owned(),
      exp: (now + lifetime).timestamp() as usize,
      iat: now.timestamp() as usize,
      payload,
    }
  }
}

pub fn create_token<T: Serialize>(claims: &Claims<T>, secret: &str) -> TokenResult<String> {
  let header = Header::default();
  let encoding_key = EncodingKey::from_secret(secret.as_ref());

  jsonwebtoken::encode(&header, claims, &encoding_key)
}

pub fn decode_token<T: DeserializeOwned>(
  token: &str,
  secret: &str,
  audience: &str,
) -> TokenResult<T> {
  let mut validation = Validation::default();
  validation.set_audience(&[audience]);
  let decoding_key = DecodingKey::from_secret(secret.as_ref());

  jsonwebtoken::decode::<Claims<T>>(token, &decoding_key, &validation)
    .map(|token_data| token_data.claims.payload)
}
