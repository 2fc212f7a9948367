use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpMessage, HttpRequest};
use subtle::ConstantTimeEq;

use crate::errors::Error;
use crate::lib::util::create_random_token;

pub const COOKIE_NAME: &str = "rucksack_antiforgery";

// Double submit token: the same value travels in a cookie and in a hidden
// form field, and POST handlers require both to match.
pub struct AntiForgeryToken(String);

impl AntiForgeryToken {
  // Reuses the browser's current token so several open forms stay valid.
  pub fn for_request(req: &HttpRequest) -> Self {
    match req.cookie(COOKIE_NAME) {
      Some(cookie) if !cookie.value().is_empty() => Self(cookie.value().to_owned()),
      _ => Self(create_random_token()),
    }
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn cookie(&self) -> Cookie<'static> {
    Cookie::build(COOKIE_NAME, self.0.clone())
      .path("/")
      .http_only(true)
      .same_site(SameSite::Strict)
      .finish()
  }
}

pub fn verify(req: &HttpRequest, submitted: &str) -> Result<(), Error> {
  match req.cookie(COOKIE_NAME) {
    Some(cookie) if !submitted.is_empty() && tokens_match(cookie.value(), submitted) => Ok(()),
    _ => {
      debug!("Rejecting form post with a missing or mismatched anti-forgery token");
      Err(Error::AntiForgery {})
    }
  }
}

fn tokens_match(expected: &str, submitted: &str) -> bool {
  expected.as_bytes().ct_eq(submitted.as_bytes()).into()
}
