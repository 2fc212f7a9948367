use actix_web::cookie::Cookie;
use actix_web::{HttpMessage, HttpRequest};
use strum::{Display, EnumString};

pub const COOKIE_NAME: &str = "rucksack_flash";

// One-shot messages carried across a redirect and shown on the login page.
// The cookie stores the variant name, never free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Flash {
  ProviderError,
  LoadingInformation,
}

impl Flash {
  pub fn message(&self) -> &'static str {
    match self {
      Flash::ProviderError => "Error from Provider",
      Flash::LoadingInformation => "Error Loading Information",
    }
  }

  pub fn cookie(&self) -> Cookie<'static> {
    Cookie::build(COOKIE_NAME, self.to_string())
      .path("/")
      .http_only(true)
      .finish()
  }
}

pub fn peek(req: &HttpRequest) -> Option<Flash> {
  req
    .cookie(COOKIE_NAME)
    .and_then(|cookie| cookie.value().parse::<Flash>().ok())
}

// Removal cookie, sent once the message has been displayed.
pub fn removal() -> Cookie<'static> {
  Cookie::build(COOKIE_NAME, "").path("/").finish()
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn reads_the_flash_back_from_its_cookie() {
    let req = TestRequest::default()
      .cookie(Flash::ProviderError.cookie())
      .to_http_request();

    assert_eq!(peek(&req), Some(Flash::ProviderError));
    assert_eq!(peek(&req).unwrap().message(), "Error from Provider");
  }

  #[test]
  fn ignores_unknown_values() {
    let req = TestRequest::default()
      .cookie(Cookie::new(COOKIE_NAME, "<script>"))
      .to_http_request();

    assert_eq!(peek(&req), None);
  }
}
