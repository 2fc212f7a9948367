use actix_web::dev::HttpResponseBuilder;
use actix_web::http::header::IntoHeaderValue;
use actix_web::{http, HttpResponse};
use nanoid::nanoid;

type Response = actix_web::Result<HttpResponse>;

pub fn redirect_to<T: IntoHeaderValue>(url: T) -> Response {
  Ok(redirect(url).finish())
}

// Returns the builder so callers can attach cookies before finishing the
// response.
pub fn redirect<T: IntoHeaderValue>(url: T) -> HttpResponseBuilder {
  let mut builder = HttpResponse::Found();
  builder.header(http::header::LOCATION, url);
  builder
}

pub fn create_random_token() -> String {
  nanoid!(40, &nanoid::alphabet::SAFE)
}

// Splits a provider display name into first and last name on the first
// whitespace. Single word names yield an empty last name.
pub fn split_full_name(full_name: &str) -> (String, String) {
  let full_name = full_name.trim();

  match full_name.split_once(char::is_whitespace) {
    Some((first, last)) => (first.to_owned(), last.trim().to_owned()),
    None => (full_name.to_owned(), String::new()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn split_full_name_on_first_space() {
    assert_eq!(
      split_full_name("Ada King Lovelace"),
      ("Ada".to_owned(), "King Lovelace".to_owned())
    );
    assert_eq!(
      split_full_name("  Jane   Doe "),
      ("Jane".to_owned(), "Doe".to_owned())
    );
  }

  #[test]
  fn split_single_word_name() {
    assert_eq!(split_full_name("Cher"), ("Cher".to_owned(), String::new()));
    assert_eq!(split_full_name(""), (String::new(), String::new()));
  }

  #[test]
  fn random_tokens_are_unique() {
    let first = create_random_token();
    let second = create_random_token();

    assert_eq!(first.len(), 40);
    assert_ne!(first, second);
  }
}
