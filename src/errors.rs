use actix_web::dev::HttpResponseBuilder;
use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use lettre_email::error::Error as LettreEmailError;
use reqwest::Error as ReqwestError;
use serde_json::json;
use wither::mongodb::error::CommandError as MongoCommandError;
use wither::mongodb::error::Error as MongoError;
use wither::mongodb::error::ErrorKind as MongoErrorKind;
use wither::mongodb::error::{WriteError, WriteFailure};
use wither::WitherError;

use crate::mailer::MailerError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
  #[error("Failed to read application shared data")]
  ReadAppData(),

  #[error("{0}")]
  Wither(#[from] WitherError),

  #[error("{0}")]
  Mongo(#[from] MongoError),

  #[error("Failed to acquire the user store lock")]
  LockStore,

  #[error("Email {0} is already taken")]
  DuplicateEmail(String),

  #[error("User has not been persisted yet")]
  MissingUserId,

  #[error("{0}")]
  Jwt(#[from] jsonwebtoken::errors::Error),

  #[error("{0}")]
  HashPassword(#[from] BlockingError<bcrypt::BcryptError>),

  #[error("Failed authenticating {0} external login")]
  ExternalAuthentication(String),

  #[error("Anti-forgery token missing or invalid")]
  AntiForgery {},

  #[error("Failed to parse URL")]
  ParseURL(),

  #[error("Error sending email {0}")]
  SendEmail(#[from] BlockingError<MailerError>),

  #[error("Failed to build email {0}")]
  BuildEmail(#[from] LettreEmailError),

  #[error("{0}")]
  Reqwest(#[from] ReqwestError),
}

impl Error {
  fn get_codes(&self) -> (StatusCode, u16) {
    match *self {
      // 4XX
      Error::ParseURL() => (StatusCode::BAD_REQUEST, 4041),
      Error::DuplicateEmail(_) => (StatusCode::BAD_REQUEST, 4042),
      Error::Wither(ref error) if is_duplicate_key(error) => (StatusCode::BAD_REQUEST, 4043),
      Error::AntiForgery {} => (StatusCode::BAD_REQUEST, 4046),

      // 401
      Error::ExternalAuthentication(_) => (StatusCode::UNAUTHORIZED, 4017),

      // 5XX
      Error::Wither(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5001),
      Error::ReadAppData() => (StatusCode::INTERNAL_SERVER_ERROR, 5002),
      Error::Mongo(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5003),
      Error::HashPassword(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5004),
      Error::Reqwest(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5005),
      Error::SendEmail(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5007),
      Error::BuildEmail(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5008),
      Error::LockStore => (StatusCode::INTERNAL_SERVER_ERROR, 5009),
      Error::MissingUserId => (StatusCode::INTERNAL_SERVER_ERROR, 5010),
      // Tokens are only minted here, decoding failures never surface as errors.
      Error::Jwt(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5011),
    }
  }
}

// Unique index violation, reported as a command error by upserts and as a
// write error by inserts.
pub fn is_duplicate_key(error: &WitherError) -> bool {
  let kind = match error {
    WitherError::Mongo(MongoError { kind, .. }) => kind.as_ref(),
    _ => return false,
  };

  matches!(
    kind,
    MongoErrorKind::CommandError(MongoCommandError { code: 11000, .. })
      | MongoErrorKind::WriteError(WriteFailure::WriteError(WriteError { code: 11000, .. }))
  )
}

impl actix_web::error::ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    self.get_codes().0
  }

  fn error_response(&self) -> HttpResponse {
    let message = self.to_string();
    let (status_code, code) = self.get_codes();

    if status_code == StatusCode::INTERNAL_SERVER_ERROR {
      error!("Internal server error {}", &message);
    }

    let body = json!({ "code": code, "message": message });
    HttpResponseBuilder::new(status_code).json(body)
  }
}
