use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::auth::SessionUser;
use crate::errors::Error;
use crate::identity::external::ExternalLoginInfo;
use crate::identity::UserManager;
use crate::lib::token::{self, Claims};
use crate::lib::util::create_random_token;
use crate::models::user::User;
use crate::settings::Settings;

pub const EXTERNAL_LOGIN_COOKIE: &str = "rucksack_external_login";
pub const CORRELATION_COOKIE: &str = "rucksack_correlation";

// The provider handshake and the confirmation form must complete within this
// window.
const EXTERNAL_LIFETIME_MINUTES: i64 = 10;

pub struct SignedIn {
  pub user: User,
  pub cookie: Cookie<'static>,
}

// Ties an OAuth callback to the browser that started the challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correlation {
  pub provider: String,
  pub state: String,
}

#[derive(Clone)]
pub struct SignInManager {
  users: UserManager,
  secret: String,
  session_cookie: String,
  session_lifetime: chrono::Duration,
  secure_cookies: bool,
}

impl SignInManager {
  pub fn new(users: UserManager, settings: &Settings) -> Self {
    Self {
      users,
      secret: settings.auth.secret.clone(),
      session_cookie: settings.auth.session_cookie.clone(),
      session_lifetime: chrono::Duration::hours(settings.auth.session_hours),
      secure_cookies: settings.secure_cookies(),
    }
  }

  // Checks the credentials. Lockout is not tracked, a failed attempt has no
  // side effects.
  pub async fn password_sign_in(
    &self,
    email: &str,
    password: &str,
  ) -> Result<Option<SignedIn>, Error> {
    let user = match self.users.find_by_email(email).await? {
      Some(user) => user,
      None => {
        debug!("No user registered with email {}", email);
        return Ok(None);
      }
    };

    if !self.users.check_password(&user, password).await? {
      debug!("Password does not match for {}", &user.email);
      return Ok(None);
    }

    let cookie = self.sign_in(&user)?;
    Ok(Some(SignedIn { user, cookie }))
  }

  pub async fn external_login_sign_in(
    &self,
    provider: &str,
    provider_key: &str,
  ) -> Result<Option<SignedIn>, Error> {
    let user = match self.users.find_by_login(provider, provider_key).await? {
      Some(user) => user,
      None => return Ok(None),
    };

    let cookie = self.sign_in(&user)?;
    Ok(Some(SignedIn { user, cookie }))
  }

  // Issues a session cookie. The cookie has no max age so it ends with the
  // browser session.
  pub fn sign_in(&self, user: &User) -> Result<Cookie<'static>, Error> {
    let claims = Claims::new(
      token::SESSION_AUDIENCE,
      SessionUser::from(user),
      self.session_lifetime,
    );
    let token = token::create_token(&claims, &self.secret)?;

    Ok(self.cookie(&self.session_cookie, token))
  }

  pub fn sign_out(&self) -> Cookie<'static> {
    self.cookie(&self.session_cookie, String::new())
  }

  pub fn session(&self, req: &HttpRequest) -> Option<SessionUser> {
    let cookie = req.cookie(&self.session_cookie)?;
    if cookie.value().is_empty() {
      return None;
    }

    match token::decode_token(cookie.value(), &self.secret, token::SESSION_AUDIENCE) {
      Ok(user) => Some(user),
      Err(err) => {
        debug!("Ignoring invalid session cookie {}", err);
        None
      }
    }
  }

  // Starts an external challenge. Returns the OAuth `state` value and the
  // correlation cookie that must come back with the callback.
  pub fn configure_external_challenge(
    &self,
    provider: &str,
  ) -> Result<(String, Cookie<'static>), Error> {
    let correlation = Correlation {
      provider: provider.to_owned(),
      state: create_random_token(),
    };
    let state = correlation.state.clone();

    let claims = Claims::new(
      token::CORRELATION_AUDIENCE,
      correlation,
      chrono::Duration::minutes(EXTERNAL_LIFETIME_MINUTES),
    );
    let token = token::create_token(&claims, &self.secret)?;

    Ok((state, self.cookie(CORRELATION_COOKIE, token)))
  }

  pub fn external_challenge(&self, req: &HttpRequest, state: &str) -> Option<Correlation> {
    let cookie = req.cookie(CORRELATION_COOKIE)?;
    let correlation: Correlation =
      token::decode_token(cookie.value(), &self.secret, token::CORRELATION_AUDIENCE).ok()?;

    if correlation.state == state {
      Some(correlation)
    } else {
      debug!("OAuth state does not match the correlation cookie");
      None
    }
  }

  pub fn forget_external_challenge(&self) -> Cookie<'static> {
    self.cookie(CORRELATION_COOKIE, String::new())
  }

  // Keeps the provider identity between the callback and the confirmation
  // form.
  pub fn remember_external_login(&self, info: &ExternalLoginInfo) -> Result<Cookie<'static>, Error> {
    let claims = Claims::new(
      token::EXTERNAL_LOGIN_AUDIENCE,
      info.clone(),
      chrono::Duration::minutes(EXTERNAL_LIFETIME_MINUTES),
    );
    let token = token::create_token(&claims, &self.secret)?;

    Ok(self.cookie(EXTERNAL_LOGIN_COOKIE, token))
  }

  pub fn external_login_info(&self, req: &HttpRequest) -> Option<ExternalLoginInfo> {
    let cookie = req.cookie(EXTERNAL_LOGIN_COOKIE)?;
    token::decode_token(cookie.value(), &self.secret, token::EXTERNAL_LOGIN_AUDIENCE).ok()
  }

  pub fn forget_external_login(&self) -> Cookie<'static> {
    self.cookie(EXTERNAL_LOGIN_COOKIE, String::new())
  }

  fn cookie(&self, name: &str, value: String) -> Cookie<'static> {
    Cookie::build(name.to_owned(), value)
      .path("/")
      .http_only(true)
      .secure(self.secure_cookies)
      .same_site(SameSite::Lax)
      .finish()
  }
}
