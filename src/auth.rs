use actix_web::dev::Payload;
use actix_web::web;
use futures::future;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::errors::Error;
use crate::models::user::{Claim, Role, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
  pub sub: String,
  pub email: String,
  pub name: String,
  pub roles: Vec<Role>,
  pub claims: Vec<Claim>,
}

impl SessionUser {
  pub fn is_in_role(&self, role: Role) -> bool {
    self.roles.contains(&role)
  }
}

impl From<&User> for SessionUser {
  fn from(user: &User) -> Self {
    Self {
      sub: user.id_hex().unwrap_or_default(),
      email: user.email.clone(),
      name: user.full_name(),
      roles: user.roles.clone(),
      claims: user.claims.clone(),
    }
  }
}

// Request identity. Missing, expired or tampered session cookies all
// resolve to an anonymous identity.
pub struct Identity(Option<SessionUser>);

impl Identity {
  pub fn is_signed_in(&self) -> bool {
    self.0.is_some()
  }

  pub fn user(&self) -> Option<&SessionUser> {
    self.0.as_ref()
  }
}

impl actix_web::FromRequest for Identity {
  type Config = ();
  type Error = Error;
  type Future = future::Ready<Result<Self, Error>>;

  fn from_request(req: &actix_web::HttpRequest, _payload: &mut Payload) -> Self::Future {
    let ctx = match req.app_data::<web::Data<Context>>() {
      Some(ctx) => ctx,
      None => return future::err(Error::ReadAppData()),
    };

    future::ok(Identity(ctx.sign_in.session(req)))
  }
}
