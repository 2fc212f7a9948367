use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::LOCATION;
use async_trait::async_trait;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, Mutex};
use url::Url;

use crate::antiforgery;
use crate::context::Context;
use crate::errors::Error;
use crate::identity::external::{ExternalLoginInfo, ExternalProvider, Providers};
use crate::identity::registration::assign_membership;
use crate::identity::IdentityResult;
use crate::mailer::EmailSender;
use crate::models::store::MemoryUserStore;
use crate::models::user::User;
use crate::settings::{self, Settings};

pub const SESSION_COOKIE: &str = "rucksack_session";
pub const CSRF_TOKEN: &str = "test-antiforgery-token";
pub const PASSWORD: &str = "Passw0rd!";

pub fn settings() -> Settings {
  Settings {
    environment: "test".to_owned(),
    base_url: "http://localhost:8080".to_owned(),
    server: settings::Server { port: 8080 },
    logger: settings::Logger {
      level: "debug".to_owned(),
    },
    database: settings::Database {
      uri: "memory://".to_owned(),
      name: "rucksack_test".to_owned(),
    },
    auth: settings::Auth {
      secret: "test-secret".to_owned(),
      session_cookie: SESSION_COOKIE.to_owned(),
      session_hours: 1,
      password_cost: 4,
      admin_domain: "codefellows.com".to_owned(),
    },
    mailer: settings::Mailer {
      from: "no-reply@rucksack.test".to_owned(),
      from_name: "RuckSack".to_owned(),
      smtp_host: None,
      smtp_username: None,
      smtp_password: None,
    },
    oauth: settings::OAuth::default(),
  }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
  pub to: String,
  pub subject: String,
  pub html: String,
}

#[derive(Clone, Default)]
pub struct RecordingSender {
  sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl RecordingSender {
  pub fn sent(&self) -> Vec<SentEmail> {
    self.sent.lock().unwrap().clone()
  }
}

#[async_trait]
impl EmailSender for RecordingSender {
  async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<(), Error> {
    self.sent.lock().map_err(|_| Error::LockStore)?.push(SentEmail {
      to: to.to_owned(),
      subject: subject.to_owned(),
      html: html.to_owned(),
    });
    Ok(())
  }
}

// Provider double that hands out the identities registered per code.
#[derive(Clone, Default)]
pub struct FakeProvider {
  identities: HashMap<String, ExternalLoginInfo>,
}

impl FakeProvider {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_identity(mut self, code: &str, provider_key: &str, email: &str, name: &str) -> Self {
    self.identities.insert(
      code.to_owned(),
      ExternalLoginInfo {
        provider: "Google".to_owned(),
        provider_key: provider_key.to_owned(),
        email: email.to_owned(),
        display_name: name.to_owned(),
      },
    );
    self
  }
}

#[async_trait]
impl ExternalProvider for FakeProvider {
  fn name(&self) -> &str {
    "Google"
  }

  fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String, Error> {
    let url = Url::parse_with_params(
      "https://provider.test/authorize",
      &[("redirect_uri", redirect_uri), ("state", state)],
    )
    .map_err(|_| Error::ParseURL())?;

    Ok(url.to_string())
  }

  async fn exchange_code(&self, code: &str, _: &str) -> Result<ExternalLoginInfo, Error> {
    self
      .identities
      .get(code)
      .cloned()
      .ok_or_else(|| Error::ExternalAuthentication("Google".to_owned()))
  }
}

pub struct TestContext {
  pub context: Context,
  pub store: MemoryUserStore,
  pub mailer: RecordingSender,
}

impl Deref for TestContext {
  type Target = Context;

  fn deref(&self) -> &Context {
    &self.context
  }
}

pub fn context() -> TestContext {
  context_with(FakeProvider::new())
}

pub fn context_with(provider: FakeProvider) -> TestContext {
  let store = MemoryUserStore::new();
  let mailer = RecordingSender::default();
  let providers = Providers::new().register(Arc::new(provider));
  let context = Context::new(
    settings(),
    Arc::new(store.clone()),
    Arc::new(mailer.clone()),
    providers,
  );

  TestContext {
    context,
    store,
    mailer,
  }
}

// Creates a member (or admin, by domain) with `PASSWORD`.
pub async fn seed_user(ctx: &Context, email: &str) -> User {
  let user = User::new(email, "Jane", "Doe", false);
  let mut user = match ctx.users.create(user, Some(PASSWORD)).await.unwrap() {
    IdentityResult::Succeeded(user) => user,
    IdentityResult::Failed(errors) => panic!("{:?}", errors),
  };
  assign_membership(&ctx.users, &mut user, &ctx.settings.auth.admin_domain)
    .await
    .unwrap();

  user
}

pub fn csrf_cookie() -> Cookie<'static> {
  Cookie::new(antiforgery::COOKIE_NAME, CSRF_TOKEN)
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
  resp
    .headers()
    .get(LOCATION)
    .and_then(|value| value.to_str().ok())
    .unwrap_or_default()
    .to_owned()
}

pub fn response_cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
  resp
    .response()
    .cookies()
    .find(|cookie| cookie.name() == name)
    .map(|cookie| cookie.into_owned())
}

macro_rules! init_app {
  ($ctx:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($ctx.context.clone()))
        .configure(crate::components::configure),
    )
    .await
  };
}
