use std::sync::Arc;

use crate::emails::Email;
use crate::identity::external::Providers;
use crate::identity::password::PasswordPolicy;
use crate::identity::sign_in::SignInManager;
use crate::identity::UserManager;
use crate::mailer::EmailSender;
use crate::models::store::UserStore;
use crate::settings::Settings;

#[derive(Clone)]
pub struct Context {
  pub settings: Settings,
  pub users: UserManager,
  pub sign_in: SignInManager,
  pub mailer: Arc<dyn EmailSender>,
  pub providers: Providers,
}

impl Context {
  pub fn new(
    settings: Settings,
    store: Arc<dyn UserStore>,
    mailer: Arc<dyn EmailSender>,
    providers: Providers,
  ) -> Self {
    let users = UserManager::new(
      store,
      PasswordPolicy::default(),
      settings.auth.password_cost,
    );
    let sign_in = SignInManager::new(users.clone(), &settings);

    Self {
      settings,
      users,
      sign_in,
      mailer,
      providers,
    }
  }

  // Delivery failures are logged and never fail the request that triggered
  // the email.
  pub async fn send_email(&self, to: &str, email: Email) {
    debug!("Sending {:?} email to {}", &email.subject, to);

    let sent = self
      .mailer
      .send_email(to, &email.subject, &email.html)
      .await;

    if let Err(err) = sent {
      error!("Failed to send email to {}. {}", to, err);
    }
  }
}
