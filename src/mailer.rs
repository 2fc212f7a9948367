use async_trait::async_trait;
use lettre::smtp::authentication::Credentials;
use lettre::smtp::error::Error as SmtpError;
use lettre::{SmtpClient, SmtpTransport, Transport};
use lettre_email::EmailBuilder;
use std::sync::{Arc, Mutex};

use crate::errors::Error;
use crate::settings::Settings;

#[derive(thiserror::Error, Debug)]
pub enum MailerError {
  #[error("Failed to send email: Could not acquire transport mutex")]
  LockTransport,

  #[error("Failed to send email: SMTP transport error {0}")]
  Smtp(#[from] SmtpError),
}

// Outbound email delivery. Handlers only see this trait so the transport
// can be swapped out.
#[async_trait]
pub trait EmailSender: Send + Sync {
  async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<(), Error>;
}

#[derive(Clone)]
pub struct Mailer {
  from: String,
  from_name: String,
  transport: Option<Arc<Mutex<SmtpTransport>>>,
}

impl Mailer {
  pub fn new(settings: &Settings) -> Result<Self, SmtpError> {
    let from = settings.mailer.from.clone();
    let from_name = settings.mailer.from_name.clone();

    let host = match settings.mailer.smtp_host {
      Some(ref host) => host,
      None => {
        warn!("No SMTP host configured, outgoing emails will only be logged");
        return Ok(Self {
          from,
          from_name,
          transport: None,
        });
      }
    };

    let mut client = SmtpClient::new_simple(host)?;
    if let (Some(username), Some(password)) = (
      settings.mailer.smtp_username.clone(),
      settings.mailer.smtp_password.clone(),
    ) {
      client = client.credentials(Credentials::new(username, password));
    }

    Ok(Self {
      from,
      from_name,
      transport: Some(Arc::new(Mutex::new(client.transport()))),
    })
  }
}

#[async_trait]
impl EmailSender for Mailer {
  async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<(), Error> {
    let email = EmailBuilder::new()
      .to(to)
      .from((self.from.as_str(), self.from_name.as_str()))
      .subject(subject)
      .html(html)
      .build()?;

    let transport = match self.transport {
      Some(ref transport) => transport.clone(),
      None => {
        info!("Email delivery disabled, skipping {:?} to {}", subject, to);
        return Ok(());
      }
    };

    actix_web::web::block(move || {
      transport
        // If another user of this mutex panicked while holding the mutex, then
        // transport.lock() call will return an error once the mutex is acquired.
        .lock()
        .map_err(|_| MailerError::LockTransport)?
        .send(email.into())
        .map_err(MailerError::Smtp)?;

      Ok::<(), MailerError>(())
    })
    .await
    .map_err(Error::SendEmail)
  }
}
