use crate::errors::Error;
use crate::identity::UserManager;
use crate::models::user::{Claim, ClaimType, Role, User};

pub fn default_claims(user: &User) -> Vec<Claim> {
  let mut claims = vec![];

  if user.subscribe {
    claims.push(Claim::new(ClaimType::Subscription, "True"));
  }

  claims.push(Claim::new(ClaimType::FullName, user.full_name()));
  claims.push(Claim::new(ClaimType::Email, user.email.clone()));
  claims.push(Claim::new(ClaimType::Role, Role::Member.to_string()));

  claims
}

// True when the email address belongs to the admin domain. The domain may be
// configured with or without the leading `@`.
pub fn is_admin_email(email: &str, admin_domain: &str) -> bool {
  let domain = admin_domain.trim().trim_start_matches('@').to_lowercase();
  if domain.is_empty() {
    return false;
  }

  email
    .trim()
    .to_lowercase()
    .ends_with(&format!("@{}", domain))
}

pub async fn assign_membership(
  users: &UserManager,
  user: &mut User,
  admin_domain: &str,
) -> Result<(), Error> {
  let claims = default_claims(user);
  users.add_claims(user, claims).await?;
  users.add_to_role(user, Role::Member).await?;

  if is_admin_email(&user.email, admin_domain) {
    info!("Granting admin role to {}", &user.email);
    users.add_to_role(user, Role::Admin).await?;
  }

  Ok(())
}
