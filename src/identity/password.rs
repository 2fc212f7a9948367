// Password strength rules checked before an account is created.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
  pub required_length: usize,
  pub require_digit: bool,
  pub require_lowercase: bool,
  pub require_uppercase: bool,
  pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
  fn default() -> Self {
    Self {
      required_length: 6,
      require_digit: true,
      require_lowercase: true,
      require_uppercase: true,
      require_non_alphanumeric: true,
    }
  }
}

impl PasswordPolicy {
  pub fn validate(&self, password: &str) -> Vec<String> {
    let mut errors = vec![];

    if password.chars().count() < self.required_length {
      errors.push(format!(
        "Passwords must be at least {} characters.",
        self.required_length
      ));
    }
    if self.require_non_alphanumeric && password.chars().all(char::is_alphanumeric) {
      errors.push("Passwords must have at least one non alphanumeric character.".to_owned());
    }
    if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
      errors.push("Passwords must have at least one digit ('0'-'9').".to_owned());
    }
    if self.require_lowercase && !password.chars().any(char::is_lowercase) {
      errors.push("Passwords must have at least one lowercase ('a'-'z').".to_owned());
    }
    if self.require_uppercase && !password.chars().any(char::is_uppercase) {
      errors.push("Passwords must have at least one uppercase ('A'-'Z').".to_owned());
    }

    errors
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_a_strong_password() {
    let policy = PasswordPolicy::default();
    assert!(policy.validate("Sup3r$ecret").is_empty());
  }

  #[test]
  fn reports_every_violated_rule() {
    let policy = PasswordPolicy::default();
    let errors = policy.validate("abc");

    assert_eq!(errors.len(), 4);
    assert!(errors[0].contains("at least 6 characters"));
    assert!(errors.iter().any(|error| error.contains("non alphanumeric")));
    assert!(errors.iter().any(|error| error.contains("digit")));
    assert!(errors.iter().any(|error| error.contains("uppercase")));
  }

  #[test]
  fn relaxed_policy_only_checks_length() {
    let policy = PasswordPolicy {
      required_length: 4,
      require_digit: false,
      require_lowercase: false,
      require_uppercase: false,
      require_non_alphanumeric: false,
    };

    assert!(policy.validate("abcd").is_empty());
    assert_eq!(policy.validate("abc").len(), 1);
  }
}
