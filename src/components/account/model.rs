use serde::{Deserialize, Serialize};
use validator::Validate;

// Every field defaults so that incomplete posts reach validation and get the
// form re-rendered instead of a bare 400 from the extractor.

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub csrf_token: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(must_match = "password")]
    pub confirm_password: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub subscribe: bool,
    pub csrf_token: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ExternalLoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(max = 100))]
    pub last_name: String,
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ExternalLoginQuery {
    #[serde(default)]
    pub provider: String,
}

#[derive(Debug, Deserialize)]
pub struct ExternalLoginCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_form() -> RegisterForm {
        RegisterForm {
            email: "jane@example.com".to_owned(),
            password: "Passw0rd!".to_owned(),
            confirm_password: "Passw0rd!".to_owned(),
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            subscribe: false,
            csrf_token: String::new(),
        }
    }

    #[test]
    fn register_form_requires_matching_passwords() {
        assert!(register_form().validate().is_ok());

        let mismatch = RegisterForm {
            confirm_password: "Passw0rd?".to_owned(),
            ..register_form()
        };
        assert!(mismatch.validate().is_err());
    }

    #[test]
    fn register_form_requires_names_and_a_valid_email() {
        let no_name = RegisterForm {
            first_name: String::new(),
            ..register_form()
        };
        assert!(no_name.validate().is_err());

        let bad_email = RegisterForm {
            email: "jane".to_owned(),
            ..register_form()
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn login_form_rejects_empty_fields() {
        assert!(LoginForm::default().validate().is_err());

        let form = LoginForm {
            email: "jane@example.com".to_owned(),
            password: "x".to_owned(),
            csrf_token: String::new(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn external_login_form_allows_an_empty_last_name() {
        let form = ExternalLoginForm {
            email: "cher@example.com".to_owned(),
            first_name: "Cher".to_owned(),
            last_name: String::new(),
            csrf_token: String::new(),
        };
        assert!(form.validate().is_ok());
    }
}
