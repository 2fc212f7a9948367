use maud::html;

use crate::models::user::User;

pub struct Email {
    pub subject: String,
    pub html: String,
}

pub fn create_welcome_email(user: &User, via_external_login: bool) -> Email {
    let full_name = user.full_name();
    let note = if via_external_login {
        "Subscribe to our site for exclusive deals."
    } else {
        "Thanks for joining us, happy shopping!"
    };

    let html = html! {
        head {
            title { "Welcome to RuckSack" }
            style type="text/css" {
                "h2, p { font-family: Arial, Helvetica, sans-serif; }"
            }
        }
        div {
            h2 { "Thank you " (full_name) " for registering at RuckSack!" }
            p { (note) }
        }
    };

    Email {
        subject: "Thank you for Registering at RuckSack".to_owned(),
        html: html.into_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_email_thanks_the_user_by_name() {
        let user = User::new("jane@example.com", "Jane", "Doe", false);
        let email = create_welcome_email(&user, false);

        assert_eq!(email.subject, "Thank you for Registering at RuckSack");
        assert!(email.html.contains("Thank you Jane Doe for registering at RuckSack!"));
        assert!(!email.html.contains("exclusive deals"));
    }

    #[test]
    fn external_welcome_email_advertises_the_subscription() {
        let user = User::new("jane@example.com", "<Jane>", "Doe", false);
        let email = create_welcome_email(&user, true);

        assert!(email.html.contains("exclusive deals"));
        assert!(email.html.contains("&lt;Jane&gt;"));
    }
}
