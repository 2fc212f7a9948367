use maud::{html, Markup};

use crate::auth::Identity;
use crate::components::account::model::{ExternalLoginForm, RegisterForm};
use crate::views::{layout, validation_summary};

fn antiforgery_field(token: &str) -> Markup {
    html! {
        input type="hidden" name="csrf_token" value=(token);
    }
}

pub fn login(
    identity: &Identity,
    email: &str,
    errors: &[String],
    flash: Option<&str>,
    providers: &[String],
    csrf_token: &str,
) -> Markup {
    let content = html! {
        h1 { "Log in" }
        @if let Some(message) = flash {
            p class="flash" { (message) }
        }
        (validation_summary(errors))
        form method="post" action="/Account/Login" {
            (antiforgery_field(csrf_token))
            label for="email" { "Email" }
            input id="email" type="email" name="email" value=(email) required;
            label for="password" { "Password" }
            input id="password" type="password" name="password" required;
            button type="submit" { "Log in" }
        }
        @if !providers.is_empty() {
            section class="external-logins" {
                h2 { "Use another service to log in" }
                @for provider in providers {
                    a href=(format!("/Account/ExternalLogin?provider={}", provider)) {
                        "Log in with " (provider)
                    }
                }
            }
        }
        p {
            "New to RuckSack? "
            a href="/Account/Register" { "Create an account" }
        }
    };

    layout("Log in", identity, content)
}

pub fn register(
    identity: &Identity,
    form: &RegisterForm,
    errors: &[String],
    csrf_token: &str,
) -> Markup {
    let content = html! {
        h1 { "Register" }
        (validation_summary(errors))
        form method="post" action="/Account/Register" {
            (antiforgery_field(csrf_token))
            label for="first_name" { "First name" }
            input id="first_name" type="text" name="first_name" value=(form.first_name) required;
            label for="last_name" { "Last name" }
            input id="last_name" type="text" name="last_name" value=(form.last_name) required;
            label for="email" { "Email" }
            input id="email" type="email" name="email" value=(form.email) required;
            label for="password" { "Password" }
            input id="password" type="password" name="password" required;
            label for="confirm_password" { "Confirm password" }
            input id="confirm_password" type="password" name="confirm_password" required;
            label {
                input type="checkbox" name="subscribe" value="true" checked[form.subscribe];
                " Subscribe to our newsletter"
            }
            button type="submit" { "Register" }
        }
    };

    layout("Register", identity, content)
}

pub fn external_login_confirmation(
    identity: &Identity,
    form: &ExternalLoginForm,
    csrf_token: &str,
) -> Markup {
    let content = html! {
        h1 { "Associate your account" }
        p { "You've successfully authenticated. Confirm your details to finish signing in." }
        form method="post" action="/Account/ExternalLoginConfirmation" {
            (antiforgery_field(csrf_token))
            label for="email" { "Email" }
            input id="email" type="email" name="email" value=(form.email) readonly required;
            label for="first_name" { "First name" }
            input id="first_name" type="text" name="first_name" value=(form.first_name) required;
            label for="last_name" { "Last name" }
            input id="last_name" type="text" name="last_name" value=(form.last_name);
            button type="submit" { "Register" }
        }
    };

    layout("Associate your account", identity, content)
}
