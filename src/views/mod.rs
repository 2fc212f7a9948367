pub mod account;
pub mod home;

use actix_web::dev::HttpResponseBuilder;
use actix_web::HttpResponse;
use maud::{html, Markup, DOCTYPE};

use crate::auth::Identity;
use crate::models::user::Role;

pub fn layout(title: &str, identity: &Identity, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " - RuckSack" }
            }
            body {
                nav {
                    a href="/" { "RuckSack" }
                    @if let Some(user) = identity.user() {
                        span { " Hello " (user.name) " " }
                        @if user.is_in_role(Role::Admin) {
                            a href="/Admin" { "Admin" }
                            " "
                        }
                        a href="/Account/LogOut" { "Log out" }
                    } @else {
                        " "
                        a href="/Account/Login" { "Log in" }
                        " "
                        a href="/Account/Register" { "Register" }
                    }
                }
                main {
                    (content)
                }
            }
        }
    }
}

pub fn render(mut builder: HttpResponseBuilder, markup: Markup) -> HttpResponse {
    builder
        .content_type("text/html; charset=utf-8")
        .body(markup.into_string())
}

pub fn validation_summary(errors: &[String]) -> Markup {
    html! {
        @if !errors.is_empty() {
            ul class="validation-summary" {
                @for error in errors {
                    li { (error) }
                }
            }
        }
    }
}
