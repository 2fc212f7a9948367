use maud::{html, Markup};

use crate::auth::{Identity, SessionUser};
use crate::views::layout;

pub fn index(identity: &Identity) -> Markup {
    let content = html! {
        h1 { "Welcome to RuckSack" }
        @match identity.user() {
            Some(user) => {
                p { "Good to see you, " (user.name) "." }
            }
            None => {
                p {
                    a href="/Account/Login" { "Log in" }
                    " or "
                    a href="/Account/Register" { "register" }
                    " to start shopping."
                }
            }
        }
    };

    layout("Home", identity, content)
}

pub fn admin(identity: &Identity, user: &SessionUser) -> Markup {
    let content = html! {
        h1 { "Admin" }
        p { "Signed in as " (user.email) "." }
        table {
            thead {
                tr { th { "Claim" } th { "Value" } }
            }
            tbody {
                @for claim in &user.claims {
                    tr { td { (claim.kind) } td { (claim.value) } }
                }
            }
        }
    };

    layout("Admin", identity, content)
}

pub fn forbidden(identity: &Identity) -> Markup {
    let content = html! {
        h1 { "Access denied" }
        p { "You do not have access to this page." }
    };

    layout("Access denied", identity, content)
}
