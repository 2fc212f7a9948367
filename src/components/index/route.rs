use actix_web::{web, HttpResponse};

use crate::auth::Identity;
use crate::lib::util::redirect_to;
use crate::models::user::Role;
use crate::views;

type Response = actix_web::Result<HttpResponse>;

pub fn create_router(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)));
    cfg.service(web::resource("/Admin").route(web::get().to(admin)));
}

async fn home(identity: Identity) -> Response {
    Ok(views::render(HttpResponse::Ok(), views::home::index(&identity)))
}

async fn admin(identity: Identity) -> Response {
    let user = match identity.user() {
        Some(user) => user,
        None => {
            debug!("Anonymous request to the admin page, redirecting to login");
            return redirect_to("/Account/Login");
        }
    };

    if !user.is_in_role(Role::Admin) {
        debug!("User {} is not an admin, returning 403", &user.email);
        let page = views::home::forbidden(&identity);
        return Ok(views::render(HttpResponse::Forbidden(), page));
    }

    let page = views::home::admin(&identity, user);
    Ok(views::render(HttpResponse::Ok(), page))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};

    use crate::test_support::{self, location, seed_user};

    #[actix_rt::test]
    async fn home_offers_login_to_anonymous_visitors() {
        let ctx = test_support::context();
        let mut app = init_app!(ctx);

        let req = TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("/Account/Login"));
        assert!(!body.contains("/Account/LogOut"));
    }

    #[actix_rt::test]
    async fn admin_page_requires_a_session() {
        let ctx = test_support::context();
        let mut app = init_app!(ctx);

        let req = TestRequest::get().uri("/Admin").to_request();
        let resp = test::call_service(&mut app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/Account/Login");
    }

    #[actix_rt::test]
    async fn admin_page_is_forbidden_to_members() {
        let ctx = test_support::context();
        let user = seed_user(&ctx, "shopper@example.com").await;
        let session = ctx.sign_in.sign_in(&user).unwrap();
        let mut app = init_app!(ctx);

        let req = TestRequest::get().uri("/Admin").cookie(session).to_request();
        let resp = test::call_service(&mut app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn admin_page_lists_the_admin_claims() {
        let ctx = test_support::context();
        let user = seed_user(&ctx, "staff@codefellows.com").await;
        let session = ctx.sign_in.sign_in(&user).unwrap();
        let mut app = init_app!(ctx);

        let req = TestRequest::get().uri("/Admin").cookie(session).to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("staff@codefellows.com"));
        assert!(body.contains("FullName"));
        assert!(body.contains("/Account/LogOut"));
    }
}
