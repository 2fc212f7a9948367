use actix_web::{web, HttpRequest, HttpResponse};
use url::form_urlencoded;
use validator::Validate;

use crate::antiforgery::{self, AntiForgeryToken};
use crate::auth::Identity;
use crate::components::account::model::{
    ExternalLoginCallbackQuery, ExternalLoginForm, ExternalLoginQuery, LoginForm, RegisterForm,
};
use crate::context::Context;
use crate::emails;
use crate::flash::{self, Flash};
use crate::identity::external::ExternalLoginInfo;
use crate::identity::registration::assign_membership;
use crate::identity::sign_in::SignedIn;
use crate::identity::IdentityResult;
use crate::lib::util::{redirect, redirect_to};
use crate::models::user::{normalize_email, Role, User};
use crate::views;

type Response = actix_web::Result<HttpResponse>;

// Shown for malformed input and wrong credentials alike.
const INVALID_CREDENTIAL: &str = "Your Credential Is Incorrect";

const HOME_PATH: &str = "/";
const ADMIN_PATH: &str = "/Admin";
const LOGIN_PATH: &str = "/Account/Login";
const EXTERNAL_CONFIRMATION_PATH: &str = "/Account/ExternalLoginConfirmation";

pub fn create_router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/Login")
            .route(web::get().to(login_form))
            .route(web::post().to(login)),
    );
    cfg.service(
        web::resource("/Register")
            .route(web::get().to(register_form))
            .route(web::post().to(register)),
    );
    cfg.service(web::resource("/LogOut").route(web::get().to(logout)));
    cfg.service(web::resource("/ExternalLogin").route(web::get().to(external_login)));
    cfg.service(
        web::resource("/ExternalLoginCallback").route(web::get().to(external_login_callback)),
    );
    cfg.service(
        web::resource("/ExternalLoginConfirmation")
            .route(web::get().to(external_login_confirmation_form))
            .route(web::post().to(external_login_confirmation)),
    );
}

async fn login_form(req: HttpRequest, ctx: web::Data<Context>, identity: Identity) -> Response {
    Ok(login_page(&req, &ctx, &identity, "", &[]))
}

async fn login(
    req: HttpRequest,
    ctx: web::Data<Context>,
    identity: Identity,
    form: web::Form<LoginForm>,
) -> Response {
    let form = form.into_inner();
    antiforgery::verify(&req, &form.csrf_token)?;

    let invalid = [INVALID_CREDENTIAL.to_owned()];

    if form.validate().is_err() {
        debug!("Login form is invalid, rendering it again");
        return Ok(login_page(&req, &ctx, &identity, &form.email, &invalid));
    }

    let signed_in = ctx
        .sign_in
        .password_sign_in(&form.email, &form.password)
        .await?;

    let SignedIn { user, cookie } = match signed_in {
        Some(signed_in) => signed_in,
        None => {
            debug!("Rejected credentials, rendering the login form again");
            return Ok(login_page(&req, &ctx, &identity, &form.email, &invalid));
        }
    };

    debug!("User {} signed in, redirecting to the landing page", &user.email);
    Ok(redirect(landing_page(&ctx, &user)).cookie(cookie).finish())
}

async fn register_form(req: HttpRequest, identity: Identity) -> Response {
    Ok(register_page(&req, &identity, &RegisterForm::default(), &[]))
}

async fn register(
    req: HttpRequest,
    ctx: web::Data<Context>,
    identity: Identity,
    form: web::Form<RegisterForm>,
) -> Response {
    let form = form.into_inner();
    antiforgery::verify(&req, &form.csrf_token)?;

    if form.validate().is_err() {
        debug!("Registration form is invalid, rendering it again");
        let errors = [INVALID_CREDENTIAL.to_owned()];
        return Ok(register_page(&req, &identity, &form, &errors));
    }

    let user = User::new(
        &form.email,
        &form.first_name,
        &form.last_name,
        form.subscribe,
    );

    let mut user = match ctx.users.create(user, Some(&form.password)).await? {
        IdentityResult::Succeeded(user) => user,
        IdentityResult::Failed(errors) => {
            debug!("User creation refused, rendering the registration form again");
            return Ok(register_page(&req, &identity, &form, &errors));
        }
    };

    assign_membership(&ctx.users, &mut user, &ctx.settings.auth.admin_domain).await?;
    let cookie = ctx.sign_in.sign_in(&user)?;

    let welcome = emails::create_welcome_email(&user, false);
    ctx.send_email(&user.email, welcome).await;

    debug!("Registered user {}, redirecting to the landing page", &user.email);
    Ok(redirect(landing_page(&ctx, &user)).cookie(cookie).finish())
}

async fn logout(ctx: web::Data<Context>, identity: Identity) -> Response {
    if identity.is_signed_in() {
        debug!("Signing out the current user");
        return Ok(redirect(HOME_PATH)
            .del_cookie(&ctx.sign_in.sign_out())
            .finish());
    }

    redirect_to(HOME_PATH)
}

async fn external_login(
    ctx: web::Data<Context>,
    query: web::Query<ExternalLoginQuery>,
) -> Response {
    let provider = match ctx.providers.find(&query.provider) {
        Some(provider) => provider,
        None => {
            debug!("Unknown external login provider {:?}", &query.provider);
            return Ok(redirect(LOGIN_PATH)
                .cookie(Flash::ProviderError.cookie())
                .finish());
        }
    };

    let (state, correlation) = ctx.sign_in.configure_external_challenge(provider.name())?;
    let url = provider.authorization_url(&ctx.settings.external_callback_url(), &state)?;

    debug!("Challenging the user with {} external login", provider.name());
    Ok(redirect(url).cookie(correlation).finish())
}

async fn external_login_callback(
    req: HttpRequest,
    ctx: web::Data<Context>,
    query: web::Query<ExternalLoginCallbackQuery>,
) -> Response {
    let query = query.into_inner();
    let forget_challenge = ctx.sign_in.forget_external_challenge();

    if let Some(error) = query.error {
        debug!("External provider returned error {:?}", error);
        return Ok(redirect(LOGIN_PATH)
            .cookie(Flash::ProviderError.cookie())
            .del_cookie(&forget_challenge)
            .finish());
    }

    let info = match load_external_login_info(&req, &ctx, query.code, query.state).await {
        Some(info) => info,
        None => {
            return Ok(redirect(LOGIN_PATH)
                .cookie(Flash::LoadingInformation.cookie())
                .del_cookie(&forget_challenge)
                .finish())
        }
    };

    let signed_in = ctx
        .sign_in
        .external_login_sign_in(&info.provider, &info.provider_key)
        .await?;

    if let Some(SignedIn { user, cookie }) = signed_in {
        debug!("User {} signed in with {}", &user.email, &info.provider);
        return Ok(redirect(HOME_PATH)
            .cookie(cookie)
            .del_cookie(&forget_challenge)
            .finish());
    }

    let (first_name, last_name) = info.first_and_last_name();
    let confirmation_query = form_urlencoded::Serializer::new(String::new())
        .append_pair("email", &info.email)
        .append_pair("first_name", &first_name)
        .append_pair("last_name", &last_name)
        .finish();
    let external_login = ctx.sign_in.remember_external_login(&info)?;

    debug!(
        "First {} login for {}, asking for confirmation",
        &info.provider, &info.email
    );
    Ok(
        redirect(format!("{}?{}", EXTERNAL_CONFIRMATION_PATH, confirmation_query))
            .cookie(external_login)
            .del_cookie(&forget_challenge)
            .finish(),
    )
}

async fn external_login_confirmation_form(
    req: HttpRequest,
    ctx: web::Data<Context>,
    identity: Identity,
    query: web::Query<ExternalLoginForm>,
) -> Response {
    if ctx.sign_in.external_login_info(&req).is_none() {
        debug!("No pending external login, redirecting to login");
        return Ok(redirect(LOGIN_PATH)
            .cookie(Flash::LoadingInformation.cookie())
            .finish());
    }

    let token = AntiForgeryToken::for_request(&req);
    let page = views::account::external_login_confirmation(&identity, &query, token.value());

    let mut builder = HttpResponse::Ok();
    builder.cookie(token.cookie());
    Ok(views::render(builder, page))
}

async fn external_login_confirmation(
    req: HttpRequest,
    ctx: web::Data<Context>,
    form: web::Form<ExternalLoginForm>,
) -> Response {
    let form = form.into_inner();
    antiforgery::verify(&req, &form.csrf_token)?;

    let forget_external_login = ctx.sign_in.forget_external_login();

    let info = match ctx.sign_in.external_login_info(&req) {
        Some(info) => info,
        None => {
            debug!("No pending external login, redirecting to login");
            return Ok(redirect(LOGIN_PATH)
                .cookie(Flash::LoadingInformation.cookie())
                .finish());
        }
    };

    if form.validate().is_err() {
        debug!("External login confirmation form is invalid, redirecting to login");
        return redirect_to(LOGIN_PATH);
    }

    // The account is keyed by the address the provider vouched for.
    if normalize_email(&form.email) != normalize_email(&info.email) {
        debug!(
            "Confirmation email {} differs from the {} email",
            &form.email, &info.provider
        );
        return Ok(redirect(LOGIN_PATH)
            .cookie(Flash::LoadingInformation.cookie())
            .del_cookie(&forget_external_login)
            .finish());
    }

    if let Some(mut user) = ctx.users.find_by_email(&form.email).await? {
        debug!("Linking {} login to existing user {}", &info.provider, &user.email);
        link_login(&ctx, &mut user, &info).await?;

        let cookie = ctx.sign_in.sign_in(&user)?;
        return Ok(redirect(landing_page(&ctx, &user))
            .cookie(cookie)
            .del_cookie(&forget_external_login)
            .finish());
    }

    let user = User::new(&form.email, &form.first_name, &form.last_name, false);
    let mut user = match ctx.users.create(user, None).await? {
        IdentityResult::Succeeded(user) => user,
        IdentityResult::Failed(errors) => {
            debug!("User creation refused {:?}, redirecting to login", errors);
            return redirect_to(LOGIN_PATH);
        }
    };

    assign_membership(&ctx.users, &mut user, &ctx.settings.auth.admin_domain).await?;
    link_login(&ctx, &mut user, &info).await?;
    let cookie = ctx.sign_in.sign_in(&user)?;

    let welcome = emails::create_welcome_email(&user, true);
    ctx.send_email(&user.email, welcome).await;

    debug!(
        "Registered user {} through {}, redirecting to the landing page",
        &user.email, &info.provider
    );
    Ok(redirect(landing_page(&ctx, &user))
        .cookie(cookie)
        .del_cookie(&forget_external_login)
        .finish())
}

// Resolves the provider identity for a callback. Any failure is logged and
// reported as missing information.
async fn load_external_login_info(
    req: &HttpRequest,
    ctx: &Context,
    code: Option<String>,
    state: Option<String>,
) -> Option<ExternalLoginInfo> {
    let (code, state) = match (code, state) {
        (Some(code), Some(state)) => (code, state),
        _ => {
            debug!("External login callback is missing the code or the state");
            return None;
        }
    };

    let correlation = ctx.sign_in.external_challenge(req, &state)?;
    let provider = ctx.providers.find(&correlation.provider)?;

    match provider
        .exchange_code(&code, &ctx.settings.external_callback_url())
        .await
    {
        Ok(info) => Some(info),
        Err(err) => {
            error!("Failed to load {} login information. {}", provider.name(), err);
            None
        }
    }
}

async fn link_login(ctx: &Context, user: &mut User, info: &ExternalLoginInfo) -> Result<(), actix_web::Error> {
    if let IdentityResult::Failed(errors) = ctx.users.add_login(user, info.to_login()).await? {
        warn!(
            "Could not link {} login to {}. {:?}",
            &info.provider, &user.email, errors
        );
    }

    Ok(())
}

fn landing_page(ctx: &Context, user: &User) -> &'static str {
    if ctx.users.is_in_role(user, Role::Admin) {
        ADMIN_PATH
    } else {
        HOME_PATH
    }
}

fn login_page(
    req: &HttpRequest,
    ctx: &Context,
    identity: &Identity,
    email: &str,
    errors: &[String],
) -> HttpResponse {
    let token = AntiForgeryToken::for_request(req);
    let flash = flash::peek(req);
    let page = views::account::login(
        identity,
        email,
        errors,
        flash.map(|flash| flash.message()),
        &ctx.providers.names(),
        token.value(),
    );

    let mut builder = HttpResponse::Ok();
    builder.cookie(token.cookie());
    if flash.is_some() {
        builder.del_cookie(&flash::removal());
    }
    views::render(builder, page)
}

fn register_page(
    req: &HttpRequest,
    identity: &Identity,
    form: &RegisterForm,
    errors: &[String],
) -> HttpResponse {
    let token = AntiForgeryToken::for_request(req);
    let page = views::account::register(identity, form, errors, token.value());

    let mut builder = HttpResponse::Ok();
    builder.cookie(token.cookie());
    views::render(builder, page)
}
