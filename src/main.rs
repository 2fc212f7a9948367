use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
mod test_support;

mod antiforgery;
mod auth;
mod components;
mod context;
mod database;
mod emails;
mod errors;
mod flash;
mod identity;
mod lib;
mod logger;
mod mailer;
mod models;
mod settings;
mod views;

use context::Context;
use identity::external::Providers;
use identity::google::GoogleProvider;
use logger::Logger;
use mailer::Mailer;
use settings::Settings;

#[actix_web::main]
async fn main() {
    let settings = match Settings::new() {
        Ok(value) => value,
        Err(err) => panic!("Failed to setup configuration. Error: {}", err),
    };

    match Logger::setup(&settings) {
        Ok(value) => value,
        Err(_) => panic!("Failed to setup logger"),
    };

    info!("Starting RuckSack in {} mode", &settings.environment);

    let store = match models::store::connect(&settings).await {
        Ok(value) => value,
        Err(err) => panic!("Failed to setup user store. Error: {}", err),
    };

    let mailer = match Mailer::new(&settings) {
        Ok(value) => value,
        Err(err) => panic!("Failed to setup mailer. Error: {}", err),
    };

    let mut providers = Providers::new();
    if let Some(ref google) = settings.oauth.google {
        providers = providers.register(Arc::new(GoogleProvider::new(google)));
    }
    info!("External login providers: {:?}", providers.names());

    let port = settings.server.port;
    let context = web::Data::new(Context::new(
        settings,
        store,
        Arc::new(mailer),
        providers,
    ));

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .app_data(context.clone())
            .configure(components::configure)
    })
    .bind(("0.0.0.0", port))
    .expect("Failed to bind server to specified port")
    .run()
    .await
    .expect("Failed to start server");
}
