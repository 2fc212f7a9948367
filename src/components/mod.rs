pub mod account;
pub mod index;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/Account").configure(account::route::create_router));
    index::route::create_router(cfg);
}
