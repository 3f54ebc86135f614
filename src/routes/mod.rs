pub mod health;
pub mod auth;
pub mod profile;
pub mod cashback;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(profile::profile_routes)
            .configure(cashback::cashback_routes),
    );
}
