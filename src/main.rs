mod models;
mod routes;
mod db;
mod services;
mod utils;
mod middleware;

use actix_web::{App, HttpServer, web};
use std::env;
use std::sync::Arc;

use utils::email::{EmailSender, SmtpMailer};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    println!("🔌 Connecting to database...");
    let db = db::establish_connection()
        .await
        .expect("Failed to connect to database");
    println!("✅ Database connected!");

    let db_data = web::Data::new(db);

    let mailer: Arc<dyn EmailSender> =
        Arc::new(SmtpMailer::from_env().expect("SMTP configuration is incomplete"));
    let mailer_data = web::Data::from(mailer);

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    println!("🚀 Starting server on http://127.0.0.1:{}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(db_data.clone())
            .app_data(mailer_data.clone())
            .configure(routes::configure_routes)
    })
        .bind(("127.0.0.1", port))?
        .run()
        .await
}
