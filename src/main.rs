#![allow(async_fn_in_trait)]

mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;

use actix_web::middleware::Logger;
use actix_web::web::{get, post, resource, scope, Data};
use actix_web::{App, HttpServer};

use middlewares::jwt::{JWTMiddleware, JWT_SECRET};

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "actix_web=info,canvass=info");
    }
    env_logger::init();
    let database_url = dotenv::var("DATABASE_URL").expect("environment variable DATABASE_URL not been set");
    let secret = dotenv::var(JWT_SECRET).expect("environment variable JWT_SECRET not been set");
    let addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let pool = database::connect(&database_url).await.expect("failed to connect to database");
    log::info!("listening on {}", addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(Data::new(pool.clone()))
            .service(resource("/signup").route(post().to(handlers::signup)))
            .service(resource("/login").route(post().to(handlers::login)))
            .service(resource("/logout").route(post().to(handlers::logout)))
            .service(
                scope("/surveys")
                    .route("", get().to(handlers::survey::list))
                    .route("/{survey_id}", get().to(handlers::survey::detail))
                    .route("/{survey_id}/results", get().to(handlers::survey::results))
                    .service(
                        scope("/{survey_id}")
                            .wrap(JWTMiddleware::new(secret.as_bytes().to_vec()))
                            .route("/start", post().to(handlers::survey::start))
                            .route("/answer", post().to(handlers::survey::submit)),
                    ),
            )
    })
    .bind(addr)?
    .run()
    .await
}
