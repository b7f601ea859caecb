use actix_web::{web, App, HttpServer};
use backend::config::AppConfig;
use backend::services;
use env_logger::Env;
use log::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };
    let renderer = match backend::build_renderer(&config) {
        Ok(renderer) => web::Data::new(renderer),
        Err(e) => {
            error!("Failed to initialise the renderer: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let host = config.server.host.clone();
    let port = config.server.port;
    let json_limit = config.server.json_limit_bytes;
    info!("Server running at http://{}:{}", host, port);
    info!("Render service: {}", config.gotenberg_url);

    HttpServer::new(move || {
        App::new()
            .wrap(services::cors_headers())
            .app_data(services::json_config(json_limit))
            .app_data(renderer.clone())
            .service(services::cards::configure_routes())
            .default_service(web::route().to(services::fallback))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
