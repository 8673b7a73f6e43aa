use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use diabetes_predict::api::{AppState, configure_routes};
use diabetes_predict::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Print the startup banner
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  No .env file loaded ({}); using process environment", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = config::AppConfig::from_env().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::other(e)
    })?;

    let bind = (app_config.bind_address.clone(), app_config.port);
    log::info!("Prediction service at {}", app_config.api_base);

    let state = AppState::new(app_config);

    println!("🚀 Starting server...");
    println!("📊 Form available at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
