use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{error, info};
use reqwest::Client;

use smp_be::config::Settings;
use smp_be::{AppState, configure};

fn mask_key(k: &str) -> String {
    if k.len() <= 8 {
        "[REDACTED]".to_string()
    } else {
        format!("{}***{}", &k[..4], &k[k.len() - 4..])
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Konfigurasi tidak lengkap: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Supabase URL: {}", settings.supabase_url);
    info!(
        "Service key: {}",
        mask_key(&settings.supabase_service_role_key)
    );

    let http_client = Client::builder()
        .user_agent("smp-be/0.1")
        .build()
        .expect("failed to build http client");

    let bind_address = settings.bind_address.clone();
    let allowed_origins = settings.allowed_origins.clone();
    let state = web::Data::new(AppState::new(settings, http_client));

    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                "authorization",
                "content-type",
                "accept",
                "x-requested-with",
            ])
            .supports_credentials()
            .max_age(3600);

        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}
