mod barcode;
mod config;
mod db;
mod notify;
mod services;

use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;

use crate::barcode::store::BarcodeStore;
use crate::config::AppConfig;
use crate::notify::Notifier;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let cfg = AppConfig::from_env();
    db::init(&cfg.db_path)
        .map_err(|e| std::io::Error::other(format!("database init failed: {}", e)))?;

    let store = BarcodeStore::new(cfg.barcode_dir.clone(), cfg.db_path.clone());
    let notifier = Notifier::from_config(&cfg);
    let bind = (cfg.http_host.clone(), cfg.http_port);

    info!("Server running at http://{}:{}", bind.0, bind.1);

    let cfg = web::Data::new(cfg);
    let store = web::Data::new(store);
    let notifier = web::Data::new(notifier);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(64 * 1024))
            .app_data(cfg.clone())
            .app_data(store.clone())
            .app_data(notifier.clone())
            .service(services::visitors::configure_routes())
    })
    .bind(bind)?
    .run()
    .await
}
