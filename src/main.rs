use actix::Actor;
use actix_web::{web, App, HttpServer};
use deathroll_web_server::game::manager::DeathrollManager;
use deathroll_web_server::handlers::{
    darkmoon_calc, drives_calc, month_calc, power_calc, resolution_calc, time_calc,
    usable_space_calc, ws_handler,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("🎲 Starting deathroll server...");

    // デスロール管理アクター起動
    let manager = DeathrollManager::new().start();

    log::info!("🌐 Listening on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(manager.clone()))
            .route("/time", web::post().to(time_calc))
            .route("/month", web::post().to(month_calc))
            .route("/resolution", web::post().to(resolution_calc))
            .route("/drives", web::post().to(drives_calc))
            .route("/usable-space", web::post().to(usable_space_calc))
            .route("/power", web::post().to(power_calc))
            .route("/darkmoon", web::post().to(darkmoon_calc))
            .route("/ws", web::get().to(ws_handler))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
