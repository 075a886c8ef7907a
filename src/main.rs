use std::io;

use actix_web::HttpServer;
use log::info;
use todo_api::{build_app, db, Config};

fn startup_error<E>(error: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::Other, error)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(startup_error)?;
    let pool = db::connect(&config.database_url)
        .await
        .map_err(startup_error)?;
    db::migrate(&pool).await.map_err(startup_error)?;

    info!("Starting to-do API at {}", config.server_url());
    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || build_app(pool.clone(), &config))
        .bind(bind_addr)?
        .run()
        .await
}
