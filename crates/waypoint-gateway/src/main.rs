//! Reverse proxy gateway server
//!
//! Thin binary built on `waypoint-proxy`: reads the config file path from
//! the single CLI positional argument, initializes the logger, loads and
//! validates the configuration, then drives an actix-web listener that
//! serves the metrics endpoint and the configured routes until a shutdown
//! signal arrives.

use std::process::ExitCode;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};
use tokio::signal;

use waypoint_proxy::config::loader::load_config;
use waypoint_proxy::gateway::Proxy;
use waypoint_proxy::logs::logger::configure_logger;
use waypoint_proxy::routes::{metrics::metrics_endpoint, proxy::configure_proxy};

#[actix_web::main]
async fn main() -> ExitCode {
    configure_logger();

    let config_path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            error!("usage: waypoint-gateway <config-path>");
            return ExitCode::from(1);
        }
    };

    let config = match load_config(std::path::Path::new(&config_path)) {
        Ok(config) => config,
        Err(err) => {
            error!("failed to load configuration from {}: {}", config_path, err);
            return ExitCode::from(1);
        }
    };

    info!(
        "loaded configuration: {} route(s), listening on {}",
        config.routes.len(),
        config.listen_address
    );

    let listen_address = config.listen_address.clone();
    let proxy = Arc::new(Proxy::new(config));
    let metrics_path = proxy.metrics_path().to_string();

    let server = HttpServer::new(move || {
        let proxy = Arc::clone(&proxy);
        App::new()
            .app_data(web::Data::from(proxy))
            .wrap(Logger::default())
            .route(&metrics_path, web::route().to(metrics_endpoint))
            .configure(configure_proxy)
    })
    .bind(&listen_address);

    let server = match server {
        Ok(server) => server,
        Err(err) => {
            error!("failed to bind {}: {}", listen_address, err);
            return ExitCode::from(2);
        }
    };

    info!("waypoint-gateway listening on {}", listen_address);

    tokio::select! {
        result = server.run() => {
            if let Err(err) = result {
                error!("server error: {}", err);
                return ExitCode::FAILURE;
            }
        }
        _ = signal::ctrl_c() => {
            info!("received shutdown signal, stopping server");
        }
    }

    ExitCode::SUCCESS
}
