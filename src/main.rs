use std::net::SocketAddr;
use std::process;

use astra::Server;
use log::{error, info, warn};

use crate::config::Config;
use crate::db::{init_db, Database};
use crate::estimates::EstimateClient;
use crate::mailer::Mailer;
use crate::partner::PartnerClient;
use crate::responses::error_to_response;
use crate::router::{handle, AppContext};

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod estimates;
mod mailer;
mod partner;
mod responses;
mod router;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(errors) => {
            for e in errors {
                error!("config: {e}");
            }
            process::exit(1);
        }
    };
    for w in config.warnings() {
        warn!("{w}");
    }

    let db = Database::new(&config.database_path);
    if let Err(e) = init_db(&db, "sql/schema.sql") {
        error!("database initialization failed: {e}");
        process::exit(1);
    }

    let partner = match PartnerClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("partner client init failed: {e}");
            process::exit(1);
        }
    };
    let estimates = match EstimateClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("estimate client init failed: {e}");
            process::exit(1);
        }
    };
    let mailer = match (&config.mail_api_key, &config.mail_sender_email) {
        (Some(key), Some(sender)) => Some(Mailer::new(
            key.clone(),
            sender.clone(),
            config
                .mail_sender_name
                .clone()
                .unwrap_or_else(|| "Flip Analyzer".to_string()),
        )),
        _ => None,
    };

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("invalid BIND_ADDR {}: {e}", config.bind_addr);
            process::exit(1);
        }
    };

    let ctx = AppContext {
        db,
        config,
        partner,
        estimates,
        mailer,
    };

    info!("starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);
    let result = server.serve(move |req, _info| match handle(req, &ctx) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        error!("server ended with error: {e}");
    }
}
