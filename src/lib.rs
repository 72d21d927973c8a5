use actix_web::web::{self, Data, FormConfig, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{App, HttpResponse, HttpServer, ResponseError};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod config;
pub mod database;
pub mod error;
pub mod views;

use campaign::{dashboard, endpoints, pages};
use config::Config;
use database::{ConnectionManager, ConnectionState, MongoConnector};
use error::Error;

/// Registers every route and the extractor error formats. The caller provides
/// `Data<ConnectionManager>` and `Data<Config>`.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(FormConfig::default().error_handler(|err, _req| {
        // format form errors with custom format
        Error::InvalidForm(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(pages::home)
    .service(pages::list_campaigns)
    .service(pages::add_campaign)
    .service(pages::delete_campaign)
    .service(pages::update_campaign)
    .service(pages::report)
    .service(pages::health)
    .service(endpoints::get_campaigns)
    .service(endpoints::create_campaign)
    .service(endpoints::update_campaign_status)
    .service(endpoints::delete_campaign)
    .service(endpoints::get_report)
    .service(dashboard::index)
    .service(dashboard::new_campaign)
    .service(dashboard::alter_campaigns)
    .service(dashboard::update_campaign)
    .service(dashboard::delete_campaign)
    .service(dashboard::report);
}

pub async fn path_does_not_exist() -> HttpResponse {
    Error::PathDoesNotExist.error_response()
}

pub async fn run(config: Config) -> Result<(), Error> {
    let connections = ConnectionManager::new(
        MongoConnector::new(config.database.clone()),
        config.mongo_uri.clone(),
    );
    if connections.state() == ConnectionState::Unconfigured {
        warn!("no database connection string configured, set MONGO_URI or CAMPAIGN_TRACKER_DEV=1");
    } else if config.dev_mode {
        info!("development mode, local database used unless MONGO_URI is set");
    }
    let connections = Data::new(connections);

    let bind_addr = config.bind_addr.clone();
    let config = Data::new(config);

    info!("listening on {}", bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(connections.clone())
            .app_data(config.clone())
            .wrap(TracingLogger::default())
            .configure(configure)
            .default_service(web::to(path_does_not_exist))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
