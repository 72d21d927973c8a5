use async_trait::async_trait;
use mongodb::options::ClientOptions;
use mongodb::{bson, Client, Collection};
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::campaign::db::CampaignStore;
use crate::campaign::Campaign;
use crate::error::Error;

pub type MongoCampaignStore = Collection<Campaign>;

const CAMPAIGNS: &str = "campaigns";

pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    campaigns: MongoCampaignStore,
}

impl MongoDatabase {
    pub fn new(db: mongodb::Database) -> MongoDatabase {
        MongoDatabase {
            campaigns: db.collection(CAMPAIGNS),
        }
    }
}

impl Database for MongoDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }
}

/// Opens a store from a connection string.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, uri: &str) -> Result<Box<dyn Database>, Error>;
}

pub struct MongoConnector {
    default_database: String,
}

impl MongoConnector {
    pub fn new(default_database: impl Into<String>) -> MongoConnector {
        MongoConnector {
            default_database: default_database.into(),
        }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    async fn connect(&self, uri: &str) -> Result<Box<dyn Database>, Error> {
        let options = ClientOptions::parse(uri).await.map_err(connection_failed)?;
        let name = options
            .default_database
            .clone()
            .unwrap_or_else(|| self.default_database.clone());
        let db = Client::with_options(options)
            .map_err(connection_failed)?
            .database(&name);

        // ping the database to ensure connection is established
        db.run_command(bson::doc! { "ping": 1 }, None)
            .await
            .map_err(connection_failed)?;

        Ok(Box::new(MongoDatabase::new(db)))
    }
}

fn connection_failed(err: mongodb::error::Error) -> Error {
    Error::ConnectionFailed {
        reason: err.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Unconfigured,
    /// Configured, but no connection attempt has completed yet.
    Connecting,
    Connected,
    Failed(String),
}

/// Owns the lazily opened store handle.
///
/// The first call to [`ConnectionManager::database`] makes the only connection
/// attempt for the life of the manager; concurrent callers wait on the same
/// attempt and all observe its outcome. Failures are cached as well.
pub struct ConnectionManager {
    connector: Box<dyn Connector>,
    uri: Option<String>,
    database: OnceCell<Result<Box<dyn Database>, String>>,
}

impl ConnectionManager {
    pub fn new(connector: impl Connector + 'static, uri: Option<String>) -> ConnectionManager {
        ConnectionManager {
            connector: Box::new(connector),
            uri,
            database: OnceCell::new(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn database(&self) -> Result<&dyn Database, Error> {
        let uri = self.uri.as_deref().ok_or(Error::NotConfigured)?;

        let result = self
            .database
            .get_or_init(|| async move {
                info!("connecting to db: {}", redact(uri));
                match self.connector.connect(uri).await {
                    Ok(db) => Ok(db),
                    Err(err) => {
                        error!("failed to connect to db: {}", err.describe());
                        match err {
                            Error::ConnectionFailed { reason } => Err(reason),
                            err => Err(err.describe()),
                        }
                    }
                }
            })
            .await;

        match result {
            Ok(db) => Ok(db.as_ref()),
            Err(reason) => Err(Error::ConnectionFailed {
                reason: reason.clone(),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        if self.uri.is_none() {
            return ConnectionState::Unconfigured;
        }

        match self.database.get() {
            None => ConnectionState::Connecting,
            Some(Ok(_)) => ConnectionState::Connected,
            Some(Err(reason)) => ConnectionState::Failed(reason.clone()),
        }
    }
}

/// Strips credentials from a connection string before it is logged.
fn redact(uri: &str) -> String {
    match (uri.find("://"), uri.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            format!("{}://***@{}", &uri[..scheme], &uri[at + 1..])
        }
        _ => uri.to_string(),
    }
}
