//! Connection management for MongoDB
//!
//! This module provides connection management functionality including:
//! - Connection establishment and termination
//! - Connection pool configuration
//! - Ping-based health verification

use mongodb::bson::doc;
use mongodb::{Client, Collection, Database, options::ClientOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::error::{ConnectionError, Result};

/// MongoDB connection manager
///
/// Manages the client used by the export engine, including pool
/// configuration and connection verification.
pub struct ConnectionManager {
    /// MongoDB client instance
    client: Option<Client>,

    /// Connection configuration
    config: ConnectionConfig,

    /// Current connection state
    state: Arc<RwLock<ConnectionState>>,

    /// Connection URI
    uri: String,
}

/// Connection state information
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected
    Disconnected,

    /// Currently connecting
    Connecting,

    /// Connected and ready
    Connected,

    /// Connection failed
    Failed(String),
}

impl ConnectionManager {
    /// Create a new connection manager
    ///
    /// # Arguments
    /// * `uri` - MongoDB connection URI
    /// * `config` - Connection configuration
    ///
    /// # Returns
    /// * `Self` - New connection manager instance
    pub fn new(uri: String, config: ConnectionConfig) -> Self {
        Self {
            client: None,
            config,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            uri,
        }
    }

    /// Establish connection to MongoDB
    ///
    /// Parses the URI, applies pool settings and verifies the connection
    /// with a ping before reporting success.
    ///
    /// # Returns
    /// * `Result<()>` - Success or connection error
    pub async fn connect(&mut self) -> Result<()> {
        self.set_state(ConnectionState::Connecting).await;

        let options = self.parse_uri().await?;
        let client = Client::with_options(options).map_err(|e| {
            ConnectionError::ConnectionFailed(e.to_string())
        })?;

        // The driver connects lazily; ping to surface failures now
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ConnectionError::PingFailed(e.to_string()))?;

        info!("Connected to MongoDB");
        self.client = Some(client);
        self.set_state(ConnectionState::Connected).await;
        Ok(())
    }

    /// Disconnect from MongoDB
    ///
    /// Closes all connections and cleans up resources
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            client.shutdown().await;
            debug!("MongoDB client shut down");
        }
        self.set_state(ConnectionState::Disconnected).await;
        Ok(())
    }

    /// Get a database handle
    ///
    /// # Arguments
    /// * `name` - Database name
    ///
    /// # Returns
    /// * `Result<Database>` - Database handle or error
    pub fn get_database(&self, name: &str) -> Result<Database> {
        Ok(self.get_client()?.database(name))
    }

    /// Get a collection handle on the URI's default database
    ///
    /// # Arguments
    /// * `name` - Collection name
    ///
    /// # Returns
    /// * `Result<Collection>` - Collection handle or error
    pub fn get_collection(&self, name: &str) -> Result<Collection<mongodb::bson::Document>> {
        let client = self.get_client()?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database("poi"));
        Ok(database.collection(name))
    }

    /// Get the MongoDB client
    ///
    /// # Returns
    /// * `Result<&Client>` - Reference to client or error
    pub fn get_client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| ConnectionError::NotConnected.into())
    }

    /// Get current connection state
    ///
    /// # Returns
    /// * `ConnectionState` - Current state
    pub async fn get_state(&self) -> ConnectionState {
        self.state.read().await.clone()
    }

    /// Check if currently connected
    ///
    /// # Returns
    /// * `bool` - True if connected
    pub async fn is_connected(&self) -> bool {
        matches!(*self.state.read().await, ConnectionState::Connected)
    }

    /// Parse connection URI and create client options with pool settings
    async fn parse_uri(&self) -> Result<ClientOptions> {
        let mut options = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| ConnectionError::InvalidUri(e.to_string()))?;

        options.app_name = Some("poi-export".to_string());
        options.max_pool_size = Some(self.config.max_pool_size);
        options.min_pool_size = Some(self.config.min_pool_size);
        options.connect_timeout = Some(Duration::from_secs(self.config.timeout));
        options.server_selection_timeout = Some(Duration::from_secs(self.config.timeout));
        options.max_idle_time = Some(Duration::from_secs(self.config.idle_timeout));

        Ok(options)
    }

    /// Update connection state
    async fn set_state(&self, new_state: ConnectionState) {
        *self.state.write().await = new_state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_state_is_disconnected() {
        let manager = ConnectionManager::new(
            "mongodb://localhost:27017".to_string(),
            ConnectionConfig::default(),
        );

        assert_eq!(manager.get_state().await, ConnectionState::Disconnected);
        assert!(!manager.is_connected().await);
    }

    #[tokio::test]
    async fn test_client_access_before_connect_fails() {
        let manager = ConnectionManager::new(
            "mongodb://localhost:27017".to_string(),
            ConnectionConfig::default(),
        );

        assert!(manager.get_client().is_err());
        assert!(manager.get_collection("pois").is_err());
    }
}
