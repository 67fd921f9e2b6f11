use crate::config::{ClientConfig, ConfigUpdate};
use crate::dtos::{DeclareExchange, DeclareQueue, NamedResource, QueueMessages};
use crate::error::{RabbitopError, Result};
use crate::transport::{Removed, Transport};
use crate::types::{is_reserved_exchange, ResourceKind};
use log::{debug, info, warn};

const NAME_COLUMN: &str = "columns=name";
const MESSAGES_COLUMN: &str = "columns=messages";

/// Administrative client for one RabbitMQ management API.
///
/// Every operation except [`AdminClient::is_up`] first probes the broker and
/// fails with [`RabbitopError::BrokerUnavailable`] without touching the
/// resource when the probe fails. Deletes are idempotent: deleting a resource
/// that does not exist succeeds.
#[derive(Clone, Default)]
pub struct AdminClient {
    transport: Transport,
    config: ClientConfig,
}

impl AdminClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            transport: Transport::default(),
            config,
        }
    }

    /// Uses a preconfigured `reqwest` client, e.g. one with timeouts or custom TLS roots.
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Self {
        Self {
            transport: Transport::new(http),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn update_config(&mut self, update: ConfigUpdate) {
        self.config.merge(update);
    }

    pub fn set_credentials(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.update_config(ConfigUpdate {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Default::default()
        });
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.update_config(ConfigUpdate {
            base_url: Some(base_url.into()),
            ..Default::default()
        });
    }

    /// Liveness probe against `/overview`. Never fails: any error reads as `false`.
    pub async fn is_up(&self) -> bool {
        match self.transport.get(&self.config, &["overview"]).await {
            Ok(_) => true,
            Err(error) => {
                debug!("RabbitMQ at '{}' is not up: {}", self.config.base_url, error);
                false
            }
        }
    }

    pub async fn get_queues(&self) -> Result<Vec<String>> {
        self.assert_available().await?;
        self.list_names(ResourceKind::Queue).await
    }

    pub async fn create_queue(&self, name: &str) -> Result<()> {
        self.assert_available().await?;
        self.transport
            .put_json(
                &self.config,
                &ResourceKind::Queue.item_segments(name),
                &DeclareQueue::default(),
            )
            .await
    }

    pub async fn delete_queue(&self, name: &str) -> Result<()> {
        self.assert_available().await?;
        self.remove(ResourceKind::Queue, name).await?;
        Ok(())
    }

    pub async fn delete_all_queues(&self) -> Result<()> {
        self.assert_available().await?;
        let queues = self.list_names(ResourceKind::Queue).await?;
        self.drain(ResourceKind::Queue, queues).await
    }

    /// Current number of messages in a queue. Fails if the queue does not exist.
    pub async fn get_queue_message_count(&self, name: &str) -> Result<u64> {
        self.assert_available().await?;
        let counters: QueueMessages = self
            .transport
            .get_json(
                &self.config,
                &ResourceKind::Queue.item_segments(name),
                Some(MESSAGES_COLUMN),
            )
            .await?;
        Ok(counters.messages)
    }

    /// User exchanges only. The nameless default exchange and `amq.*` ones are left out.
    pub async fn get_exchanges(&self) -> Result<Vec<String>> {
        self.assert_available().await?;
        self.list_names(ResourceKind::Exchange).await
    }

    /// Declares an exchange. `exchange_type` goes to the broker as is.
    pub async fn create_exchange(&self, name: &str, exchange_type: &str) -> Result<()> {
        self.assert_available().await?;
        self.transport
            .put_json(
                &self.config,
                &ResourceKind::Exchange.item_segments(name),
                &DeclareExchange { exchange_type },
            )
            .await
    }

    pub async fn delete_exchange(&self, name: &str) -> Result<()> {
        self.assert_available().await?;
        self.remove(ResourceKind::Exchange, name).await?;
        Ok(())
    }

    pub async fn delete_all_exchanges(&self) -> Result<()> {
        self.assert_available().await?;
        let exchanges = self.list_names(ResourceKind::Exchange).await?;
        self.drain(ResourceKind::Exchange, exchanges).await
    }

    pub async fn get_connections(&self) -> Result<Vec<String>> {
        self.assert_available().await?;
        self.list_names(ResourceKind::Connection).await
    }

    /// Force-closes a client connection.
    pub async fn delete_connection(&self, name: &str) -> Result<()> {
        self.assert_available().await?;
        self.remove(ResourceKind::Connection, name).await?;
        Ok(())
    }

    pub async fn delete_all_connections(&self) -> Result<()> {
        self.assert_available().await?;
        let connections = self.list_names(ResourceKind::Connection).await?;
        self.drain(ResourceKind::Connection, connections).await
    }

    /// Closes all connections, then deletes all queues, then all user exchanges.
    ///
    /// Connections go first so that clients stop repopulating queues while
    /// they are drained. The broker is not locked meanwhile, so new resources
    /// created concurrently may survive.
    pub async fn delete_everything(&self) -> Result<()> {
        self.delete_all_connections().await?;
        self.delete_all_queues().await?;
        self.delete_all_exchanges().await?;
        info!("Removed all connections, queues and exchanges");
        Ok(())
    }

    async fn assert_available(&self) -> Result<()> {
        if self.is_up().await {
            return Ok(());
        }

        warn!("RabbitMQ is not reachable at '{}'", self.config.base_url);
        Err(RabbitopError::BrokerUnavailable {
            base_url: self.config.base_url.clone(),
        })
    }

    async fn list_names(&self, kind: ResourceKind) -> Result<Vec<String>> {
        let rows: Vec<NamedResource> = self
            .transport
            .get_json(&self.config, &[kind.collection()], Some(NAME_COLUMN))
            .await?;

        let names = rows
            .into_iter()
            .filter_map(|row| row.name)
            .filter(|name| kind != ResourceKind::Exchange || !is_reserved_exchange(name))
            .collect();

        Ok(names)
    }

    async fn remove(&self, kind: ResourceKind, name: &str) -> Result<Removed> {
        self.transport
            .delete(&self.config, &kind.item_segments(name))
            .await
    }

    /// Deletes the names last to first. The first failure other than a 404
    /// stops the drain and whatever was already deleted stays deleted.
    async fn drain(&self, kind: ResourceKind, mut names: Vec<String>) -> Result<()> {
        let total = names.len();
        let mut deleted = 0;

        while let Some(name) = names.pop() {
            if self.remove(kind, &name).await? == Removed::Deleted {
                deleted += 1;
            }
        }

        info!("Deleted {} of {} listed {}s", deleted, total, kind);
        Ok(())
    }
}
