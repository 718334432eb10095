use crate::backend::{HistoryBackend, ParticipantBackend};
use crate::config::RestConfig;
use crate::error::{LuckyDrawError, Result};
use crate::types::{HistoryEntry, HistoryRecord, NewParticipant, Participant};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Hosted backend speaking the PostgREST dialect (`/rest/v1/<table>`).
pub struct RestBackend {
    client: Client,
    config: RestConfig,
}

impl RestBackend {
    pub fn new(config: RestConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                LuckyDrawError::network_connection(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            table
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await.map_err(|e| {
            LuckyDrawError::network_connection(format!("Request to store failed: {}", e))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::warn!("Store answered {}: {}", status, message);
        Err(LuckyDrawError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    /// Send and decode a JSON body. A body that arrives but does not parse is
    /// a serialization error, not a connection one.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send(request).await?.text().await.map_err(|e| {
            LuckyDrawError::network_connection(format!("Reading store response failed: {}", e))
        })?;
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!("Store sent a body we could not decode: {}", e);
        LuckyDrawError::from(e)
    })
}

#[async_trait]
impl ParticipantBackend for RestBackend {
    async fn list_participants(&self) -> Result<Vec<Participant>> {
        let url = self.table_url(&self.config.participants_table);
        let request = self
            .client
            .get(url)
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        let participants = self.fetch(request).await?;
        Ok(participants)
    }

    async fn insert_participant(&self, participant: NewParticipant) -> Result<Participant> {
        let url = self.table_url(&self.config.participants_table);
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(&[&participant]);

        let mut created: Vec<Participant> = self.fetch(request).await?;
        let created = created
            .pop()
            .ok_or_else(|| LuckyDrawError::internal("Store returned no inserted row"))?;

        tracing::info!("Added participant '{}' ({})", created.name, created.id);
        Ok(created)
    }

    async fn delete_participant(&self, id: &str) -> Result<()> {
        let url = self.table_url(&self.config.participants_table);
        let filter = format!("eq.{}", id);
        let request = self.client.delete(url).query(&[("id", filter.as_str())]);

        self.send(request).await?;
        tracing::info!("Deleted participant {}", id);
        Ok(())
    }
}

#[async_trait]
impl HistoryBackend for RestBackend {
    async fn insert_history(&self, records: &[HistoryRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let url = self.table_url(&self.config.history_table);
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(records);

        self.send(request).await?;
        tracing::info!("Recorded {} winner(s) in history", records.len());
        Ok(())
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let url = self.table_url(&self.config.history_table);
        let limit = limit.to_string();
        let request = self.client.get(url).query(&[
            ("select", "*"),
            ("order", "created_at.desc"),
            ("limit", limit.as_str()),
        ]);

        let entries = self.fetch(request).await?;
        Ok(entries)
    }
}
