use crate::config::ClientConfig;
use crate::error::{RabbitopError, Result};
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// Outcome of a delete call. A 404 is not an error: the resource is gone either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removed {
    Deleted,
    AlreadyAbsent,
}

/// Thin layer over `reqwest` that knows how to address the management API
/// and how to classify its answers.
#[derive(Clone, Default)]
pub struct Transport {
    http: Client,
}

impl Transport {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// GET whose body is of no interest, only the status.
    pub async fn get(&self, config: &ClientConfig, segments: &[&str]) -> Result<()> {
        let url = endpoint(&config.base_url, segments, None)?;
        self.send(config, Method::GET, url, None::<&()>).await?;
        Ok(())
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        config: &ClientConfig,
        segments: &[&str],
        query: Option<&str>,
    ) -> Result<T> {
        let url = endpoint(&config.base_url, segments, query)?;
        let response = self.send(config, Method::GET, url, None::<&()>).await?;
        Ok(response.json().await?)
    }

    pub async fn put_json<B: Serialize>(
        &self,
        config: &ClientConfig,
        segments: &[&str],
        body: &B,
    ) -> Result<()> {
        let url = endpoint(&config.base_url, segments, None)?;
        self.send(config, Method::PUT, url, Some(body)).await?;
        Ok(())
    }

    pub async fn delete(&self, config: &ClientConfig, segments: &[&str]) -> Result<Removed> {
        let url = endpoint(&config.base_url, segments, None)?;
        match self.send(config, Method::DELETE, url, None::<&()>).await {
            Ok(_) => Ok(Removed::Deleted),
            Err(error) if error.is_not_found() => {
                debug!("Nothing to delete: {}", error);
                Ok(Removed::AlreadyAbsent)
            }
            Err(error) => Err(error),
        }
    }

    async fn send<B: Serialize>(
        &self,
        config: &ClientConfig,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Response> {
        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let mut request: RequestBuilder = self
            .http
            .request(method.clone(), url)
            .basic_auth(&config.username, Some(&config.password));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("{} {} returned status {}", method, path, status);

        if status.is_success() {
            return Ok(response);
        }

        Err(RabbitopError::ResourceOperation {
            method,
            path,
            status,
            body: read_body(response, status).await,
        })
    }
}

async fn read_body(response: Response, status: StatusCode) -> String {
    match response.text().await {
        Ok(text) if !text.is_empty() => text,
        _ => status.canonical_reason().unwrap_or_default().to_string(),
    }
}

/// Resolves `segments` against the base URL, percent-encoding each segment
/// on its own so that names containing `/`, spaces or `>` stay one segment.
///
/// `.` and `..` are dot segments that URL normalization removes, so such a
/// segment is refused instead of being sent to a different resource.
pub(crate) fn endpoint(base_url: &str, segments: &[&str], query: Option<&str>) -> Result<Url> {
    if let Some(segment) = segments.iter().find(|s| matches!(**s, "." | "..")) {
        return Err(RabbitopError::UnaddressableName(segment.to_string()));
    }

    let invalid = |reason: String| RabbitopError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("URL cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(segments);
    url.set_query(query);

    Ok(url)
}
