use crate::error::StoreError;
use crate::store::{CountResponse, ViewCountStore};
use async_trait::async_trait;
use reqwest::{Method, Url};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// View-count store reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpViewStore {
    client: reqwest::Client,
    endpoint: String,
    base: Url,
}

impl HttpViewStore {
    /// Create a client for the store rooted at `endpoint`
    /// (e.g. `https://views.example.com`)
    pub fn new(endpoint: &str) -> Result<Self, StoreError> {
        let endpoint = endpoint.trim_end_matches('/');
        let base = Url::parse(endpoint)
            .map_err(|e| StoreError::InvalidEndpoint(format!("'{}': {}", endpoint, e)))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::InvalidEndpoint(format!(
                "'{}' cannot carry a path",
                endpoint
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("blog-kit/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            base,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `{endpoint}/views/{slug}` with the slug percent-encoded as one segment
    fn url(&self, slug: &str) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidEndpoint(self.endpoint.clone()))?
            .pop_if_empty()
            .push("views")
            .push(slug);
        Ok(url)
    }

    async fn request(&self, method: Method, slug: &str) -> Result<u64, StoreError> {
        let url = self.url(slug)?;
        let response = self.client.request(method.clone(), url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%method, slug, status = status.as_u16(), "view store rejected request");
            return Err(StoreError::Status {
                slug: slug.to_string(),
                status: status.as_u16(),
            });
        }

        let body: CountResponse = response.json().await?;
        Ok(body.count)
    }
}

#[async_trait]
impl ViewCountStore for HttpViewStore {
    async fn get_count(&self, slug: &str) -> Result<u64, StoreError> {
        self.request(Method::GET, slug).await
    }

    async fn increment(&self, slug: &str) -> Result<u64, StoreError> {
        self.request(Method::POST, slug).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_strips_trailing_slash() {
        let store = HttpViewStore::new("https://views.example.com/").unwrap();
        assert_eq!(store.endpoint(), "https://views.example.com");
        assert_eq!(
            store.url("hello").unwrap().as_str(),
            "https://views.example.com/views/hello"
        );
    }

    #[test]
    fn test_url_encodes_slug_as_one_segment() {
        let store = HttpViewStore::new("https://views.example.com").unwrap();
        assert_eq!(
            store.url("a b/../c?d#e").unwrap().as_str(),
            "https://views.example.com/views/a%20b%2F..%2Fc%3Fd%23e"
        );
    }

    #[test]
    fn test_url_keeps_endpoint_path() {
        let store = HttpViewStore::new("https://example.com/api/").unwrap();
        assert_eq!(
            store.url("hello").unwrap().as_str(),
            "https://example.com/api/views/hello"
        );
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        assert!(matches!(
            HttpViewStore::new("not a url"),
            Err(StoreError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            HttpViewStore::new("mailto:views@example.com"),
            Err(StoreError::InvalidEndpoint(_))
        ));
    }
}
