use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Deserialize;

use super::CatalogSource;
use crate::{Config, FetchError, Page, Record};

/// Columns requested from the API; everything else in the artwork payload is
/// left on the server.
const FIELDS: &str = "id,title,place_of_origin,artist_display,inscriptions,date_start,date_end";

const USER_AGENT: &str = concat!("artgrid/", env!("CARGO_PKG_VERSION"));

/// Client for the `artworks` listing of the Art Institute of Chicago API.
pub struct ArticCatalog {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

#[derive(Deserialize)]
struct ArtworksResponse {
    #[serde(default)]
    data: Vec<Record>,
    #[serde(default)]
    pagination: Pagination,
}

#[derive(Deserialize, Default)]
struct Pagination {
    #[serde(default)]
    total: u64,
}

impl ArticCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_url.clone(), config.timeout())
    }

    pub fn artworks_url(&self) -> String {
        format!("{}/artworks", self.base_url)
    }
}

/// Decode an `artworks` listing body into a [`Page`].
///
/// A missing `pagination.total` counts as zero.
pub fn parse_page(body: &str) -> Result<Page, FetchError> {
    let resp: ArtworksResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(Page {
        records: resp.data,
        total: resp.pagination.total,
    })
}

impl CatalogSource for ArticCatalog {
    fn name(&self) -> &str {
        "Art Institute of Chicago"
    }

    fn fetch_page<'a>(
        &'a self,
        page: u32,
        limit: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Page, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(self.artworks_url())
                .query(&[
                    ("page", page.to_string()),
                    ("limit", limit.to_string()),
                    ("fields", FIELDS.to_string()),
                ])
                .header("User-Agent", USER_AGENT)
                .timeout(self.timeout)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let body = resp.text().await?;
            parse_page(&body)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordId;

    #[test]
    fn parses_listing_body() {
        let body = r#"{
            "pagination": {"total": 128194, "limit": 2, "current_page": 1},
            "data": [
                {"id": 1, "title": "A", "place_of_origin": "France", "artist_display": "X",
                 "inscriptions": null, "date_start": 1880, "date_end": 1881},
                {"id": 2, "title": "B"}
            ]
        }"#;
        let page = parse_page(body).unwrap();
        assert_eq!(page.total, 128194);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].id, RecordId::Number(1));
        assert_eq!(page.records[0].place_of_origin.as_deref(), Some("France"));
        assert_eq!(page.records[1].date_end, None);
    }

    #[test]
    fn missing_pagination_means_zero_total() {
        let page = parse_page(r#"{"data": []}"#).unwrap();
        assert_eq!(page.total, 0);
        assert!(page.records.is_empty());
    }

    #[test]
    fn garbage_body_is_decode_error() {
        let err = parse_page("<html>oops</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let catalog = ArticCatalog::new("https://example.test/api/v1/", Duration::from_secs(1));
        assert_eq!(catalog.artworks_url(), "https://example.test/api/v1/artworks");
    }
}
