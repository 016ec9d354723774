use crate::adapters::http::HttpClient;
use crate::domain::model::CatalogEntry;
use crate::utils::error::Result;
use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Upper bound on followed `rel="next"` links.
pub const MAX_PAGES: usize = 1000;

static NEXT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>\s*;[^,]*rel="?next"?"#).unwrap());

pub struct CatalogLister<'a> {
    client: &'a HttpClient,
    max_pages: usize,
}

impl<'a> CatalogLister<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self {
            client,
            max_pages: MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Downloadable paths, or an empty list when the listing cannot be fetched.
    pub async fn list_files(&self, listing_url: &str) -> Vec<String> {
        match self.try_list_files(listing_url).await {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("❌ Failed to list files from {}: {}", listing_url, e);
                Vec::new()
            }
        }
    }

    pub async fn try_list_files(&self, listing_url: &str) -> Result<Vec<String>> {
        let mut files = Vec::new();
        let mut next_url = Some(listing_url.to_string());
        let mut visited = HashSet::new();
        let mut pages = 0;

        while let Some(url) = next_url.take() {
            if !visited.insert(normalize_url(&url)) {
                tracing::warn!("Listing page {} links back to an earlier page, stopping", url);
                break;
            }
            if pages == self.max_pages {
                tracing::warn!(
                    "Stopped following listing pages after {}; results may be incomplete",
                    self.max_pages
                );
                break;
            }

            let response = self.client.get(&url).await?;
            next_url = next_page_url(&url, response.headers());

            let entries: Vec<CatalogEntry> = response.json().await?;
            let before = files.len();
            files.extend(filter_entries(entries));
            pages += 1;

            tracing::debug!(
                "Listing page {} contributed {} files",
                pages,
                files.len() - before
            );
        }

        tracing::info!("Discovered {} downloadable files", files.len());
        Ok(files)
    }
}

/// Keeps `.jsonl` files, in listing order.
pub fn filter_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Vec<String> {
    entries
        .into_iter()
        .filter(CatalogEntry::is_downloadable)
        .map(|entry| entry.path)
        .collect()
}

fn normalize_url(url: &str) -> String {
    Url::parse(url)
        .map(|parsed| parsed.to_string())
        .unwrap_or_else(|_| url.to_string())
}

/// Resolves the `rel="next"` target of a `Link` header against the current URL.
pub fn next_page_url(current_url: &str, headers: &HeaderMap) -> Option<String> {
    let header = headers.get(LINK)?.to_str().ok()?;

    header.split(',').find_map(|part| {
        let target = NEXT_LINK.captures(part)?.get(1)?.as_str();
        let resolved = Url::parse(current_url).ok()?.join(target).ok()?;
        Some(resolved.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn entries(value: serde_json::Value) -> Vec<CatalogEntry> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_filter_keeps_only_jsonl_files() {
        let listed = entries(serde_json::json!([
            {"path": "a.jsonl", "type": "file"},
            {"path": "sub", "type": "directory"},
            {"path": "b.txt", "type": "file"}
        ]));
        assert_eq!(filter_entries(listed), vec!["a.jsonl"]);
    }

    #[test]
    fn test_filter_preserves_order_and_drops_jsonl_directories() {
        let listed = entries(serde_json::json!([
            {"path": "z.jsonl", "type": "file"},
            {"path": "dir.jsonl", "type": "directory"},
            {"path": "m.jsonl.gz", "type": "file"},
            {"path": "data/a.jsonl", "type": "file"}
        ]));
        assert_eq!(filter_entries(listed), vec!["z.jsonl", "data/a.jsonl"]);
    }

    #[test]
    fn test_next_page_url_parses_link_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://example.com/api/tree?cursor=abc>; rel="next", <https://example.com/api/tree>; rel="first""#,
            ),
        );
        assert_eq!(
            next_page_url("https://example.com/api/tree", &headers).as_deref(),
            Some("https://example.com/api/tree?cursor=abc")
        );
    }

    #[test]
    fn test_next_page_url_resolves_relative_targets() {
        let mut headers = HeaderMap::new();
        headers.insert(LINK, HeaderValue::from_static(r#"</api/tree?cursor=2>; rel=next"#));
        assert_eq!(
            next_page_url("https://example.com/api/tree", &headers).as_deref(),
            Some("https://example.com/api/tree?cursor=2")
        );
    }

    #[test]
    fn test_next_page_url_absent() {
        let mut headers = HeaderMap::new();
        assert_eq!(next_page_url("https://example.com/", &headers), None);

        headers.insert(LINK, HeaderValue::from_static(r#"<https://example.com/p1>; rel="prev""#));
        assert_eq!(next_page_url("https://example.com/", &headers), None);
    }
}
