//! Hosted trending store on an Appwrite document collection
//!
//! Documents carry `searchTerm`, `count`, `poster_url` and `movie_id`
//! attributes. Queries use the JSON query syntax of Appwrite 1.5+.

use super::{NewTrendingEntry, TrendingBackend, TrendingEntry};
use crate::config::AppwriteConfig;
use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<TrendingDocument>,
}

#[derive(Debug, Deserialize)]
struct TrendingDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "searchTerm")]
    search_term: String,
    count: i64,
    #[serde(default)]
    poster_url: String,
    #[serde(default)]
    movie_id: u64,
}

impl From<TrendingDocument> for TrendingEntry {
    fn from(doc: TrendingDocument) -> Self {
        TrendingEntry {
            id: doc.id,
            search_term: doc.search_term,
            count: doc.count,
            poster_url: doc.poster_url,
            movie_id: doc.movie_id,
        }
    }
}

#[derive(Serialize)]
struct CreateDocument<'a> {
    #[serde(rename = "documentId")]
    document_id: &'a str,
    data: NewDocumentData<'a>,
}

#[derive(Serialize)]
struct NewDocumentData<'a> {
    #[serde(rename = "searchTerm")]
    search_term: &'a str,
    count: i64,
    poster_url: &'a str,
    movie_id: u64,
}

#[derive(Serialize)]
struct UpdateDocument {
    data: CountUpdate,
}

#[derive(Serialize)]
struct CountUpdate {
    count: i64,
}

pub(crate) fn equal_query(attribute: &str, value: &str) -> String {
    serde_json::json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
}

pub(crate) fn order_desc_query(attribute: &str) -> String {
    serde_json::json!({ "method": "orderDesc", "attribute": attribute }).to_string()
}

pub(crate) fn limit_query(limit: usize) -> String {
    serde_json::json!({ "method": "limit", "values": [limit] }).to_string()
}

pub struct AppwriteBackend {
    client: Client,
    documents_url: String,
    project_id: String,
    api_key: Option<String>,
}

impl AppwriteBackend {
    pub fn new(config: &AppwriteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            documents_url: format!(
                "{}/databases/{}/collections/{}/documents",
                config.endpoint,
                urlencoding::encode(&config.database_id),
                urlencoding::encode(&config.collection_id)
            ),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("X-Appwrite-Project", &self.project_id);
        match &self.api_key {
            Some(key) => request.header("X-Appwrite-Key", key),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = self
            .authorize(request)
            .send()
            .with_context(|| format!("Appwrite {} request failed", what))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            anyhow::bail!("Appwrite {} failed ({}): {}", what, status, body);
        }
        Ok(response)
    }

    fn list(&self, queries: &[String], what: &str) -> Result<Vec<TrendingEntry>> {
        let params: Vec<(&str, &str)> = queries
            .iter()
            .map(|q| ("queries[]", q.as_str()))
            .collect();
        let request = self.client.get(&self.documents_url).query(&params);
        let list: DocumentList = self
            .send(request, what)?
            .json()
            .with_context(|| format!("Failed to decode Appwrite {} response", what))?;
        Ok(list.documents.into_iter().map(TrendingEntry::from).collect())
    }
}

impl TrendingBackend for AppwriteBackend {
    fn find_by_term(&self, term: &str) -> Result<Option<TrendingEntry>> {
        let queries = [equal_query("searchTerm", term), limit_query(1)];
        Ok(self.list(&queries, "lookup")?.into_iter().next())
    }

    fn create(&self, entry: &NewTrendingEntry) -> Result<TrendingEntry> {
        let body = CreateDocument {
            document_id: "unique()",
            data: NewDocumentData {
                search_term: &entry.search_term,
                count: 1,
                poster_url: &entry.poster_url,
                movie_id: entry.movie_id,
            },
        };
        let request = self.client.post(&self.documents_url).json(&body);
        let doc: TrendingDocument = self
            .send(request, "create")?
            .json()
            .context("Failed to decode created Appwrite document")?;
        Ok(doc.into())
    }

    fn increment(&self, entry: &TrendingEntry) -> Result<TrendingEntry> {
        let url = format!("{}/{}", self.documents_url, urlencoding::encode(&entry.id));
        let body = UpdateDocument {
            data: CountUpdate {
                count: entry.count + 1,
            },
        };
        let request = self.client.patch(&url).json(&body);
        let doc: TrendingDocument = self
            .send(request, "update")?
            .json()
            .context("Failed to decode updated Appwrite document")?;
        Ok(doc.into())
    }

    fn list_by_count_desc(&self, limit: usize) -> Result<Vec<TrendingEntry>> {
        let queries = [order_desc_query("count"), limit_query(limit)];
        self.list(&queries, "list")
    }

    fn describe(&self) -> String {
        format!("appwrite {}", self.documents_url)
    }
}
