use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("table store returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected table store response: {0}")]
    Decode(String),
}

/// Client tipis di atas endpoint tabel Supabase (`/rest/v1`).
/// Semua request memakai service role key; otorisasi per-role terjadi
/// di layer routing, bukan lewat RLS.
#[derive(Clone)]
pub struct Postgrest {
    base_url: String,
    service_role_key: String,
    client: Client,
}

impl Postgrest {
    pub fn new(base_url: &str, service_role_key: &str, client: Client) -> Self {
        Postgrest {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
            client,
        }
    }

    pub fn from_table(&self, table: &str) -> TableRequest<'_> {
        TableRequest {
            store: self,
            table: table.to_string(),
            query: Vec::new(),
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        self.client
            .request(method, url)
            .header("apikey", &self.service_role_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.service_role_key),
            )
    }
}

/// Satu request terhadap satu tabel; filter dikirim sebagai query param
/// dengan sintaks operator PostgREST (`eq.`, `in.(...)`, `or=(...)`).
pub struct TableRequest<'a> {
    store: &'a Postgrest,
    table: String,
    query: Vec<(String, String)>,
}

impl<'a> TableRequest<'a> {
    pub fn select(mut self, columns: &str) -> Self {
        self.query.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.query
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn gte(mut self, column: &str, value: impl ToString) -> Self {
        self.query
            .push((column.to_string(), format!("gte.{}", value.to_string())));
        self
    }

    pub fn lte(mut self, column: &str, value: impl ToString) -> Self {
        self.query
            .push((column.to_string(), format!("lte.{}", value.to_string())));
        self
    }

    pub fn in_list<I, T>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.query
            .push((column.to_string(), format!("in.({})", joined)));
        self
    }

    /// Disjungsi mentah, mis. `target_roles.cs.{guru},target_roles.is.null`.
    pub fn or_filter(mut self, expression: &str) -> Self {
        self.query
            .push(("or".to_string(), format!("({})", expression)));
        self
    }

    pub fn order(mut self, expression: &str) -> Self {
        self.query
            .push(("order".to_string(), expression.to_string()));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.query.push(("limit".to_string(), n.to_string()));
        self
    }

    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, StoreError> {
        let resp = self
            .store
            .request(Method::GET, &self.table)
            .query(&self.query)
            .send()
            .await?;
        read_rows(resp).await
    }

    /// Nol atau satu baris; lebih dari satu dianggap respons rusak.
    pub async fn maybe_single<T: DeserializeOwned>(self) -> Result<Option<T>, StoreError> {
        let table = self.table.clone();
        let mut rows: Vec<T> = self.limit(2).fetch().await?;
        if rows.len() > 1 {
            return Err(StoreError::Decode(format!(
                "expected at most one row from {}",
                table
            )));
        }
        Ok(rows.pop())
    }

    /// HEAD + `Prefer: count=exact`, total dibaca dari Content-Range.
    pub async fn count(self) -> Result<u64, StoreError> {
        let resp = self
            .store
            .request(Method::HEAD, &self.table)
            .query(&self.query)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status,
                body: String::new(),
            });
        }
        let range = resp
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| StoreError::Decode("missing content-range header".to_string()))?;
        range
            .rsplit('/')
            .next()
            .and_then(|total| total.parse::<u64>().ok())
            .ok_or_else(|| StoreError::Decode(format!("bad content-range: {}", range)))
    }

    pub async fn insert<B, T>(self, body: &B) -> Result<Vec<T>, StoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .store
            .request(Method::POST, &self.table)
            .query(&self.query)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        read_rows(resp).await
    }

    pub async fn update<B, T>(self, patch: &B) -> Result<Vec<T>, StoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .store
            .request(Method::PATCH, &self.table)
            .query(&self.query)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        read_rows(resp).await
    }

    /// DELETE mengembalikan baris yang terhapus supaya bisa dipublikasikan
    /// sebagai change event.
    pub async fn delete<T: DeserializeOwned>(self) -> Result<Vec<T>, StoreError> {
        let resp = self
            .store
            .request(Method::DELETE, &self.table)
            .query(&self.query)
            .header("Prefer", "return=representation")
            .send()
            .await?;
        read_rows(resp).await
    }
}

async fn read_rows<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<T>, StoreError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(StoreError::Status { status, body });
    }
    serde_json::from_str(&body).map_err(|e| StoreError::Decode(format!("{}: {}", e, body)))
}
