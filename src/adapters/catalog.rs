use crate::config::CatalogSource;
use crate::domain::model::Drug;
use crate::domain::ports::DrugCatalog;
use crate::utils::error::{DoseError, Result};
use crate::utils::validation::validate_file_extension;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const CATALOG_FILE_EXTENSIONS: [&str; 2] = ["json", "toml"];

#[derive(Debug, Deserialize)]
struct CatalogFile {
    drugs: Vec<Drug>,
}

/// Catalog held fully in memory, loaded once from a list or a file.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    drugs: HashMap<String, Drug>,
}

impl InMemoryCatalog {
    /// Later records replace earlier ones with the same id.
    pub fn new(drugs: Vec<Drug>) -> Self {
        Self {
            drugs: drugs.into_iter().map(|drug| (drug.id.clone(), drug)).collect(),
        }
    }

    /// JSON array of drug records.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let drugs: Vec<Drug> = serde_json::from_str(content)?;
        Ok(Self::new(drugs))
    }

    /// TOML document with one `[[drugs]]` table per record.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| {
            DoseError::catalog(format!("TOML catalog parsing error: {}", e))
        })?;
        Ok(Self::new(file.drugs))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_display = path.to_string_lossy();
        validate_file_extension("catalog.path", &path_display, &CATALOG_FILE_EXTENSIONS)?;

        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        let catalog = if is_toml {
            Self::from_toml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };

        tracing::info!("Loaded {} drugs from {}", catalog.len(), path_display);
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }
}

#[async_trait]
impl DrugCatalog for InMemoryCatalog {
    async fn get_drug_by_id(&self, id: &str) -> Result<Option<Drug>> {
        Ok(self.drugs.get(id).cloned())
    }
}

/// Remote catalog answering `GET {endpoint}/{id}` with a JSON drug record.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    endpoint: Url,
}

impl HttpCatalog {
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::build(endpoint, Client::builder())
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        Self::build(endpoint, Client::builder().timeout(timeout))
    }

    fn build(endpoint: &str, builder: reqwest::ClientBuilder) -> Result<Self> {
        crate::utils::validation::validate_url("catalog.endpoint", endpoint)?;
        let endpoint = Url::parse(endpoint).map_err(|e| DoseError::InvalidConfigValueError {
            field: "catalog.endpoint".to_string(),
            value: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    fn drug_url(&self, id: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| DoseError::catalog(format!("{} cannot take a path", self.endpoint)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl DrugCatalog for HttpCatalog {
    async fn get_drug_by_id(&self, id: &str) -> Result<Option<Drug>> {
        let url = self.drug_url(id)?;
        tracing::debug!("Requesting drug record: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("Catalog response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DoseError::catalog(format!("{} returned {}", url, status)));
        }

        let drug: Drug = response.json().await?;
        Ok(Some(drug))
    }
}

/// Catalog for a configured source.
pub fn build_catalog(source: &CatalogSource) -> Result<Arc<dyn DrugCatalog>> {
    match source {
        CatalogSource::File(path) => Ok(Arc::new(InMemoryCatalog::from_file(path)?)),
        CatalogSource::Http { endpoint, timeout } => {
            Ok(Arc::new(HttpCatalog::with_timeout(endpoint, *timeout)?))
        }
    }
}
