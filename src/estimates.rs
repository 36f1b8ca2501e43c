// src/estimates.rs
//
// Address-keyed property lookup against the listing-data partner. Feeds
// the deal form prefill and the ARV fallback chain in the quick estimator.

use std::time::Duration;

use serde::Deserialize;

use crate::config::Config;
use crate::errors::ServerError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub address: String,
    pub price: f64,
    #[serde(default)]
    pub bedrooms: Option<f64>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub living_area: Option<f64>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub estimate: Option<f64>,
    #[serde(default)]
    pub days_on_market: Option<i64>,
    #[serde(default)]
    pub year_built: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompSale {
    pub address: String,
    pub sale_price: f64,
    #[serde(default)]
    pub sale_date: Option<String>,
    #[serde(default)]
    pub sqft: Option<f64>,
}

pub struct EstimateClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl EstimateClient {
    pub fn from_config(cfg: &Config) -> Result<Option<Self>, ServerError> {
        let (Some(url), Some(key)) = (&cfg.estimate_api_url, &cfg.estimate_api_key) else {
            return Ok(None);
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ServerError::Upstream(format!("http client init failed: {e}")))?;
        Ok(Some(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            api_key: key.clone(),
        }))
    }

    pub fn search_by_address(&self, address: &str) -> Result<PropertyRecord, ServerError> {
        let response = self
            .client
            .get(format!("{}/properties/search", self.base_url))
            .query(&[("address", address)])
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| ServerError::Upstream(format!("property lookup failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ServerError::NotFound);
        }
        if !response.status().is_success() {
            return Err(ServerError::Upstream(format!(
                "property lookup returned {}",
                response.status()
            )));
        }

        response
            .json::<PropertyRecord>()
            .map_err(|e| ServerError::Upstream(format!("property lookup parse failed: {e}")))
    }

    /// Recent comparable sales near the address. A failed or empty response
    /// is an empty list, not an error; the estimator treats it as no signal.
    pub fn comps(&self, address: &str) -> Result<Vec<CompSale>, ServerError> {
        let response = self
            .client
            .get(format!("{}/properties/comps", self.base_url))
            .query(&[("address", address), ("radius", "1")])
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| ServerError::Upstream(format!("comps lookup failed: {e}")))?;

        if !response.status().is_success() {
            return Ok(Vec::new());
        }
        Ok(response.json::<Vec<CompSale>>().unwrap_or_default())
    }
}

/// ARV from comparable sales: mean sale price, rounded to the dollar.
/// No comps means no estimate (0).
pub fn arv_from_comps(comps: &[CompSale]) -> f64 {
    if comps.is_empty() {
        return 0.0;
    }
    let sum: f64 = comps.iter().map(|c| c.sale_price).sum();
    (sum / comps.len() as f64).round()
}
