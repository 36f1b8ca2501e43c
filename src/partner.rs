// src/partner.rs
//
// Integration with the wealth-tracking and lending partners. Every call is
// a single best-effort HTTP request; failures come back as an error message
// for the caller to display, never a retry.

use std::time::Duration;

use log::warn;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::deals;
use crate::domain::deal::{Deal, DealStatus};
use crate::errors::ServerError;

#[derive(Debug, Clone)]
struct Endpoint {
    base_url: String,
    api_key: String,
}

pub struct PartnerClient {
    client: reqwest::blocking::Client,
    wealth: Option<Endpoint>,
    lending: Option<Endpoint>,
}

/// Asset record pushed to the wealth partner when a deal closes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssetPayload {
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: &'static str,
    pub current_value: f64,
    pub cost_basis: f64,
    pub purchase_date: i64,
    pub address: String,
    pub source_deal_id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WealthSummary {
    pub net_worth: f64,
    pub total_assets: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreQualification {
    pub eligible: bool,
    pub max_loan_amount: Option<f64>,
    pub reason: Option<String>,
    pub ltv_ratio: f64,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub synced: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApplicationResponse {
    application_id: String,
}

#[derive(Debug, Serialize)]
struct LoanApplicationPayload<'a> {
    user_id: i64,
    source_deal_id: i64,
    property_address: &'a str,
    purchase_price: f64,
    arv: f64,
    rehab_estimate: f64,
    loan_amount: f64,
    ltv_ratio: f64,
    source: &'static str,
}

impl PartnerClient {
    pub fn from_config(cfg: &Config) -> Result<Self, ServerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ServerError::Upstream(format!("http client init failed: {e}")))?;

        let wealth = match (&cfg.wealth_api_url, &cfg.wealth_api_key) {
            (Some(url), Some(key)) => Some(Endpoint {
                base_url: url.trim_end_matches('/').to_string(),
                api_key: key.clone(),
            }),
            _ => None,
        };
        let lending = match (&cfg.lending_api_url, &cfg.lending_api_key) {
            (Some(url), Some(key)) => Some(Endpoint {
                base_url: url.trim_end_matches('/').to_string(),
                api_key: key.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            client,
            wealth,
            lending,
        })
    }

    /// Push a closed deal to the wealth partner as a real-estate asset,
    /// then stamp the deal as synced.
    pub fn sync_deal(
        &self,
        conn: &Connection,
        user_id: i64,
        deal_id: i64,
        now: i64,
    ) -> Result<(), ServerError> {
        let Some(wealth) = &self.wealth else {
            return Err(ServerError::Upstream("wealth partner not configured".into()));
        };

        let deal = deals::get_deal(conn, deal_id, user_id)?;
        if deal.status != DealStatus::Closed {
            return Err(ServerError::BadRequest(
                "deal must be closed before syncing".into(),
            ));
        }

        let payload = asset_payload(&deal);
        let response = self
            .client
            .post(format!("{}/api/sync/asset", wealth.base_url))
            .bearer_auth(&wealth.api_key)
            .json(&payload)
            .send()
            .map_err(|e| ServerError::Upstream(format!("sync request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(ServerError::Upstream(format!(
                "sync rejected: {status} - {text}"
            )));
        }

        deals::mark_synced(conn, deal_id, user_id, now)
    }

    /// Sync every unsynced closed deal for the user; keeps going on
    /// per-deal failures and reports them.
    pub fn sync_all_closed(
        &self,
        conn: &Connection,
        user_id: i64,
        now: i64,
    ) -> Result<SyncReport, ServerError> {
        let pending = deals::unsynced_closed_deals(conn, user_id)?;
        let mut report = SyncReport::default();

        for deal in pending {
            match self.sync_deal(conn, user_id, deal.id, now) {
                Ok(()) => report.synced += 1,
                Err(e) => {
                    report.failed += 1;
                    report.errors.push(format!("deal {}: {e}", deal.id));
                }
            }
        }
        Ok(report)
    }

    /// Net-worth summary from the wealth partner; None on any failure so
    /// pre-qualification can fall back to deal-only rules.
    pub fn wealth_summary(&self, user_id: i64) -> Option<WealthSummary> {
        let wealth = self.wealth.as_ref()?;
        let result = self
            .client
            .get(format!("{}/api/summary", wealth.base_url))
            .query(&[("userId", user_id.to_string())])
            .bearer_auth(&wealth.api_key)
            .send();

        match result {
            Ok(resp) if resp.status().is_success() => match resp.json::<WealthSummary>() {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!("wealth summary parse failed: {e}");
                    None
                }
            },
            Ok(resp) => {
                warn!("wealth summary returned {}", resp.status());
                None
            }
            Err(e) => {
                warn!("wealth summary request failed: {e}");
                None
            }
        }
    }

    pub fn check_pre_qualification(
        &self,
        conn: &Connection,
        user_id: i64,
        deal_id: i64,
    ) -> Result<PreQualification, ServerError> {
        let deal = deals::get_deal(conn, deal_id, user_id)?;
        let summary = self.wealth_summary(user_id);
        Ok(qualify(&deal, summary.as_ref()))
    }

    /// Submit a loan application pre-filled with deal data. Gated on
    /// pre-qualification and the qualified maximum.
    pub fn submit_loan_application(
        &self,
        conn: &Connection,
        user_id: i64,
        deal_id: i64,
        loan_amount: f64,
        now: i64,
    ) -> Result<String, ServerError> {
        let Some(lending) = &self.lending else {
            return Err(ServerError::Upstream(
                "lending partner not configured".into(),
            ));
        };

        let deal = deals::get_deal(conn, deal_id, user_id)?;
        let pre_qual = qualify(&deal, self.wealth_summary(user_id).as_ref());
        if !pre_qual.eligible {
            return Err(ServerError::BadRequest(
                pre_qual
                    .reason
                    .unwrap_or_else(|| "not pre-qualified".to_string()),
            ));
        }
        let max = pre_qual.max_loan_amount.unwrap_or(0.0);
        if loan_amount > max {
            return Err(ServerError::BadRequest(format!(
                "requested amount exceeds max qualification of {max:.0}"
            )));
        }

        let payload = LoanApplicationPayload {
            user_id,
            source_deal_id: deal.id,
            property_address: &deal.address,
            purchase_price: deal.list_price,
            arv: deal.estimated_arv,
            rehab_estimate: deal.rehab_estimate,
            loan_amount,
            ltv_ratio: pre_qual.ltv_ratio,
            source: "flip_analyzer",
        };

        let response = self
            .client
            .post(format!("{}/api/applications", lending.base_url))
            .bearer_auth(&lending.api_key)
            .json(&payload)
            .send()
            .map_err(|e| ServerError::Upstream(format!("loan application failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(ServerError::Upstream(format!(
                "loan application rejected: {status} - {text}"
            )));
        }

        let parsed: ApplicationResponse = response
            .json()
            .map_err(|e| ServerError::Upstream(format!("loan application parse failed: {e}")))?;

        deals::record_loan_application(conn, deal_id, user_id, &parsed.application_id, now)?;
        Ok(parsed.application_id)
    }
}

/// The asset record for a closed deal: ARV as current value (list price
/// when no ARV was entered), purchase plus rehab as cost basis.
pub fn asset_payload(deal: &Deal) -> AssetPayload {
    let current_value = if deal.estimated_arv > 0.0 {
        deal.estimated_arv
    } else {
        deal.list_price
    };
    AssetPayload {
        user_id: deal.user_id,
        name: format!("Flip: {}", deal.street()),
        asset_type: "real_estate",
        current_value,
        cost_basis: deal.list_price + deal.rehab_estimate,
        purchase_date: deal.updated_at,
        address: deal.address.clone(),
        source_deal_id: deal.id,
        description: format!(
            "Flip deal. ARV: {:.0}, Rehab: {:.0}",
            deal.estimated_arv, deal.rehab_estimate
        ),
    }
}

/// Eligibility rules. With no wealth summary available, fall back to the
/// deal-only check (LTV <= 70, max loan 80% of purchase). With one, reject
/// high LTV or thin liquidity and cap the loan by both the property and the
/// borrower's net worth.
pub fn qualify(deal: &Deal, summary: Option<&WealthSummary>) -> PreQualification {
    let value = if deal.estimated_arv > 0.0 {
        deal.estimated_arv
    } else {
        deal.list_price
    };
    let ltv = deal.list_price / value * 100.0;

    let Some(summary) = summary else {
        if ltv <= 70.0 {
            return PreQualification {
                eligible: true,
                max_loan_amount: Some(deal.list_price * 0.8),
                reason: None,
                ltv_ratio: ltv,
            };
        }
        return PreQualification {
            eligible: false,
            max_loan_amount: None,
            reason: Some("LTV ratio too high (>70%)".to_string()),
            ltv_ratio: ltv,
        };
    };

    if ltv > 80.0 {
        return PreQualification {
            eligible: false,
            max_loan_amount: None,
            reason: Some("LTV ratio too high (>80%)".to_string()),
            ltv_ratio: ltv,
        };
    }

    let liquidity_ratio = summary.total_assets / deal.list_price;
    if liquidity_ratio < 0.25 {
        return PreQualification {
            eligible: false,
            max_loan_amount: None,
            reason: Some(
                "insufficient liquidity (need 25% of purchase price in assets)".to_string(),
            ),
            ltv_ratio: ltv,
        };
    }

    let max_loan = (deal.list_price * 0.85).min(summary.net_worth * 0.5);
    PreQualification {
        eligible: true,
        max_loan_amount: Some(max_loan),
        reason: None,
        ltv_ratio: ltv,
    }
}
