// src/domain/deal.rs

use crate::errors::ServerError;

/// Lifecycle of a candidate property. Deals move forward through
/// lead -> analyzed -> offered -> under-contract -> closed, and can be
/// marked dead at any point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealStatus {
    Lead,
    Analyzed,
    Offered,
    UnderContract,
    Closed,
    Dead,
}

impl DealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Lead => "lead",
            DealStatus::Analyzed => "analyzed",
            DealStatus::Offered => "offered",
            DealStatus::UnderContract => "under-contract",
            DealStatus::Closed => "closed",
            DealStatus::Dead => "dead",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ServerError> {
        match s {
            "lead" => Ok(DealStatus::Lead),
            "analyzed" => Ok(DealStatus::Analyzed),
            "offered" => Ok(DealStatus::Offered),
            "under-contract" => Ok(DealStatus::UnderContract),
            "closed" => Ok(DealStatus::Closed),
            "dead" => Ok(DealStatus::Dead),
            other => Err(ServerError::BadRequest(format!(
                "unknown deal status: {other}"
            ))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DealStatus::Lead => "Lead",
            DealStatus::Analyzed => "Analyzed",
            DealStatus::Offered => "Offered",
            DealStatus::UnderContract => "Under Contract",
            DealStatus::Closed => "Closed",
            DealStatus::Dead => "Dead",
        }
    }

    pub const ALL: [DealStatus; 6] = [
        DealStatus::Lead,
        DealStatus::Analyzed,
        DealStatus::Offered,
        DealStatus::UnderContract,
        DealStatus::Closed,
        DealStatus::Dead,
    ];
}

/// A candidate property as entered by the user.
#[derive(Debug, Clone)]
pub struct Deal {
    pub id: i64,
    pub user_id: i64,
    pub address: String,
    pub zip_code: String,
    pub list_price: f64,
    pub estimated_arv: f64,
    pub rehab_estimate: f64,
    pub square_feet: Option<f64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub days_on_market: Option<i64>,
    pub notes: Option<String>,
    pub status: DealStatus,
    /// Set once the deal has been pushed to the wealth partner.
    pub synced_at: Option<i64>,
    pub loan_application_id: Option<String>,
    pub loan_application_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Deal {
    /// Street portion of the address, used as the asset name on sync.
    pub fn street(&self) -> &str {
        self.address.split(',').next().unwrap_or(&self.address).trim()
    }
}

/// Reusable investor acceptance criteria. Immutable input to analysis,
/// edited independently of deals.
#[derive(Debug, Clone)]
pub struct BuyBox {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub max_purchase_price: Option<f64>,
    /// Minimum acceptable cash-on-cash return, percent.
    pub min_cash_on_cash: f64,
    pub max_rehab_budget: f64,
    pub holding_period_months: f64,
    pub target_profit_min: f64,
    /// Hard money annual interest rate, percent.
    pub hard_money_rate: f64,
    /// Hard money points, percent of loan amount.
    pub hard_money_points: f64,
    /// Selling costs as a percent of ARV.
    pub selling_costs_percent: f64,
    pub is_default: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
