// src/domain/analysis.rs

use crate::domain::deal::{BuyBox, Deal};

/// Letter grade on cash-on-cash ROI. Thresholds are closed on the lower
/// bound: >= 25 is an A, >= 15 a B, >= 10 a C, everything else a D.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealGrade {
    A,
    B,
    C,
    D,
}

impl DealGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealGrade::A => "A",
            DealGrade::B => "B",
            DealGrade::C => "C",
            DealGrade::D => "D",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A" => Some(DealGrade::A),
            "B" => Some(DealGrade::B),
            "C" => Some(DealGrade::C),
            "D" => Some(DealGrade::D),
            _ => None,
        }
    }

    /// Numeric rank for sorting, A highest.
    pub fn rank(&self) -> u8 {
        match self {
            DealGrade::A => 4,
            DealGrade::B => 3,
            DealGrade::C => 2,
            DealGrade::D => 1,
        }
    }

    fn from_cash_on_cash(roi: f64) -> Self {
        if roi >= 25.0 {
            DealGrade::A
        } else if roi >= 15.0 {
            DealGrade::B
        } else if roi >= 10.0 {
            DealGrade::C
        } else {
            DealGrade::D
        }
    }
}

/// Derived analysis record for a (Deal, BuyBox) pair.
///
/// Pure function of its two inputs; recomputing with identical inputs yields
/// identical output. ROI fields can be non-finite when the inputs are
/// degenerate (zero cash invested, zero holding months); display layers
/// render those as a dash rather than this record guarding them.
#[derive(Debug, Clone, PartialEq)]
pub struct DealAnalysis {
    pub deal_id: i64,
    pub max_offer_70_percent: f64,
    pub total_investment: f64,
    pub projected_profit: f64,
    pub cash_on_cash_roi: f64,
    pub annualized_roi: f64,
    pub holding_costs: f64,
    pub selling_costs: f64,
    pub hard_money_costs: f64,
    pub grade: DealGrade,
    pub meets_buy_box: bool,
}

/// Fixed monthly estimate for utilities, insurance and property taxes.
/// Policy constant, not user-configurable.
const MONTHLY_HOLDING_COSTS: f64 = 500.0;

/// Fixed down payment assumption on the purchase price.
const DOWN_PAYMENT_RATE: f64 = 0.2;

pub fn analyze_deal(deal: &Deal, buy_box: &BuyBox) -> DealAnalysis {
    let max_offer_70_percent = deal.estimated_arv * 0.7 - deal.rehab_estimate;

    let purchase_price = deal.list_price;
    let rehab_costs = deal.rehab_estimate;
    let hard_money_loan_amount = purchase_price + rehab_costs;

    let points_cost = hard_money_loan_amount * (buy_box.hard_money_points / 100.0);
    let monthly_interest = hard_money_loan_amount * (buy_box.hard_money_rate / 12.0 / 100.0);
    let total_interest = monthly_interest * buy_box.holding_period_months;
    let hard_money_costs = points_cost + total_interest;

    let other_holding_costs = MONTHLY_HOLDING_COSTS * buy_box.holding_period_months;
    let total_holding_costs = hard_money_costs + other_holding_costs;

    let selling_costs = deal.estimated_arv * (buy_box.selling_costs_percent / 100.0);

    let total_investment = purchase_price + rehab_costs + total_holding_costs + selling_costs;
    let projected_profit = deal.estimated_arv - total_investment;

    // Investor puts down 20% of purchase plus all rehab and holding costs.
    let cash_invested = purchase_price * DOWN_PAYMENT_RATE + rehab_costs + total_holding_costs;
    let cash_on_cash_roi = projected_profit / cash_invested * 100.0;
    let annualized_roi = cash_on_cash_roi * (12.0 / buy_box.holding_period_months);

    let grade = DealGrade::from_cash_on_cash(cash_on_cash_roi);

    let meets_buy_box = cash_on_cash_roi >= buy_box.min_cash_on_cash
        && projected_profit >= buy_box.target_profit_min
        && rehab_costs <= buy_box.max_rehab_budget;

    DealAnalysis {
        deal_id: deal.id,
        max_offer_70_percent,
        total_investment,
        projected_profit,
        cash_on_cash_roi,
        annualized_roi,
        holding_costs: total_holding_costs,
        selling_costs,
        hard_money_costs,
        grade,
        meets_buy_box,
    }
}

pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "—".to_string();
    }
    let negative = amount < 0.0;
    let rounded = amount.abs().round() as i64;
    let digits = rounded.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negative {
        format!("-${out}")
    } else {
        format!("${out}")
    }
}

pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    format!("{value:.1}%")
}
