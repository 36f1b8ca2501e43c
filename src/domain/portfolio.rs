// src/domain/portfolio.rs

use crate::domain::analysis::{DealAnalysis, DealGrade};
use crate::domain::deal::{Deal, DealStatus};

/// Aggregate view over a user's pipeline, shown on the portfolio page.
/// Money aggregates cover active deals only (anything not dead); the
/// closed count is tracked separately.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioStats {
    pub total_deals: usize,
    pub active_deals: usize,
    pub closed_deals: usize,
    pub total_projected_profit: f64,
    pub avg_cash_on_cash: f64,
    pub total_investment: f64,
    pub grade_counts: [usize; 4], // A, B, C, D
}

impl PortfolioStats {
    pub fn grade_count(&self, grade: DealGrade) -> usize {
        match grade {
            DealGrade::A => self.grade_counts[0],
            DealGrade::B => self.grade_counts[1],
            DealGrade::C => self.grade_counts[2],
            DealGrade::D => self.grade_counts[3],
        }
    }
}

pub fn portfolio_stats(deals: &[(Deal, Option<DealAnalysis>)]) -> PortfolioStats {
    let active: Vec<&(Deal, Option<DealAnalysis>)> = deals
        .iter()
        .filter(|(d, _)| d.status != DealStatus::Dead)
        .collect();
    let closed_deals = deals
        .iter()
        .filter(|(d, _)| d.status == DealStatus::Closed)
        .count();

    let mut total_projected_profit = 0.0;
    let mut total_investment = 0.0;
    let mut roi_sum = 0.0;
    let mut grade_counts = [0usize; 4];

    for (_, analysis) in &active {
        if let Some(a) = analysis {
            total_projected_profit += a.projected_profit;
            total_investment += a.total_investment;
            roi_sum += a.cash_on_cash_roi;
            grade_counts[4 - a.grade.rank() as usize] += 1;
        }
    }

    let avg_cash_on_cash = if active.is_empty() {
        0.0
    } else {
        roi_sum / active.len() as f64
    };

    PortfolioStats {
        total_deals: deals.len(),
        active_deals: active.len(),
        closed_deals,
        total_projected_profit,
        avg_cash_on_cash,
        total_investment,
        grade_counts,
    }
}
