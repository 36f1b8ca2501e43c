// src/domain/estimator.rs
//
// The standalone single-page calculator. This is a second, independent
// formula set from `analysis.rs` (different holding-cost and profit
// assumptions); the two are deliberately not unified.

/// Raw calculator inputs, already coerced to numbers (malformed form input
/// is treated as zero by the parsing layer).
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorInput {
    pub purchase_price: f64,
    /// Manual ARV override; wins when positive.
    pub arv_manual: f64,
    /// Third-party estimates (Zillow, Redfin, Realtor); zeros are ignored.
    pub estimates: [f64; 3],
    /// Comparable sale prices entered by hand; zeros are ignored.
    pub comp_prices: Vec<f64>,
    pub rehab: f64,
    /// Loan-to-cost, percent.
    pub ltc: f64,
    /// Annual interest rate, percent.
    pub interest_rate: f64,
    pub hold_months: f64,
    pub buying_costs: f64,
    /// Selling commission, percent of ARV.
    pub commission: f64,
    pub selling_costs: f64,
}

impl Default for EstimatorInput {
    fn default() -> Self {
        Self {
            purchase_price: 0.0,
            arv_manual: 0.0,
            estimates: [0.0; 3],
            comp_prices: Vec::new(),
            rehab: 0.0,
            ltc: 80.0,
            interest_rate: 12.0,
            hold_months: 5.0,
            buying_costs: 0.0,
            commission: 6.0,
            selling_costs: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuickEstimate {
    pub arv: f64,
    pub rehab_with_contingency: f64,
    pub mao_70: f64,
    pub mao_50k_profit: f64,
    pub max_recommended: f64,
    pub loan_amount: f64,
    pub total_interest: f64,
    pub selling_commission: f64,
    pub profit: f64,
    pub roi: f64,
    pub wholesale_spread: f64,
    pub wholesale_viable: bool,
    pub flip_viable: bool,
}

impl QuickEstimate {
    /// GO iff at least one exit strategy clears its threshold.
    pub fn is_go(&self) -> bool {
        self.wholesale_viable || self.flip_viable
    }
}

/// Rehab contingency buffer, fixed at 10%.
const CONTINGENCY: f64 = 0.10;

/// Flat target profit backing the second MAO.
const TARGET_PROFIT: f64 = 50_000.0;

/// Minimum assignment spread for a wholesale exit.
const WHOLESALE_MIN_SPREAD: f64 = 15_000.0;

/// Flip exit thresholds.
const FLIP_MIN_PROFIT: f64 = 50_000.0;
const FLIP_MIN_ROI: f64 = 20.0;

/// ARV resolution order: manual override, then the mean of the provided
/// third-party estimates, then the mean of the entered comps, then zero.
pub fn resolve_arv(input: &EstimatorInput) -> f64 {
    if input.arv_manual > 0.0 {
        return input.arv_manual;
    }
    let estimates: Vec<f64> = input.estimates.iter().copied().filter(|e| *e > 0.0).collect();
    if !estimates.is_empty() {
        return estimates.iter().sum::<f64>() / estimates.len() as f64;
    }
    let comps: Vec<f64> = input.comp_prices.iter().copied().filter(|p| *p > 0.0).collect();
    if !comps.is_empty() {
        return comps.iter().sum::<f64>() / comps.len() as f64;
    }
    0.0
}

pub fn estimate(input: &EstimatorInput) -> QuickEstimate {
    let arv = resolve_arv(input);

    let pp = input.purchase_price;
    let rehab = input.rehab;
    let rehab_with_contingency = rehab * (1.0 + CONTINGENCY);

    let mao_70 = (arv * 0.7 - rehab).max(0.0);

    let loan_amount = (pp + rehab) * (input.ltc / 100.0);
    let monthly_interest = loan_amount * (input.interest_rate / 100.0) / 12.0;
    let total_interest = monthly_interest * input.hold_months;

    let selling_commission = arv * input.commission / 100.0;

    let profit = arv
        - pp
        - rehab_with_contingency
        - total_interest
        - input.buying_costs
        - selling_commission
        - input.selling_costs;
    let roi = if pp > 0.0 { profit / pp * 100.0 } else { 0.0 };

    let mao_50k_profit = (arv
        - rehab
        - total_interest
        - input.buying_costs
        - selling_commission
        - input.selling_costs
        - TARGET_PROFIT)
        .max(0.0);

    let wholesale_spread = arv - mao_70;
    let wholesale_viable = wholesale_spread >= WHOLESALE_MIN_SPREAD;
    let flip_viable = profit >= FLIP_MIN_PROFIT && roi >= FLIP_MIN_ROI;

    QuickEstimate {
        arv,
        rehab_with_contingency,
        mao_70,
        mao_50k_profit,
        max_recommended: mao_70.min(mao_50k_profit),
        loan_amount,
        total_interest,
        selling_commission,
        profit,
        roi,
        wholesale_spread,
        wholesale_viable,
        flip_viable,
    }
}
