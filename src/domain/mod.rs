pub mod analysis;
pub mod deal;
pub mod estimator;
pub mod portfolio;

pub use analysis::{analyze_deal, DealAnalysis, DealGrade};
pub use deal::{BuyBox, Deal, DealStatus};
