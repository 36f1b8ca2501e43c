pub mod buy_boxes;
pub mod check_email;
pub mod deal_detail;
pub mod deals;
pub mod home;
pub mod login;
pub mod portfolio;

pub use buy_boxes::buy_boxes_page;
pub use check_email::check_email_page;
pub use deal_detail::{deal_detail_page, DealDetailVm};
pub use deals::{deals_page, DealSort, DealsVm};
pub use home::{home_page, CalculatorVm};
pub use login::login_page;
pub use portfolio::{portfolio_page, PortfolioVm};
