mod auth_flow_tests;
mod buy_box_tests;
mod calculator_tests;
mod deals_tests;
mod portfolio_tests;
