use crate::domain::analysis::DealAnalysis;
use crate::domain::deal::{BuyBox, Deal, DealStatus};
use crate::partner::PreQualification;
use crate::templates::{card, desktop_layout, grade_badge, money, percent, status_badge};
use chrono::{TimeZone, Utc};
use maud::{html, Markup};

pub struct DealDetailVm {
    pub deal: Deal,
    pub analysis: Option<DealAnalysis>,
    /// Which buy box produced the stored analysis, if any.
    pub analyzed_against: Option<String>,
    pub buy_boxes: Vec<BuyBox>,
    /// Present only right after a pre-qualification check.
    pub prequal: Option<PreQualification>,
    pub flash: Option<String>,
}

pub fn deal_detail_page(vm: &DealDetailVm) -> Markup {
    desktop_layout(
        &vm.deal.address,
        true,
        html! {
            main class="container" {
                h1 { (vm.deal.address) " " (status_badge(vm.deal.status)) }

                @if let Some(msg) = &vm.flash {
                    p style="color: #10b981; font-weight: bold;" { (msg) }
                }

                div style="display: grid; grid-template-columns: repeat(2, 1fr); gap: 12px;" {
                    (property_card(&vm.deal))
                    (analysis_card(vm))
                    (status_card(&vm.deal))
                    (partner_card(vm))
                }
            }
        },
    )
}

fn property_card(deal: &Deal) -> Markup {
    card(
        "Property",
        html! {
            table {
                tr { th { "List price" } td { (money(deal.list_price)) } }
                tr { th { "Estimated ARV" } td { (money(deal.estimated_arv)) } }
                tr { th { "Rehab estimate" } td { (money(deal.rehab_estimate)) } }
                @if let Some(sqft) = deal.square_feet {
                    tr { th { "Square feet" } td { (sqft) } }
                }
                @if let Some(beds) = deal.bedrooms {
                    tr { th { "Beds / baths" } td { (beds) " / " (deal.bathrooms.unwrap_or(0.0)) } }
                }
                @if let Some(dom) = deal.days_on_market {
                    tr { th { "Days on market" } td { (dom) } }
                }
            }
            @if let Some(notes) = &deal.notes {
                p { (notes) }
            }
        },
    )
}

fn analysis_card(vm: &DealDetailVm) -> Markup {
    card(
        "Analysis",
        html! {
            @if let Some(a) = &vm.analysis {
                @if let Some(name) = &vm.analyzed_against {
                    p { "Against buy box " strong { (name) } }
                }
                table {
                    tr { th { "Grade" } td { (grade_badge(a.grade)) } }
                    tr { th { "70% rule max offer" } td { (money(a.max_offer_70_percent)) } }
                    tr { th { "Total investment" } td { (money(a.total_investment)) } }
                    tr { th { "Projected profit" } td { (money(a.projected_profit)) } }
                    tr { th { "Cash-on-cash ROI" } td { (percent(a.cash_on_cash_roi)) } }
                    tr { th { "Annualized ROI" } td { (percent(a.annualized_roi)) } }
                    tr { th { "Holding costs" } td { (money(a.holding_costs)) } }
                    tr { th { "Hard money costs" } td { (money(a.hard_money_costs)) } }
                    tr { th { "Selling costs" } td { (money(a.selling_costs)) } }
                    tr {
                        th { "Meets buy box" }
                        td {
                            @if a.meets_buy_box {
                                span style="color: #10b981; font-weight: bold;" { "Yes" }
                            } @else {
                                span style="color: #dc2626; font-weight: bold;" { "No" }
                            }
                        }
                    }
                }
            } @else {
                p { "Not analyzed yet." }
            }

            @if vm.buy_boxes.is_empty() {
                p { a href="/buy-boxes" { "Create a buy box" } " to analyze this deal." }
            } @else {
                form action=(format!("/deals/{}/analyze", vm.deal.id)) method="post"
                    style="display: flex; gap: 10px; align-items: center; margin-top: 10px;" {
                    label for="buy_box_id" { "Buy box" }
                    select name="buy_box_id" id="buy_box_id" style="padding: 6px;" {
                        @for bb in &vm.buy_boxes {
                            option value=(bb.id) selected[bb.is_default] {
                                (bb.name)
                                @if bb.is_default { " (default)" }
                            }
                        }
                    }
                    button type="submit" style="padding: 6px 12px; cursor: pointer;" { "Analyze" }
                }
            }
        },
    )
}

fn status_card(deal: &Deal) -> Markup {
    card(
        "Status",
        html! {
            form action=(format!("/deals/{}/status", deal.id)) method="post"
                style="display: flex; gap: 10px; align-items: center;" {
                select name="status" style="padding: 6px;" {
                    @for status in DealStatus::ALL {
                        option value=(status.as_str()) selected[deal.status == status] {
                            (status.label())
                        }
                    }
                }
                button type="submit" style="padding: 6px 12px; cursor: pointer;" { "Update" }
            }

            form action=(format!("/deals/{}/delete", deal.id)) method="post" style="margin-top: 10px;" {
                button type="submit" style="background-color: #dc2626; color: white; padding: 6px 12px; border: none; border-radius: 4px; cursor: pointer;" {
                    "Delete deal"
                }
            }
        },
    )
}

fn partner_card(vm: &DealDetailVm) -> Markup {
    let deal = &vm.deal;
    card(
        "Wealth & lending",
        html! {
            @match deal.synced_at {
                Some(ts) => {
                    p {
                        "Synced to wealth tracker on "
                        (Utc.timestamp_opt(ts, 0).single().map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default())
                    }
                }
                None => {
                    @if deal.status == DealStatus::Closed {
                        form action=(format!("/deals/{}/sync", deal.id)) method="post" {
                            button type="submit" style="padding: 6px 12px; cursor: pointer;" {
                                "Sync to wealth tracker"
                            }
                        }
                    } @else {
                        p { "Close the deal to sync it to your wealth tracker." }
                    }
                }
            }

            @if let Some(app_id) = &deal.loan_application_id {
                p { "Loan application " strong { (app_id) } " submitted." }
            } @else {
                form action=(format!("/deals/{}/prequal", deal.id)) method="post" style="margin-top: 10px;" {
                    button type="submit" style="padding: 6px 12px; cursor: pointer;" {
                        "Check loan pre-qualification"
                    }
                }
            }

            @if let Some(pq) = &vm.prequal {
                @if pq.eligible {
                    p style="color: #10b981; font-weight: bold;" {
                        "Pre-qualified at " (percent(pq.ltv_ratio)) " LTV, up to "
                        (money(pq.max_loan_amount.unwrap_or(0.0)))
                    }
                    form action=(format!("/deals/{}/apply", deal.id)) method="post"
                        style="display: flex; gap: 10px; align-items: center; margin-top: 10px;" {
                        label for="loan_amount" { "Loan amount ($)" }
                        input type="number" id="loan_amount" name="loan_amount"
                            value=(pq.max_loan_amount.unwrap_or(0.0)) step="1000" style="padding: 6px;";
                        button type="submit" style="padding: 6px 12px; cursor: pointer;" { "Apply" }
                    }
                } @else {
                    p style="color: #dc2626;" {
                        "Not pre-qualified: "
                        (pq.reason.as_deref().unwrap_or("ineligible"))
                    }
                }
            }
        },
    )
}
