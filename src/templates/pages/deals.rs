use crate::domain::analysis::DealAnalysis;
use crate::domain::deal::{Deal, DealStatus};
use crate::templates::{card, desktop_layout, grade_badge, money, percent, status_badge};
use maud::{html, Markup};

/// Sort order for the pipeline table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealSort {
    Newest,
    Profit,
    Grade,
}

impl DealSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealSort::Newest => "newest",
            DealSort::Profit => "profit",
            DealSort::Grade => "grade",
        }
    }

    /// Unknown values fall back to newest-first.
    pub fn parse(s: &str) -> Self {
        match s {
            "profit" => DealSort::Profit,
            "grade" => DealSort::Grade,
            _ => DealSort::Newest,
        }
    }

    pub const ALL: [DealSort; 3] = [DealSort::Newest, DealSort::Profit, DealSort::Grade];

    pub fn label(&self) -> &'static str {
        match self {
            DealSort::Newest => "Newest first",
            DealSort::Profit => "Projected profit",
            DealSort::Grade => "Grade",
        }
    }
}

pub struct DealsVm {
    pub rows: Vec<(Deal, Option<DealAnalysis>)>,
    pub filter: Option<DealStatus>,
    pub sort: DealSort,
}

pub fn deals_page(vm: &DealsVm) -> Markup {
    desktop_layout(
        "Deals",
        true,
        html! {
            main class="container" {
                h1 { "Deal Pipeline" }

                (filter_bar(vm))
                (deals_table(&vm.rows))
                (new_deal_form())
            }
        },
    )
}

fn filter_bar(vm: &DealsVm) -> Markup {
    html! {
        form action="/deals" method="get" style="display: flex; gap: 10px; align-items: center; margin-bottom: 1rem;" {
            label for="status" { "Status" }
            select name="status" id="status" style="padding: 6px;" {
                option value="" selected[vm.filter.is_none()] { "All" }
                @for status in DealStatus::ALL {
                    option value=(status.as_str()) selected[vm.filter == Some(status)] {
                        (status.label())
                    }
                }
            }

            label for="sort" { "Sort by" }
            select name="sort" id="sort" style="padding: 6px;" {
                @for sort in DealSort::ALL {
                    option value=(sort.as_str()) selected[vm.sort == sort] { (sort.label()) }
                }
            }

            button type="submit" style="padding: 6px 12px; cursor: pointer;" { "Apply" }
        }
    }
}

fn deals_table(rows: &[(Deal, Option<DealAnalysis>)]) -> Markup {
    html! {
        @if rows.is_empty() {
            p { "No deals yet. Add your first candidate below." }
        } @else {
            table style="width: 100%; border-collapse: collapse;" {
                thead {
                    tr {
                        th { "Address" }
                        th { "Status" }
                        th { "List" }
                        th { "ARV" }
                        th { "Rehab" }
                        th { "Profit" }
                        th { "CoC ROI" }
                        th { "Grade" }
                        th { "Buy box" }
                    }
                }
                tbody {
                    @for (deal, analysis) in rows {
                        tr {
                            td { a href=(format!("/deals/{}", deal.id)) { (deal.address) } }
                            td { (status_badge(deal.status)) }
                            td { (money(deal.list_price)) }
                            td { (money(deal.estimated_arv)) }
                            td { (money(deal.rehab_estimate)) }
                            @match analysis {
                                Some(a) => {
                                    td { (money(a.projected_profit)) }
                                    td { (percent(a.cash_on_cash_roi)) }
                                    td { (grade_badge(a.grade)) }
                                    td { @if a.meets_buy_box { "✓" } @else { "✗" } }
                                }
                                None => {
                                    td { "—" }
                                    td { "—" }
                                    td { "—" }
                                    td { "—" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn field(label: &str, name: &str, input_type: &str, required: bool) -> Markup {
    html! {
        div style="display: flex; flex-direction: column;" {
            label for=(name) { (label) }
            input type=(input_type) id=(name) name=(name) required[required] style="padding: 6px;";
        }
    }
}

fn new_deal_form() -> Markup {
    card(
        "Add a deal",
        html! {
            form action="/deals" method="post" {
                div style="display: grid; grid-template-columns: repeat(3, 1fr); gap: 12px;" {
                    (field("Address", "address", "text", true))
                    (field("Zip code", "zip_code", "text", false))
                    (field("List price ($)", "list_price", "number", true))
                    (field("Estimated ARV ($)", "estimated_arv", "number", false))
                    (field("Rehab estimate ($)", "rehab_estimate", "number", false))
                    (field("Square feet", "square_feet", "number", false))
                    (field("Bedrooms", "bedrooms", "number", false))
                    (field("Bathrooms", "bathrooms", "number", false))
                    (field("Days on market", "days_on_market", "number", false))
                }
                div style="margin-top: 12px; display: flex; flex-direction: column;" {
                    label for="notes" { "Notes" }
                    textarea id="notes" name="notes" rows="3" style="padding: 6px;" {}
                }
                button type="submit" style="margin-top: 12px; padding: 8px 16px; cursor: pointer;" {
                    "Add deal"
                }
            }
        },
    )
}
