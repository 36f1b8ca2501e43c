// templates/pages/home.rs
//
// The public quick-offer calculator. Results are computed from the query
// string so the page stays a plain GET form with shareable URLs.

use crate::domain::estimator::{EstimatorInput, QuickEstimate};
use crate::estimates::{arv_from_comps, CompSale, PropertyRecord};
use crate::templates::{card, desktop_layout, money, percent};
use maud::{html, Markup};

pub struct CalculatorVm {
    pub input: EstimatorInput,
    /// None until the form is submitted at least once.
    pub result: Option<QuickEstimate>,
    pub lookup_address: String,
    pub lookup: Option<PropertyRecord>,
    pub comps: Vec<CompSale>,
    pub lookup_error: Option<String>,
    pub logged_in: bool,
}

pub fn home_page(vm: &CalculatorVm) -> Markup {
    desktop_layout(
        "Quick Offer Calculator",
        vm.logged_in,
        html! {
            main class="container" {
                h1 { "Quick Offer Calculator" }
                p class="lead" {
                    "Run the numbers on a potential flip before committing it to your pipeline."
                }

                (lookup_card(vm))
                (calculator_form(&vm.input))

                @if let Some(result) = &vm.result {
                    (results_section(result))
                }
            }
        },
    )
}

fn lookup_card(vm: &CalculatorVm) -> Markup {
    card(
        "Property lookup",
        html! {
            form action="/lookup" method="get" style="display: flex; gap: 10px; align-items: center;" {
                label class="sr-only" for="address" { "Property address" }
                input
                    type="text"
                    id="address"
                    name="address"
                    value=(vm.lookup_address)
                    placeholder="123 Main St, Austin, TX 78701"
                    style="flex: 1; padding: 8px;";
                button type="submit" style="padding: 8px 16px; cursor: pointer;" { "Look up" }
            }

            @if let Some(msg) = &vm.lookup_error {
                p style="color: #dc2626;" { (msg) }
            }

            @if let Some(record) = &vm.lookup {
                table {
                    tr { th { "Address" } td { (record.address) } }
                    tr { th { "List price" } td { (money(record.price)) } }
                    @if let Some(estimate) = record.estimate {
                        tr { th { "Estimated value" } td { (money(estimate)) } }
                    }
                    @if let Some(beds) = record.bedrooms {
                        tr { th { "Beds / baths" }
                            td { (beds) " / " (record.bathrooms.unwrap_or(0.0)) } }
                    }
                    @if let Some(sqft) = record.living_area {
                        tr { th { "Square feet" } td { (sqft) } }
                    }
                    @if let Some(kind) = &record.property_type {
                        tr { th { "Type" } td { (kind) } }
                    }
                    @if let Some(year) = record.year_built {
                        tr { th { "Year built" } td { (year) } }
                    }
                    @if let Some(dom) = record.days_on_market {
                        tr { th { "Days on market" } td { (dom) } }
                    }
                }
            }

            @if !vm.comps.is_empty() {
                h4 { "Comparable sales" }
                table {
                    @for comp in &vm.comps {
                        tr {
                            th { (comp.address) }
                            td { (money(comp.sale_price)) }
                            td {
                                @if let Some(sqft) = comp.sqft { (sqft) " sqft" }
                            }
                            td {
                                @if let Some(date) = &comp.sale_date { (date) }
                            }
                        }
                    }
                    tr {
                        th { "Mean of comps" }
                        td { strong { (money(arv_from_comps(&vm.comps))) } }
                    }
                }
            }
        },
    )
}

fn number_field(label: &str, name: &str, value: f64, step: &str) -> Markup {
    html! {
        div style="display: flex; flex-direction: column;" {
            label for=(name) { (label) }
            input
                type="number"
                id=(name)
                name=(name)
                value=(value)
                step=(step)
                style="padding: 6px;";
        }
    }
}

fn calculator_form(input: &EstimatorInput) -> Markup {
    card(
        "Deal inputs",
        html! {
            form action="/" method="get" {
                div style="display: grid; grid-template-columns: repeat(3, 1fr); gap: 12px;" {
                    (number_field("Purchase price ($)", "purchase_price", input.purchase_price, "1000"))
                    (number_field("Rehab estimate ($)", "rehab", input.rehab, "1000"))
                    (number_field("ARV override ($)", "arv", input.arv_manual, "1000"))

                    (number_field("Zillow estimate ($)", "estimate1", input.estimates[0], "1000"))
                    (number_field("Redfin estimate ($)", "estimate2", input.estimates[1], "1000"))
                    (number_field("Realtor estimate ($)", "estimate3", input.estimates[2], "1000"))

                    (number_field("Loan-to-cost (%)", "ltc", input.ltc, "1"))
                    (number_field("Interest rate (%)", "interest_rate", input.interest_rate, "0.25"))
                    (number_field("Hold (months)", "hold_months", input.hold_months, "1"))

                    (number_field("Buying costs ($)", "buying_costs", input.buying_costs, "500"))
                    (number_field("Commission (%)", "commission", input.commission, "0.5"))
                    (number_field("Other selling costs ($)", "selling_costs", input.selling_costs, "500"))
                }

                div style="margin-top: 12px;" {
                    label for="comps" { "Comp sale prices (comma separated, used when no ARV or estimates)" }
                    input
                        type="text"
                        id="comps"
                        name="comps"
                        value=(comps_value(&input.comp_prices))
                        placeholder="825000, 795000, 850000"
                        style="width: 100%; padding: 6px;";
                }

                input type="hidden" name="run" value="1";
                button type="submit" style="margin-top: 12px; padding: 8px 16px; cursor: pointer;" {
                    "Run the numbers"
                }
            }
        },
    )
}

fn comps_value(prices: &[f64]) -> String {
    prices
        .iter()
        .map(|p| format!("{p}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn results_section(result: &QuickEstimate) -> Markup {
    let verdict = if result.is_go() { "GO" } else { "NO-GO" };
    let verdict_color = if result.is_go() { "#10b981" } else { "#dc2626" };

    html! {
        section class="card" {
            h2 {
                "Verdict: "
                span style=(format!("color: {verdict_color};")) { (verdict) }
            }

            div style="display: grid; grid-template-columns: repeat(2, 1fr); gap: 12px;" {
                (card("Offer ceilings", html! {
                    table {
                        tr { th { "ARV used" } td { (money(result.arv)) } }
                        tr { th { "70% rule MAO" } td { (money(result.mao_70)) } }
                        tr { th { "$50k-profit MAO" } td { (money(result.mao_50k_profit)) } }
                        tr {
                            th { "Max recommended offer" }
                            td { strong { (money(result.max_recommended)) } }
                        }
                    }
                }))

                (card("Financing", html! {
                    table {
                        tr { th { "Rehab + 10% contingency" } td { (money(result.rehab_with_contingency)) } }
                        tr { th { "Loan amount" } td { (money(result.loan_amount)) } }
                        tr { th { "Total interest" } td { (money(result.total_interest)) } }
                        tr { th { "Selling commission" } td { (money(result.selling_commission)) } }
                    }
                }))

                (card("Flip exit", html! {
                    table {
                        tr { th { "Projected profit" } td { (money(result.profit)) } }
                        tr { th { "ROI" } td { (percent(result.roi)) } }
                    }
                    @if result.flip_viable {
                        p style="color: #10b981; font-weight: bold;" { "Viable flip" }
                    } @else {
                        p style="color: #dc2626;" { "Below flip thresholds ($50k profit, 20% ROI)" }
                    }
                }))

                (card("Wholesale exit", html! {
                    table {
                        tr { th { "Assignment spread" } td { (money(result.wholesale_spread)) } }
                    }
                    @if result.wholesale_viable {
                        p style="color: #10b981; font-weight: bold;" { "Viable wholesale" }
                    } @else {
                        p style="color: #dc2626;" { "Spread under $15k" }
                    }
                }))
            }
        }
    }
}
