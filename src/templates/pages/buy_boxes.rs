use crate::domain::deal::BuyBox;
use crate::templates::{card, desktop_layout, money, percent};
use maud::{html, Markup};

pub fn buy_boxes_page(boxes: &[BuyBox]) -> Markup {
    desktop_layout(
        "Buy Boxes",
        true,
        html! {
            main class="container" {
                h1 { "Buy Boxes" }
                p class="lead" {
                    "Acceptance criteria for your deals. One box is the default used by analysis."
                }

                @if boxes.is_empty() {
                    p { "No buy boxes yet. Create one below." }
                } @else {
                    @for bb in boxes {
                        (buy_box_card(bb))
                    }
                }

                (new_buy_box_form())
            }
        },
    )
}

fn buy_box_card(bb: &BuyBox) -> Markup {
    html! {
        section class="card" {
            h3 {
                (bb.name)
                @if bb.is_default {
                    " "
                    span style="background-color: #3b82f6; color: white; padding: 2px 8px; border-radius: 4px; font-size: 0.8em;" {
                        "default"
                    }
                }
            }
            table {
                @if let Some(max_price) = bb.max_purchase_price {
                    tr { th { "Max purchase price" } td { (money(max_price)) } }
                }
                tr { th { "Min cash-on-cash" } td { (percent(bb.min_cash_on_cash)) } }
                tr { th { "Max rehab budget" } td { (money(bb.max_rehab_budget)) } }
                tr { th { "Holding period" } td { (bb.holding_period_months) " months" } }
                tr { th { "Target profit" } td { (money(bb.target_profit_min)) } }
                tr { th { "Hard money rate" } td { (percent(bb.hard_money_rate)) } }
                tr { th { "Points" } td { (percent(bb.hard_money_points)) } }
                tr { th { "Selling costs" } td { (percent(bb.selling_costs_percent)) " of ARV" } }
            }
            div style="display: flex; gap: 10px;" {
                @if !bb.is_default {
                    form action=(format!("/buy-boxes/{}/default", bb.id)) method="post" {
                        button type="submit" style="padding: 6px 12px; cursor: pointer;" {
                            "Make default"
                        }
                    }
                }
                form action=(format!("/buy-boxes/{}/delete", bb.id)) method="post" {
                    button type="submit" style="background-color: #dc2626; color: white; padding: 6px 12px; border: none; border-radius: 4px; cursor: pointer;" {
                        "Delete"
                    }
                }
            }
        }
    }
}

fn field(label: &str, name: &str, value: &str, required: bool) -> Markup {
    html! {
        div style="display: flex; flex-direction: column;" {
            label for=(name) { (label) }
            input type="number" id=(name) name=(name) value=(value) step="any" required[required]
                style="padding: 6px;";
        }
    }
}

fn new_buy_box_form() -> Markup {
    card(
        "New buy box",
        html! {
            form action="/buy-boxes" method="post" {
                div style="display: flex; flex-direction: column; margin-bottom: 12px;" {
                    label for="name" { "Name" }
                    input type="text" id="name" name="name" required placeholder="Austin SFH"
                        style="padding: 6px;";
                }
                div style="display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px;" {
                    (field("Max purchase price ($)", "max_purchase_price", "", false))
                    (field("Min cash-on-cash (%)", "min_cash_on_cash", "15", true))
                    (field("Max rehab budget ($)", "max_rehab_budget", "80000", true))
                    (field("Holding period (months)", "holding_period_months", "6", true))
                    (field("Target profit ($)", "target_profit_min", "30000", true))
                    (field("Hard money rate (%)", "hard_money_rate", "12", true))
                    (field("Points (%)", "hard_money_points", "2", true))
                    (field("Selling costs (% of ARV)", "selling_costs_percent", "6", true))
                }
                button type="submit" style="margin-top: 12px; padding: 8px 16px; cursor: pointer;" {
                    "Create buy box"
                }
            }
        },
    )
}
