use crate::domain::analysis::DealGrade;
use crate::domain::portfolio::PortfolioStats;
use crate::partner::SyncReport;
use crate::templates::{card, desktop_layout, grade_badge, money, percent};
use maud::{html, Markup};

pub struct PortfolioVm {
    pub stats: PortfolioStats,
    /// Closed deals not yet pushed to the wealth tracker.
    pub unsynced_closed: usize,
    /// Present right after a sync-all run.
    pub report: Option<SyncReport>,
}

pub fn portfolio_page(vm: &PortfolioVm) -> Markup {
    desktop_layout(
        "Portfolio",
        true,
        html! {
            main class="container" {
                h1 { "Portfolio" }

                @if let Some(report) = &vm.report {
                    (sync_report_card(report))
                }

                div style="display: grid; grid-template-columns: repeat(2, 1fr); gap: 12px;" {
                    (card("Pipeline", html! {
                        table {
                            tr { th { "Total deals" } td { (vm.stats.total_deals) } }
                            tr { th { "Active" } td { (vm.stats.active_deals) } }
                            tr { th { "Closed" } td { (vm.stats.closed_deals) } }
                        }
                    }))

                    (card("Returns (active deals)", html! {
                        table {
                            tr { th { "Projected profit" } td { (money(vm.stats.total_projected_profit)) } }
                            tr { th { "Total investment" } td { (money(vm.stats.total_investment)) } }
                            tr { th { "Avg cash-on-cash" } td { (percent(vm.stats.avg_cash_on_cash)) } }
                        }
                    }))

                    (card("Grades", html! {
                        table {
                            @for grade in [DealGrade::A, DealGrade::B, DealGrade::C, DealGrade::D] {
                                tr {
                                    th { (grade_badge(grade)) }
                                    td { (vm.stats.grade_count(grade)) }
                                }
                            }
                        }
                    }))

                    (card("Wealth tracker", html! {
                        @if vm.unsynced_closed == 0 {
                            p { "All closed deals are synced." }
                        } @else {
                            p {
                                strong { (vm.unsynced_closed) }
                                " closed deal(s) waiting to sync."
                            }
                            form action="/deals/sync-all" method="post" {
                                button type="submit" style="padding: 6px 12px; cursor: pointer;" {
                                    "Sync all closed deals"
                                }
                            }
                        }
                    }))
                }
            }
        },
    )
}

fn sync_report_card(report: &SyncReport) -> Markup {
    html! {
        section class="card" {
            h3 { "Sync results" }
            p {
                "Synced " strong { (report.synced) } ", failed " strong { (report.failed) } "."
            }
            @if !report.errors.is_empty() {
                ul {
                    @for err in &report.errors {
                        li style="color: #dc2626;" { (err) }
                    }
                }
            }
        }
    }
}
