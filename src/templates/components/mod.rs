use maud::{html, Markup};

use crate::domain::analysis::{format_currency, format_percent, DealGrade};
use crate::domain::deal::DealStatus;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// Dollar amount, grouped and rounded. Non-finite values render as a dash.
pub fn money(amount: f64) -> Markup {
    html! { (format_currency(amount)) }
}

pub fn percent(value: f64) -> Markup {
    html! { (format_percent(value)) }
}

pub fn grade_badge(grade: DealGrade) -> Markup {
    let color = match grade {
        DealGrade::A => "#10b981",
        DealGrade::B => "#3b82f6",
        DealGrade::C => "#f59e0b",
        DealGrade::D => "#dc2626",
    };
    html! {
        span style=(format!("background-color: {color}; color: white; padding: 2px 8px; border-radius: 4px; font-weight: bold;")) {
            (grade.as_str())
        }
    }
}

pub fn status_badge(status: DealStatus) -> Markup {
    let color = match status {
        DealStatus::Lead => "#6b7280",
        DealStatus::Analyzed => "#3b82f6",
        DealStatus::Offered => "#8b5cf6",
        DealStatus::UnderContract => "#f59e0b",
        DealStatus::Closed => "#10b981",
        DealStatus::Dead => "#dc2626",
    };
    html! {
        span style=(format!("background-color: {color}; color: white; padding: 2px 8px; border-radius: 4px; font-size: 0.85em;")) {
            (status.label())
        }
    }
}
