use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn check_email_page(email: &str) -> Markup {
    desktop_layout(
        "Check your email",
        false,
        html! {
            main class="container narrow" {
                div class="card" {
                    h3 { "Check your email" }
                    p {
                        "We sent a sign-in link to "
                        strong { (email) }
                        "."
                    }
                    p { "Click the link in the email to sign in. It expires in 15 minutes." }
                    p {
                        a href="/login" { "Try with a different email" }
                    }
                }
            }
        },
    )
}
