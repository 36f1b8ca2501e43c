use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn login_page(error: Option<&str>) -> Markup {
    desktop_layout(
        "Sign in",
        false,
        html! {
            main class="container narrow" {
                h1 { "Sign in" }
                p class="lead" {
                    "Enter your email and we'll send you a secure sign-in link."
                }

                @if let Some(msg) = error {
                    p style="color: #dc2626; font-weight: bold;" { (msg) }
                }

                form method="post" action="/auth/request-link" class="email-cta" {
                    label class="sr-only" for="email" { "Email address" }
                    input
                        type="email"
                        id="email"
                        name="email"
                        placeholder="you@domain.com"
                        autocomplete="email"
                        required;

                    button type="submit" class="primary" { "Get sign-in link" }

                    p class="microcopy" {
                        "We'll email you a secure sign-in link. No password needed."
                    }
                }
            }
        },
    )
}
