use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Confirmation step for a state-changing form.
///
/// `fields` are re-posted as hidden inputs together with `confirm=yes`.
pub fn confirm_page(prompt: &str, action: &str, fields: &[(&str, String)]) -> Markup {
    desktop_layout(
        "Konfirmasi",
        true,
        html! {
            main class="container narrow" {
                section class="card" id="confirm" {
                    h1 { "Konfirmasi" }
                    p class="prompt" { (prompt) }
                    form method="post" action=(action) class="inline" {
                        @for (name, value) in fields {
                            input type="hidden" name=(name) value=(value);
                        }
                        input type="hidden" name="confirm" value="yes";
                        button type="submit" { "Ya, lanjutkan" }
                    }
                    " "
                    a href="/" { "Batal" }
                }
            }
        },
    )
}
