use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn login_page(error: Option<&str>) -> Markup {
    desktop_layout(
        "Login",
        false,
        html! {
            main class="container narrow" {
                section class="card" {
                    h1 { "Login" }
                    @if let Some(err) = error {
                        div class="banner banner-error" role="alert" { (err) }
                    }
                    form method="post" action="/login" {
                        label for="password" { "Password" }
                        input type="password" id="password" name="password" autocomplete="current-password" required autofocus;
                        button type="submit" { "Masuk" }
                    }
                }
            }
        },
    )
}
