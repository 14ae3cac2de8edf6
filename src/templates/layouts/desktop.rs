use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; background: #f9fafb; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; background: #fff; box-shadow: 0 1px 2px rgba(0,0,0,.08); }
main.container { max-width: 1100px; margin: 1.5rem auto; padding: 0 1rem; }
main.narrow { max-width: 420px; }
.card { background: #fff; border-radius: 8px; padding: 1rem 1.25rem; margin-bottom: 1.5rem; box-shadow: 0 1px 2px rgba(0,0,0,.06); }
.banner { padding: 0.6rem 1rem; border-radius: 6px; margin-bottom: 0.75rem; background: #e0f2fe; }
.banner-error { background: #fee2e2; color: #991b1b; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 8px; border-bottom: 1px solid #e5e7eb; text-align: left; vertical-align: top; }
.tabs a { margin-right: 1rem; }
.tabs a.current { font-weight: bold; text-decoration: none; }
.badge { padding: 2px 8px; border-radius: 10px; font-size: 0.85em; background: #e5e7eb; }
.status-done { background: #dcfce7; } .status-picked-up { background: #d1fae5; } .status-cancelled { background: #fee2e2; }
.status-in-progress { background: #fef9c3; } .status-inspection { background: #e0e7ff; }
.priority { color: #b91c1c; font-weight: bold; }
form.inline { display: inline-flex; gap: 4px; margin: 0; }
.danger { background: #dc3545; color: #fff; border: none; border-radius: 4px; padding: 4px 10px; cursor: pointer; }
"#;

pub fn desktop_layout(title: &str, logged_in: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="id" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | Servis Toko" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                header {
                    h3 { a href="/" { "Daftar Servis Toko" } }
                    @if logged_in {
                        form method="post" action="/logout" class="inline" {
                            button type="submit" class="danger" { "Logout" }
                        }
                    }
                }
                (content)
            }
        }
    }
}
