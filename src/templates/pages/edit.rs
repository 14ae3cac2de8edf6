use crate::domain::ServiceRecord;
use crate::templates::{desktop_layout, status_badge};
use maud::{html, Markup};

pub fn edit_page(record: &ServiceRecord) -> Markup {
    desktop_layout(
        &format!("Edit #{}", record.id),
        true,
        html! {
            main class="container narrow" {
                section class="card" {
                    h1 { "Edit servis #" (record.id) }
                    p { "Status: " (status_badge(record.status)) }
                    form method="post" action=(format!("/services/{}", record.id)) id="edit-form" {
                        label { "Nama Pelanggan"
                            input type="text" name="customer_name" value=(record.customer_name) required;
                        }
                        label { "No. HP"
                            input type="tel" name="customer_phone" value=(record.customer_phone.as_deref().unwrap_or(""));
                        }
                        label { "Nama Barang"
                            input type="text" name="item_name" value=(record.item_name) required;
                        }
                        label { "Kerusakan"
                            textarea name="item_damage" { (record.item_damage.as_deref().unwrap_or("")) }
                        }
                        label {
                            input type="checkbox" name="high_priority" checked[record.high_priority];
                            " Prioritas tinggi"
                        }
                        button type="submit" { "Simpan" }
                        " "
                        a href="/" { "Kembali" }
                    }
                }
            }
        },
    )
}
