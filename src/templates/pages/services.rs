use crate::domain::{ServiceRecord, ServiceStatus, Tab};
use crate::forms::ListParams;
use crate::templates::{card, desktop_layout, notices, status_badge};
use chrono::FixedOffset;
use maud::{html, Markup};

pub struct ServicesVm<'a> {
    pub params: &'a ListParams,
    pub rows: &'a [ServiceRecord],
    pub active_count: usize,
    pub history_count: usize,
    pub load_error: Option<&'a str>,
    pub notices: &'a [String],
    pub utc_offset: FixedOffset,
}

pub fn services_page(vm: &ServicesVm) -> Markup {
    desktop_layout(
        "Daftar Servis",
        true,
        html! {
            main class="container" {
                (notices(vm.load_error, vm.notices))
                (card("Servis Baru", intake_form()))
                (filter_bar(vm.params))
                (tabs(vm))
                (service_table(vm))
            }
        },
    )
}

fn intake_form() -> Markup {
    html! {
        form method="post" action="/services" id="intake-form" {
            input type="text" name="customer_name" placeholder="Nama Pelanggan" required;
            input type="tel" name="customer_phone" placeholder="No. HP";
            input type="text" name="item_name" placeholder="Nama Barang" required;
            input type="text" name="item_damage" placeholder="Kerusakan";
            label { input type="checkbox" name="high_priority"; " Prioritas tinggi" }
            button type="submit" { "Tambah Servis" }
        }
    }
}

fn filter_bar(params: &ListParams) -> Markup {
    let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
    html! {
        form method="get" action="/" id="filters" class="card" {
            input type="search" name="q" value=(params.query) placeholder="Cari nama, barang, atau ID";
            @for st in ServiceStatus::ALL {
                label {
                    input type="checkbox" name="status" value=(st.label()) checked[params.facets.statuses.contains(&st)];
                    " " (st.label())
                }
            }
            label { "Dari " input type="date" name="from" value=(date(params.facets.start_date)); }
            label { "Sampai " input type="date" name="to" value=(date(params.facets.end_date)); }
            input type="hidden" name="tab" value=(params.tab.as_str());
            button type="submit" { "Filter" }
            " "
            a href="/" { "Reset" }
            " "
            a href=(format!("/services/export.xlsx?{}", params.to_query_string(params.tab))) { "Export XLSX" }
        }
        form method="post" action="/services/refresh" class="inline" {
            button type="submit" { "Muat ulang" }
        }
    }
}

fn tabs(vm: &ServicesVm) -> Markup {
    let link = |tab: Tab, label: &str, count: usize| {
        html! {
            a href=(format!("/?{}", vm.params.to_query_string(tab)))
              class=[(vm.params.tab == tab).then_some("current")]
              data-tab=(tab.as_str())
            { (label) " (" (count) ")" }
        }
    };
    html! {
        nav class="tabs" {
            (link(Tab::Active, "Aktif", vm.active_count))
            (link(Tab::History, "Riwayat", vm.history_count))
        }
    }
}

fn service_table(vm: &ServicesVm) -> Markup {
    html! {
        table id="services" {
            thead {
                tr {
                    th { "ID" }
                    th { "Tanggal" }
                    th { "Pelanggan" }
                    th { "Barang" }
                    th { "Kerusakan" }
                    th { "Status" }
                    th { "Aksi" }
                }
            }
            tbody {
                @if vm.rows.is_empty() {
                    tr class="empty" { td colspan="7" { "Tidak ada data servis." } }
                }
                @for s in vm.rows {
                    tr data-id=(s.id) class=[s.high_priority.then_some("high-priority")] {
                        td { (s.id) }
                        td { (s.created_at.with_timezone(&vm.utc_offset).format("%d/%m/%Y")) }
                        td {
                            span class="customer" { (s.customer_name) }
                            @if let Some(phone) = &s.customer_phone {
                                br; small { (phone) }
                            }
                        }
                        td {
                            @if s.high_priority { span class="priority" title="Prioritas tinggi" { "! " } }
                            (s.item_name)
                        }
                        td { (s.item_damage.as_deref().unwrap_or("")) }
                        td { (status_badge(s.status)) }
                        td {
                            (status_form(s))
                            a href=(format!("/services/{}/edit", s.id)) { "Edit" }
                            " "
                            form method="post" action=(format!("/services/{}/delete", s.id)) class="inline" {
                                button type="submit" class="danger" { "Hapus" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Only statuses the policy could accept are offered; the server still
/// checks every request.
fn status_form(s: &ServiceRecord) -> Markup {
    html! {
        form method="post" action=(format!("/services/{}/status", s.id)) class="inline status-form" {
            select name="status" class="status-select" {
                @for st in ServiceStatus::ALL {
                    @if st == s.status || st.rank() >= s.status.rank() && !s.status.is_terminal() {
                        option value=(st.label()) selected[st == s.status] { (st.label()) }
                    }
                }
            }
            button type="submit" { "Ubah" }
        }
    }
}
