use crate::domain::ServiceRecord;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use chrono::FixedOffset;
use rust_xlsxwriter::Workbook;

const HEADERS: [&str; 8] = [
    "ID", "Date", "Customer", "Phone", "Item", "Damage", "Status", "Priority",
];

fn xlsx_err(what: &str) -> impl Fn(rust_xlsxwriter::XlsxError) -> ServerError + '_ {
    move |e| ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}

/// Builds the workbook bytes for the given rows.
pub fn services_workbook(rows: &[ServiceRecord], utc_offset: FixedOffset) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(xlsx_err(header))?;
    }

    for (i, s) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let date = s
            .created_at
            .with_timezone(&utc_offset)
            .format("%Y-%m-%d %H:%M")
            .to_string();

        worksheet.write_number(r, 0, s.id as f64).map_err(xlsx_err("id"))?;
        worksheet.write_string(r, 1, &date).map_err(xlsx_err("date"))?;
        worksheet
            .write_string(r, 2, &s.customer_name)
            .map_err(xlsx_err("customer"))?;
        worksheet
            .write_string(r, 3, s.customer_phone.as_deref().unwrap_or(""))
            .map_err(xlsx_err("phone"))?;
        worksheet
            .write_string(r, 4, &s.item_name)
            .map_err(xlsx_err("item"))?;
        worksheet
            .write_string(r, 5, s.item_damage.as_deref().unwrap_or(""))
            .map_err(xlsx_err("damage"))?;
        worksheet
            .write_string(r, 6, s.status.label())
            .map_err(xlsx_err("status"))?;
        worksheet
            .write_string(r, 7, if s.high_priority { "High" } else { "" })
            .map_err(xlsx_err("priority"))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

pub fn export_services_xlsx(rows: &[ServiceRecord], utc_offset: FixedOffset, filename: &str) -> ResultResp {
    let buffer = services_workbook(rows, utc_offset)?;
    xlsx_response(buffer, filename)
}
