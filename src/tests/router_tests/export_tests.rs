use crate::tests::utils::{body_bytes, get, header, login, test_app};
use crate::view_model::Reconcile;

#[test]
fn export_downloads_current_tab_as_xlsx() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);

    let resp = get(&t.app, "/services/export.xlsx?tab=history&q=budi", Some(&cookie)).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        header(&resp, "Content-Type"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = header(&resp, "Content-Disposition");
    assert!(disposition.starts_with("attachment; filename=\"servis_history_"));
    assert!(disposition.ends_with(".xlsx\""));

    // xlsx is a zip container
    let bytes = body_bytes(resp);
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn export_of_empty_view_still_produces_a_workbook() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);

    let resp = get(&t.app, "/services/export.xlsx?q=tidak-ada", Some(&cookie)).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(header(&resp, "Content-Disposition").contains("servis_active_"));
    assert!(!body_bytes(resp).is_empty());
}
