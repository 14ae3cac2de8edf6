use crate::domain::ServiceStatus;
use crate::errors::ServerError;
use crate::tests::utils::{
    attrs, body_string, get, header, login, post_form, test_app, texts, TestApp,
};
use crate::view_model::Reconcile;

fn stored_status(t: &TestApp, id: i64) -> ServiceStatus {
    t.store
        .snapshot()
        .iter()
        .find(|r| r.id == id)
        .map(|r| r.status)
        .unwrap()
}

fn list(t: &TestApp, cookie: &str, uri: &str) -> String {
    body_string(get(&t.app, uri, Some(cookie)).unwrap())
}

#[test]
fn forward_change_asks_for_confirmation_first() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);
    list(&t, &cookie, "/");
    let before = t.store.calls();

    let resp = post_form(&t.app, "/services/1/status", "status=Pengecekan", Some(&cookie)).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    let prompt = texts(&body, "#confirm p.prompt");
    assert_eq!(prompt, vec!["Ubah status dari Masuk ke Pengecekan?"]);
    assert_eq!(attrs(&body, "#confirm form", "action"), vec!["/services/1/status"]);
    assert_eq!(attrs(&body, "#confirm input[name=status]", "value"), vec!["Pengecekan"]);
    assert_eq!(t.store.calls(), before);
    assert_eq!(stored_status(&t, 1), ServiceStatus::Intake);
}

#[test]
fn confirmed_change_is_saved_and_shown() {
    for reconcile in [Reconcile::Patch, Reconcile::Refetch] {
        let t = test_app(reconcile);
        let cookie = login(&t.app);

        let resp = post_form(
            &t.app,
            "/services/3/status",
            "status=Selesai&confirm=yes",
            Some(&cookie),
        )
        .unwrap();
        assert_eq!(resp.status(), 302);
        assert_eq!(header(&resp, "Location"), "/");
        assert_eq!(stored_status(&t, 3), ServiceStatus::Done);

        let body = list(&t, &cookie, "/?tab=history");
        assert_eq!(texts(&body, "tr[data-id=\"3\"] span.badge"), vec!["Selesai"]);
        assert_eq!(texts(&body, "nav.tabs a"), vec!["Aktif (1)", "Riwayat (2)"]);
    }
}

#[test]
fn terminal_status_reachable_from_intake() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);

    post_form(&t.app, "/services/1/status", "status=Batal&confirm=yes", Some(&cookie)).unwrap();
    assert_eq!(stored_status(&t, 1), ServiceStatus::Cancelled);
}

#[test]
fn regression_is_denied_with_notice() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);
    list(&t, &cookie, "/");
    let before = t.store.calls();

    let resp = post_form(&t.app, "/services/2/status", "status=Masuk&confirm=yes", Some(&cookie)).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(t.store.calls(), before);
    assert_eq!(stored_status(&t, 2), ServiceStatus::Done);

    let body = list(&t, &cookie, "/?tab=history");
    let notices = texts(&body, "div.banner");
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("Selesai") && notices[0].contains("Masuk"));
}

#[test]
fn terminal_to_terminal_is_denied() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);
    post_form(&t.app, "/services/1/status", "status=Diambil&confirm=yes", Some(&cookie)).unwrap();
    assert_eq!(stored_status(&t, 1), ServiceStatus::PickedUp);
    list(&t, &cookie, "/");

    post_form(&t.app, "/services/1/status", "status=Batal&confirm=yes", Some(&cookie)).unwrap();
    assert_eq!(stored_status(&t, 1), ServiceStatus::PickedUp);
    let body = list(&t, &cookie, "/?tab=history");
    assert!(texts(&body, "div.banner")[0].contains("final"));
}

#[test]
fn same_status_is_a_no_op() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);
    list(&t, &cookie, "/");
    let before = t.store.calls();

    let resp = post_form(&t.app, "/services/3/status", "status=Dikerjakan", Some(&cookie)).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(t.store.calls(), before);
    assert!(texts(&list(&t, &cookie, "/"), "div.banner").is_empty());
}

#[test]
fn failed_update_reverts_visible_status() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);
    list(&t, &cookie, "/");

    t.store.fail_next("503 Service Unavailable");
    let resp = post_form(
        &t.app,
        "/services/1/status",
        "status=Pengecekan&confirm=yes",
        Some(&cookie),
    )
    .unwrap();
    assert_eq!(resp.status(), 302);

    let body = list(&t, &cookie, "/");
    assert_eq!(texts(&body, "tr[data-id=\"1\"] span.badge"), vec!["Masuk"]);
    assert!(texts(&body, "div.banner")
        .iter()
        .any(|n| n.contains("503 Service Unavailable")));
    assert_eq!(stored_status(&t, 1), ServiceStatus::Intake);
}

#[test]
fn status_select_offers_only_forward_moves() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);

    let body = list(&t, &cookie, "/");
    let options = attrs(&body, "tr[data-id=\"3\"] select[name=status] option", "value");
    assert_eq!(options, vec!["Dikerjakan", "Selesai", "Diambil", "Batal"]);
}

#[test]
fn unknown_status_is_a_bad_request() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);

    assert!(matches!(
        post_form(&t.app, "/services/1/status", "status=Rusak", Some(&cookie)),
        Err(ServerError::BadRequest(_))
    ));
    assert!(matches!(
        post_form(&t.app, "/services/1/status", "", Some(&cookie)),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn missing_service_is_reported() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);

    let resp = post_form(&t.app, "/services/42/status", "status=Selesai&confirm=yes", Some(&cookie)).unwrap();
    assert_eq!(resp.status(), 302);
    let body = list(&t, &cookie, "/");
    assert!(texts(&body, "div.banner")[0].contains("#42"));
}
