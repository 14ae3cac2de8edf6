use crate::tests::utils::{attrs, body_string, get, header, login, post_form, test_app};
use crate::view_model::Reconcile;

#[test]
fn login_page_loads_successfully() {
    let t = test_app(Reconcile::Patch);

    let resp = get(&t.app, "/login", None).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert_eq!(
        attrs(&body, "form[action=\"/login\"] input", "name"),
        vec!["password".to_string()]
    );
}

#[test]
fn wrong_password_is_rejected_without_cookie() {
    let t = test_app(Reconcile::Patch);

    let resp = post_form(&t.app, "/login", "password=salah", None).unwrap();
    assert_eq!(resp.status(), 401);
    assert_eq!(header(&resp, "Set-Cookie"), "");
    assert!(body_string(resp).contains("banner-error"));
}

#[test]
fn anonymous_requests_are_sent_to_login() {
    let t = test_app(Reconcile::Patch);

    for (method, uri) in [("GET", "/"), ("GET", "/services/export.xlsx"), ("POST", "/services")] {
        let resp = if method == "GET" {
            get(&t.app, uri, None).unwrap()
        } else {
            post_form(&t.app, uri, "customer_name=X&item_name=Y", None).unwrap()
        };
        assert_eq!(resp.status(), 302, "{method} {uri}");
        assert_eq!(header(&resp, "Location"), "/login");
    }
    assert_eq!(t.store.snapshot().len(), 3);
}

#[test]
fn forged_cookie_is_not_a_session() {
    let t = test_app(Reconcile::Patch);

    let resp = get(&t.app, "/", Some("session=not-a-real-token")).unwrap();
    assert_eq!(header(&resp, "Location"), "/login");
}

#[test]
fn login_sets_http_only_cookie_and_opens_list() {
    let t = test_app(Reconcile::Patch);

    let resp = post_form(&t.app, "/login", "password=rahasia", None).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/");
    let set_cookie = header(&resp, "Set-Cookie");
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=3600"));

    let cookie = login(&t.app);
    let resp = get(&t.app, "/", Some(&cookie)).unwrap();
    assert_eq!(resp.status(), 200);
}

#[test]
fn logged_in_user_skips_login_page() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);

    let resp = get(&t.app, "/login", Some(&cookie)).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/");
}

#[test]
fn logout_revokes_session_and_clears_cookie() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);
    assert_eq!(get(&t.app, "/", Some(&cookie)).unwrap().status(), 200);

    let resp = post_form(&t.app, "/logout", "", Some(&cookie)).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/login");
    assert!(header(&resp, "Set-Cookie").contains("Max-Age=0"));

    let resp = get(&t.app, "/", Some(&cookie)).unwrap();
    assert_eq!(header(&resp, "Location"), "/login");
}

#[test]
fn logout_drops_the_cached_list() {
    let t = test_app(Reconcile::Patch);
    let cookie = login(&t.app);
    get(&t.app, "/", Some(&cookie)).unwrap();
    let after_first_load = t.store.calls();

    post_form(&t.app, "/logout", "", Some(&cookie)).unwrap();
    let cookie = login(&t.app);
    get(&t.app, "/", Some(&cookie)).unwrap();

    assert_eq!(t.store.calls(), after_first_load + 1);
}
