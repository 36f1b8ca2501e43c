use crate::auth::magic::{MagicLinkConfig, MagicLinkService};
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, header, login, make_ctx, now_unix, post};

#[test]
fn login_page_loads_successfully() {
    let ctx = make_ctx();

    let resp = handle(get("/login", None), &ctx).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Sign in"));
    assert!(body.contains("form"));
}

#[test]
fn request_link_shows_check_email_page() {
    let ctx = make_ctx();
    let email = "test@example.com";

    let req = post("/auth/request-link", &format!("email={email}"), None);
    let resp = handle(req, &ctx).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Check your email"));
    assert!(body.contains(email));
}

#[test]
fn request_link_rejects_invalid_email() {
    let ctx = make_ctx();
    let req = post("/auth/request-link", "email=no-at-symbol", None);
    match handle(req, &ctx) {
        Err(ServerError::BadRequest(_)) => {}
        other => panic!("expected BadRequest, got: {other:?}"),
    }
}

#[test]
fn magic_link_redeems_into_a_session() {
    let ctx = make_ctx();

    let token = ctx
        .db
        .with_conn(|conn| {
            let svc = MagicLinkService::new(MagicLinkConfig::default());
            Ok(svc.request_link(conn, "magic@example.com", now_unix())?.token)
        })
        .unwrap();

    let resp = handle(get(&format!("/auth/magic?token={token}"), None), &ctx).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location").as_deref(), Some("/deals"));

    let cookie = header(&resp, "Set-Cookie").expect("session cookie");
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));

    // The cookie actually works against a protected page.
    let session = cookie
        .trim_start_matches("session=")
        .split(';')
        .next()
        .unwrap()
        .to_string();
    let resp = handle(get("/deals", Some(&session)), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
}

#[test]
fn invalid_magic_token_is_rejected() {
    let ctx = make_ctx();
    match handle(get("/auth/magic?token=bogus", None), &ctx) {
        Err(ServerError::Unauthorized(_)) => {}
        other => panic!("expected Unauthorized, got: {other:?}"),
    }
}

#[test]
fn protected_pages_require_a_session() {
    let ctx = make_ctx();
    for path in ["/deals", "/buy-boxes", "/portfolio"] {
        match handle(get(path, None), &ctx) {
            Err(ServerError::Unauthorized(_)) => {}
            other => panic!("expected Unauthorized for {path}, got: {other:?}"),
        }
    }
}

#[test]
fn logout_revokes_the_session() {
    let ctx = make_ctx();
    let session = login(&ctx, "logout@example.com");

    let resp = handle(post("/logout", "", Some(&session)), &ctx).unwrap();
    assert_eq!(resp.status(), 303);
    let cookie = header(&resp, "Set-Cookie").expect("cleared cookie");
    assert!(cookie.contains("Max-Age=0"));

    match handle(get("/deals", Some(&session)), &ctx) {
        Err(ServerError::Unauthorized(_)) => {}
        other => panic!("expected Unauthorized after logout, got: {other:?}"),
    }
}
