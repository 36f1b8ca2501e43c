use crate::router::handle;
use crate::tests::utils::{body_string, get, make_ctx};

#[test]
fn calculator_loads_without_auth() {
    let ctx = make_ctx();

    let resp = handle(get("/", None), &ctx).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Quick Offer Calculator"));
    // No results until the form is submitted.
    assert!(!body.contains("Verdict"));
}

#[test]
fn submitted_form_computes_results() {
    let ctx = make_ctx();

    // 400k ARV, 200k purchase, 50k rehab at the default terms.
    let resp = handle(
        get("/?run=1&purchase_price=200000&rehab=50000&arv=400000", None),
        &ctx,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Verdict"));
    assert!(body.contains("GO"));
    // max recommended = min(70% MAO 230k, $50k-target MAO 266k)
    assert!(body.contains("$230,000"));
    assert!(body.contains("$266,000"));
    assert!(body.contains("Viable flip"));
}

#[test]
fn malformed_numbers_are_treated_as_zero() {
    let ctx = make_ctx();

    let resp = handle(
        get("/?run=1&purchase_price=abc&rehab=xyz&arv=100000", None),
        &ctx,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    // Zero purchase and rehab, so the wholesale spread carries the verdict.
    assert!(body.contains("Verdict"));
    assert!(body.contains("Viable wholesale"));
}

#[test]
fn lookup_without_provider_reports_it() {
    let ctx = make_ctx();

    let resp = handle(get("/lookup?address=1+Main+St", None), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("not configured"));
}

#[test]
fn lookup_without_address_asks_for_one() {
    let ctx = make_ctx();

    let resp = handle(get("/lookup", None), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Enter an address"));
}

#[test]
fn stylesheet_is_served() {
    let ctx = make_ctx();

    let resp = handle(get("/static/main.css", None), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/css"
    );
}
