use crate::errors::ServerError;
use crate::router::{handle, AppContext};
use crate::tests::utils::{body_string, get, header, login, make_ctx, post};

fn create_deal(ctx: &AppContext, session: &str, address: &str) -> String {
    let form = format!(
        "address={}&zip_code=78701&list_price=200000&estimated_arv=350000&rehab_estimate=50000",
        address.replace(' ', "+")
    );
    let resp = handle(post("/deals", &form, Some(session)), ctx).unwrap();
    assert_eq!(resp.status(), 303);
    header(&resp, "Location").expect("redirect to the new deal")
}

fn create_buy_box(ctx: &AppContext, session: &str) {
    let form = "name=Austin+SFH&min_cash_on_cash=15&max_rehab_budget=80000\
        &holding_period_months=6&target_profit_min=30000&hard_money_rate=12\
        &hard_money_points=2&selling_costs_percent=6";
    let resp = handle(post("/buy-boxes", form, Some(session)), ctx).unwrap();
    assert_eq!(resp.status(), 303);
}

#[test]
fn creating_a_deal_redirects_to_its_page() {
    let ctx = make_ctx();
    let session = login(&ctx, "deals@example.com");

    let location = create_deal(&ctx, &session, "1 Elm St, Austin, TX");
    assert!(location.starts_with("/deals/"));

    let resp = handle(get(&location, Some(&session)), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("1 Elm St, Austin, TX"));
    assert!(body.contains("Lead"));
    assert!(body.contains("Not analyzed yet"));
}

#[test]
fn deal_creation_requires_an_address() {
    let ctx = make_ctx();
    let session = login(&ctx, "noaddr@example.com");

    let req = post("/deals", "list_price=100000", Some(&session));
    match handle(req, &ctx) {
        Err(ServerError::BadRequest(_)) => {}
        other => panic!("expected BadRequest, got: {other:?}"),
    }
}

#[test]
fn deal_list_shows_created_deals() {
    let ctx = make_ctx();
    let session = login(&ctx, "list@example.com");
    create_deal(&ctx, &session, "2 Oak St");
    create_deal(&ctx, &session, "3 Pine St");

    let resp = handle(get("/deals", Some(&session)), &ctx).unwrap();
    let body = body_string(resp);
    assert!(body.contains("2 Oak St"));
    assert!(body.contains("3 Pine St"));
}

#[test]
fn status_filter_narrows_the_list() {
    let ctx = make_ctx();
    let session = login(&ctx, "filter@example.com");
    let first = create_deal(&ctx, &session, "4 Birch St");
    create_deal(&ctx, &session, "5 Cedar St");

    let resp = handle(
        post(&format!("{first}/status"), "status=closed", Some(&session)),
        &ctx,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);

    let resp = handle(get("/deals?status=closed", Some(&session)), &ctx).unwrap();
    let body = body_string(resp);
    assert!(body.contains("4 Birch St"));
    assert!(!body.contains("5 Cedar St"));
}

#[test]
fn analyze_without_a_buy_box_is_rejected() {
    let ctx = make_ctx();
    let session = login(&ctx, "nobb@example.com");
    let location = create_deal(&ctx, &session, "6 Maple St");

    let req = post(&format!("{location}/analyze"), "", Some(&session));
    match handle(req, &ctx) {
        Err(ServerError::BadRequest(msg)) => assert!(msg.contains("buy box")),
        other => panic!("expected BadRequest, got: {other:?}"),
    }
}

#[test]
fn analyze_stores_a_snapshot_and_advances_the_lead() {
    let ctx = make_ctx();
    let session = login(&ctx, "analyze@example.com");
    create_buy_box(&ctx, &session);
    let location = create_deal(&ctx, &session, "7 Walnut St");

    let resp = handle(post(&format!("{location}/analyze"), "", Some(&session)), &ctx).unwrap();
    assert_eq!(resp.status(), 303);
    assert!(header(&resp, "Location").unwrap().contains("flash=analyzed"));

    let resp = handle(
        get(&format!("{location}?flash=analyzed"), Some(&session)),
        &ctx,
    )
    .unwrap();
    let body = body_string(resp);
    assert!(body.contains("Analysis saved."));
    // 350k ARV / 200k list / 50k rehab against the sample terms.
    assert!(body.contains("$56,000")); // projected profit
    assert!(body.contains("49.6%")); // cash-on-cash
    assert!(body.contains("Austin SFH"));
    assert!(body.contains("Yes")); // meets buy box
    assert!(body.contains("Analyzed")); // lead auto-advanced
}

#[test]
fn reanalysis_replaces_the_snapshot() {
    let ctx = make_ctx();
    let session = login(&ctx, "reanalyze@example.com");
    create_buy_box(&ctx, &session);
    let location = create_deal(&ctx, &session, "8 Spruce St");

    handle(post(&format!("{location}/analyze"), "", Some(&session)), &ctx).unwrap();
    handle(post(&format!("{location}/analyze"), "", Some(&session)), &ctx).unwrap();

    let resp = handle(get(&location, Some(&session)), &ctx).unwrap();
    let body = body_string(resp);
    assert_eq!(body.matches("$56,000").count(), 1);
}

#[test]
fn delete_removes_the_deal() {
    let ctx = make_ctx();
    let session = login(&ctx, "delete@example.com");
    let location = create_deal(&ctx, &session, "9 Ash St");

    let resp = handle(post(&format!("{location}/delete"), "", Some(&session)), &ctx).unwrap();
    assert_eq!(resp.status(), 303);

    match handle(get(&location, Some(&session)), &ctx) {
        Err(ServerError::NotFound) => {}
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

#[test]
fn deals_are_invisible_to_other_users() {
    let ctx = make_ctx();
    let owner = login(&ctx, "owner@example.com");
    let intruder = login(&ctx, "intruder@example.com");
    let location = create_deal(&ctx, &owner, "10 Fir St");

    match handle(get(&location, Some(&intruder)), &ctx) {
        Err(ServerError::NotFound) => {}
        other => panic!("expected NotFound, got: {other:?}"),
    }

    let resp = handle(get("/deals", Some(&intruder)), &ctx).unwrap();
    assert!(!body_string(resp).contains("10 Fir St"));
}

#[test]
fn unknown_status_is_a_bad_request() {
    let ctx = make_ctx();
    let session = login(&ctx, "badstatus@example.com");
    let location = create_deal(&ctx, &session, "11 Hazel St");

    let req = post(&format!("{location}/status"), "status=bogus", Some(&session));
    match handle(req, &ctx) {
        Err(ServerError::BadRequest(_)) => {}
        other => panic!("expected BadRequest, got: {other:?}"),
    }
}
