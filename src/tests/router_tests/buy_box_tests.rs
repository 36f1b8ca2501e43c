use crate::db::buy_boxes::get_default_buy_box;
use crate::errors::ServerError;
use crate::router::{handle, AppContext};
use crate::tests::utils::{body_string, get, login, make_ctx, post};

fn create_box(ctx: &AppContext, session: &str, name: &str) {
    let form = format!(
        "name={}&min_cash_on_cash=15&max_rehab_budget=80000&holding_period_months=6\
         &target_profit_min=30000&hard_money_rate=12&hard_money_points=2&selling_costs_percent=6",
        name.replace(' ', "+")
    );
    let resp = handle(post("/buy-boxes", &form, Some(session)), ctx).unwrap();
    assert_eq!(resp.status(), 303);
}

#[test]
fn first_buy_box_becomes_the_default() {
    let ctx = make_ctx();
    let session = login(&ctx, "boxes@example.com");
    create_box(&ctx, &session, "Austin SFH");

    let resp = handle(get("/buy-boxes", Some(&session)), &ctx).unwrap();
    let body = body_string(resp);
    assert!(body.contains("Austin SFH"));
    assert!(body.contains("default"));
}

#[test]
fn buy_box_requires_a_name() {
    let ctx = make_ctx();
    let session = login(&ctx, "noname@example.com");

    let req = post("/buy-boxes", "min_cash_on_cash=15", Some(&session));
    match handle(req, &ctx) {
        Err(ServerError::BadRequest(_)) => {}
        other => panic!("expected BadRequest, got: {other:?}"),
    }
}

#[test]
fn make_default_switches_the_flag() {
    let ctx = make_ctx();
    let session = login(&ctx, "switch@example.com");
    create_box(&ctx, &session, "First Box");
    create_box(&ctx, &session, "Second Box");

    let resp = handle(post("/buy-boxes/2/default", "", Some(&session)), &ctx).unwrap();
    assert_eq!(resp.status(), 303);

    let default = ctx
        .db
        .with_conn(|conn| {
            let user_id: i64 = conn
                .query_row(
                    "select id from users where email = 'switch@example.com'",
                    [],
                    |r| r.get(0),
                )
                .unwrap();
            get_default_buy_box(conn, user_id)
        })
        .unwrap()
        .expect("a default buy box");
    assert_eq!(default.name, "Second Box");
}

#[test]
fn deleting_a_buy_box_keeps_analyses() {
    let ctx = make_ctx();
    let session = login(&ctx, "keep@example.com");
    create_box(&ctx, &session, "Doomed Box");

    let form = "address=12+Elm+St&list_price=200000&estimated_arv=350000&rehab_estimate=50000";
    let resp = handle(post("/deals", form, Some(&session)), &ctx).unwrap();
    let location = resp.headers().get("Location").unwrap().to_str().unwrap().to_string();
    handle(post(&format!("{location}/analyze"), "", Some(&session)), &ctx).unwrap();

    let resp = handle(post("/buy-boxes/1/delete", "", Some(&session)), &ctx).unwrap();
    assert_eq!(resp.status(), 303);

    // The snapshot survives, only the buy box name is gone.
    let resp = handle(get(&location, Some(&session)), &ctx).unwrap();
    let body = body_string(resp);
    assert!(body.contains("$56,000"));
    assert!(!body.contains("Doomed Box"));
}

#[test]
fn buy_boxes_are_scoped_to_their_owner() {
    let ctx = make_ctx();
    let owner = login(&ctx, "bbowner@example.com");
    let intruder = login(&ctx, "bbintruder@example.com");
    create_box(&ctx, &owner, "Private Box");

    match handle(post("/buy-boxes/1/delete", "", Some(&intruder)), &ctx) {
        Err(ServerError::NotFound) => {}
        other => panic!("expected NotFound, got: {other:?}"),
    }

    let resp = handle(get("/buy-boxes", Some(&intruder)), &ctx).unwrap();
    assert!(!body_string(resp).contains("Private Box"));
}
