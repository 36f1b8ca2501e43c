use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

use astra::{Body, Response};
use http::{Method, Request};

use crate::auth::magic::{MagicLinkConfig, MagicLinkService};
use crate::auth::sessions::create_session;
use crate::config::Config;
use crate::db::{init_db, Database};
use crate::partner::PartnerClient;
use crate::router::AppContext;

pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

fn test_config() -> Config {
    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        database_path: ":memory:".to_string(),
        base_url: "http://localhost:3000".to_string(),
        wealth_api_url: None,
        wealth_api_key: None,
        lending_api_url: None,
        lending_api_key: None,
        estimate_api_url: None,
        estimate_api_key: None,
        mail_api_key: None,
        mail_sender_email: None,
        mail_sender_name: None,
    }
}

/// Fresh app context on a throwaway database file, with every outbound
/// integration disabled so no test ever touches the network.
pub fn make_ctx() -> AppContext {
    let path = std::env::temp_dir().join(format!(
        "flip_analyzer_test_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path);
    init_db(&db, "sql/schema.sql").expect("failed to initialize test db");

    let config = test_config();
    let partner = PartnerClient::from_config(&config).expect("partner client");

    AppContext {
        db,
        config,
        partner,
        estimates: None,
        mailer: None,
    }
}

/// Full sign-in without driving the mailer: issue a link, redeem it, and
/// return the session cookie token.
pub fn login(ctx: &AppContext, email: &str) -> String {
    ctx.db
        .with_conn(|conn| {
            let svc = MagicLinkService::new(MagicLinkConfig::default());
            let issued = svc.request_link(conn, email, now_unix())?;
            let user_id = svc.redeem(conn, &issued.token, now_unix())?;
            create_session(conn, user_id, now_unix())
        })
        .expect("test login failed")
}

pub fn get(path: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    if let Some(token) = session {
        builder = builder.header("Cookie", format!("session={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post(path: &str, form_body: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(token) = session {
        builder = builder.header("Cookie", format!("session={token}"));
    }
    builder
        .body(Body::from(form_body.as_bytes().to_vec()))
        .unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body()
        .reader()
        .read_to_string(&mut body)
        .unwrap();
    body
}

pub fn header(resp: &Response, name: &str) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
