use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::Read;

use astra::Request;
use chrono::Utc;
use log::info;

use crate::auth::magic::{MagicLinkConfig, MagicLinkService};
use crate::auth::sessions;
use crate::config::Config;
use crate::db::{buy_boxes, deals, Database};
use crate::domain::analysis::{analyze_deal, DealAnalysis};
use crate::domain::deal::{Deal, DealStatus};
use crate::domain::estimator::{estimate, EstimatorInput};
use crate::domain::portfolio::portfolio_stats;
use crate::errors::ServerError;
use crate::estimates::EstimateClient;
use crate::mailer::Mailer;
use crate::partner::{PartnerClient, PreQualification, SyncReport};
use crate::responses::{html_response, redirect, redirect_with_cookie, ResultResp};
use crate::templates::pages::{
    buy_boxes_page, check_email_page, deal_detail_page, deals_page, home_page, login_page,
    portfolio_page, CalculatorVm, DealDetailVm, DealSort, DealsVm, PortfolioVm,
};

/// Everything a request handler needs, shared across worker threads.
pub struct AppContext {
    pub db: Database,
    pub config: Config,
    pub partner: PartnerClient,
    pub estimates: Option<EstimateClient>,
    pub mailer: Option<Mailer>,
}

const SESSION_COOKIE_MAX_AGE: i64 = 60 * 60 * 24 * 7;

pub fn handle(mut req: Request, ctx: &AppContext) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => calculator(&req, ctx),
        ("GET", ["lookup"]) => lookup(&req, ctx),
        ("GET", ["static", "main.css"]) => stylesheet(),

        ("GET", ["login"]) => html_response(login_page(None)),
        ("POST", ["auth", "request-link"]) => request_link(&mut req, ctx),
        ("GET", ["auth", "magic"]) => redeem_magic_link(&req, ctx),
        ("POST", ["logout"]) => logout(&req, ctx),

        ("GET", ["deals"]) => list_deals(&req, ctx),
        ("POST", ["deals"]) => create_deal(&mut req, ctx),
        ("POST", ["deals", "sync-all"]) => sync_all(&req, ctx),
        ("GET", ["deals", id]) => {
            let deal_id = parse_id(id)?;
            deal_detail(&req, ctx, deal_id)
        }
        ("POST", ["deals", id, action]) => {
            let deal_id = parse_id(id)?;
            let action = action.to_string();
            deal_action(&mut req, ctx, deal_id, &action)
        }

        ("GET", ["buy-boxes"]) => list_buy_boxes(&req, ctx),
        ("POST", ["buy-boxes"]) => create_buy_box(&mut req, ctx),
        ("POST", ["buy-boxes", id, "default"]) => {
            let buy_box_id = parse_id(id)?;
            let (user_id, _) = require_user(&req, ctx)?;
            ctx.db
                .with_conn(|conn| buy_boxes::set_default_buy_box(conn, buy_box_id, user_id, now()))?;
            redirect("/buy-boxes")
        }
        ("POST", ["buy-boxes", id, "delete"]) => {
            let buy_box_id = parse_id(id)?;
            let (user_id, _) = require_user(&req, ctx)?;
            ctx.db
                .with_conn(|conn| buy_boxes::delete_buy_box(conn, buy_box_id, user_id))?;
            redirect("/buy-boxes")
        }

        ("GET", ["portfolio"]) => portfolio(&req, ctx),

        _ => Err(ServerError::NotFound),
    }
}

// ---- calculator -----------------------------------------------------------

fn calculator(req: &Request, ctx: &AppContext) -> ResultResp {
    let params = parse_query(req);
    let logged_in = current_user(req, ctx)?.is_some();

    let input = estimator_input(&params);
    let result = params.contains_key("run").then(|| estimate(&input));

    html_response(home_page(&CalculatorVm {
        input,
        result,
        lookup_address: String::new(),
        lookup: None,
        comps: Vec::new(),
        lookup_error: None,
        logged_in,
    }))
}

fn lookup(req: &Request, ctx: &AppContext) -> ResultResp {
    let params = parse_query(req);
    let logged_in = current_user(req, ctx)?.is_some();
    let address = params.get("address").cloned().unwrap_or_default();

    let mut vm = CalculatorVm {
        input: EstimatorInput::default(),
        result: None,
        lookup_address: address.clone(),
        lookup: None,
        comps: Vec::new(),
        lookup_error: None,
        logged_in,
    };

    if address.trim().is_empty() {
        vm.lookup_error = Some("Enter an address to look up.".to_string());
        return html_response(home_page(&vm));
    }

    match &ctx.estimates {
        None => {
            vm.lookup_error = Some("Property lookup is not configured.".to_string());
        }
        Some(client) => match client.search_by_address(&address) {
            Ok(record) => {
                // Prefill the calculator from the listing.
                vm.input.purchase_price = record.price;
                if let Some(estimate) = record.estimate {
                    vm.input.estimates[0] = estimate;
                }
                let comps = client.comps(&address).unwrap_or_default();
                vm.input.comp_prices = comps.iter().map(|c| c.sale_price).collect();
                vm.comps = comps;
                vm.lookup = Some(record);
            }
            Err(ServerError::NotFound) => {
                vm.lookup_error = Some("No property found for that address.".to_string());
            }
            Err(e) => {
                vm.lookup_error = Some(e.to_string());
            }
        },
    }

    html_response(home_page(&vm))
}

/// Query parameters with missing or malformed numbers treated as zero.
fn estimator_input(params: &HashMap<String, String>) -> EstimatorInput {
    let defaults = EstimatorInput::default();
    EstimatorInput {
        purchase_price: num(params, "purchase_price"),
        arv_manual: num(params, "arv"),
        estimates: [
            num(params, "estimate1"),
            num(params, "estimate2"),
            num(params, "estimate3"),
        ],
        comp_prices: params
            .get("comps")
            .map(|s| s.split(',').filter_map(|p| p.trim().parse().ok()).collect())
            .unwrap_or_default(),
        rehab: num(params, "rehab"),
        ltc: num_or(params, "ltc", defaults.ltc),
        interest_rate: num_or(params, "interest_rate", defaults.interest_rate),
        hold_months: num_or(params, "hold_months", defaults.hold_months),
        buying_costs: num(params, "buying_costs"),
        commission: num_or(params, "commission", defaults.commission),
        selling_costs: num(params, "selling_costs"),
    }
}

// ---- auth -----------------------------------------------------------------

fn request_link(req: &mut Request, ctx: &AppContext) -> ResultResp {
    let form = read_form(req)?;
    let email = form
        .get("email")
        .ok_or_else(|| ServerError::BadRequest("missing email".into()))?;

    let service = MagicLinkService::new(MagicLinkConfig::default());
    let issued = ctx
        .db
        .with_conn(|conn| service.request_link(conn, email, now()))?;

    let link = format!("{}{}", ctx.config.base_url, issued.link);
    match &ctx.mailer {
        Some(mailer) => mailer.send_magic_link(&issued.email, &link)?,
        None => info!("mailer disabled; magic link for {}: {link}", issued.email),
    }

    html_response(check_email_page(&issued.email))
}

fn redeem_magic_link(req: &Request, ctx: &AppContext) -> ResultResp {
    let params = parse_query(req);
    let token = params.get("token").cloned().unwrap_or_default();

    let service = MagicLinkService::new(MagicLinkConfig::default());
    let session_token = ctx.db.with_conn(|conn| {
        let user_id = service.redeem(conn, &token, now())?;
        sessions::create_session(conn, user_id, now())
    })?;

    let cookie = format!(
        "session={session_token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_COOKIE_MAX_AGE}"
    );
    redirect_with_cookie("/deals", &cookie)
}

fn logout(req: &Request, ctx: &AppContext) -> ResultResp {
    if let Some(token) = session_token(req) {
        ctx.db
            .with_conn(|conn| sessions::revoke_session(conn, &token, now()))?;
    }
    redirect_with_cookie("/", "session=; Path=/; HttpOnly; Max-Age=0")
}

// ---- deals ----------------------------------------------------------------

fn list_deals(req: &Request, ctx: &AppContext) -> ResultResp {
    let (user_id, _) = require_user(req, ctx)?;
    let params = parse_query(req);

    let filter = params
        .get("status")
        .filter(|s| !s.is_empty())
        .and_then(|s| DealStatus::parse(s).ok());
    let sort = params
        .get("sort")
        .map(|s| DealSort::parse(s))
        .unwrap_or(DealSort::Newest);

    let mut rows = ctx
        .db
        .with_conn(|conn| deals::list_deals_with_analyses(conn, user_id, filter))?;
    sort_rows(&mut rows, sort);

    html_response(deals_page(&DealsVm { rows, filter, sort }))
}

fn sort_rows(rows: &mut [(Deal, Option<DealAnalysis>)], sort: DealSort) {
    fn profit(row: &(Deal, Option<DealAnalysis>)) -> f64 {
        row.1
            .as_ref()
            .map(|a| a.projected_profit)
            .unwrap_or(f64::NEG_INFINITY)
    }

    match sort {
        // The query already returns newest first.
        DealSort::Newest => {}
        DealSort::Profit => {
            rows.sort_by(|a, b| profit(b).partial_cmp(&profit(a)).unwrap_or(Ordering::Equal));
        }
        DealSort::Grade => {
            rows.sort_by_key(|(_, a)| {
                std::cmp::Reverse(a.as_ref().map(|a| a.grade.rank()).unwrap_or(0))
            });
        }
    }
}

fn create_deal(req: &mut Request, ctx: &AppContext) -> ResultResp {
    let (user_id, _) = require_user(req, ctx)?;
    let form = read_form(req)?;

    let address = form
        .get("address")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServerError::BadRequest("address is required".into()))?;

    let new_deal = deals::NewDeal {
        address,
        zip_code: form.get("zip_code").cloned().unwrap_or_default(),
        list_price: num(&form, "list_price"),
        estimated_arv: num(&form, "estimated_arv"),
        rehab_estimate: num(&form, "rehab_estimate"),
        square_feet: opt_num(&form, "square_feet"),
        bedrooms: opt_num(&form, "bedrooms"),
        bathrooms: opt_num(&form, "bathrooms"),
        days_on_market: form.get("days_on_market").and_then(|s| s.trim().parse().ok()),
        notes: form
            .get("notes")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };

    let deal_id = ctx
        .db
        .with_conn(|conn| deals::create_deal(conn, user_id, &new_deal, now()))?;
    redirect(&format!("/deals/{deal_id}"))
}

fn deal_detail(req: &Request, ctx: &AppContext, deal_id: i64) -> ResultResp {
    let (user_id, _) = require_user(req, ctx)?;
    let params = parse_query(req);

    let flash = match params.get("flash").map(String::as_str) {
        Some("analyzed") => Some("Analysis saved.".to_string()),
        Some("synced") => Some("Synced to your wealth tracker.".to_string()),
        Some("applied") => Some("Loan application submitted.".to_string()),
        _ => None,
    };

    let vm = ctx
        .db
        .with_conn(|conn| detail_vm(conn, user_id, deal_id, None, flash))?;
    html_response(deal_detail_page(&vm))
}

fn detail_vm(
    conn: &rusqlite::Connection,
    user_id: i64,
    deal_id: i64,
    prequal: Option<PreQualification>,
    flash: Option<String>,
) -> Result<DealDetailVm, ServerError> {
    let deal = deals::get_deal(conn, deal_id, user_id)?;
    let analysis = deals::get_analysis(conn, deal_id)?;
    let analyzed_against = deals::analysis_buy_box_name(conn, deal_id)?;
    let buy_boxes = buy_boxes::list_buy_boxes(conn, user_id)?;
    Ok(DealDetailVm {
        deal,
        analysis,
        analyzed_against,
        buy_boxes,
        prequal,
        flash,
    })
}

fn deal_action(req: &mut Request, ctx: &AppContext, deal_id: i64, action: &str) -> ResultResp {
    let (user_id, _) = require_user(req, ctx)?;

    match action {
        "status" => {
            let form = read_form(req)?;
            let status = DealStatus::parse(form.get("status").map(String::as_str).unwrap_or(""))?;
            ctx.db
                .with_conn(|conn| deals::update_status(conn, deal_id, user_id, status, now()))?;
            redirect(&format!("/deals/{deal_id}"))
        }
        "analyze" => {
            let form = read_form(req)?;
            ctx.db.with_conn(|conn| {
                let deal = deals::get_deal(conn, deal_id, user_id)?;
                let buy_box = match form.get("buy_box_id").and_then(|s| s.parse().ok()) {
                    Some(id) => buy_boxes::get_buy_box(conn, id, user_id)?,
                    None => buy_boxes::get_default_buy_box(conn, user_id)?.ok_or_else(|| {
                        ServerError::BadRequest("create a buy box before analyzing".into())
                    })?,
                };
                let analysis = analyze_deal(&deal, &buy_box);
                deals::save_analysis(conn, &analysis, buy_box.id, now())?;
                if deal.status == DealStatus::Lead {
                    deals::update_status(conn, deal_id, user_id, DealStatus::Analyzed, now())?;
                }
                Ok(())
            })?;
            redirect(&format!("/deals/{deal_id}?flash=analyzed"))
        }
        "delete" => {
            ctx.db
                .with_conn(|conn| deals::delete_deal(conn, deal_id, user_id))?;
            redirect("/deals")
        }
        "sync" => {
            ctx.db
                .with_conn(|conn| ctx.partner.sync_deal(conn, user_id, deal_id, now()))?;
            redirect(&format!("/deals/{deal_id}?flash=synced"))
        }
        "prequal" => {
            let vm = ctx.db.with_conn(|conn| {
                let prequal = ctx.partner.check_pre_qualification(conn, user_id, deal_id)?;
                detail_vm(conn, user_id, deal_id, Some(prequal), None)
            })?;
            html_response(deal_detail_page(&vm))
        }
        "apply" => {
            let form = read_form(req)?;
            let amount = num(&form, "loan_amount");
            ctx.db.with_conn(|conn| {
                ctx.partner
                    .submit_loan_application(conn, user_id, deal_id, amount, now())
            })?;
            redirect(&format!("/deals/{deal_id}?flash=applied"))
        }
        _ => Err(ServerError::NotFound),
    }
}

fn sync_all(req: &Request, ctx: &AppContext) -> ResultResp {
    let (user_id, _) = require_user(req, ctx)?;
    let report = ctx
        .db
        .with_conn(|conn| ctx.partner.sync_all_closed(conn, user_id, now()))?;
    render_portfolio(ctx, user_id, Some(report))
}

// ---- buy boxes ------------------------------------------------------------

fn list_buy_boxes(req: &Request, ctx: &AppContext) -> ResultResp {
    let (user_id, _) = require_user(req, ctx)?;
    let boxes = ctx
        .db
        .with_conn(|conn| buy_boxes::list_buy_boxes(conn, user_id))?;
    html_response(buy_boxes_page(&boxes))
}

fn create_buy_box(req: &mut Request, ctx: &AppContext) -> ResultResp {
    let (user_id, _) = require_user(req, ctx)?;
    let form = read_form(req)?;

    let name = form
        .get("name")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServerError::BadRequest("name is required".into()))?;

    let new_box = buy_boxes::NewBuyBox {
        name,
        max_purchase_price: opt_num(&form, "max_purchase_price"),
        min_cash_on_cash: num(&form, "min_cash_on_cash"),
        max_rehab_budget: num(&form, "max_rehab_budget"),
        holding_period_months: num(&form, "holding_period_months"),
        target_profit_min: num(&form, "target_profit_min"),
        hard_money_rate: num(&form, "hard_money_rate"),
        hard_money_points: num(&form, "hard_money_points"),
        selling_costs_percent: num(&form, "selling_costs_percent"),
    };

    ctx.db
        .with_conn(|conn| buy_boxes::create_buy_box(conn, user_id, &new_box, now()))?;
    redirect("/buy-boxes")
}

// ---- portfolio ------------------------------------------------------------

fn portfolio(req: &Request, ctx: &AppContext) -> ResultResp {
    let (user_id, _) = require_user(req, ctx)?;
    render_portfolio(ctx, user_id, None)
}

fn render_portfolio(ctx: &AppContext, user_id: i64, report: Option<SyncReport>) -> ResultResp {
    let (rows, unsynced) = ctx.db.with_conn(|conn| {
        let rows = deals::list_deals_with_analyses(conn, user_id, None)?;
        let unsynced = deals::unsynced_closed_deals(conn, user_id)?.len();
        Ok((rows, unsynced))
    })?;

    html_response(portfolio_page(&PortfolioVm {
        stats: portfolio_stats(&rows),
        unsynced_closed: unsynced,
        report,
    }))
}

// ---- static ---------------------------------------------------------------

fn stylesheet() -> ResultResp {
    let css = std::fs::read_to_string("static/main.css")
        .map_err(|_| ServerError::NotFound)?;
    let resp = astra::ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::TEXT_CSS.as_ref())
        .body(astra::Body::from(css))
        .unwrap();
    Ok(resp)
}

// ---- request helpers ------------------------------------------------------

fn now() -> i64 {
    Utc::now().timestamp()
}

fn parse_id(s: &str) -> Result<i64, ServerError> {
    s.parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid id: {s}")))
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    match req.uri().query() {
        Some(q) => url::form_urlencoded::parse(q.as_bytes())
            .into_owned()
            .collect(),
        None => HashMap::new(),
    }
}

fn read_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let mut raw = String::new();
    req.body_mut()
        .reader()
        .read_to_string(&mut raw)
        .map_err(|_| ServerError::BadRequest("unreadable request body".into()))?;
    Ok(url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect())
}

/// Missing or malformed numeric input is treated as zero.
fn num(params: &HashMap<String, String>, key: &str) -> f64 {
    params
        .get(key)
        .map(|s| s.trim().parse().unwrap_or(0.0))
        .unwrap_or(0.0)
}

/// Like `num`, but an absent field falls back to the given default.
fn num_or(params: &HashMap<String, String>, key: &str, default: f64) -> f64 {
    match params.get(key) {
        Some(s) => s.trim().parse().unwrap_or(0.0),
        None => default,
    }
}

/// Blank optional fields stay unset instead of collapsing to zero.
fn opt_num(params: &HashMap<String, String>, key: &str) -> Option<f64> {
    params
        .get(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

fn session_token(req: &Request) -> Option<String> {
    let cookies = req.headers().get("cookie")?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == "session").then(|| v.to_string())
    })
}

fn current_user(req: &Request, ctx: &AppContext) -> Result<Option<(i64, String)>, ServerError> {
    let Some(token) = session_token(req) else {
        return Ok(None);
    };
    ctx.db
        .with_conn(|conn| sessions::load_user_from_session(conn, &token, now()))
}

fn require_user(req: &Request, ctx: &AppContext) -> Result<(i64, String), ServerError> {
    current_user(req, ctx)?
        .ok_or_else(|| ServerError::Unauthorized("sign in required".into()))
}
