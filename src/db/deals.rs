// src/db/deals.rs
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::analysis::{DealAnalysis, DealGrade};
use crate::domain::deal::{Deal, DealStatus};
use crate::errors::ServerError;

/// User-entered fields for a new deal. Status always starts at `lead`.
#[derive(Debug, Clone)]
pub struct NewDeal {
    pub address: String,
    pub zip_code: String,
    pub list_price: f64,
    pub estimated_arv: f64,
    pub rehab_estimate: f64,
    pub square_feet: Option<f64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub days_on_market: Option<i64>,
    pub notes: Option<String>,
}

fn deal_from_row(row: &Row) -> rusqlite::Result<Deal> {
    let status: String = row.get("status")?;
    Ok(Deal {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        address: row.get("address")?,
        zip_code: row.get("zip_code")?,
        list_price: row.get("list_price")?,
        estimated_arv: row.get("estimated_arv")?,
        rehab_estimate: row.get("rehab_estimate")?,
        square_feet: row.get("square_feet")?,
        bedrooms: row.get("bedrooms")?,
        bathrooms: row.get("bathrooms")?,
        days_on_market: row.get("days_on_market")?,
        notes: row.get("notes")?,
        // Unknown statuses cannot appear: writes go through DealStatus.
        status: DealStatus::parse(&status).unwrap_or(DealStatus::Lead),
        synced_at: row.get("synced_at")?,
        loan_application_id: row.get("loan_application_id")?,
        loan_application_date: row.get("loan_application_date")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

const DEAL_COLUMNS: &str = "id, user_id, address, zip_code, list_price, estimated_arv, \
     rehab_estimate, square_feet, bedrooms, bathrooms, days_on_market, notes, status, \
     synced_at, loan_application_id, loan_application_date, created_at, updated_at";

pub fn create_deal(
    conn: &Connection,
    user_id: i64,
    deal: &NewDeal,
    now: i64,
) -> Result<i64, ServerError> {
    conn.execute(
        "insert into deals (user_id, address, zip_code, list_price, estimated_arv, \
         rehab_estimate, square_feet, bedrooms, bathrooms, days_on_market, notes, \
         status, created_at, updated_at) \
         values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'lead', ?, ?)",
        params![
            user_id,
            deal.address,
            deal.zip_code,
            deal.list_price,
            deal.estimated_arv,
            deal.rehab_estimate,
            deal.square_feet,
            deal.bedrooms,
            deal.bathrooms,
            deal.days_on_market,
            deal.notes,
            now,
            now,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert deal failed: {e}")))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_deal(conn: &Connection, deal_id: i64, user_id: i64) -> Result<Deal, ServerError> {
    conn.query_row(
        &format!("select {DEAL_COLUMNS} from deals where id = ? and user_id = ?"),
        params![deal_id, user_id],
        deal_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select deal failed: {e}")))?
    .ok_or(ServerError::NotFound)
}

/// Most recent first; optional status filter.
pub fn list_deals(
    conn: &Connection,
    user_id: i64,
    status: Option<DealStatus>,
) -> Result<Vec<Deal>, ServerError> {
    let mut deals = Vec::new();
    match status {
        Some(s) => {
            let mut stmt = conn.prepare(&format!(
                "select {DEAL_COLUMNS} from deals \
                 where user_id = ? and status = ? order by created_at desc, id desc"
            ))?;
            let rows = stmt.query_map(params![user_id, s.as_str()], deal_from_row)?;
            for row in rows {
                deals.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "select {DEAL_COLUMNS} from deals \
                 where user_id = ? order by created_at desc, id desc"
            ))?;
            let rows = stmt.query_map(params![user_id], deal_from_row)?;
            for row in rows {
                deals.push(row?);
            }
        }
    }
    Ok(deals)
}

pub fn update_status(
    conn: &Connection,
    deal_id: i64,
    user_id: i64,
    status: DealStatus,
    now: i64,
) -> Result<(), ServerError> {
    let updated = conn
        .execute(
            "update deals set status = ?, updated_at = ? where id = ? and user_id = ?",
            params![status.as_str(), now, deal_id, user_id],
        )
        .map_err(|e| ServerError::DbError(format!("update deal status failed: {e}")))?;
    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

pub fn delete_deal(conn: &Connection, deal_id: i64, user_id: i64) -> Result<(), ServerError> {
    let deleted = conn
        .execute(
            "delete from deals where id = ? and user_id = ?",
            params![deal_id, user_id],
        )
        .map_err(|e| ServerError::DbError(format!("delete deal failed: {e}")))?;
    if deleted == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

/// Store (or replace) the analysis snapshot for a deal.
pub fn save_analysis(
    conn: &Connection,
    analysis: &DealAnalysis,
    buy_box_id: i64,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "insert or replace into deal_analyses (deal_id, buy_box_id, max_offer_70, \
         total_investment, projected_profit, cash_on_cash_roi, annualized_roi, \
         holding_costs, selling_costs, hard_money_costs, grade, meets_buy_box, analyzed_at) \
         values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            analysis.deal_id,
            buy_box_id,
            analysis.max_offer_70_percent,
            analysis.total_investment,
            analysis.projected_profit,
            analysis.cash_on_cash_roi,
            analysis.annualized_roi,
            analysis.holding_costs,
            analysis.selling_costs,
            analysis.hard_money_costs,
            analysis.grade.as_str(),
            analysis.meets_buy_box,
            now,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("save analysis failed: {e}")))?;
    Ok(())
}

fn analysis_from_row(row: &Row) -> rusqlite::Result<DealAnalysis> {
    let grade: String = row.get("grade")?;
    Ok(DealAnalysis {
        deal_id: row.get("deal_id")?,
        max_offer_70_percent: row.get("max_offer_70")?,
        total_investment: row.get("total_investment")?,
        projected_profit: row.get("projected_profit")?,
        cash_on_cash_roi: row.get("cash_on_cash_roi")?,
        annualized_roi: row.get("annualized_roi")?,
        holding_costs: row.get("holding_costs")?,
        selling_costs: row.get("selling_costs")?,
        hard_money_costs: row.get("hard_money_costs")?,
        grade: DealGrade::parse(&grade).unwrap_or(DealGrade::D),
        meets_buy_box: row.get("meets_buy_box")?,
    })
}

pub fn get_analysis(
    conn: &Connection,
    deal_id: i64,
) -> Result<Option<DealAnalysis>, ServerError> {
    conn.query_row(
        "select deal_id, max_offer_70, total_investment, projected_profit, \
         cash_on_cash_roi, annualized_roi, holding_costs, selling_costs, \
         hard_money_costs, grade, meets_buy_box from deal_analyses where deal_id = ?",
        params![deal_id],
        analysis_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select analysis failed: {e}")))
}

/// Name of the buy box the stored analysis was run against. None when the
/// deal is unanalyzed or the buy box was deleted since.
pub fn analysis_buy_box_name(
    conn: &Connection,
    deal_id: i64,
) -> Result<Option<String>, ServerError> {
    conn.query_row(
        "select b.name from deal_analyses a \
         join buy_boxes b on b.id = a.buy_box_id \
         where a.deal_id = ?",
        params![deal_id],
        |r| r.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select analysis buy box failed: {e}")))
}

/// Deals paired with their stored analysis, for the list and portfolio pages.
pub fn list_deals_with_analyses(
    conn: &Connection,
    user_id: i64,
    status: Option<DealStatus>,
) -> Result<Vec<(Deal, Option<DealAnalysis>)>, ServerError> {
    let deals = list_deals(conn, user_id, status)?;
    let mut out = Vec::with_capacity(deals.len());
    for deal in deals {
        let analysis = get_analysis(conn, deal.id)?;
        out.push((deal, analysis));
    }
    Ok(out)
}

pub fn mark_synced(
    conn: &Connection,
    deal_id: i64,
    user_id: i64,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "update deals set synced_at = ?, updated_at = ? where id = ? and user_id = ?",
        params![now, now, deal_id, user_id],
    )
    .map_err(|e| ServerError::DbError(format!("mark synced failed: {e}")))?;
    Ok(())
}

/// Closed deals that have never been pushed to the wealth partner.
pub fn unsynced_closed_deals(conn: &Connection, user_id: i64) -> Result<Vec<Deal>, ServerError> {
    let mut stmt = conn.prepare(&format!(
        "select {DEAL_COLUMNS} from deals \
         where user_id = ? and status = 'closed' and synced_at is null \
         order by created_at desc, id desc"
    ))?;
    let rows = stmt.query_map(params![user_id], deal_from_row)?;
    let mut deals = Vec::new();
    for row in rows {
        deals.push(row?);
    }
    Ok(deals)
}

pub fn record_loan_application(
    conn: &Connection,
    deal_id: i64,
    user_id: i64,
    application_id: &str,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "update deals set loan_application_id = ?, loan_application_date = ?, updated_at = ? \
         where id = ? and user_id = ?",
        params![application_id, now, now, deal_id, user_id],
    )
    .map_err(|e| ServerError::DbError(format!("record loan application failed: {e}")))?;
    Ok(())
}
