// src/db/buy_boxes.rs
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::deal::BuyBox;
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct NewBuyBox {
    pub name: String,
    pub max_purchase_price: Option<f64>,
    pub min_cash_on_cash: f64,
    pub max_rehab_budget: f64,
    pub holding_period_months: f64,
    pub target_profit_min: f64,
    pub hard_money_rate: f64,
    pub hard_money_points: f64,
    pub selling_costs_percent: f64,
}

fn buy_box_from_row(row: &Row) -> rusqlite::Result<BuyBox> {
    Ok(BuyBox {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        max_purchase_price: row.get("max_purchase_price")?,
        min_cash_on_cash: row.get("min_cash_on_cash")?,
        max_rehab_budget: row.get("max_rehab_budget")?,
        holding_period_months: row.get("holding_period_months")?,
        target_profit_min: row.get("target_profit_min")?,
        hard_money_rate: row.get("hard_money_rate")?,
        hard_money_points: row.get("hard_money_points")?,
        selling_costs_percent: row.get("selling_costs_percent")?,
        is_default: row.get("is_default")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

const BUY_BOX_COLUMNS: &str = "id, user_id, name, max_purchase_price, min_cash_on_cash, \
     max_rehab_budget, holding_period_months, target_profit_min, hard_money_rate, \
     hard_money_points, selling_costs_percent, is_default, created_at, updated_at";

pub fn create_buy_box(
    conn: &Connection,
    user_id: i64,
    buy_box: &NewBuyBox,
    now: i64,
) -> Result<i64, ServerError> {
    // The user's first buy box becomes the default automatically.
    let has_any: i64 = conn
        .query_row(
            "select count(*) from buy_boxes where user_id = ?",
            params![user_id],
            |r| r.get(0),
        )
        .map_err(|e| ServerError::DbError(format!("count buy boxes failed: {e}")))?;

    conn.execute(
        "insert into buy_boxes (user_id, name, max_purchase_price, min_cash_on_cash, \
         max_rehab_budget, holding_period_months, target_profit_min, hard_money_rate, \
         hard_money_points, selling_costs_percent, is_default, created_at, updated_at) \
         values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            user_id,
            buy_box.name,
            buy_box.max_purchase_price,
            buy_box.min_cash_on_cash,
            buy_box.max_rehab_budget,
            buy_box.holding_period_months,
            buy_box.target_profit_min,
            buy_box.hard_money_rate,
            buy_box.hard_money_points,
            buy_box.selling_costs_percent,
            has_any == 0,
            now,
            now,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert buy box failed: {e}")))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_buy_box(conn: &Connection, buy_box_id: i64, user_id: i64) -> Result<BuyBox, ServerError> {
    conn.query_row(
        &format!("select {BUY_BOX_COLUMNS} from buy_boxes where id = ? and user_id = ?"),
        params![buy_box_id, user_id],
        buy_box_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select buy box failed: {e}")))?
    .ok_or(ServerError::NotFound)
}

pub fn list_buy_boxes(conn: &Connection, user_id: i64) -> Result<Vec<BuyBox>, ServerError> {
    let mut stmt = conn.prepare(&format!(
        "select {BUY_BOX_COLUMNS} from buy_boxes \
         where user_id = ? order by created_at desc, id desc"
    ))?;
    let rows = stmt.query_map(params![user_id], buy_box_from_row)?;
    let mut boxes = Vec::new();
    for row in rows {
        boxes.push(row?);
    }
    Ok(boxes)
}

/// The user's default buy box, falling back to the most recently created
/// one when no default is flagged. None when the user has no buy boxes.
pub fn get_default_buy_box(
    conn: &Connection,
    user_id: i64,
) -> Result<Option<BuyBox>, ServerError> {
    let default = conn
        .query_row(
            &format!(
                "select {BUY_BOX_COLUMNS} from buy_boxes \
                 where user_id = ? and is_default = 1"
            ),
            params![user_id],
            buy_box_from_row,
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select default buy box failed: {e}")))?;

    if default.is_some() {
        return Ok(default);
    }

    conn.query_row(
        &format!(
            "select {BUY_BOX_COLUMNS} from buy_boxes \
             where user_id = ? order by created_at desc, id desc limit 1"
        ),
        params![user_id],
        buy_box_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select fallback buy box failed: {e}")))
}

/// Flip the default to another buy box; the previous default is unset in
/// the same transaction.
pub fn set_default_buy_box(
    conn: &mut Connection,
    buy_box_id: i64,
    user_id: i64,
    now: i64,
) -> Result<(), ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    tx.execute(
        "update buy_boxes set is_default = 0, updated_at = ? \
         where user_id = ? and is_default = 1",
        params![now, user_id],
    )
    .map_err(|e| ServerError::DbError(format!("unset default failed: {e}")))?;

    let updated = tx
        .execute(
            "update buy_boxes set is_default = 1, updated_at = ? \
             where id = ? and user_id = ?",
            params![now, buy_box_id, user_id],
        )
        .map_err(|e| ServerError::DbError(format!("set default failed: {e}")))?;

    if updated == 0 {
        tx.rollback().ok();
        return Err(ServerError::NotFound);
    }

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))
}

pub fn delete_buy_box(
    conn: &Connection,
    buy_box_id: i64,
    user_id: i64,
) -> Result<(), ServerError> {
    let deleted = conn
        .execute(
            "delete from buy_boxes where id = ? and user_id = ?",
            params![buy_box_id, user_id],
        )
        .map_err(|e| ServerError::DbError(format!("delete buy box failed: {e}")))?;
    if deleted == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::auth::get_or_create_user;

    pub(crate) fn sample_buy_box() -> NewBuyBox {
        NewBuyBox {
            name: "Austin SFH".to_string(),
            max_purchase_price: Some(400_000.0),
            min_cash_on_cash: 15.0,
            max_rehab_budget: 80_000.0,
            holding_period_months: 6.0,
            target_profit_min: 30_000.0,
            hard_money_rate: 12.0,
            hard_money_points: 2.0,
            selling_costs_percent: 6.0,
        }
    }

    fn test_conn() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("../../sql/schema.sql"))
            .unwrap();
        let user_id = get_or_create_user(&conn, "boxes@example.com", 1000).unwrap();
        (conn, user_id)
    }

    #[test]
    fn first_buy_box_becomes_default() {
        let (conn, user_id) = test_conn();
        let first = create_buy_box(&conn, user_id, &sample_buy_box(), 5000).unwrap();
        let second = create_buy_box(&conn, user_id, &sample_buy_box(), 6000).unwrap();

        let default = get_default_buy_box(&conn, user_id).unwrap().unwrap();
        assert_eq!(default.id, first);
        assert!(default.is_default);

        let bb2 = get_buy_box(&conn, second, user_id).unwrap();
        assert!(!bb2.is_default);
    }

    #[test]
    fn set_default_unsets_previous() {
        let (mut conn, user_id) = test_conn();
        let first = create_buy_box(&conn, user_id, &sample_buy_box(), 5000).unwrap();
        let second = create_buy_box(&conn, user_id, &sample_buy_box(), 6000).unwrap();

        set_default_buy_box(&mut conn, second, user_id, 7000).unwrap();

        assert!(!get_buy_box(&conn, first, user_id).unwrap().is_default);
        assert!(get_buy_box(&conn, second, user_id).unwrap().is_default);

        let defaults: i64 = conn
            .query_row(
                "select count(*) from buy_boxes where user_id = ? and is_default = 1",
                params![user_id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(defaults, 1);
    }

    #[test]
    fn default_falls_back_to_most_recent() {
        let (conn, user_id) = test_conn();
        let first = create_buy_box(&conn, user_id, &sample_buy_box(), 5000).unwrap();
        let second = create_buy_box(&conn, user_id, &sample_buy_box(), 6000).unwrap();

        // Clear the default flag directly to simulate imported rows.
        conn.execute("update buy_boxes set is_default = 0", [])
            .unwrap();

        let fallback = get_default_buy_box(&conn, user_id).unwrap().unwrap();
        assert_eq!(fallback.id, second);
        let _ = first;
    }

    #[test]
    fn no_buy_boxes_means_no_default() {
        let (conn, user_id) = test_conn();
        assert!(get_default_buy_box(&conn, user_id).unwrap().is_none());
    }

    #[test]
    fn buy_boxes_are_scoped_to_their_owner() {
        let (conn, user_id) = test_conn();
        let other = get_or_create_user(&conn, "other@example.com", 1000).unwrap();
        let id = create_buy_box(&conn, user_id, &sample_buy_box(), 5000).unwrap();

        assert!(matches!(
            get_buy_box(&conn, id, other),
            Err(ServerError::NotFound)
        ));
        assert!(matches!(
            delete_buy_box(&conn, id, other),
            Err(ServerError::NotFound)
        ));
    }
}
