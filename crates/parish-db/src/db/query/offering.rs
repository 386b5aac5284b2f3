use chrono::NaiveDate;
use parish_core::page::Page;

use crate::db::DbConnection;
use crate::db::query::column::columns;
use crate::db::query::{Direction, InsertQuery, Op, SelectQuery, UpdateOutcome, UpdateQuery};
use crate::db::statement::Statement;
use crate::error::{DbError, DbResult};
use crate::model::offering::{
    MemberOfferingSummary, MonthlyTotal, NewOffering, NewOfferingType, Offering, OfferingChanges,
    OfferingFilter, OfferingStatistics, OfferingTotal, OfferingType, OfferingTypeTotal,
};

columns!(pub enum OfferingTypeColumn as "ot" {
    Id => "id",
    Name => "name",
    Description => "description",
    IsActive => "is_active",
    CreatedAt => "created_at",
});

columns!(pub enum OfferingColumn as "o" {
    Id => "id",
    MemberId => "member_id",
    OfferingDate => "offering_date",
    OfferingType => "offering_type",
    Amount => "amount",
    Memo => "memo",
    CreatedBy => "created_by",
    CreatedAt => "created_at",
    UpdatedAt => "updated_at",
});

const OFFERING_TYPE_TABLE: &str = "offering_types";
const OFFERING_TABLE: &str = "offerings";

const OFFERING_TYPE_SELECT: &str =
    "SELECT ot.id, ot.name, ot.description, ot.is_active, ot.created_at FROM offering_types ot";

const OFFERING_SELECT: &str = "SELECT o.id, o.member_id, o.offering_date, o.offering_type, o.amount, \
     o.memo, o.created_by, o.created_at, o.updated_at, \
     m.name AS member_name, u.username AS created_by_username \
     FROM offerings o \
     LEFT JOIN members m ON m.id = o.member_id \
     LEFT JOIN users u ON u.id = o.created_by";

const TOTAL_SQL: &str = "SELECT SUM(amount) AS total_amount, COUNT(*) AS total_count \
     FROM offerings WHERE offering_date BETWEEN ? AND ?";
const TOTAL_COLUMNS: &[&str] = &["total_amount", "total_count"];

const BY_TYPE_SQL: &str = "SELECT offering_type, SUM(amount) AS amount, COUNT(*) AS count \
     FROM offerings WHERE offering_date BETWEEN ? AND ? \
     GROUP BY offering_type ORDER BY amount DESC, offering_type ASC";
const BY_TYPE_COLUMNS: &[&str] = &["offering_type", "amount", "count"];

const MONTHLY_SQL: &str = "SELECT strftime('%Y-%m', offering_date) AS month, SUM(amount) AS amount, \
     COUNT(*) AS count \
     FROM offerings WHERE offering_date BETWEEN ? AND ? \
     GROUP BY month ORDER BY month ASC";
const MONTHLY_COLUMNS: &[&str] = &["month", "amount", "count"];

const MEMBER_SUMMARY_SQL: &str = "SELECT offering_type, SUM(amount) AS total_amount, COUNT(*) AS count, \
     MIN(offering_date) AS first_date, MAX(offering_date) AS last_date \
     FROM offerings WHERE member_id = ? AND offering_date BETWEEN ? AND ? \
     GROUP BY offering_type ORDER BY total_amount DESC, offering_type ASC";
const MEMBER_SUMMARY_COLUMNS: &[&str] =
    &["offering_type", "total_amount", "count", "first_date", "last_date"];

/// ## Summary
/// Lists offering types by name, optionally only the active ones.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn list_offering_types(
    conn: &mut DbConnection,
    active_only: bool,
) -> DbResult<Vec<OfferingType>> {
    let stmt = SelectQuery::new(OFFERING_TYPE_SELECT, OfferingTypeColumn::Id)
        .projection(OfferingType::COLUMNS)
        .where_eq(OfferingTypeColumn::IsActive, active_only.then_some(true))
        .order_by(OfferingTypeColumn::Name, Direction::Asc)
        .build_all();
    conn.fetch_all(&stmt).await
}

fn offering_type_insert(kind: &NewOfferingType) -> InsertQuery<OfferingTypeColumn> {
    InsertQuery::new(OFFERING_TYPE_TABLE)
        .value(OfferingTypeColumn::Name, kind.name.as_str())
        .value(OfferingTypeColumn::Description, kind.description.as_deref())
        .value(OfferingTypeColumn::IsActive, kind.is_active)
}

/// ## Summary
/// Inserts an offering type and returns its id.
///
/// ## Errors
/// Returns storage failures, including a duplicate name.
#[tracing::instrument(skip(conn, kind))]
pub async fn insert_offering_type(
    conn: &mut DbConnection,
    kind: &NewOfferingType,
) -> DbResult<i64> {
    conn.insert(&offering_type_insert(kind).build()).await
}

/// ## Summary
/// Inserts an offering type unless one with the same name exists. Returns whether a row was added.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, kind), fields(name = %kind.name))]
pub async fn ensure_offering_type(
    conn: &mut DbConnection,
    kind: &NewOfferingType,
) -> DbResult<bool> {
    let stmt = offering_type_insert(kind).or_ignore().build();
    Ok(conn.execute(&stmt).await?.rows_affected() > 0)
}

fn offering_query() -> SelectQuery<OfferingColumn> {
    SelectQuery::new(OFFERING_SELECT, OfferingColumn::Id).projection(Offering::COLUMNS)
}

/// ## Summary
/// Records an offering and returns its id.
///
/// ## Errors
/// Returns storage failures, including foreign-key violations.
#[tracing::instrument(skip(conn, offering))]
pub async fn insert_offering(conn: &mut DbConnection, offering: &NewOffering) -> DbResult<i64> {
    let stmt = InsertQuery::new(OFFERING_TABLE)
        .value(OfferingColumn::MemberId, offering.member_id)
        .value(OfferingColumn::OfferingDate, offering.offering_date)
        .value(OfferingColumn::OfferingType, offering.offering_type.as_str())
        .value(OfferingColumn::Amount, offering.amount)
        .value(OfferingColumn::Memo, offering.memo.as_deref())
        .value(OfferingColumn::CreatedBy, offering.created_by)
        .build();
    conn.insert(&stmt).await
}

/// ## Summary
/// Fetches one offering.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn find_offering(conn: &mut DbConnection, id: i64) -> DbResult<Option<Offering>> {
    let stmt = offering_query()
        .where_eq(OfferingColumn::Id, Some(id))
        .build_all();
    conn.fetch_optional(&stmt).await
}

/// ## Summary
/// Lists offerings matching every present filter, newest first.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn list_offerings(
    conn: &mut DbConnection,
    filter: &OfferingFilter,
    page: Page,
) -> DbResult<Vec<Offering>> {
    let stmt = offering_query()
        .where_eq(OfferingColumn::MemberId, filter.member_id)
        .where_eq(OfferingColumn::OfferingType, filter.offering_type.as_deref())
        .filter(OfferingColumn::OfferingDate, Op::GtEq, filter.start_date)
        .filter(OfferingColumn::OfferingDate, Op::LtEq, filter.end_date)
        .filter(OfferingColumn::Amount, Op::GtEq, filter.min_amount)
        .filter(OfferingColumn::Amount, Op::LtEq, filter.max_amount)
        .order_by(OfferingColumn::OfferingDate, Direction::Desc)
        .order_by(OfferingColumn::CreatedAt, Direction::Desc)
        .build(page);
    conn.fetch_all(&stmt).await
}

/// ## Summary
/// Applies the supplied fields to one offering and stamps `updated_at`.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, changes))]
pub async fn update_offering(
    conn: &mut DbConnection,
    id: i64,
    changes: &OfferingChanges,
) -> DbResult<UpdateOutcome> {
    UpdateQuery::new(OFFERING_TABLE)
        .set(OfferingColumn::MemberId, changes.member_id)
        .set(OfferingColumn::OfferingDate, changes.offering_date)
        .set(OfferingColumn::OfferingType, changes.offering_type.as_deref())
        .set(OfferingColumn::Amount, changes.amount)
        .set(OfferingColumn::Memo, changes.memo.as_deref())
        .touch(OfferingColumn::UpdatedAt)
        .apply(conn, OfferingColumn::Id, id)
        .await
}

/// ## Summary
/// Deletes one offering. Returns whether it existed.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn))]
pub async fn delete_offering(conn: &mut DbConnection, id: i64) -> DbResult<bool> {
    let stmt = Statement::new("DELETE FROM offerings WHERE id = ?").bind(id);
    Ok(conn.execute(&stmt).await?.rows_affected() > 0)
}

/// ## Summary
/// Counts the offerings recorded for a member.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn))]
pub async fn count_member_offerings(conn: &mut DbConnection, member_id: i64) -> DbResult<i64> {
    let stmt = Statement::new("SELECT COUNT(*) FROM offerings WHERE member_id = ?").bind(member_id);
    conn.fetch_scalar(&stmt).await
}

/// ## Summary
/// Totals, per-type and per-month sums for offerings dated within `start..=end`.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn offering_statistics(
    conn: &mut DbConnection,
    start: NaiveDate,
    end: NaiveDate,
) -> DbResult<OfferingStatistics> {
    let ranged = |sql: &str, columns: &'static [&'static str]| {
        Statement::new(sql)
            .bind(start)
            .bind(end)
            .with_projection(columns)
    };

    let total: OfferingTotal = conn
        .fetch_optional(&ranged(TOTAL_SQL, TOTAL_COLUMNS))
        .await?
        .ok_or_else(|| DbError::DecodeError("aggregate query returned no rows".to_string()))?;
    let by_type: Vec<OfferingTypeTotal> = conn
        .fetch_all(&ranged(BY_TYPE_SQL, BY_TYPE_COLUMNS))
        .await?;
    let monthly: Vec<MonthlyTotal> = conn
        .fetch_all(&ranged(MONTHLY_SQL, MONTHLY_COLUMNS))
        .await?;

    Ok(OfferingStatistics {
        total,
        by_type,
        monthly,
    })
}

/// ## Summary
/// Per-type giving for one member within `start..=end`.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn member_offering_summary(
    conn: &mut DbConnection,
    member_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> DbResult<Vec<MemberOfferingSummary>> {
    let stmt = Statement::new(MEMBER_SUMMARY_SQL)
        .bind(member_id)
        .bind(start)
        .bind(end)
        .with_projection(MEMBER_SUMMARY_COLUMNS);
    conn.fetch_all(&stmt).await
}
