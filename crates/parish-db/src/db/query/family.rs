use parish_core::page::Page;

use crate::db::DbConnection;
use crate::db::query::column::columns;
use crate::db::query::{Direction, InsertQuery, SelectQuery, UpdateOutcome, UpdateQuery};
use crate::db::statement::Statement;
use crate::error::DbResult;
use crate::model::family::{Family, FamilyChanges, NewFamily};

columns!(pub enum FamilyColumn as "f" {
    Id => "id",
    FamilyName => "family_name",
    HeadMemberId => "head_member_id",
    Address => "address",
    CreatedAt => "created_at",
});

const FAMILY_TABLE: &str = "families";

const FAMILY_SELECT: &str = "SELECT f.id, f.family_name, f.head_member_id, f.address, f.created_at, \
     hm.name AS head_member_name, \
     (SELECT COUNT(*) FROM members fm WHERE fm.family_id = f.id) AS member_count \
     FROM families f LEFT JOIN members hm ON hm.id = f.head_member_id";

fn family_query() -> SelectQuery<FamilyColumn> {
    SelectQuery::new(FAMILY_SELECT, FamilyColumn::Id).projection(Family::COLUMNS)
}

/// ## Summary
/// Inserts a family and returns its id.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, family))]
pub async fn insert_family(conn: &mut DbConnection, family: &NewFamily) -> DbResult<i64> {
    let stmt = InsertQuery::new(FAMILY_TABLE)
        .value(FamilyColumn::FamilyName, family.family_name.as_str())
        .value(FamilyColumn::HeadMemberId, family.head_member_id)
        .value(FamilyColumn::Address, family.address.as_deref())
        .build();
    conn.insert(&stmt).await
}

/// ## Summary
/// Fetches one family with its head's name and member count.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn find_family(conn: &mut DbConnection, id: i64) -> DbResult<Option<Family>> {
    let stmt = family_query()
        .where_eq(FamilyColumn::Id, Some(id))
        .build_all();
    conn.fetch_optional(&stmt).await
}

/// ## Summary
/// Lists families by name.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn list_families(conn: &mut DbConnection, page: Page) -> DbResult<Vec<Family>> {
    let stmt = family_query()
        .order_by(FamilyColumn::FamilyName, Direction::Asc)
        .build(page);
    conn.fetch_all(&stmt).await
}

/// ## Summary
/// Applies the supplied fields to one family.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, changes))]
pub async fn update_family(
    conn: &mut DbConnection,
    id: i64,
    changes: &FamilyChanges,
) -> DbResult<UpdateOutcome> {
    UpdateQuery::new(FAMILY_TABLE)
        .set(FamilyColumn::FamilyName, changes.family_name.as_deref())
        .set(FamilyColumn::HeadMemberId, changes.head_member_id)
        .set(FamilyColumn::Address, changes.address.as_deref())
        .apply(conn, FamilyColumn::Id, id)
        .await
}

/// ## Summary
/// Detaches every member from the family, then deletes it, in one transaction.
/// Returns whether the family existed.
///
/// ## Errors
/// Returns storage failures; nothing is changed in that case.
#[tracing::instrument(skip(conn))]
pub async fn delete_family(conn: &mut DbConnection, id: i64) -> DbResult<bool> {
    let stmts = [
        Statement::new(
            "UPDATE members SET family_id = NULL, family_role = NULL, updated_at = CURRENT_TIMESTAMP \
             WHERE family_id = ?",
        )
        .bind(id),
        Statement::new("DELETE FROM families WHERE id = ?").bind(id),
    ];
    let results = conn.execute_batch(&stmts).await?;
    Ok(results.last().is_some_and(|rs| rs.rows_affected() > 0))
}
