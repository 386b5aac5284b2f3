use parish_core::page::Page;

use crate::db::DbConnection;
use crate::db::query::column::columns;
use crate::db::query::{Direction, InsertQuery, Op, SelectQuery, UpdateOutcome, UpdateQuery};
use crate::db::statement::Statement;
use crate::error::DbResult;
use crate::model::member::{Member, MemberChanges, MemberFilter, NewMember};

columns!(pub enum MemberColumn as "m" {
    Id => "id",
    Name => "name",
    NameEn => "name_en",
    BirthDate => "birth_date",
    Gender => "gender",
    Phone => "phone",
    Email => "email",
    Address => "address",
    Job => "job",
    RegistrationDate => "registration_date",
    BaptismDate => "baptism_date",
    Position => "position",
    District => "district",
    FamilyId => "family_id",
    FamilyRole => "family_role",
    IsActive => "is_active",
    Notes => "notes",
    CreatedBy => "created_by",
    CreatedAt => "created_at",
    UpdatedAt => "updated_at",
});

const MEMBER_TABLE: &str = "members";

const MEMBER_SELECT: &str = "SELECT m.id, m.name, m.name_en, m.birth_date, m.gender, m.phone, m.email, \
     m.address, m.job, m.registration_date, m.baptism_date, m.position, m.district, m.family_id, \
     m.family_role, m.is_active, m.notes, m.created_by, m.created_at, m.updated_at, \
     f.family_name AS family_name, u.username AS created_by_username \
     FROM members m \
     LEFT JOIN families f ON f.id = m.family_id \
     LEFT JOIN users u ON u.id = m.created_by";

fn member_query() -> SelectQuery<MemberColumn> {
    SelectQuery::new(MEMBER_SELECT, MemberColumn::Id).projection(Member::COLUMNS)
}

/// ## Summary
/// Inserts a member and returns its id.
///
/// ## Errors
/// Returns storage failures, including foreign-key violations.
#[tracing::instrument(skip(conn, member))]
pub async fn insert_member(conn: &mut DbConnection, member: &NewMember) -> DbResult<i64> {
    let stmt = InsertQuery::new(MEMBER_TABLE)
        .value(MemberColumn::Name, member.name.as_str())
        .value(MemberColumn::NameEn, member.name_en.as_deref())
        .value(MemberColumn::BirthDate, member.birth_date)
        .value(MemberColumn::Gender, member.gender)
        .value(MemberColumn::Phone, member.phone.as_deref())
        .value(MemberColumn::Email, member.email.as_deref())
        .value(MemberColumn::Address, member.address.as_deref())
        .value(MemberColumn::Job, member.job.as_deref())
        .value(MemberColumn::RegistrationDate, member.registration_date)
        .value(MemberColumn::BaptismDate, member.baptism_date)
        .value(MemberColumn::Position, member.position.as_str())
        .value(MemberColumn::District, member.district.as_deref())
        .value(MemberColumn::FamilyId, member.family_id)
        .value(MemberColumn::FamilyRole, member.family_role.as_deref())
        .value(MemberColumn::IsActive, member.is_active)
        .value(MemberColumn::Notes, member.notes.as_deref())
        .value(MemberColumn::CreatedBy, member.created_by)
        .build();
    conn.insert(&stmt).await
}

/// ## Summary
/// Fetches one member.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn find_member(conn: &mut DbConnection, id: i64) -> DbResult<Option<Member>> {
    let stmt = member_query()
        .where_eq(MemberColumn::Id, Some(id))
        .build_all();
    conn.fetch_optional(&stmt).await
}

/// ## Summary
/// Lists members matching every present filter, by name.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn list_members(
    conn: &mut DbConnection,
    filter: &MemberFilter,
    page: Page,
) -> DbResult<Vec<Member>> {
    let stmt = member_query()
        .filter(MemberColumn::Name, Op::Contains, filter.name.as_deref())
        .where_eq(MemberColumn::District, filter.district.as_deref())
        .where_eq(MemberColumn::Position, filter.position.as_deref())
        .where_eq(MemberColumn::FamilyId, filter.family_id)
        .where_eq(MemberColumn::IsActive, filter.is_active)
        .order_by(MemberColumn::Name, Direction::Asc)
        .build(page);
    conn.fetch_all(&stmt).await
}

/// ## Summary
/// Lists the members of one family by role, then age.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn list_family_members(
    conn: &mut DbConnection,
    family_id: i64,
) -> DbResult<Vec<Member>> {
    let stmt = member_query()
        .where_eq(MemberColumn::FamilyId, Some(family_id))
        .order_by(MemberColumn::FamilyRole, Direction::Asc)
        .order_by(MemberColumn::BirthDate, Direction::Asc)
        .build_all();
    conn.fetch_all(&stmt).await
}

/// ## Summary
/// Applies the supplied fields to one member and stamps `updated_at`.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, changes))]
pub async fn update_member(
    conn: &mut DbConnection,
    id: i64,
    changes: &MemberChanges,
) -> DbResult<UpdateOutcome> {
    UpdateQuery::new(MEMBER_TABLE)
        .set(MemberColumn::Name, changes.name.as_deref())
        .set(MemberColumn::NameEn, changes.name_en.as_deref())
        .set(MemberColumn::BirthDate, changes.birth_date)
        .set(MemberColumn::Gender, changes.gender)
        .set(MemberColumn::Phone, changes.phone.as_deref())
        .set(MemberColumn::Email, changes.email.as_deref())
        .set(MemberColumn::Address, changes.address.as_deref())
        .set(MemberColumn::Job, changes.job.as_deref())
        .set(MemberColumn::RegistrationDate, changes.registration_date)
        .set(MemberColumn::BaptismDate, changes.baptism_date)
        .set(MemberColumn::Position, changes.position.as_deref())
        .set(MemberColumn::District, changes.district.as_deref())
        .set(MemberColumn::FamilyId, changes.family_id)
        .set(MemberColumn::FamilyRole, changes.family_role.as_deref())
        .set(MemberColumn::IsActive, changes.is_active)
        .set(MemberColumn::Notes, changes.notes.as_deref())
        .touch(MemberColumn::UpdatedAt)
        .apply(conn, MemberColumn::Id, id)
        .await
}

/// ## Summary
/// Places a member in a family with the given role.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn))]
pub async fn assign_family(
    conn: &mut DbConnection,
    member_id: i64,
    family_id: i64,
    family_role: &str,
) -> DbResult<UpdateOutcome> {
    UpdateQuery::new(MEMBER_TABLE)
        .set(MemberColumn::FamilyId, Some(family_id))
        .set(MemberColumn::FamilyRole, Some(family_role))
        .touch(MemberColumn::UpdatedAt)
        .apply(conn, MemberColumn::Id, member_id)
        .await
}

/// ## Summary
/// Clears a member's family and role. Returns whether the member exists.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn))]
pub async fn clear_family(conn: &mut DbConnection, member_id: i64) -> DbResult<bool> {
    // NULL is never produced by a partial update, so this one is spelled out.
    let stmt = Statement::new(
        "UPDATE members SET family_id = NULL, family_role = NULL, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ?",
    )
    .bind(member_id);
    Ok(conn.execute(&stmt).await?.rows_affected() > 0)
}

/// ## Summary
/// Unsets the member as head of any family, then deletes it, in one transaction.
/// Returns whether the member existed.
///
/// ## Errors
/// Returns storage failures; nothing is changed in that case.
#[tracing::instrument(skip(conn))]
pub async fn delete_member(conn: &mut DbConnection, id: i64) -> DbResult<bool> {
    let stmts = [
        Statement::new("UPDATE families SET head_member_id = NULL WHERE head_member_id = ?")
            .bind(id),
        Statement::new("DELETE FROM members WHERE id = ?").bind(id),
    ];
    let results = conn.execute_batch(&stmts).await?;
    Ok(results.last().is_some_and(|rs| rs.rows_affected() > 0))
}
