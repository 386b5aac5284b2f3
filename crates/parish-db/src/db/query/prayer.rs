use parish_core::page::Page;

use crate::db::DbConnection;
use crate::db::query::column::columns;
use crate::db::query::{Direction, InsertQuery, SelectQuery, UpdateOutcome, UpdateQuery};
use crate::db::statement::Statement;
use crate::error::DbResult;
use crate::model::prayer::{
    NewPrayer, NewPrayerCategory, NewPrayerComment, Prayer, PrayerCategory, PrayerChanges,
    PrayerComment, PrayerFilter, PrayerParticipant,
};

columns!(pub enum CategoryColumn as "c" {
    Id => "id",
    Name => "name",
    Description => "description",
    Color => "color",
    IsActive => "is_active",
    CreatedAt => "created_at",
});

columns!(pub enum PrayerColumn as "p" {
    Id => "id",
    Title => "title",
    Content => "content",
    Category => "category",
    IsAnonymous => "is_anonymous",
    Visibility => "visibility",
    Status => "status",
    PrayerPeriodStart => "prayer_period_start",
    PrayerPeriodEnd => "prayer_period_end",
    AnswerContent => "answer_content",
    AnswerDate => "answer_date",
    Tags => "tags",
    CreatedBy => "created_by",
    CreatedAt => "created_at",
    UpdatedAt => "updated_at",
});

columns!(pub enum ParticipantColumn as "pp" {
    Id => "id",
    PrayerId => "prayer_id",
    UserId => "user_id",
    ParticipatedAt => "participated_at",
});

columns!(pub enum CommentColumn as "pc" {
    Id => "id",
    PrayerId => "prayer_id",
    UserId => "user_id",
    Comment => "comment",
    IsAnonymous => "is_anonymous",
    CreatedAt => "created_at",
});

const CATEGORY_TABLE: &str = "prayer_categories";
const PRAYER_TABLE: &str = "prayers";
const PARTICIPANT_TABLE: &str = "prayer_participants";
const COMMENT_TABLE: &str = "prayer_comments";

const CATEGORY_SELECT: &str =
    "SELECT c.id, c.name, c.description, c.color, c.is_active, c.created_at FROM prayer_categories c";

const PRAYER_SELECT: &str = "SELECT p.id, p.title, p.content, p.category, p.is_anonymous, p.visibility, \
     p.status, p.prayer_period_start, p.prayer_period_end, p.answer_content, p.answer_date, p.tags, \
     p.created_by, p.created_at, p.updated_at FROM prayers p";

const PARTICIPANT_SELECT: &str = "SELECT pp.id, pp.prayer_id, pp.user_id, pp.participated_at, \
     u.username AS username, u.full_name AS full_name \
     FROM prayer_participants pp LEFT JOIN users u ON u.id = pp.user_id";

const COMMENT_SELECT: &str = "SELECT pc.id, pc.prayer_id, pc.user_id, pc.comment, pc.is_anonymous, \
     pc.created_at, u.username AS username, u.full_name AS full_name \
     FROM prayer_comments pc LEFT JOIN users u ON u.id = pc.user_id";

/// ## Summary
/// Lists prayer categories by name, optionally only the active ones.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn list_categories(
    conn: &mut DbConnection,
    active_only: bool,
) -> DbResult<Vec<PrayerCategory>> {
    let stmt = SelectQuery::new(CATEGORY_SELECT, CategoryColumn::Id)
        .projection(PrayerCategory::COLUMNS)
        .where_eq(CategoryColumn::IsActive, active_only.then_some(true))
        .order_by(CategoryColumn::Name, Direction::Asc)
        .build_all();
    conn.fetch_all(&stmt).await
}

fn category_insert(category: &NewPrayerCategory) -> InsertQuery<CategoryColumn> {
    InsertQuery::new(CATEGORY_TABLE)
        .value(CategoryColumn::Name, category.name.as_str())
        .value(CategoryColumn::Description, category.description.as_deref())
        .value(CategoryColumn::Color, category.color.as_deref())
        .value(CategoryColumn::IsActive, category.is_active)
}

/// ## Summary
/// Inserts a prayer category and returns its id.
///
/// ## Errors
/// Returns storage failures, including a duplicate name.
#[tracing::instrument(skip(conn, category))]
pub async fn insert_category(
    conn: &mut DbConnection,
    category: &NewPrayerCategory,
) -> DbResult<i64> {
    conn.insert(&category_insert(category).build()).await
}

/// ## Summary
/// Inserts a category unless one with the same name exists. Returns whether a row was added.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, category), fields(name = %category.name))]
pub async fn ensure_category(
    conn: &mut DbConnection,
    category: &NewPrayerCategory,
) -> DbResult<bool> {
    let stmt = category_insert(category).or_ignore().build();
    Ok(conn.execute(&stmt).await?.rows_affected() > 0)
}

fn prayer_query() -> SelectQuery<PrayerColumn> {
    SelectQuery::new(PRAYER_SELECT, PrayerColumn::Id).projection(Prayer::COLUMNS)
}

/// ## Summary
/// Inserts a prayer request and returns its id.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, prayer))]
pub async fn insert_prayer(conn: &mut DbConnection, prayer: &NewPrayer) -> DbResult<i64> {
    let stmt = InsertQuery::new(PRAYER_TABLE)
        .value(PrayerColumn::Title, prayer.title.as_str())
        .value(PrayerColumn::Content, prayer.content.as_str())
        .value(PrayerColumn::Category, prayer.category.as_str())
        .value(PrayerColumn::IsAnonymous, prayer.is_anonymous)
        .value(PrayerColumn::Visibility, prayer.visibility)
        .value(PrayerColumn::Status, prayer.status)
        .value(PrayerColumn::PrayerPeriodStart, prayer.prayer_period_start)
        .value(PrayerColumn::PrayerPeriodEnd, prayer.prayer_period_end)
        .value(PrayerColumn::Tags, prayer.tags.as_deref())
        .value(PrayerColumn::CreatedBy, prayer.created_by)
        .build();
    conn.insert(&stmt).await
}

/// ## Summary
/// Fetches one prayer request.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn find_prayer(conn: &mut DbConnection, id: i64) -> DbResult<Option<Prayer>> {
    let stmt = prayer_query()
        .where_eq(PrayerColumn::Id, Some(id))
        .build_all();
    conn.fetch_optional(&stmt).await
}

/// ## Summary
/// Lists prayer requests matching every present filter, newest first.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn list_prayers(
    conn: &mut DbConnection,
    filter: &PrayerFilter,
    page: Page,
) -> DbResult<Vec<Prayer>> {
    let stmt = prayer_query()
        .where_eq(PrayerColumn::Category, filter.category.as_deref())
        .where_eq(PrayerColumn::Status, filter.status)
        .where_eq(PrayerColumn::Visibility, filter.visibility)
        .where_eq(PrayerColumn::CreatedBy, filter.user_id)
        .order_by(PrayerColumn::CreatedAt, Direction::Desc)
        .build(page);
    conn.fetch_all(&stmt).await
}

/// ## Summary
/// Applies the supplied fields to one prayer request and stamps `updated_at`.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, changes))]
pub async fn update_prayer(
    conn: &mut DbConnection,
    id: i64,
    changes: &PrayerChanges,
) -> DbResult<UpdateOutcome> {
    UpdateQuery::new(PRAYER_TABLE)
        .set(PrayerColumn::Title, changes.title.as_deref())
        .set(PrayerColumn::Content, changes.content.as_deref())
        .set(PrayerColumn::Category, changes.category.as_deref())
        .set(PrayerColumn::IsAnonymous, changes.is_anonymous)
        .set(PrayerColumn::Visibility, changes.visibility)
        .set(PrayerColumn::Status, changes.status)
        .set(PrayerColumn::PrayerPeriodStart, changes.prayer_period_start)
        .set(PrayerColumn::PrayerPeriodEnd, changes.prayer_period_end)
        .set(PrayerColumn::AnswerContent, changes.answer_content.as_deref())
        .set(PrayerColumn::AnswerDate, changes.answer_date)
        .set(PrayerColumn::Tags, changes.tags.as_deref())
        .touch(PrayerColumn::UpdatedAt)
        .apply(conn, PrayerColumn::Id, id)
        .await
}

/// ## Summary
/// Deletes a prayer request together with its comments and participation rows,
/// in one transaction. Returns whether the prayer existed.
///
/// ## Errors
/// Returns storage failures; nothing is changed in that case.
#[tracing::instrument(skip(conn))]
pub async fn delete_prayer(conn: &mut DbConnection, id: i64) -> DbResult<bool> {
    let stmts = [
        Statement::new("DELETE FROM prayer_comments WHERE prayer_id = ?").bind(id),
        Statement::new("DELETE FROM prayer_participants WHERE prayer_id = ?").bind(id),
        Statement::new("DELETE FROM prayers WHERE id = ?").bind(id),
    ];
    let results = conn.execute_batch(&stmts).await?;
    Ok(results.last().is_some_and(|rs| rs.rows_affected() > 0))
}

/// ## Summary
/// Records that a user prays for a request. Repeating it is harmless; the id of
/// the participation row is returned either way.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn))]
pub async fn participate(conn: &mut DbConnection, prayer_id: i64, user_id: i64) -> DbResult<i64> {
    let insert = InsertQuery::new(PARTICIPANT_TABLE)
        .value(ParticipantColumn::PrayerId, prayer_id)
        .value(ParticipantColumn::UserId, user_id)
        .or_ignore()
        .build();
    let rs = conn.execute(&insert).await?;
    if rs.rows_affected() > 0
        && let Some(id) = rs.last_insert_rowid()
    {
        return Ok(id);
    }

    let existing = Statement::new(
        "SELECT id FROM prayer_participants WHERE prayer_id = ? AND user_id = ?",
    )
    .bind(prayer_id)
    .bind(user_id);
    conn.fetch_scalar(&existing).await
}

/// ## Summary
/// Lists the users praying for a request, most recent first.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn list_participants(
    conn: &mut DbConnection,
    prayer_id: i64,
) -> DbResult<Vec<PrayerParticipant>> {
    let stmt = SelectQuery::new(PARTICIPANT_SELECT, ParticipantColumn::Id)
        .projection(PrayerParticipant::COLUMNS)
        .where_eq(ParticipantColumn::PrayerId, Some(prayer_id))
        .order_by(ParticipantColumn::ParticipatedAt, Direction::Desc)
        .build_all();
    conn.fetch_all(&stmt).await
}

/// ## Summary
/// Adds a comment to a prayer request and returns its id.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, comment))]
pub async fn insert_comment(
    conn: &mut DbConnection,
    prayer_id: i64,
    comment: &NewPrayerComment,
) -> DbResult<i64> {
    let stmt = InsertQuery::new(COMMENT_TABLE)
        .value(CommentColumn::PrayerId, prayer_id)
        .value(CommentColumn::UserId, comment.user_id)
        .value(CommentColumn::Comment, comment.comment.as_str())
        .value(CommentColumn::IsAnonymous, comment.is_anonymous)
        .build();
    conn.insert(&stmt).await
}

/// ## Summary
/// Lists the comments on a prayer request, oldest first.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn list_comments(
    conn: &mut DbConnection,
    prayer_id: i64,
) -> DbResult<Vec<PrayerComment>> {
    let stmt = SelectQuery::new(COMMENT_SELECT, CommentColumn::Id)
        .projection(PrayerComment::COLUMNS)
        .where_eq(CommentColumn::PrayerId, Some(prayer_id))
        .order_by(CommentColumn::CreatedAt, Direction::Asc)
        .build_all();
    conn.fetch_all(&stmt).await
}

/// ## Summary
/// Deletes a comment if `user_id` wrote it. Returns whether a row was removed.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn))]
pub async fn delete_comment(
    conn: &mut DbConnection,
    comment_id: i64,
    user_id: i64,
) -> DbResult<bool> {
    let stmt = Statement::new("DELETE FROM prayer_comments WHERE id = ? AND user_id = ?")
        .bind(comment_id)
        .bind(user_id);
    Ok(conn.execute(&stmt).await?.rows_affected() > 0)
}
