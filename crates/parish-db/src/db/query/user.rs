use crate::db::DbConnection;
use crate::db::query::column::columns;
use crate::db::query::{InsertQuery, SelectQuery};
use crate::error::DbResult;
use crate::model::user::{NewUser, User};

columns!(pub enum UserColumn as "u" {
    Id => "id",
    Email => "email",
    Username => "username",
    PasswordHash => "password_hash",
    FullName => "full_name",
    Role => "role",
    IsActive => "is_active",
    CreatedAt => "created_at",
});

const USER_TABLE: &str = "users";

const USER_SELECT: &str =
    "SELECT u.id, u.email, u.username, u.full_name, u.role, u.is_active, u.created_at FROM users u";

/// ## Summary
/// Creates an account unless the email or username is taken. Returns whether a row was added.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, user), fields(username = %user.username))]
pub async fn ensure_user(conn: &mut DbConnection, user: &NewUser) -> DbResult<bool> {
    let stmt = InsertQuery::new(USER_TABLE)
        .value(UserColumn::Email, user.email.as_str())
        .value(UserColumn::Username, user.username.as_str())
        .value(UserColumn::PasswordHash, user.password_hash.as_str())
        .value(UserColumn::FullName, user.full_name.as_deref())
        .value(UserColumn::Role, user.role.as_str())
        .value(UserColumn::IsActive, user.is_active)
        .or_ignore()
        .build();
    Ok(conn.execute(&stmt).await?.rows_affected() > 0)
}

/// ## Summary
/// Fetches an account by username.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn find_user_by_username(
    conn: &mut DbConnection,
    username: &str,
) -> DbResult<Option<User>> {
    let stmt = SelectQuery::new(USER_SELECT, UserColumn::Id)
        .projection(User::COLUMNS)
        .where_eq(UserColumn::Username, Some(username))
        .build_all();
    conn.fetch_optional(&stmt).await
}

/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn find_user(conn: &mut DbConnection, id: i64) -> DbResult<Option<User>> {
    let stmt = SelectQuery::new(USER_SELECT, UserColumn::Id)
        .projection(User::COLUMNS)
        .where_eq(UserColumn::Id, Some(id))
        .build_all();
    conn.fetch_optional(&stmt).await
}
