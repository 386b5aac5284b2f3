//! Existence checks for rows a payload points at. A dangling id is reported as
//! `ServiceError::NotFound` before any write, not as a constraint failure.

use parish_db::db::DbConnection;
use parish_db::db::query::{family, member, user};

use crate::error::{ServiceResult, found};

/// ## Errors
/// Returns `ServiceError::NotFound("Family")` if `id` is set and names no family.
pub(crate) async fn require_family(
    conn: &mut DbConnection,
    id: Option<i64>,
) -> ServiceResult<()> {
    if let Some(id) = id {
        found(family::find_family(conn, id).await?, "Family")?;
    }
    Ok(())
}

/// ## Errors
/// Returns `ServiceError::NotFound("Member")` if `id` is set and names no member.
pub(crate) async fn require_member(
    conn: &mut DbConnection,
    id: Option<i64>,
) -> ServiceResult<()> {
    if let Some(id) = id {
        found(member::find_member(conn, id).await?, "Member")?;
    }
    Ok(())
}

/// ## Errors
/// Returns `ServiceError::NotFound("User")` if `id` is set and names no account.
pub(crate) async fn require_user(
    conn: &mut DbConnection,
    id: Option<i64>,
) -> ServiceResult<()> {
    if let Some(id) = id {
        found(user::find_user(conn, id).await?, "User")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::testing;

    #[test_log::test(tokio::test)]
    async fn absent_ids_pass_and_dangling_ids_are_not_found() {
        let db = testing::provider().await;
        let clerk = testing::user(&db, "clerk").await;
        let mut conn = db.get_connection().await.unwrap();

        require_user(&mut conn, Some(clerk)).await.unwrap();
        require_family(&mut conn, None).await.unwrap();
        require_member(&mut conn, None).await.unwrap();

        assert!(matches!(
            require_user(&mut conn, Some(clerk + 100)).await,
            Err(ServiceError::NotFound("User"))
        ));
        assert!(matches!(
            require_family(&mut conn, Some(9999)).await,
            Err(ServiceError::NotFound("Family"))
        ));
        assert!(matches!(
            require_member(&mut conn, Some(9999)).await,
            Err(ServiceError::NotFound("Member"))
        ));
    }
}
