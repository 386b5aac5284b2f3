//! The member registry.

use std::sync::Arc;

use parish_core::page::Page;
use parish_db::db::DbProvider;
use parish_db::db::query::{UpdateOutcome, member, offering};
use parish_db::model::member::{Member, MemberChanges, MemberFilter, NewMember};

use crate::error::{ServiceError, ServiceResult, found};
use crate::refs;

const MEMBER: &str = "Member";

#[derive(Clone)]
pub struct MemberService {
    db: Arc<dyn DbProvider>,
}

impl MemberService {
    #[must_use]
    pub fn new(db: Arc<dyn DbProvider>) -> Self {
        Self { db }
    }

    /// ## Summary
    /// Registers a member and returns its id.
    ///
    /// ## Errors
    /// Returns a validation error for a bad field, `ServiceError::NotFound` for an
    /// unknown family or creating user, or a storage failure.
    #[tracing::instrument(skip(self, payload))]
    pub async fn create(&self, payload: &NewMember) -> ServiceResult<i64> {
        payload.validate()?;
        let mut conn = self.db.get_connection().await?;
        refs::require_family(&mut conn, payload.family_id).await?;
        refs::require_user(&mut conn, Some(payload.created_by)).await?;
        let id = member::insert_member(&mut conn, payload).await?;
        tracing::info!(member_id = id, "Member registered");
        Ok(id)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if the member does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: i64) -> ServiceResult<Member> {
        let mut conn = self.db.get_connection().await?;
        found(member::find_member(&mut conn, id).await?, MEMBER)
    }

    /// ## Errors
    /// Returns storage failures.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, filter: &MemberFilter, page: Page) -> ServiceResult<Vec<Member>> {
        let mut conn = self.db.get_connection().await?;
        Ok(member::list_members(&mut conn, filter, page).await?)
    }

    /// ## Summary
    /// Applies the supplied fields and returns the member as stored afterwards.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` if the member or the new family does not exist.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update(&self, id: i64, changes: &MemberChanges) -> ServiceResult<Member> {
        changes.validate()?;
        let mut conn = self.db.get_connection().await?;
        refs::require_family(&mut conn, changes.family_id).await?;
        match member::update_member(&mut conn, id, changes).await? {
            UpdateOutcome::Missing => Err(ServiceError::NotFound(MEMBER)),
            UpdateOutcome::Applied | UpdateOutcome::NoChanges => {
                found(member::find_member(&mut conn, id).await?, MEMBER)
            }
        }
    }

    /// ## Summary
    /// Deletes a member, unsetting it as head of any family first. Members with
    /// recorded offerings are kept so giving history stays intact.
    ///
    /// ## Errors
    /// Returns `ServiceError::PreconditionFailed` if offerings reference the member
    /// and `ServiceError::NotFound` if it does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut conn = self.db.get_connection().await?;
        let offerings = offering::count_member_offerings(&mut conn, id).await?;
        if offerings > 0 {
            return Err(ServiceError::PreconditionFailed(format!(
                "member has {offerings} offering records and cannot be deleted"
            )));
        }
        if !member::delete_member(&mut conn, id).await? {
            return Err(ServiceError::NotFound(MEMBER));
        }
        tracing::info!(member_id = id, "Member deleted");
        Ok(())
    }
}
