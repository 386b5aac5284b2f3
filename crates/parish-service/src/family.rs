//! Households and their membership.

use std::sync::Arc;

use parish_core::page::Page;
use parish_db::db::DbProvider;
use parish_db::db::query::{UpdateOutcome, family, member};
use parish_db::model::family::{Family, FamilyChanges, FamilyMembership, NewFamily};
use parish_db::model::member::Member;

use crate::error::{ServiceError, ServiceResult, found};
use crate::refs;

const FAMILY: &str = "Family";
const MEMBER: &str = "Member";

#[derive(Clone)]
pub struct FamilyService {
    db: Arc<dyn DbProvider>,
}

impl FamilyService {
    #[must_use]
    pub fn new(db: Arc<dyn DbProvider>) -> Self {
        Self { db }
    }

    /// ## Summary
    /// Registers a family and returns its id.
    ///
    /// ## Errors
    /// Returns a validation error for a bad name, `ServiceError::NotFound` for an
    /// unknown head member, or a storage failure.
    #[tracing::instrument(skip(self, payload))]
    pub async fn create(&self, payload: &NewFamily) -> ServiceResult<i64> {
        payload.validate()?;
        let mut conn = self.db.get_connection().await?;
        refs::require_member(&mut conn, payload.head_member_id).await?;
        let id = family::insert_family(&mut conn, payload).await?;
        tracing::info!(family_id = id, "Family created");
        Ok(id)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if the family does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: i64) -> ServiceResult<Family> {
        let mut conn = self.db.get_connection().await?;
        found(family::find_family(&mut conn, id).await?, FAMILY)
    }

    /// ## Errors
    /// Returns storage failures.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, page: Page) -> ServiceResult<Vec<Family>> {
        let mut conn = self.db.get_connection().await?;
        Ok(family::list_families(&mut conn, page).await?)
    }

    /// ## Summary
    /// Lists the members of a family.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` if the family does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn members(&self, family_id: i64) -> ServiceResult<Vec<Member>> {
        let mut conn = self.db.get_connection().await?;
        found(family::find_family(&mut conn, family_id).await?, FAMILY)?;
        Ok(member::list_family_members(&mut conn, family_id).await?)
    }

    /// ## Summary
    /// Applies the supplied fields and returns the family as stored afterwards.
    /// An update with no fields leaves the row untouched.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` if the family or the new head member does not exist.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update(&self, id: i64, changes: &FamilyChanges) -> ServiceResult<Family> {
        changes.validate()?;
        let mut conn = self.db.get_connection().await?;
        refs::require_member(&mut conn, changes.head_member_id).await?;
        match family::update_family(&mut conn, id, changes).await? {
            UpdateOutcome::Missing => Err(ServiceError::NotFound(FAMILY)),
            UpdateOutcome::Applied | UpdateOutcome::NoChanges => {
                found(family::find_family(&mut conn, id).await?, FAMILY)
            }
        }
    }

    /// ## Summary
    /// Deletes a family. Its members stay registered without a family.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` if the family does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut conn = self.db.get_connection().await?;
        if !family::delete_family(&mut conn, id).await? {
            return Err(ServiceError::NotFound(FAMILY));
        }
        tracing::info!(family_id = id, "Family deleted");
        Ok(())
    }

    /// ## Summary
    /// Places a member in a family with the requested role.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` if either the family or the member does not exist.
    #[tracing::instrument(skip(self, membership), fields(member_id = membership.member_id))]
    pub async fn add_member(
        &self,
        family_id: i64,
        membership: &FamilyMembership,
    ) -> ServiceResult<()> {
        membership.validate()?;
        let mut conn = self.db.get_connection().await?;
        found(family::find_family(&mut conn, family_id).await?, FAMILY)?;

        let outcome = member::assign_family(
            &mut conn,
            membership.member_id,
            family_id,
            &membership.family_role,
        )
        .await?;
        if outcome == UpdateOutcome::Missing {
            return Err(ServiceError::NotFound(MEMBER));
        }
        Ok(())
    }

    /// ## Summary
    /// Takes a member out of its family, clearing both the family and the role.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` if the member does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn remove_member(&self, member_id: i64) -> ServiceResult<()> {
        let mut conn = self.db.get_connection().await?;
        if !member::clear_family(&mut conn, member_id).await? {
            return Err(ServiceError::NotFound(MEMBER));
        }
        Ok(())
    }
}
