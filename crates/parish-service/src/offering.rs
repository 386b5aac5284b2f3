//! Offering types, offering records and giving statistics.

use std::sync::Arc;

use chrono::NaiveDate;
use parish_core::page::Page;
use parish_core::validate;
use parish_db::db::DbProvider;
use parish_db::db::query::{UpdateOutcome, member, offering};
use parish_db::model::offering::{
    MemberOfferingSummary, NewOffering, NewOfferingType, Offering, OfferingChanges,
    OfferingFilter, OfferingStatistics, OfferingType,
};

use crate::error::{ServiceError, ServiceResult, found};
use crate::refs;

const OFFERING: &str = "Offering";
const MEMBER: &str = "Member";

#[derive(Clone)]
pub struct OfferingService {
    db: Arc<dyn DbProvider>,
}

impl OfferingService {
    #[must_use]
    pub fn new(db: Arc<dyn DbProvider>) -> Self {
        Self { db }
    }

    /// ## Errors
    /// Returns storage failures.
    #[tracing::instrument(skip(self))]
    pub async fn list_types(&self, active_only: bool) -> ServiceResult<Vec<OfferingType>> {
        let mut conn = self.db.get_connection().await?;
        Ok(offering::list_offering_types(&mut conn, active_only).await?)
    }

    /// ## Errors
    /// Returns a validation error for a bad name, or a storage failure (including a duplicate name).
    #[tracing::instrument(skip(self, payload))]
    pub async fn create_type(&self, payload: &NewOfferingType) -> ServiceResult<i64> {
        payload.validate()?;
        let mut conn = self.db.get_connection().await?;
        Ok(offering::insert_offering_type(&mut conn, payload).await?)
    }

    /// ## Summary
    /// Records an offering for an existing member and returns its id.
    ///
    /// ## Errors
    /// Returns a validation error for a bad field, `ServiceError::NotFound` for an
    /// unknown member or recording user, or a storage failure.
    #[tracing::instrument(skip(self, payload), fields(member_id = payload.member_id))]
    pub async fn create(&self, payload: &NewOffering) -> ServiceResult<i64> {
        payload.validate()?;
        let mut conn = self.db.get_connection().await?;
        refs::require_member(&mut conn, Some(payload.member_id)).await?;
        refs::require_user(&mut conn, Some(payload.created_by)).await?;
        let id = offering::insert_offering(&mut conn, payload).await?;
        tracing::info!(offering_id = id, "Offering recorded");
        Ok(id)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if the offering does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: i64) -> ServiceResult<Offering> {
        let mut conn = self.db.get_connection().await?;
        found(offering::find_offering(&mut conn, id).await?, OFFERING)
    }

    /// ## Errors
    /// Returns a precondition failure for an inverted range, or a storage failure.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, filter: &OfferingFilter, page: Page) -> ServiceResult<Vec<Offering>> {
        filter.validate()?;
        let mut conn = self.db.get_connection().await?;
        Ok(offering::list_offerings(&mut conn, filter, page).await?)
    }

    /// ## Summary
    /// Applies the supplied fields and returns the offering as stored afterwards.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` if the offering or the new member does not exist.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update(&self, id: i64, changes: &OfferingChanges) -> ServiceResult<Offering> {
        changes.validate()?;
        let mut conn = self.db.get_connection().await?;
        refs::require_member(&mut conn, changes.member_id).await?;
        match offering::update_offering(&mut conn, id, changes).await? {
            UpdateOutcome::Missing => Err(ServiceError::NotFound(OFFERING)),
            UpdateOutcome::Applied | UpdateOutcome::NoChanges => {
                found(offering::find_offering(&mut conn, id).await?, OFFERING)
            }
        }
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if the offering does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut conn = self.db.get_connection().await?;
        if !offering::delete_offering(&mut conn, id).await? {
            return Err(ServiceError::NotFound(OFFERING));
        }
        Ok(())
    }

    /// ## Summary
    /// Totals for offerings dated within `start..=end`, overall, per type and per month.
    ///
    /// ## Errors
    /// Returns a precondition failure when `start` is after `end`, checked before
    /// the store is touched.
    #[tracing::instrument(skip(self))]
    pub async fn statistics(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<OfferingStatistics> {
        validate::ordered_range(&start, &end)?;
        let mut conn = self.db.get_connection().await?;
        Ok(offering::offering_statistics(&mut conn, start, end).await?)
    }

    /// ## Summary
    /// One member's giving per offering type for a calendar year.
    ///
    /// ## Errors
    /// Returns a validation error for a year outside the accepted range and
    /// `ServiceError::NotFound` for an unknown member.
    #[tracing::instrument(skip(self))]
    pub async fn member_summary(
        &self,
        member_id: i64,
        year: i32,
    ) -> ServiceResult<Vec<MemberOfferingSummary>> {
        let start = validate::summary_year(year)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| ServiceError::ValidationError(format!("invalid year {year}")))?;

        let mut conn = self.db.get_connection().await?;
        found(member::find_member(&mut conn, member_id).await?, MEMBER)?;
        Ok(offering::member_offering_summary(&mut conn, member_id, start, end).await?)
    }
}
