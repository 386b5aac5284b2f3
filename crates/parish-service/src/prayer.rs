//! Prayer requests, categories, participation and comments.

use std::sync::Arc;

use parish_core::page::Page;
use parish_db::db::DbProvider;
use parish_db::db::query::{UpdateOutcome, prayer};
use parish_db::model::prayer::{
    NewPrayer, NewPrayerCategory, NewPrayerComment, Prayer, PrayerCategory, PrayerChanges,
    PrayerComment, PrayerFilter, PrayerParticipant,
};

use crate::error::{ServiceError, ServiceResult, found};
use crate::refs;

const PRAYER: &str = "Prayer";

#[derive(Clone)]
pub struct PrayerService {
    db: Arc<dyn DbProvider>,
}

impl PrayerService {
    #[must_use]
    pub fn new(db: Arc<dyn DbProvider>) -> Self {
        Self { db }
    }

    /// ## Errors
    /// Returns storage failures.
    #[tracing::instrument(skip(self))]
    pub async fn list_categories(&self, active_only: bool) -> ServiceResult<Vec<PrayerCategory>> {
        let mut conn = self.db.get_connection().await?;
        Ok(prayer::list_categories(&mut conn, active_only).await?)
    }

    /// ## Errors
    /// Returns a validation error for a bad name or color, or a storage failure.
    #[tracing::instrument(skip(self, payload))]
    pub async fn create_category(&self, payload: &NewPrayerCategory) -> ServiceResult<i64> {
        payload.validate()?;
        let mut conn = self.db.get_connection().await?;
        Ok(prayer::insert_category(&mut conn, payload).await?)
    }

    /// ## Errors
    /// Returns a validation error for a bad field, `ServiceError::NotFound` for an
    /// unknown author, or a storage failure.
    #[tracing::instrument(skip(self, payload))]
    pub async fn create(&self, payload: &NewPrayer) -> ServiceResult<i64> {
        payload.validate()?;
        let mut conn = self.db.get_connection().await?;
        refs::require_user(&mut conn, Some(payload.created_by)).await?;
        let id = prayer::insert_prayer(&mut conn, payload).await?;
        tracing::info!(prayer_id = id, "Prayer request created");
        Ok(id)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if the prayer does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: i64) -> ServiceResult<Prayer> {
        let mut conn = self.db.get_connection().await?;
        found(prayer::find_prayer(&mut conn, id).await?, PRAYER)
    }

    /// ## Errors
    /// Returns storage failures.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, filter: &PrayerFilter, page: Page) -> ServiceResult<Vec<Prayer>> {
        let mut conn = self.db.get_connection().await?;
        Ok(prayer::list_prayers(&mut conn, filter, page).await?)
    }

    /// ## Summary
    /// Applies the supplied fields and returns the prayer as stored afterwards.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` if the prayer does not exist.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update(&self, id: i64, changes: &PrayerChanges) -> ServiceResult<Prayer> {
        changes.validate()?;
        let mut conn = self.db.get_connection().await?;
        match prayer::update_prayer(&mut conn, id, changes).await? {
            UpdateOutcome::Missing => Err(ServiceError::NotFound(PRAYER)),
            UpdateOutcome::Applied | UpdateOutcome::NoChanges => {
                found(prayer::find_prayer(&mut conn, id).await?, PRAYER)
            }
        }
    }

    /// ## Summary
    /// Deletes a prayer with all of its comments and participation rows.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` if the prayer does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut conn = self.db.get_connection().await?;
        if !prayer::delete_prayer(&mut conn, id).await? {
            return Err(ServiceError::NotFound(PRAYER));
        }
        tracing::info!(prayer_id = id, "Prayer request deleted");
        Ok(())
    }

    /// ## Summary
    /// Records that `user_id` prays for the request. Joining twice is harmless and
    /// returns the same participation id.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` if the prayer or the user does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn participate(&self, prayer_id: i64, user_id: i64) -> ServiceResult<i64> {
        let mut conn = self.db.get_connection().await?;
        found(prayer::find_prayer(&mut conn, prayer_id).await?, PRAYER)?;
        refs::require_user(&mut conn, Some(user_id)).await?;
        Ok(prayer::participate(&mut conn, prayer_id, user_id).await?)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if the prayer does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn participants(&self, prayer_id: i64) -> ServiceResult<Vec<PrayerParticipant>> {
        let mut conn = self.db.get_connection().await?;
        found(prayer::find_prayer(&mut conn, prayer_id).await?, PRAYER)?;
        Ok(prayer::list_participants(&mut conn, prayer_id).await?)
    }

    /// ## Errors
    /// Returns a validation error for an empty comment and `ServiceError::NotFound`
    /// if the prayer or the commenting user does not exist.
    #[tracing::instrument(skip(self, payload))]
    pub async fn add_comment(
        &self,
        prayer_id: i64,
        payload: &NewPrayerComment,
    ) -> ServiceResult<i64> {
        payload.validate()?;
        let mut conn = self.db.get_connection().await?;
        found(prayer::find_prayer(&mut conn, prayer_id).await?, PRAYER)?;
        refs::require_user(&mut conn, Some(payload.user_id)).await?;
        Ok(prayer::insert_comment(&mut conn, prayer_id, payload).await?)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if the prayer does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn comments(&self, prayer_id: i64) -> ServiceResult<Vec<PrayerComment>> {
        let mut conn = self.db.get_connection().await?;
        found(prayer::find_prayer(&mut conn, prayer_id).await?, PRAYER)?;
        Ok(prayer::list_comments(&mut conn, prayer_id).await?)
    }

    /// ## Summary
    /// Deletes a comment on behalf of its author.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` when no comment with that id was written by `user_id`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_comment(&self, comment_id: i64, user_id: i64) -> ServiceResult<()> {
        let mut conn = self.db.get_connection().await?;
        if !prayer::delete_comment(&mut conn, comment_id, user_id).await? {
            return Err(ServiceError::NotFound("Comment"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use parish_core::types::{PrayerStatus, Visibility};

    use super::*;
    use crate::testing;

    fn request(title: &str, category: &str, author: i64) -> NewPrayer {
        NewPrayer {
            title: title.to_string(),
            content: format!("{title} 기도 부탁드립니다"),
            category: category.to_string(),
            is_anonymous: false,
            visibility: Visibility::Public,
            status: PrayerStatus::Active,
            prayer_period_start: None,
            prayer_period_end: None,
            tags: None,
            created_by: author,
        }
    }

    #[test_log::test(tokio::test)]
    async fn participation_is_idempotent() {
        let db = testing::provider().await;
        let author = testing::user(&db, "author").await;
        let friend = testing::user(&db, "friend").await;
        let prayers = PrayerService::new(db);
        let id = prayers
            .create(&request("취업", "진로", author))
            .await
            .unwrap();

        let first = prayers.participate(id, friend).await.unwrap();
        let again = prayers.participate(id, friend).await.unwrap();
        assert_eq!(first, again);

        let participants = prayers.participants(id).await.unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].username.as_deref(), Some("friend"));

        assert!(matches!(
            prayers.participate(id + 1, friend).await,
            Err(ServiceError::NotFound(PRAYER))
        ));
    }

    #[test_log::test(tokio::test)]
    async fn delete_removes_comments_and_participants() {
        let db = testing::provider().await;
        let author = testing::user(&db, "author").await;
        let prayers = PrayerService::new(db.clone());
        let id = prayers
            .create(&request("수술", "건강", author))
            .await
            .unwrap();
        prayers.participate(id, author).await.unwrap();
        prayers
            .add_comment(
                id,
                &NewPrayerComment {
                    user_id: author,
                    comment: "함께 기도합니다".to_string(),
                    is_anonymous: false,
                },
            )
            .await
            .unwrap();

        prayers.delete(id).await.unwrap();
        assert!(prayers.get(id).await.is_err());

        let orphans = testing::count(
            &db,
            "SELECT (SELECT COUNT(*) FROM prayer_comments) + (SELECT COUNT(*) FROM prayer_participants)",
        )
        .await;
        assert_eq!(orphans, 0);
    }

    #[test_log::test(tokio::test)]
    async fn only_the_author_deletes_a_comment() {
        let db = testing::provider().await;
        let author = testing::user(&db, "author").await;
        let other = testing::user(&db, "other").await;
        let prayers = PrayerService::new(db);
        let id = prayers
            .create(&request("감사", "감사", author))
            .await
            .unwrap();
        let comment = prayers
            .add_comment(
                id,
                &NewPrayerComment {
                    user_id: author,
                    comment: "아멘".to_string(),
                    is_anonymous: true,
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            prayers.delete_comment(comment, other).await,
            Err(ServiceError::NotFound("Comment"))
        ));
        prayers.delete_comment(comment, author).await.unwrap();
        assert!(prayers.comments(id).await.unwrap().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn answering_a_prayer_changes_only_status_fields() {
        let db = testing::provider().await;
        let author = testing::user(&db, "author").await;
        let prayers = PrayerService::new(db);
        let id = prayers
            .create(&request("시험", "학업", author))
            .await
            .unwrap();

        let answered = prayers
            .update(
                id,
                &PrayerChanges {
                    status: Some(PrayerStatus::Answered),
                    answer_content: Some("합격했습니다".to_string()),
                    ..PrayerChanges::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(answered.status, PrayerStatus::Answered);
        assert_eq!(answered.title, "시험");

        let filter = PrayerFilter {
            status: Some(PrayerStatus::Active),
            ..PrayerFilter::default()
        };
        let active = prayers.list(&filter, testing::page(10)).await.unwrap();
        assert!(active.is_empty());
    }
}
