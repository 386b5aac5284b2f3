//! Reference data and optional sample records for a fresh database.
//!
//! Every reference insert uses `INSERT OR IGNORE`, so seeding can be repeated safely.

use std::sync::Arc;

use chrono::NaiveDate;
use parish_core::types::{Gender, PrayerStatus, SettingType, Visibility};
use parish_db::db::DbProvider;
use parish_db::db::query::{family, member, offering, prayer, system, user};
use parish_db::model::family::NewFamily;
use parish_db::model::member::NewMember;
use parish_db::model::offering::{NewOffering, NewOfferingType};
use parish_db::model::prayer::{NewPrayer, NewPrayerCategory};
use parish_db::model::system::NewSetting;
use parish_db::model::user::NewUser;
use rust_decimal::Decimal;

use crate::error::{ServiceError, ServiceResult};
use crate::password::hash_password;

const PRAYER_CATEGORIES: &[(&str, &str, &str)] = &[
    ("개인 기도", "개인적인 기도 제목", "#3B82F6"),
    ("가족 기도", "가족을 위한 기도 제목", "#10B981"),
    ("건강 기도", "건강과 치유를 위한 기도", "#EF4444"),
    ("사업/직장 기도", "사업과 직장을 위한 기도", "#F59E0B"),
    ("선교 기도", "선교와 전도를 위한 기도", "#8B5CF6"),
    ("교회 기도", "교회와 공동체를 위한 기도", "#06B6D4"),
    ("감사 기도", "감사와 찬양의 기도", "#F97316"),
    ("기타", "기타 기도 제목", "#6B7280"),
];

const OFFERING_TYPES: &[(&str, &str)] = &[
    ("주일헌금", "주일 예배 헌금"),
    ("십일조", "정기적인 십일조 헌금"),
    ("감사헌금", "감사의 마음으로 드리는 헌금"),
    ("선교헌금", "선교 사역을 위한 헌금"),
    ("건축헌금", "교회 건축을 위한 헌금"),
    ("특별헌금", "특별한 목적을 위한 헌금"),
    ("절기헌금", "절기에 드리는 헌금"),
    ("생일헌금", "생일을 맞아 드리는 헌금"),
    ("기타", "기타 헌금"),
];

const SETTINGS: &[(&str, &str, SettingType, &str)] = &[
    ("church_name", "Parish", SettingType::String, "교회명"),
    ("church_address", "", SettingType::String, "교회 주소"),
    ("church_phone", "", SettingType::String, "교회 전화번호"),
    ("church_email", "", SettingType::String, "교회 이메일"),
    ("site_title", "교회 관리 시스템", SettingType::String, "사이트 제목"),
    ("default_language", "ko", SettingType::String, "기본 언어"),
    ("timezone", "Asia/Seoul", SettingType::String, "타임존"),
    ("date_format", "YYYY-MM-DD", SettingType::String, "날짜 형식"),
    ("currency", "KRW", SettingType::String, "화폐 단위"),
    ("password_min_length", "8", SettingType::Number, "최소 비밀번호 길이"),
    ("session_timeout", "3600", SettingType::Number, "세션 타임아웃 (초)"),
    ("max_login_attempts", "5", SettingType::Number, "최대 로그인 시도 횟수"),
    ("enable_member_registration", "true", SettingType::Boolean, "성도 등록 기능 활성화"),
    ("enable_prayer_comments", "true", SettingType::Boolean, "기도 댓글 기능 활성화"),
    ("enable_anonymous_prayers", "true", SettingType::Boolean, "익명 기도 기능 활성화"),
    ("enable_offering_statistics", "true", SettingType::Boolean, "헌금 통계 기능 활성화"),
    ("auto_backup_enabled", "false", SettingType::Boolean, "자동 백업 활성화"),
    ("backup_retention_days", "30", SettingType::Number, "백업 보관 일수"),
    ("items_per_page", "20", SettingType::Number, "페이지당 항목 수"),
];

/// How many rows each seeding step added. Rows that already existed are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub prayer_categories: usize,
    pub offering_types: usize,
    pub settings: usize,
    pub admin_created: bool,
    pub sample_members: usize,
}

/// Administrator account created on first seed.
#[derive(Clone)]
pub struct AdminAccount {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct Seeder {
    db: Arc<dyn DbProvider>,
}

impl Seeder {
    #[must_use]
    pub fn new(db: Arc<dyn DbProvider>) -> Self {
        Self { db }
    }

    /// ## Summary
    /// Inserts the default prayer categories, offering types and settings.
    ///
    /// ## Errors
    /// Returns the first storage failure.
    #[tracing::instrument(skip(self))]
    pub async fn reference_data(&self) -> ServiceResult<SeedReport> {
        let mut conn = self.db.get_connection().await?;
        let mut report = SeedReport::default();

        for (name, description, color) in PRAYER_CATEGORIES {
            let category = NewPrayerCategory {
                name: (*name).to_string(),
                description: Some((*description).to_string()),
                color: Some((*color).to_string()),
                is_active: true,
            };
            if prayer::ensure_category(&mut conn, &category).await? {
                report.prayer_categories += 1;
            }
        }

        for (name, description) in OFFERING_TYPES {
            let kind = NewOfferingType {
                name: (*name).to_string(),
                description: Some((*description).to_string()),
                is_active: true,
            };
            if offering::ensure_offering_type(&mut conn, &kind).await? {
                report.offering_types += 1;
            }
        }

        for (key, value, setting_type, description) in SETTINGS {
            let setting = NewSetting {
                setting_key: (*key).to_string(),
                setting_value: (*value).to_string(),
                setting_type: *setting_type,
                description: Some((*description).to_string()),
            };
            if system::ensure_setting(&mut conn, &setting).await? {
                report.settings += 1;
            }
        }

        tracing::info!(?report, "Reference data seeded");
        Ok(report)
    }

    /// ## Summary
    /// Creates the administrator account unless the username or email is taken,
    /// and returns its id.
    ///
    /// ## Errors
    /// Returns an error if hashing fails or the account cannot be read back.
    #[tracing::instrument(skip(self))]
    pub async fn admin(&self, account: &AdminAccount) -> ServiceResult<(i64, bool)> {
        let password_hash = hash_password(&account.password)?;
        let mut conn = self.db.get_connection().await?;
        let created = user::ensure_user(
            &mut conn,
            &NewUser {
                email: account.email.clone(),
                username: account.username.clone(),
                password_hash,
                full_name: Some("관리자".to_string()),
                role: "admin".to_string(),
                is_active: true,
            },
        )
        .await?;

        let admin = user::find_user_by_username(&mut conn, &account.username)
            .await?
            .ok_or(ServiceError::NotFound("User"))?;
        tracing::info!(user_id = admin.id, created, "Administrator account ready");
        Ok((admin.id, created))
    }

    /// ## Summary
    /// Adds a small demonstration congregation: two families, their members, a
    /// few offerings and a prayer request. Skipped when members already exist.
    ///
    /// ## Errors
    /// Returns the first storage failure.
    #[tracing::instrument(skip(self))]
    pub async fn sample_data(&self, created_by: i64) -> ServiceResult<usize> {
        let mut conn = self.db.get_connection().await?;
        let existing = member::list_members(
            &mut conn,
            &parish_db::model::member::MemberFilter::default(),
            parish_core::page::Page::new(0, 1, 1)?,
        )
        .await?;
        if !existing.is_empty() {
            tracing::info!("Members already present, skipping sample data");
            return Ok(0);
        }

        let households: [(&str, &str, &[(&str, Gender, (i32, u32, u32), &str)]); 2] = [
            (
                "김철수 가정",
                "서울시 강남구",
                &[
                    ("김철수", Gender::Male, (1975, 3, 15), "가장"),
                    ("이영희", Gender::Female, (1978, 7, 22), "배우자"),
                    ("김민준", Gender::Male, (2005, 11, 2), "자녀"),
                ],
            ),
            (
                "박영수 가정",
                "서울시 서초구",
                &[
                    ("박영수", Gender::Male, (1968, 1, 9), "가장"),
                    ("최미경", Gender::Female, (1970, 5, 30), "배우자"),
                ],
            ),
        ];

        let registered = date(2020, 1, 5)?;
        let mut added = 0;
        for (family_name, address, people) in households {
            let family_id = family::insert_family(
                &mut conn,
                &NewFamily {
                    family_name: family_name.to_string(),
                    head_member_id: None,
                    address: Some(address.to_string()),
                },
            )
            .await?;

            for (idx, (name, gender, (y, m, d), role)) in people.iter().enumerate() {
                let member_id = member::insert_member(
                    &mut conn,
                    &NewMember {
                        name: (*name).to_string(),
                        name_en: None,
                        birth_date: date(*y, *m, *d)?,
                        gender: *gender,
                        phone: None,
                        email: None,
                        address: Some(address.to_string()),
                        job: None,
                        registration_date: registered,
                        baptism_date: None,
                        position: parish_core::constants::DEFAULT_MEMBER_POSITION.to_string(),
                        district: Some("1교구".to_string()),
                        family_id: Some(family_id),
                        family_role: Some((*role).to_string()),
                        is_active: true,
                        notes: None,
                        created_by,
                    },
                )
                .await?;
                added += 1;

                if idx == 0 {
                    family::update_family(
                        &mut conn,
                        family_id,
                        &parish_db::model::family::FamilyChanges {
                            head_member_id: Some(member_id),
                            ..Default::default()
                        },
                    )
                    .await?;
                    offering::insert_offering(
                        &mut conn,
                        &NewOffering {
                            member_id,
                            offering_date: date(2024, 1, 7)?,
                            offering_type: "십일조".to_string(),
                            amount: Decimal::from(300_000),
                            memo: None,
                            created_by,
                        },
                    )
                    .await?;
                }
            }
        }

        prayer::insert_prayer(
            &mut conn,
            &NewPrayer {
                title: "교회 부흥을 위하여".to_string(),
                content: "새해에도 교회 공동체가 함께 자라가도록".to_string(),
                category: "교회 기도".to_string(),
                is_anonymous: false,
                visibility: Visibility::Public,
                status: PrayerStatus::Active,
                prayer_period_start: None,
                prayer_period_end: None,
                tags: Some("부흥,공동체".to_string()),
                created_by,
            },
        )
        .await?;

        tracing::info!(members = added, "Sample data seeded");
        Ok(added)
    }
}

fn date(year: i32, month: u32, day: u32) -> ServiceResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ServiceError::ValidationError(format!("invalid date {year}-{month}-{day}")))
}
