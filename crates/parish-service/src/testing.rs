//! Fixtures shared by the service tests.

use std::sync::Arc;

use chrono::NaiveDate;
use parish_core::page::Page;
use parish_core::types::Gender;
use parish_db::db::local::LocalDb;
use parish_db::db::query::user;
use parish_db::db::schema;
use parish_db::db::statement::Statement;
use parish_db::db::DbProvider;
use parish_db::model::member::NewMember;
use parish_db::model::user::NewUser;

pub async fn provider() -> Arc<dyn DbProvider> {
    let db = LocalDb::in_memory().await.unwrap();
    let mut conn = db.get_connection().await.unwrap();
    schema::apply(&mut conn).await.unwrap();
    drop(conn);
    Arc::new(db)
}

/// Creates a login account and returns its id.
pub async fn user(db: &Arc<dyn DbProvider>, username: &str) -> i64 {
    let mut conn = db.get_connection().await.unwrap();
    user::ensure_user(
        &mut conn,
        &NewUser {
            email: format!("{username}@parish.local"),
            username: username.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            full_name: None,
            role: "staff".to_string(),
            is_active: true,
        },
    )
    .await
    .unwrap();
    user::find_user_by_username(&mut conn, username)
        .await
        .unwrap()
        .unwrap()
        .id
}

pub fn member(name: &str, created_by: i64) -> NewMember {
    NewMember {
        name: name.to_string(),
        name_en: None,
        birth_date: NaiveDate::from_ymd_opt(1980, 4, 12).unwrap(),
        gender: Gender::Male,
        phone: None,
        email: None,
        address: None,
        job: None,
        registration_date: NaiveDate::from_ymd_opt(2020, 1, 5).unwrap(),
        baptism_date: None,
        position: "성도".to_string(),
        district: None,
        family_id: None,
        family_role: None,
        is_active: true,
        notes: None,
        created_by,
    }
}

pub fn page(limit: u32) -> Page {
    Page::new(0, limit, limit).unwrap()
}

pub async fn count(db: &Arc<dyn DbProvider>, sql: &str) -> i64 {
    let mut conn = db.get_connection().await.unwrap();
    conn.fetch_scalar(&Statement::new(sql)).await.unwrap()
}

pub async fn exec(db: &Arc<dyn DbProvider>, sql: &str) {
    let mut conn = db.get_connection().await.unwrap();
    conn.execute(&Statement::new(sql)).await.unwrap();
}
