//! Integration tests for settings, audit logs, backups and the dashboard.

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn duplicate_setting_key_is_a_server_error() {
    let (db, service, _user) = setup().await;
    let body = json!({ "setting_key": "church_name", "setting_value": "새빛교회" });

    TestRequest::post("/system/settings")
        .json(body.clone())
        .send(&service)
        .await
        .assert_success();
    TestRequest::post("/system/settings")
        .json(body)
        .send(&service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_detail_contains("UNIQUE");

    assert_eq!(db.count("SELECT COUNT(*) FROM system_settings").await.unwrap(), 1);
}

#[test_log::test(tokio::test)]
async fn updating_unknown_setting_is_404() {
    let (_db, service, _user) = setup().await;

    TestRequest::put("/system/settings/nope")
        .json(json!({ "setting_value": "1" }))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn logs_filter_by_level_and_author() {
    let (_db, service, user) = setup().await;

    for (level, author) in [("INFO", Some(user)), ("ERROR", Some(user)), ("ERROR", None)] {
        TestRequest::post("/system/logs")
            .json(json!({
                "log_level": level,
                "log_type": "audit",
                "message": "event",
                "user_id": author,
            }))
            .send(&service)
            .await
            .assert_success();
    }

    let errors = TestRequest::get("/system/logs?log_level=ERROR")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(errors.array_len(), 2);

    let mine = TestRequest::get(&format!("/system/logs?log_level=ERROR&user_id={user}"))
        .send(&service)
        .await
        .json();
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["username"], "tester");

    TestRequest::get("/system/logs?start_date=2024-02-01T00:00:00&end_date=2024-01-01T00:00:00")
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn old_logs_are_cleared() {
    let (db, service, _user) = setup().await;
    TestRequest::post("/system/logs")
        .json(json!({ "log_level": "INFO", "log_type": "audit", "message": "today" }))
        .send(&service)
        .await
        .assert_success();
    TestRequest::post("/system/logs")
        .json(json!({ "log_level": "INFO", "log_type": "audit", "message": "last year" }))
        .send(&service)
        .await
        .assert_success();
    let aged = db
        .execute("UPDATE system_logs SET created_at = datetime('now', '-400 days') WHERE message = 'last year'")
        .await
        .unwrap();
    assert_eq!(aged, 1);

    let cleared = TestRequest::delete("/system/logs/cleanup")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(cleared["deleted"], 1);
    assert_eq!(db.count("SELECT COUNT(*) FROM system_logs").await.unwrap(), 1);
}

#[test_log::test(tokio::test)]
async fn dashboard_reflects_this_month() {
    let (_db, service, user) = setup().await;
    let member = create_member(&service, "김철수", user).await;
    create_family(&service, "Kim Family").await;
    let today = chrono::Utc::now().date_naive().to_string();

    TestRequest::post("/offerings")
        .json(json!({
            "member_id": member,
            "offering_date": today,
            "offering_type": "주일헌금",
            "amount": "12000",
            "created_by": user,
        }))
        .send(&service)
        .await
        .assert_success();

    let stats = TestRequest::get("/system/dashboard/stats")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(stats["member_count"], 1);
    assert_eq!(stats["family_count"], 1);
    assert_eq!(stats["monthly_prayer_count"], 0);
    assert_eq!(stats["monthly_offering_amount"], "12000");
}
