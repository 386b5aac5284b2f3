//! Integration tests for prayer requests, participation and comments.

use salvo::http::StatusCode;

use super::helpers::*;

async fn create_prayer(service: &salvo::Service, user: i64, category: &str) -> i64 {
    TestRequest::post("/prayers")
        .json(json!({
            "title": "새 일자리를 위해",
            "content": "좋은 직장을 찾도록",
            "category": category,
            "created_by": user,
        }))
        .send(service)
        .await
        .assert_success()
        .id()
}

#[test_log::test(tokio::test)]
async fn delete_removes_comments_and_participants() {
    let (db, service, user) = setup().await;
    let id = create_prayer(&service, user, "직장").await;

    TestRequest::post(&format!("/prayers/{id}/participate"))
        .json(json!({ "user_id": user }))
        .send(&service)
        .await
        .assert_success();
    TestRequest::post(&format!("/prayers/{id}/comments"))
        .json(json!({ "user_id": user, "comment": "기도합니다", "is_anonymous": true }))
        .send(&service)
        .await
        .assert_success();

    TestRequest::delete(&format!("/prayers/{id}"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    assert_eq!(db.count("SELECT COUNT(*) FROM prayers").await.unwrap(), 0);
    assert_eq!(db.count("SELECT COUNT(*) FROM prayer_comments").await.unwrap(), 0);
    assert_eq!(db.count("SELECT COUNT(*) FROM prayer_participants").await.unwrap(), 0);
}

#[test_log::test(tokio::test)]
async fn comments_list_oldest_first() {
    let (_db, service, user) = setup().await;
    let id = create_prayer(&service, user, "가정").await;

    for text in ["첫 번째", "두 번째", "세 번째"] {
        TestRequest::post(&format!("/prayers/{id}/comments"))
            .json(json!({ "user_id": user, "comment": text }))
            .send(&service)
            .await
            .assert_success();
    }

    let comments = TestRequest::get(&format!("/prayers/{id}/comments"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let texts: Vec<_> = comments
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["comment"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, ["첫 번째", "두 번째", "세 번째"]);
}

#[test_log::test(tokio::test)]
async fn list_filters_by_category_and_author() {
    let (db, service, user) = setup().await;
    let other = db.seed_user("elder").await.unwrap();
    create_prayer(&service, user, "건강").await;
    create_prayer(&service, user, "직장").await;
    create_prayer(&service, other, "건강").await;

    let health = TestRequest::get("/prayers?category=%EA%B1%B4%EA%B0%95")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(health.array_len(), 2);

    let mine = TestRequest::get(&format!("/prayers?category=%EA%B1%B4%EA%B0%95&user_id={user}"))
        .send(&service)
        .await;
    assert_eq!(mine.array_len(), 1);
}

#[test_log::test(tokio::test)]
async fn inverted_prayer_period_is_rejected() {
    let (_db, service, user) = setup().await;

    TestRequest::post("/prayers")
        .json(json!({
            "title": "수련회",
            "content": "안전한 여행",
            "category": "교회",
            "prayer_period_start": "2024-08-10",
            "prayer_period_end": "2024-08-01",
            "created_by": user,
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn categories_are_listed_by_name() {
    let (_db, service, _user) = setup().await;

    for (name, color) in [("치유", "#FF6B6B"), ("감사", "#4ECDC4")] {
        TestRequest::post("/prayers/categories")
            .json(json!({ "name": name, "color": color }))
            .send(&service)
            .await
            .assert_success();
    }

    let categories = TestRequest::get("/prayers/categories")
        .send(&service)
        .await
        .json();
    assert_eq!(categories[0]["name"], "감사");
    assert_eq!(categories[1]["color"], "#FF6B6B");
}

#[test_log::test(tokio::test)]
async fn unknown_user_cannot_join_or_comment() {
    let (db, service, user) = setup().await;
    let id = create_prayer(&service, user, "가정").await;
    let stranger = user + 100;

    TestRequest::post(&format!("/prayers/{id}/participate"))
        .json(json!({ "user_id": stranger }))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_detail_contains("User not found");
    TestRequest::post(&format!("/prayers/{id}/comments"))
        .json(json!({ "user_id": stranger, "comment": "기도합니다" }))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_detail_contains("User not found");

    assert_eq!(db.count("SELECT COUNT(*) FROM prayer_participants").await.unwrap(), 0);
    assert_eq!(db.count("SELECT COUNT(*) FROM prayer_comments").await.unwrap(), 0);
}
