//! Integration tests for offering records and their statistics.

use salvo::http::StatusCode;

use super::helpers::*;

async fn record(service: &salvo::Service, member_id: i64, user: i64, date: &str, kind: &str, amount: &str) {
    TestRequest::post("/offerings")
        .json(json!({
            "member_id": member_id,
            "offering_date": date,
            "offering_type": kind,
            "amount": amount,
            "created_by": user,
        }))
        .send(service)
        .await
        .assert_success();
}

#[test_log::test(tokio::test)]
async fn statistics_with_inverted_range_is_400() {
    let (_db, service, _user) = setup().await;

    TestRequest::get("/offerings/statistics/period?start_date=2024-06-01&end_date=2024-01-01")
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_detail_contains("start date");
}

#[test_log::test(tokio::test)]
async fn statistics_group_by_type_and_month() {
    let (_db, service, user) = setup().await;
    let kim = create_member(&service, "김철수", user).await;
    let lee = create_member(&service, "이영희", user).await;

    record(&service, kim, user, "2024-01-07", "주일헌금", "10000").await;
    record(&service, lee, user, "2024-01-14", "주일헌금", "20000").await;
    record(&service, kim, user, "2024-02-04", "십일조", "100000").await;
    record(&service, kim, user, "2023-12-31", "주일헌금", "5000").await;

    let stats = TestRequest::get("/offerings/statistics/period?start_date=2024-01-01&end_date=2024-12-31")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(stats["total"]["total_count"], 3);
    assert_eq!(stats["total"]["total_amount"], "130000");
    assert_eq!(stats["by_type"][0]["offering_type"], "십일조");
    assert_eq!(stats["by_type"][1]["count"], 2);
    assert_eq!(stats["monthly"][0]["month"], "2024-01");
    assert_eq!(stats["monthly"][1]["month"], "2024-02");
}

#[test_log::test(tokio::test)]
async fn empty_range_has_no_total() {
    let (_db, service, _user) = setup().await;

    let stats = TestRequest::get("/offerings/statistics/period?start_date=2020-01-01&end_date=2020-12-31")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(stats["total"]["total_count"], 0);
    assert!(stats["total"]["total_amount"].is_null());
    assert!(stats["by_type"].as_array().unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn member_summary_covers_one_year() {
    let (_db, service, user) = setup().await;
    let kim = create_member(&service, "김철수", user).await;
    record(&service, kim, user, "2024-03-03", "감사헌금", "15000").await;
    record(&service, kim, user, "2024-09-01", "감사헌금", "25000").await;
    record(&service, kim, user, "2025-01-05", "감사헌금", "99000").await;

    let summary = TestRequest::get(&format!("/offerings/statistics/member/{kim}?year=2024"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(summary[0]["total_amount"], "40000");
    assert_eq!(summary[0]["count"], 2);
    assert_eq!(summary[0]["first_date"], "2024-03-03");
    assert_eq!(summary[0]["last_date"], "2024-09-01");

    TestRequest::get(&format!("/offerings/statistics/member/{kim}?year=1999"))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    TestRequest::get("/offerings/statistics/member/9999?year=2024")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn non_positive_amount_is_rejected() {
    let (db, service, user) = setup().await;
    let kim = create_member(&service, "김철수", user).await;

    TestRequest::post("/offerings")
        .json(json!({
            "member_id": kim,
            "offering_date": "2024-03-03",
            "offering_type": "주일헌금",
            "amount": "0",
            "created_by": user,
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(db.count("SELECT COUNT(*) FROM offerings").await.unwrap(), 0);
}

#[test_log::test(tokio::test)]
async fn reassigning_to_unknown_member_is_404() {
    let (_db, service, user) = setup().await;
    let giver = create_member(&service, "오세린", user).await;
    let id = TestRequest::post("/offerings")
        .json(json!({
            "member_id": giver,
            "offering_date": "2024-03-03",
            "offering_type": "주일헌금",
            "amount": "15000",
            "created_by": user,
        }))
        .send(&service)
        .await
        .assert_success()
        .id();

    TestRequest::put(&format!("/offerings/{id}"))
        .json(json!({ "member_id": 9999 }))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_detail_contains("Member not found");

    let offering = TestRequest::get(&format!("/offerings/{id}"))
        .send(&service)
        .await
        .json();
    assert_eq!(offering["member_id"], giver);
}

#[test_log::test(tokio::test)]
async fn unknown_recorder_is_404() {
    let (db, service, user) = setup().await;
    let giver = create_member(&service, "남도윤", user).await;

    TestRequest::post("/offerings")
        .json(json!({
            "member_id": giver,
            "offering_date": "2024-03-03",
            "offering_type": "주일헌금",
            "amount": "15000",
            "created_by": user + 100,
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_detail_contains("User not found");
    assert_eq!(db.count("SELECT COUNT(*) FROM offerings").await.unwrap(), 0);
}
