//! Properties of the filtered listing and partial update machinery, observed
//! through the HTTP surface.

use std::collections::HashSet;

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn empty_update_leaves_record_untouched() {
    let (_db, service, user) = setup().await;
    let id = create_member(&service, "오세훈", user).await;
    let before = TestRequest::get(&format!("/members/{id}"))
        .send(&service)
        .await
        .json();

    let after = TestRequest::put(&format!("/members/{id}"))
        .json(json!({}))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(before, after);
}

#[test_log::test(tokio::test)]
async fn null_fields_mean_leave_unchanged() {
    let (_db, service, user) = setup().await;
    let id = create_member(&service, "서지민", user).await;
    TestRequest::put(&format!("/members/{id}"))
        .json(json!({ "district": "1교구" }))
        .send(&service)
        .await
        .assert_success();

    let member = TestRequest::put(&format!("/members/{id}"))
        .json(json!({ "district": null, "job": "교사" }))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(member["district"], "1교구");
    assert_eq!(member["job"], "교사");
}

#[test_log::test(tokio::test)]
async fn update_of_missing_id_is_404_and_changes_nothing() {
    let (db, service, user) = setup().await;
    create_member(&service, "강민호", user).await;

    TestRequest::put("/members/9999")
        .json(json!({ "name": "유령" }))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_detail_contains("not found");

    assert_eq!(
        db.count("SELECT COUNT(*) FROM members WHERE name = '유령'")
            .await
            .unwrap(),
        0
    );
}

#[test_log::test(tokio::test)]
async fn unknown_update_field_is_400_before_storage() {
    let (_db, service, user) = setup().await;
    let id = create_member(&service, "조은별", user).await;

    TestRequest::put(&format!("/members/{id}"))
        .json(json!({ "name = 'x'; --": "oops" }))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let member = TestRequest::get(&format!("/members/{id}"))
        .send(&service)
        .await
        .json();
    assert_eq!(member["name"], "조은별");
}

#[test_log::test(tokio::test)]
async fn adding_a_filter_only_narrows() {
    let (_db, service, user) = setup().await;
    for (name, district) in [
        ("김하나", "1교구"),
        ("김두리", "2교구"),
        ("이세나", "1교구"),
        ("박네리", "1교구"),
    ] {
        let id = create_member(&service, name, user).await;
        TestRequest::put(&format!("/members/{id}"))
            .json(json!({ "district": district }))
            .send(&service)
            .await
            .assert_success();
    }

    let ids = |body: serde_json::Value| -> HashSet<i64> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_i64().unwrap())
            .collect()
    };

    // 김 and 1교구
    let kim = "%EA%B9%80";
    let first = "1%EA%B5%90%EA%B5%AC";

    let all = ids(TestRequest::get("/members").send(&service).await.json());
    let by_district = ids(
        TestRequest::get(&format!("/members?district={first}"))
            .send(&service)
            .await
            .json(),
    );
    let both = ids(
        TestRequest::get(&format!("/members?district={first}&name={kim}"))
            .send(&service)
            .await
            .json(),
    );

    assert_eq!(all.len(), 4);
    assert_eq!(by_district.len(), 3);
    assert_eq!(both.len(), 1);
    assert!(by_district.is_subset(&all));
    assert!(both.is_subset(&by_district));
}

#[test_log::test(tokio::test)]
async fn wildcards_in_name_filter_are_literal() {
    let (_db, service, user) = setup().await;
    create_member(&service, "100%", user).await;
    create_member(&service, "1000", user).await;

    let hits = TestRequest::get("/members?name=0%25")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(hits.array_len(), 1);
}

#[test_log::test(tokio::test)]
async fn consecutive_pages_concatenate_to_the_full_list() {
    let (_db, service, user) = setup().await;
    // Equal names force the id tiebreaker to decide the order.
    for _ in 0..7 {
        create_member(&service, "동명이인", user).await;
    }
    create_member(&service, "가나다", user).await;

    let full: Vec<i64> = TestRequest::get("/members?limit=100")
        .send(&service)
        .await
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();

    let mut paged = Vec::new();
    for skip in (0..9).step_by(3) {
        let page = TestRequest::get(&format!("/members?skip={skip}&limit=3"))
            .send(&service)
            .await
            .json();
        paged.extend(
            page.as_array()
                .unwrap()
                .iter()
                .map(|m| m["id"].as_i64().unwrap()),
        );
    }

    assert_eq!(full.len(), 8);
    assert_eq!(paged, full);
}

#[test_log::test(tokio::test)]
async fn limit_outside_bounds_is_400() {
    let (_db, service, _user) = setup().await;

    TestRequest::get("/members?limit=101")
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    TestRequest::get("/families?skip=abc")
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn concurrent_disjoint_updates_both_apply() {
    let (_db, service, user) = setup().await;
    let id = create_member(&service, "임도윤", user).await;
    let path = format!("/members/{id}");

    let (phone, job) = futures::join!(
        TestRequest::put(&path)
            .json(json!({ "phone": "010-1234-5678" }))
            .send(&service),
        TestRequest::put(&path)
            .json(json!({ "job": "간호사" }))
            .send(&service),
    );
    assert!(phone.status.is_success(), "{}", phone.body);
    assert!(job.status.is_success(), "{}", job.body);

    let member = TestRequest::get(&path).send(&service).await.json();
    assert_eq!(member["phone"], "010-1234-5678");
    assert_eq!(member["job"], "간호사");
}
