//! Integration tests for households and their membership.

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn kim_family_is_created_empty() {
    let (_db, service, _user) = setup().await;

    let id = create_family(&service, "Kim Family").await;

    let family = TestRequest::get(&format!("/families/{id}"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(family["family_name"], "Kim Family");
    assert_eq!(family["member_count"], 0);
    assert!(family["head_member_id"].is_null());
}

#[test_log::test(tokio::test)]
async fn membership_add_then_remove_clears_family_fields() {
    let (_db, service, user) = setup().await;
    let family_id = create_family(&service, "Kim Family").await;
    let member_id = create_member(&service, "김민수", user).await;

    TestRequest::post(&format!("/families/{family_id}/members"))
        .json(json!({ "member_id": member_id }))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    let member = TestRequest::get(&format!("/members/{member_id}"))
        .send(&service)
        .await
        .json();
    assert_eq!(member["family_id"], family_id);
    assert_eq!(member["family_role"], "자녀");
    assert_eq!(member["family_name"], "Kim Family");

    let family = TestRequest::get(&format!("/families/{family_id}"))
        .send(&service)
        .await
        .json();
    assert_eq!(family["member_count"], 1);

    TestRequest::delete(&format!("/families/members/{member_id}"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    let member = TestRequest::get(&format!("/members/{member_id}"))
        .send(&service)
        .await
        .json();
    assert!(member["family_id"].is_null());
    assert!(member["family_role"].is_null());
}

#[test_log::test(tokio::test)]
async fn adding_to_missing_family_or_member_is_404() {
    let (_db, service, user) = setup().await;
    let family_id = create_family(&service, "Lee Family").await;
    let member_id = create_member(&service, "이수진", user).await;

    TestRequest::post("/families/404/members")
        .json(json!({ "member_id": member_id }))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_detail_contains("Family");

    TestRequest::post(&format!("/families/{family_id}/members"))
        .json(json!({ "member_id": 404 }))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_detail_contains("Member");
}

#[test_log::test(tokio::test)]
async fn deleting_family_detaches_members() {
    let (db, service, user) = setup().await;
    let family_id = create_family(&service, "Choi Family").await;
    let head = create_member(&service, "최준호", user).await;

    TestRequest::post(&format!("/families/{family_id}/members"))
        .json(json!({ "member_id": head, "family_role": "가장" }))
        .send(&service)
        .await
        .assert_success();
    TestRequest::put(&format!("/families/{family_id}"))
        .json(json!({ "head_member_id": head }))
        .send(&service)
        .await
        .assert_success();

    TestRequest::delete(&format!("/families/{family_id}"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    assert_eq!(db.count("SELECT COUNT(*) FROM families").await.unwrap(), 0);
    assert_eq!(
        db.count("SELECT COUNT(*) FROM members WHERE family_id IS NOT NULL")
            .await
            .unwrap(),
        0
    );

    TestRequest::delete(&format!("/families/{family_id}"))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn unknown_head_member_is_404() {
    let (db, service, _user) = setup().await;

    TestRequest::post("/families")
        .json(json!({ "family_name": "Baek Family", "head_member_id": 9999 }))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_detail_contains("Member not found");
    assert_eq!(db.count("SELECT COUNT(*) FROM families").await.unwrap(), 0);

    let id = create_family(&service, "Baek Family").await;
    TestRequest::put(&format!("/families/{id}"))
        .json(json!({ "head_member_id": 9999 }))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_detail_contains("Member not found");
}
