//! Integration tests for member registration and maintenance.

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn registration_applies_defaults() {
    let (_db, service, user) = setup().await;
    let id = create_member(&service, "박지훈", user).await;

    let member = TestRequest::get(&format!("/members/{id}"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(member["position"], "성도");
    assert_eq!(member["is_active"], true);
    assert_eq!(member["created_by_username"], "tester");
}

#[test_log::test(tokio::test)]
async fn invalid_email_is_rejected() {
    let (db, service, user) = setup().await;
    let mut body = member_body("정하늘", user);
    body["email"] = json!("not-an-email");

    TestRequest::post("/members")
        .json(body)
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(db.count("SELECT COUNT(*) FROM members").await.unwrap(), 0);
}

#[test_log::test(tokio::test)]
async fn member_with_offerings_cannot_be_deleted() {
    let (_db, service, user) = setup().await;
    let id = create_member(&service, "한가람", user).await;
    TestRequest::post("/offerings")
        .json(json!({
            "member_id": id,
            "offering_date": "2024-05-05",
            "offering_type": "감사헌금",
            "amount": "30000",
            "created_by": user,
        }))
        .send(&service)
        .await
        .assert_success();

    TestRequest::delete(&format!("/members/{id}"))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::get(&format!("/members/{id}"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn deleting_a_member_frees_the_family_head() {
    let (_db, service, user) = setup().await;
    let family_id = create_family(&service, "Yoon Family").await;
    let head = create_member(&service, "윤서준", user).await;
    TestRequest::put(&format!("/families/{family_id}"))
        .json(json!({ "head_member_id": head }))
        .send(&service)
        .await
        .assert_success();

    TestRequest::delete(&format!("/members/{head}"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    let family = TestRequest::get(&format!("/families/{family_id}"))
        .send(&service)
        .await
        .json();
    assert!(family["head_member_id"].is_null());
}

#[test_log::test(tokio::test)]
async fn moving_to_unknown_family_is_404_and_changes_nothing() {
    let (_db, service, user) = setup().await;
    let id = create_member(&service, "서지안", user).await;

    TestRequest::put(&format!("/members/{id}"))
        .json(json!({ "family_id": 9999, "phone": "010-2222-3333" }))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_detail_contains("Family not found");

    let member = TestRequest::get(&format!("/members/{id}"))
        .send(&service)
        .await
        .json();
    assert!(member["family_id"].is_null());
    assert!(member["phone"].is_null());
}

#[test_log::test(tokio::test)]
async fn unknown_creator_is_404() {
    let (db, service, user) = setup().await;

    TestRequest::post("/members")
        .json(member_body("문가온", user + 100))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_detail_contains("User not found");
    assert_eq!(db.count("SELECT COUNT(*) FROM members").await.unwrap(), 0);
}
