/// Integration tests for the user management endpoints
///
/// Require a running PostgreSQL database (see DATABASE_URL).

mod common;

use axum::http::StatusCode;
use common::{unique_email, TestContext, TEST_PASSWORD};
use prodlist_shared::auth::password::verify_password;
use prodlist_shared::models::auth_token::AuthToken;
use prodlist_shared::models::favorite::FavoriteProduct;
use prodlist_shared::models::product::Product;
use prodlist_shared::models::user::User;
use serde_json::{json, Value};

const USER_NOT_FOUND: &str = "No user was found with the provided ID.";
const EMAIL_IN_USE: &str = "The provided email is already in use.";

async fn create_via_api(ctx: &TestContext, name: &str, email: &str) -> (StatusCode, Value) {
    let (status, body) = ctx
        .request(
            "POST",
            "/management/user",
            Some(&ctx.admin.token),
            Some(json!({"name": name, "email": email, "password": "s3cret-pass"})),
        )
        .await;

    if let Some(id) = body["id"].as_i64() {
        ctx.track_user(id);
    }
    (status, body)
}

#[tokio::test]
async fn test_management_requires_admin() {
    let ctx = TestContext::new().await.unwrap();
    let user_uri = format!("/management/user/{}", ctx.customer.user.id);

    let routes = [
        ("GET", "/management/user/list".to_string(), None),
        ("POST", "/management/user".to_string(), Some(json!({"bogus": true}))),
        ("GET", user_uri.clone(), None),
        ("PUT", user_uri.clone(), Some(json!({"email": "not-an-email"}))),
        ("DELETE", user_uri.clone(), None),
    ];

    for (method, uri, body) in routes {
        let (status, response) = ctx
            .request(method, &uri, Some(&ctx.customer.token), body.clone())
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(response, json!({"detail": "Forbidden"}));

        let (status, response) = ctx.request(method, &uri, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(response, json!({"detail": "Unauthorized"}));
    }

    // Nothing was deleted along the way
    assert!(User::find_by_id(&ctx.db, ctx.customer.user.id).await.unwrap().is_some());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_create_user_returns_working_token() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email();

    let (status, body) = create_via_api(&ctx, "Lucia", &email).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Lucia");
    assert_eq!(body["email"], email);
    assert!(body["id"].is_i64());

    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 40);

    let (status, _) = ctx.request("GET", "/common/favorites", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Customers only
    let (status, _) = ctx.request("GET", "/management/user/list", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let ctx = TestContext::new().await.unwrap();
    let email = ctx.customer.user.email.clone();

    let (status, body) = create_via_api(&ctx, "Copycat", &email).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!(EMAIL_IN_USE));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 1);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_create_user_validation() {
    let ctx = TestContext::new().await.unwrap();

    let bodies = [
        json!({"name": "No Email", "password": "x"}),
        json!({"name": "Bad Email", "email": "nope", "password": "x"}),
        json!({"name": "", "email": unique_email(), "password": "x"}),
        json!({"name": "No Password", "email": unique_email()}),
        json!("not an object"),
    ];

    for body in bodies {
        let (status, response) = ctx
            .request("POST", "/management/user", Some(&ctx.admin.token), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {}", body);
        assert!(response["detail"].is_array());
    }

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_get_user() {
    let ctx = TestContext::new().await.unwrap();
    let customer = &ctx.customer.user;

    let (status, body) = ctx
        .request(
            "GET",
            &format!("/management/user/{}", customer.id),
            Some(&ctx.admin.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": customer.id, "name": customer.name, "email": customer.email})
    );

    let (status, body) = ctx
        .request("GET", "/management/user/0", Some(&ctx.admin.token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!(USER_NOT_FOUND));

    let (status, _) = ctx
        .request("GET", "/management/user/abc", Some(&ctx.admin.token), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_update_name_only() {
    let ctx = TestContext::new().await.unwrap();
    let before = ctx.customer.user.clone();

    let (status, body) = ctx
        .request(
            "PUT",
            &format!("/management/user/{}", before.id),
            Some(&ctx.admin.token),
            Some(json!({"name": "X"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": before.id,
            "name": "X",
            "email": before.email,
            "token": ctx.customer.token,
        })
    );

    let after = User::find_by_id(&ctx.db, before.id).await.unwrap().unwrap();
    assert_eq!(after.email, before.email);
    assert_eq!(after.password_hash, before.password_hash);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_update_password_is_rehashed() {
    let ctx = TestContext::new().await.unwrap();
    let id = ctx.customer.user.id;

    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/management/user/{}", id),
            Some(&ctx.admin.token),
            Some(json!({"password": "brand-new-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let user = User::find_by_id(&ctx.db, id).await.unwrap().unwrap();
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert!(verify_password("brand-new-password", &user.password_hash).unwrap());
    assert!(!verify_password(TEST_PASSWORD, &user.password_hash).unwrap());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_update_email_conflicts() {
    let ctx = TestContext::new().await.unwrap();
    let uri = format!("/management/user/{}", ctx.customer.user.id);

    // Someone else's email
    let (status, body) = ctx
        .request(
            "PUT",
            &uri,
            Some(&ctx.admin.token),
            Some(json!({"email": ctx.admin.user.email})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!(EMAIL_IN_USE));

    // The user's own email is fine
    let (status, _) = ctx
        .request(
            "PUT",
            &uri,
            Some(&ctx.admin.token),
            Some(json!({"email": ctx.customer.user.email})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let new_email = unique_email();
    let (status, body) = ctx
        .request("PUT", &uri, Some(&ctx.admin.token), Some(json!({"email": new_email})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], new_email);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_update_missing_user() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(
            "PUT",
            "/management/user/0",
            Some(&ctx.admin.token),
            Some(json!({"name": "Ghost"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!(USER_NOT_FOUND));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let ctx = TestContext::new().await.unwrap();
    let victim = ctx.create_customer("Victim").await.unwrap();

    let item = ctx.catalog_product();
    let (status, _) = ctx
        .request(
            "POST",
            &format!("/common/favorites/{}", item.id),
            Some(&victim.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/management/user/{}", victim.user.id);
    let (status, body) = ctx.request("DELETE", &uri, Some(&ctx.admin.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    assert!(User::find_by_id(&ctx.db, victim.user.id).await.unwrap().is_none());
    assert_eq!(AuthToken::count_for_user(&ctx.db, victim.user.id).await.unwrap(), 0);
    assert_eq!(FavoriteProduct::count_for_user(&ctx.db, victim.user.id).await.unwrap(), 0);
    assert!(Product::find_by_api_id(&ctx.db, item.id).await.unwrap().is_some());

    // The old token no longer works
    let (status, _) = ctx.request("GET", "/common/favorites", Some(&victim.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = ctx.request("DELETE", &uri, Some(&ctx.admin.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!(USER_NOT_FOUND));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_list_users_ordered_by_name() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request("GET", "/management/user/list", Some(&ctx.admin.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let items = body["items"].as_array().unwrap();
    assert!(items.len() <= 20);
    assert!(body["count"].as_i64().unwrap() >= 2);

    let keys: Vec<(String, i64)> = items
        .iter()
        .map(|u| (u["name"].as_str().unwrap().to_string(), u["id"].as_i64().unwrap()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    for item in items {
        let mut fields: Vec<&String> = item.as_object().unwrap().keys().collect();
        fields.sort();
        assert_eq!(fields, ["email", "id", "name"]);
    }

    let (status, body) = ctx
        .request(
            "GET",
            "/management/user/list?page=100000",
            Some(&ctx.admin.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));

    let (status, _) = ctx
        .request("GET", "/management/user/list?page=0", Some(&ctx.admin.token), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_empty_update_changes_nothing() {
    let ctx = TestContext::new().await.unwrap();
    let before = ctx.customer.user.clone();

    let (status, body) = ctx
        .request(
            "PUT",
            &format!("/management/user/{}", before.id),
            Some(&ctx.admin.token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], before.name);
    assert_eq!(body["token"], ctx.customer.token);

    let after = User::find_by_id(&ctx.db, before.id).await.unwrap().unwrap();
    assert_eq!(after.updated_at, before.updated_at);

    ctx.cleanup().await.unwrap();
}
