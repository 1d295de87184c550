use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use synctool_core::{Database, ModelSpec, Queryset, Registry};
use synctool_models::{ModelLabel, SyncRecord};
use synctool_server::auth::encode_header;
use synctool_server::{Route, ServerContext};
use tower::ServiceExt;

fn test_context() -> ServerContext {
    let db = Database::open_in_memory().unwrap();
    db.execute_batch(
        r#"
        CREATE TABLE blog_blog (id INTEGER PRIMARY KEY AUTOINCREMENT, slug TEXT NOT NULL);
        CREATE TABLE blog_post (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            blog INTEGER NOT NULL,
            slug TEXT NOT NULL
        );
        INSERT INTO blog_blog (id, slug) VALUES (1, 'blog');
        INSERT INTO blog_post (id, blog, slug) VALUES (1, 1, 'first'), (2, 1, 'second');
        "#,
    )
    .unwrap();

    let mut registry = Registry::new();
    registry.register(db.introspect(&ModelSpec::new("blog", "blog")).unwrap());
    registry.register(db.introspect(&ModelSpec::new("blog", "post")).unwrap());

    ServerContext::new(db, registry)
}

fn test_router() -> axum::Router {
    Route::new("token")
        .queryset("blog-single", || {
            vec![Queryset::all(ModelLabel::new("blog", "blog"))]
        })
        .queryset("blog-multiple", || {
            vec![
                Queryset::all(ModelLabel::new("blog", "blog")),
                Queryset::all(ModelLabel::new("blog", "post")),
            ]
        })
        .app("blogs", "blog")
        .app("missing", "shop")
        .into_router(test_context())
}

fn authorized(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, encode_header("token"))
        .body(Body::empty())
        .unwrap()
}

async fn records_from(response: axum::response::Response) -> Vec<SyncRecord> {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_single_queryset_route() {
    let response = test_router().oneshot(authorized("/blog-single")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let records = records_from(response).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].model, "blog.blog");
    assert_eq!(records[0].fields["slug"], "blog");
}

#[tokio::test]
async fn test_multiple_querysets_keep_order() {
    let response = test_router()
        .oneshot(authorized("/blog-multiple/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let records = records_from(response).await;
    let models: Vec<&str> = records.iter().map(|r| r.model.as_str()).collect();
    assert_eq!(models, vec!["blog.blog", "blog.post", "blog.post"]);
}

#[tokio::test]
async fn test_app_dump_route() {
    let response = test_router().oneshot(authorized("/blogs")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let records = records_from(response).await;
    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn test_trailing_slash_optional() {
    for uri in ["/blogs", "/blogs/"] {
        let response = test_router().oneshot(authorized(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_bad_token_rejected() {
    let request = Request::builder()
        .uri("/blog-single")
        .header(header::AUTHORIZATION, encode_header("wrong"))
        .body(Body::empty())
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()[header::WWW_AUTHENTICATE],
        "Basic realm=\"Sync API\""
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"HTTP Authentication failed\n");
}

#[tokio::test]
async fn test_missing_header_rejected() {
    let request = Request::builder()
        .uri("/blog-single")
        .body(Body::empty())
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_accepted_in_password_half() {
    use base64::{engine::general_purpose::STANDARD, Engine};

    let request = Request::builder()
        .uri("/blog-single")
        .header(
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode(":token")),
        )
        .body(Body::empty())
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unregistered_app_is_not_found() {
    let response = test_router().oneshot(authorized("/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
