//! Router-level tests over the in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use library_catalog::{api, repository::Repository, AppState};

fn app() -> Router {
    api::router(AppState::new(Repository::memory()))
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["status"], "healthy");

    let response = get(&app, "/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["status"], "ready");
}

#[tokio::test]
async fn test_root_redirects_to_catalog() {
    let response = get(&app(), "/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog");
}

#[tokio::test]
async fn test_catalog_home_counts() {
    let app = app();
    post_form(&app, "/catalog/genre/create", "name=Poetry").await;

    let response = get(&app, "/catalog").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["template"], "index");
    assert_eq!(body["context"]["title"], "Local Library Home");
    assert_eq!(body["context"]["counts"]["genre_count"], 1);
    assert_eq!(body["context"]["counts"]["book_count"], 0);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = app();

    let response = get(&app, "/catalog/author/not-an-id").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(
        &app,
        "/catalog/book/5f0c2d4e-7a1b-4c3d-9e8f-0a1b2c3d4e5f",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_missing_targets_redirect_to_lists() {
    let app = app();
    let id = "5f0c2d4e-7a1b-4c3d-9e8f-0a1b2c3d4e5f";

    let response = get(&app, &format!("/catalog/author/{}/update", id)).await;
    assert_eq!(location(&response), "/catalog/authors");

    let response = get(&app, &format!("/catalog/genre/{}/delete", id)).await;
    assert_eq!(location(&response), "/catalog/genres");

    let response = post_form(&app, &format!("/catalog/bookinstance/{}/delete", id), "").await;
    assert_eq!(location(&response), "/catalog/bookinstances");
}

#[tokio::test]
async fn test_create_author_and_view_detail() {
    let app = app();

    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=Jane&family_name=Austen&date_of_birth=1775-12-16&date_of_death=1817-07-18",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let url = location(&response);
    assert!(url.starts_with("/catalog/author/"));

    let body = json(get(&app, &url).await).await;
    assert_eq!(body["template"], "author_detail");
    let author = &body["context"]["author"];
    assert_eq!(author["name"], "Austen, Jane");
    assert_eq!(author["lifespan"], 41);
    assert_eq!(author["url"], url);
    assert_eq!(body["context"]["author_books"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_rejected_author_form_is_rendered_with_errors() {
    let app = app();

    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=J%21ne&family_name=&date_of_birth=1775-13-45",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["template"], "author_form");
    assert_eq!(body["context"]["author"]["first_name"], "J!ne");
    let fields: Vec<_> = body["context"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, ["first_name", "family_name", "date_of_birth"]);

    let body = json(get(&app, "/catalog/authors").await).await;
    assert_eq!(body["context"]["author_list"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_genre_create_is_idempotent() {
    let app = app();

    let first = location(&post_form(&app, "/catalog/genre/create", "name=Fantasy").await);
    let second = location(&post_form(&app, "/catalog/genre/create", "name=Fantasy").await);
    assert_eq!(first, second);

    let body = json(get(&app, "/catalog/genres").await).await;
    assert_eq!(body["context"]["genre_list"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_book_with_repeated_genre_keys() {
    let app = app();
    let author = location(
        &post_form(
            &app,
            "/catalog/author/create",
            "first_name=Ursula&family_name=LeGuin",
        )
        .await,
    );
    let author_id = author.rsplit('/').next().unwrap().to_string();
    let fantasy = location(&post_form(&app, "/catalog/genre/create", "name=Fantasy").await);
    let poetry = location(&post_form(&app, "/catalog/genre/create", "name=Poetry").await);
    let fantasy_id = fantasy.rsplit('/').next().unwrap();
    let poetry_id = poetry.rsplit('/').next().unwrap();

    let response = post_form(
        &app,
        "/catalog/book/create",
        &format!(
            "title=A%20Wizard%20of%20Earthsea&author={}&summary=Ged.&isbn=9780547722023&genre={}&genre={}",
            author_id, fantasy_id, poetry_id
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let book = location(&response);

    let body = json(get(&app, &book).await).await;
    assert_eq!(body["context"]["book"]["title"], "A Wizard of Earthsea");
    assert_eq!(body["context"]["author"]["url"], author);
    let genres: Vec<_> = body["context"]["genres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(genres, ["Fantasy", "Poetry"]);

    // The author now has a book, so deletion is refused
    let response = post_form(&app, &format!("{}/delete", author), "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["template"], "author_delete");
    assert_eq!(body["context"]["author_books"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_book_instance_lifecycle() {
    let app = app();
    let book = location(
        &post_form(
            &app,
            "/catalog/book/create",
            "title=Emma&author=5f0c2d4e-7a1b-4c3d-9e8f-0a1b2c3d4e5f&summary=A%20novel.&isbn=9780141439587",
        )
        .await,
    );
    let book_id = book.rsplit('/').next().unwrap().to_string();

    let copy = location(
        &post_form(
            &app,
            "/catalog/bookinstance/create",
            &format!("book={}&imprint=Penguin&status=Loaned&due_back=2024-03-01", book_id),
        )
        .await,
    );

    let body = json(get(&app, &copy).await).await;
    let instance = &body["context"]["bookinstance"];
    assert_eq!(instance["status"], "Loaned");
    assert_eq!(instance["due_back_yyyy_mm_dd"], "2024-03-01");
    assert_eq!(instance["book"]["title"], "Emma");

    let response = post_form(&app, &format!("{}/delete", book), "").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_form(&app, &format!("{}/delete", copy), "").await;
    assert_eq!(location(&response), "/catalog/bookinstances");
    let response = post_form(&app, &format!("{}/delete", book), "").await;
    assert_eq!(location(&response), "/catalog/books");
}

#[tokio::test]
async fn test_book_list_keeps_insertion_order() {
    let app = app();
    let author = "5f0c2d4e-7a1b-4c3d-9e8f-0a1b2c3d4e5f";
    for title in ["Zebra", "Apple"] {
        let response = post_form(
            &app,
            "/catalog/book/create",
            &format!("title={}&author={}&summary=S.&isbn=1", title, author),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let body = json(get(&app, "/catalog/books").await).await;
    let titles: Vec<_> = body["context"]["book_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["Zebra", "Apple"]);
}

#[tokio::test]
async fn test_book_with_unparsable_author_rejected() {
    let app = app();
    let response = post_form(
        &app,
        "/catalog/book/create",
        "title=Emma&author=austen&summary=S.&isbn=1",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["context"]["errors"][0]["field"], "author");
    assert_eq!(body["context"]["errors"][0]["message"], "Invalid author");
}
