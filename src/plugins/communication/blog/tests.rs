use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use crate::kernel::build_app;
use crate::plugins::communication::blog::models::{BlogStatus, BlogTopic, VoteType};
use crate::plugins::communication::blog::service::BlogService;
use crate::plugins::communication::comments::models::CommentCreate;
use crate::plugins::communication::comments::service::CommentService;
use crate::standard_plugins;
use crate::store::InMemoryStore;

async fn app() -> Router {
    let plugins = standard_plugins(InMemoryStore::new().into_arc(), None);
    build_app(&plugins, None).await
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = Request::builder().method(method).uri(uri).header("content-type", "application/json");
    let req = match body {
        Some(b) => req.body(Body::from(b.to_string())).unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn create(app: &Router, title: &str) -> Value {
    let (status, blog) = call(app, Method::POST, "/blogs", Some(json!({
        "title": title, "description": "three days on the coast", "authorId": 7, "topic": "hiking"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    blog
}

async fn vote(app: &Router, blog_id: i64, user_id: i64, vote_type: &str) -> (StatusCode, Value) {
    call(app, Method::POST, "/blogs/votes", Some(json!({"userId": user_id, "blogId": blog_id, "voteType": vote_type}))).await
}

#[tokio::test]
async fn new_blog_starts_published_public_and_empty() {
    let app = app().await;
    let blog = create(&app, "Cinque Terre").await;
    assert_eq!(blog["status"], "published");
    assert_eq!(blog["visibility"], "public");
    assert_eq!(blog["voteCount"], 0);
    assert_eq!(blog["upvoteCount"], 0);
    assert_eq!(blog["downvoteCount"], 0);
    assert_eq!(blog["votes"], json!([]));
    assert_eq!(blog["comments"], json!([]));
    assert!(blog["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn create_rejects_bad_input() {
    let app = app().await;
    let (status, body) = call(&app, Method::POST, "/blogs", Some(json!({
        "title": "", "description": "d", "authorId": 1, "topic": "hiking"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = call(&app, Method::POST, "/blogs", Some(json!({
        "title": "t", "description": "d", "authorId": 1, "topic": "skydiving"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn one_vote_per_user_and_idempotent_repeat() {
    let app = app().await;
    let id = create(&app, "Dolomites").await["id"].as_i64().unwrap();

    let (status, blog) = vote(&app, id, 1, "UPVOTE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(blog["voteCount"], 1);

    let (_, again) = vote(&app, id, 1, "UPVOTE").await;
    assert_eq!(again["voteCount"], 1);
    assert_eq!(again["votes"].as_array().unwrap().len(), 1);
    assert_eq!(again["version"], blog["version"]);

    let (_, flipped) = vote(&app, id, 1, "DOWNVOTE").await;
    assert_eq!(flipped["voteCount"], -1);
    assert_eq!(flipped["upvoteCount"], 0);
    assert_eq!(flipped["downvoteCount"], 1);
    assert_eq!(flipped["votes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_vote_leaves_blog_untouched() {
    let app = app().await;
    let id = create(&app, "Lofoten").await["id"].as_i64().unwrap();
    vote(&app, id, 2, "UPVOTE").await;

    let (status, body) = vote(&app, id, 3, "SIDEVOTE").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("SIDEVOTE"));

    let (status, _) = vote(&app, id, 0, "UPVOTE").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, blog) = call(&app, Method::GET, &format!("/blogs/{}", id), None).await;
    assert_eq!(blog["voteCount"], 1);
    assert_eq!(blog["votes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn voting_on_missing_blog_is_not_found() {
    let app = app().await;
    let (status, body) = vote(&app, 999, 1, "UPVOTE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn three_downvotes_close_the_blog() {
    let app = app().await;
    let id = create(&app, "Rainy Glasgow").await["id"].as_i64().unwrap();
    for user in 1..=2 {
        vote(&app, id, user, "DOWNVOTE").await;
    }
    let (_, blog) = call(&app, Method::GET, &format!("/blogs/{}", id), None).await;
    assert_eq!(blog["status"], "published");

    let (_, blog) = vote(&app, id, 3, "DOWNVOTE").await;
    assert_eq!(blog["voteCount"], -3);
    assert_eq!(blog["status"], "closed");

    // recovering the score reopens it
    let (_, blog) = vote(&app, id, 3, "UPVOTE").await;
    assert_eq!(blog["status"], "published");
}

#[tokio::test]
async fn block_is_one_way_and_keeps_counts() {
    let app = app().await;
    let id = create(&app, "Hidden Cove").await["id"].as_i64().unwrap();
    vote(&app, id, 1, "UPVOTE").await;

    let (status, blog) = call(&app, Method::PATCH, &format!("/blogs/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(blog["visibility"], "private");
    assert_eq!(blog["voteCount"], 1);

    let (_, again) = call(&app, Method::PATCH, &format!("/blogs/{}", id), None).await;
    assert_eq!(again["visibility"], "private");

    let (_, published) = call(&app, Method::GET, "/blogs/published", None).await;
    assert_eq!(published["total"], 0);
}

#[tokio::test]
async fn update_changes_text_only() {
    let app = app().await;
    let id = create(&app, "Old Title").await["id"].as_i64().unwrap();
    vote(&app, id, 4, "UPVOTE").await;

    let (status, blog) = call(&app, Method::PUT, &format!("/blogs/{}", id), Some(json!({"title": "New Title", "description": "rewritten"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(blog["title"], "New Title");
    assert_eq!(blog["voteCount"], 1);

    let (status, _) = call(&app, Method::PUT, &format!("/blogs/{}", id), Some(json!({"title": " ", "description": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = app().await;
    let id = create(&app, "Gone").await["id"].as_i64().unwrap();
    let (status, _) = call(&app, Method::DELETE, &format!("/blogs/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, Method::GET, &format!("/blogs/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::DELETE, &format!("/blogs/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_author_and_topic() {
    let app = app().await;
    create(&app, "one").await;
    call(&app, Method::POST, "/blogs", Some(json!({"title": "two", "description": "d", "authorId": 9, "topic": "food"}))).await;

    let (_, by_author) = call(&app, Method::GET, "/blogs/author/9", None).await;
    assert_eq!(by_author["total"], 1);
    assert_eq!(by_author["items"][0]["title"], "two");

    let (_, by_topic) = call(&app, Method::GET, "/blogs/type/hiking", None).await;
    assert_eq!(by_topic["total"], 1);
    assert_eq!(by_topic["items"][0]["title"], "one");

    let (status, _) = call(&app, Method::GET, "/blogs/type/skydiving", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, all) = call(&app, Method::GET, "/blogs?per_page=1", None).await;
    assert_eq!(all["total"], 2);
    assert_eq!(all["has_more"], true);
}

#[tokio::test]
async fn concurrent_votes_are_all_counted() {
    let service = BlogService::new(InMemoryStore::new().into_arc());
    let blog_id = service.create("Crowded", "everyone votes", 1, BlogTopic::Beach).await.unwrap().id;

    let mut handles = Vec::new();
    for user in 1..=50 {
        let s = service.clone();
        let vote_type = if user % 5 == 0 { VoteType::Downvote } else { VoteType::Upvote };
        handles.push(tokio::spawn(async move { s.set_vote(blog_id, user, vote_type).await }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let blog = service.find(blog_id).await.unwrap();
    assert_eq!(blog.votes.len(), 50);
    assert_eq!(blog.upvote_count, 40);
    assert_eq!(blog.downvote_count, 10);
    assert_eq!(blog.vote_count, 30);
}

#[tokio::test]
async fn comments_drive_active_and_famous() {
    let blogs = BlogService::new(InMemoryStore::new().into_arc());
    let comments = CommentService::new(blogs.clone());
    let blog = blogs.create("Busy", "lots of talk", 1, BlogTopic::Culture).await.unwrap();
    for user in 1..=3 {
        blogs.set_vote(blog.id, user, VoteType::Upvote).await.unwrap();
    }
    assert_eq!(blogs.find(blog.id).await.unwrap().status, BlogStatus::Published);

    let mut ids = Vec::new();
    for n in 0..3 {
        let c = comments
            .create(CommentCreate { author_id: 2, blog_id: blog.id, created_at: None, text: format!("comment {}", n) })
            .await
            .unwrap();
        ids.push(c.id);
        let expected = if n == 0 { BlogStatus::Published } else if n == 1 { BlogStatus::Active } else { BlogStatus::Famous };
        assert_eq!(blogs.find(blog.id).await.unwrap().status, expected);
    }

    comments.delete(ids[0]).await.unwrap();
    let after = blogs.find(blog.id).await.unwrap();
    assert_eq!(after.comment_count(), 2);
    assert_eq!(after.status, BlogStatus::Active);
}
