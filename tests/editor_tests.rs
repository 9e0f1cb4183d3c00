mod common;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::routing::{get, post};
use common::{Recorder, client, jwt, ok, serve, store};
use gamedex::ClientError;
use gamedex::Session;
use gamedex::editor::{EditorError, ListEditor};
use gamedex::likes::{LikeAction, toggle_like};
use gamedex::models::{GameList, GameSummary, ListOrdering, Review, User};
use gamedex::session::tokens::ACCESS_TOKEN;
use serde_json::{Value, json};
use std::sync::Arc;

fn ana() -> User {
    serde_json::from_value(json!({ "id": "u1", "username": "ana" })).unwrap()
}

fn list_json(ordering: &str) -> Value {
    json!({
        "id": "l1",
        "name": "Favourites",
        "description": "All-time",
        "user": { "id": "u1", "username": "ana" },
        "ordering": ordering,
        "is_ranked": true,
        "games": [
            { "game_id": "a", "note": "", "game": { "id": "a", "title": "Celeste", "year": "2018" } },
            { "game_id": "b", "note": "gorgeous", "game": { "id": "b", "title": "Gris", "year": "2018" } },
            { "game_id": "c", "note": "", "game": { "id": "c", "title": "Inside", "year": "2016" } }
        ],
        "likes": [{ "user_id": "u2" }]
    })
}

/// Serves `GET /list/l1` and records `POST /list` and `PUT /list/{id}` bodies.
fn list_router(rec: Arc<Recorder>, list: Value) -> Router {
    let (put_rec, post_rec) = (rec.clone(), rec);

    Router::new()
        .route(
            "/list/{id}",
            get(move || {
                let list = list.clone();
                async move { ok(list) }
            })
            .put(move |Path(id): Path<String>, Json(body): Json<Value>| {
                let rec = put_rec.clone();
                async move {
                    rec.record(&format!("PUT /list/{id}"), body.clone());
                    let mut saved = body;
                    saved["id"] = Value::String(id);
                    ok(saved)
                }
            }),
        )
        .route(
            "/list",
            post(move |Json(body): Json<Value>| {
                let rec = post_rec.clone();
                async move {
                    rec.record("POST /list", body.clone());
                    let mut saved = body;
                    saved["id"] = json!("l-new");
                    ok(saved)
                }
            }),
        )
}

fn orders(body: &Value) -> Vec<Value> {
    body["games"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g.get("order").cloned().unwrap_or(Value::Null))
        .collect()
}

fn ids(body: &Value) -> Vec<&str> {
    body["games"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["game_id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_switching_to_custom_numbers_current_order_and_saves_with_put() {
    let rec = Recorder::new();
    let base = serve(list_router(rec.clone(), list_json("title_asc"))).await;
    let (client, tokens) = client(&base);
    store(&tokens, ACCESS_TOKEN, &jwt("u1", 3600));
    let session = Session::with_user(ana());

    let list = client.get_list("l1").await.unwrap();
    let mut editor = ListEditor::from_list(list, &session).unwrap();
    assert_eq!(editor.ordering(), ListOrdering::TitleAsc);

    editor.set_ordering(ListOrdering::Custom);
    let saved = editor.save(&client).await.unwrap().unwrap();

    let bodies = rec.bodies("PUT /list/l1");
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["ordering"], "custom");
    assert_eq!(ids(body), vec!["a", "b", "c"]);
    assert_eq!(orders(body), vec![json!(0), json!(1), json!(2)]);
    assert_eq!(body["name"], "Favourites");
    assert_eq!(body["description"], "All-time");
    assert_eq!(body["is_ranked"], true);
    assert_eq!(body["games"][1]["note"], "gorgeous");

    assert_eq!(saved.id, "l1");
    assert_eq!(saved.ordering, ListOrdering::Custom);
}

#[tokio::test]
async fn test_drag_then_remove_keeps_stale_orders_in_payload() {
    let rec = Recorder::new();
    let base = serve(list_router(rec.clone(), list_json("year_desc"))).await;
    let (client, tokens) = client(&base);
    store(&tokens, ACCESS_TOKEN, &jwt("u1", 3600));
    let session = Session::with_user(ana());

    let list = client.get_list("l1").await.unwrap();
    let mut editor = ListEditor::from_list(list, &session).unwrap();

    assert!(editor.reorder("c", "a"));
    assert_eq!(editor.ordering(), ListOrdering::Custom);
    assert!(editor.remove_game("c"));
    editor.save(&client).await.unwrap();

    let body = &rec.bodies("PUT /list/l1")[0];
    assert_eq!(ids(body), vec!["a", "b"]);
    assert_eq!(orders(body), vec![json!(1), json!(2)]);
}

#[tokio::test]
async fn test_leaving_custom_drops_orders_from_payload() {
    let rec = Recorder::new();
    let base = serve(list_router(rec.clone(), list_json("custom"))).await;
    let (client, tokens) = client(&base);
    store(&tokens, ACCESS_TOKEN, &jwt("u1", 3600));
    let session = Session::with_user(ana());

    let list: GameList = client.get_list("l1").await.unwrap();
    let mut editor = ListEditor::from_list(list, &session).unwrap();
    assert!(editor.is_consistent());

    editor.set_ordering(ListOrdering::TitleDesc);
    editor.save(&client).await.unwrap();

    let body = &rec.bodies("PUT /list/l1")[0];
    assert_eq!(body["ordering"], "title_desc");
    assert_eq!(orders(body), vec![Value::Null, Value::Null, Value::Null]);
}

#[tokio::test]
async fn test_new_list_is_created_with_post() {
    let rec = Recorder::new();
    let base = serve(list_router(rec.clone(), list_json("custom"))).await;
    let (client, tokens) = client(&base);
    store(&tokens, ACCESS_TOKEN, &jwt("u1", 3600));

    let mut editor = ListEditor::new();
    editor.set_name("Short & sweet");
    editor.set_ordering(ListOrdering::Custom);
    for (id, title) in [("x", "Thumper"), ("y", "Tetris Effect")] {
        let game = GameSummary {
            id: Some(id.to_string()),
            title: title.to_string(),
            ..GameSummary::default()
        };
        editor.add_game(id, game).unwrap();
    }

    let saved = editor.save(&client).await.unwrap().unwrap();

    assert_eq!(saved.id, "l-new");
    let body = &rec.bodies("POST /list")[0];
    assert_eq!(body["name"], "Short & sweet");
    assert_eq!(orders(body), vec![json!(0), json!(1)]);
    assert_eq!(rec.count("PUT /list/l1"), 0);
}

#[tokio::test]
async fn test_only_the_owner_can_edit() {
    let rec = Recorder::new();
    let base = serve(list_router(rec.clone(), list_json("custom"))).await;
    let (client, _tokens) = client(&base);

    let list = client.get_list("l1").await.unwrap();
    let stranger: User =
        serde_json::from_value(json!({ "id": "u9", "username": "zed" })).unwrap();

    assert!(matches!(
        ListEditor::from_list(list.clone(), &Session::with_user(stranger)),
        Err(EditorError::NotOwner)
    ));
    assert!(matches!(
        ListEditor::from_list(list, &Session::new()),
        Err(EditorError::NotOwner)
    ));
}

#[tokio::test]
async fn test_save_without_login_is_unauthenticated() {
    let rec = Recorder::new();
    let base = serve(list_router(rec.clone(), list_json("custom"))).await;
    let (client, _tokens) = client(&base);

    let mut editor = ListEditor::new();
    editor.set_name("Nope");
    let err = editor.save(&client).await.unwrap_err();

    assert!(matches!(err, EditorError::Client(ClientError::Unauthenticated)));
    assert_eq!(rec.count("POST /list"), 0);
}

fn like_router(rec: Arc<Recorder>) -> Router {
    let (post_rec, delete_rec) = (rec.clone(), rec);
    Router::new().route(
        "/reviews/{id}/like",
        post(move |Path(id): Path<String>| {
            let rec = post_rec.clone();
            async move {
                rec.record(&format!("POST /reviews/{id}/like"), Value::Null);
                ok(Value::Null)
            }
        })
        .delete(move |Path(id): Path<String>| {
            let rec = delete_rec.clone();
            async move {
                rec.record(&format!("DELETE /reviews/{id}/like"), Value::Null);
                ok(Value::Null)
            }
        }),
    )
}

fn review(likes: Value) -> Review {
    serde_json::from_value(json!({
        "id": "r1",
        "gameId": "g1",
        "userId": "u2",
        "review_text": "Short, sharp and funny.",
        "likes": likes
    }))
    .unwrap()
}

#[tokio::test]
async fn test_toggle_like_picks_post_or_delete_from_likes() {
    let rec = Recorder::new();
    let base = serve(like_router(rec.clone())).await;
    let (client, tokens) = client(&base);
    store(&tokens, ACCESS_TOKEN, &jwt("u1", 3600));
    let session = Session::with_user(ana());

    let not_liked = review(json!([{ "user_id": "u3" }]));
    let action = toggle_like(&client, &session, &not_liked).await.unwrap();
    assert_eq!(action, LikeAction::Liked);
    assert_eq!(rec.count("POST /reviews/r1/like"), 1);

    let liked = review(json!([{ "user_id": "u3" }, { "user_id": "u1" }]));
    let action = toggle_like(&client, &session, &liked).await.unwrap();
    assert_eq!(action, LikeAction::Unliked);
    assert_eq!(rec.count("DELETE /reviews/r1/like"), 1);
}

#[tokio::test]
async fn test_anonymous_like_sends_nothing() {
    let rec = Recorder::new();
    let base = serve(like_router(rec.clone())).await;
    let (client, _tokens) = client(&base);

    let err = toggle_like(&client, &Session::new(), &review(json!([])))
        .await
        .unwrap_err();

    assert_eq!(err, ClientError::Unauthenticated);
    assert_eq!(rec.total(), 0);
}
