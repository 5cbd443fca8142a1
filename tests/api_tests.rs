use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use movies_api::{
    config::Config,
    entities::{actor, actor_movie, genre, movie},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::{Value, json};
use tower::ServiceExt;

const HOST: &str = "movies.test";

struct TestApp {
    router: Router,
    db: DatabaseConnection,
}

impl TestApp {
    async fn spawn() -> Self {
        let state = movies_api::create_app_state(&Config::in_memory())
            .await
            .expect("Failed to create app state");
        let db = state.catalog.db().clone();
        Self { router: movies_api::router(state), db }
    }

    async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri).header(header::HOST, HOST);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    async fn genre(&self, name: &str, ranking: i32) -> genre::Model {
        genre::ActiveModel { name: Set(name.to_string()), ranking: Set(ranking), ..Default::default() }
            .insert(&self.db)
            .await
            .unwrap()
    }

    async fn movie(&self, title: &str, rating: f64, release_date: &str, genre_id: Option<i32>) -> movie::Model {
        movie::ActiveModel {
            title: Set(title.to_string()),
            rating: Set(rating),
            awards: Set(1),
            release_date: Set(release_date.to_string()),
            length: Set(Some(120)),
            genre_id: Set(genre_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    async fn actor(&self, first_name: &str, favorite_movie_id: Option<i32>) -> actor::Model {
        actor::ActiveModel {
            first_name: Set(first_name.to_string()),
            last_name: Set("Doe".to_string()),
            rating: Set(Some(7.5)),
            favorite_movie_id: Set(favorite_movie_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    async fn cast(&self, movie_id: i32, actor_id: i32) {
        actor_movie::ActiveModel { movie_id: Set(movie_id), actor_id: Set(actor_id), ..Default::default() }
            .insert(&self.db)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_genre_list_orders() {
    let app = TestApp::spawn().await;
    for (name, ranking) in [("Drama", 3), ("Action", 1), ("Comedy", 2)] {
        app.genre(name, ranking).await;
    }

    let (status, body) = app.get("/api/genres").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["meta"]["status"], 200);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["perPage"], 3);
    assert!(body["data"]["genres"][0].get("created_at").is_none());

    for order in ["name", "ranking", "id"] {
        let (status, _) = app.get(&format!("/api/genres?order={order}")).await;
        assert_eq!(status, StatusCode::OK, "order={order}");
    }

    let (_, body) = app.get("/api/genres?order=name&limit=2").await;
    assert_eq!(body["data"]["perPage"], 2);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["genres"][0]["name"], "Action");

    let (status, body) = app.get("/api/genres?order=title").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert!(body["msg"].as_str().unwrap().contains("name, ranking, id"));
}

#[tokio::test]
async fn test_genre_by_id() {
    let app = TestApp::spawn().await;
    let drama = app.genre("Drama", 3).await;

    let (status, body) = app.get("/api/genres/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);

    let (status, _) = app.get("/api/genres/999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get(&format!("/api/genres/{}", drama.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["genre"]["name"], "Drama");
}

#[tokio::test]
async fn test_genre_by_name() {
    let app = TestApp::spawn().await;
    app.genre("Science Fiction", 4).await;
    app.genre("Comedy", 2).await;

    for uri in ["/api/genres/name", "/api/genres/name/"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["ok"], false);
    }

    let (status, body) = app.get("/api/genres/name/medy").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["genre"]["name"], "Comedy");

    let (status, body) = app.get("/api/genres/name/Western").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_movie_list_links_and_orders() {
    let app = TestApp::spawn().await;
    let genre = app.genre("Drama", 1).await;
    for i in 0..7 {
        app.movie(&format!("Movie {i}"), 5.0 + i as f64, &format!("200{i}-01-01"), Some(genre.id)).await;
    }

    let (status, body) = app.get("/api/movies").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 7);
    assert_eq!(body["data"]["perPage"], 5);
    for movie in body["data"]["movies"].as_array().unwrap() {
        assert_eq!(movie["link"], format!("http://{HOST}/api/movies/{}", movie["id"]));
        assert_eq!(movie["genre"]["name"], "Drama");
        assert!(movie.get("created_at").is_none());
        assert!(movie["genre"].get("updated_at").is_none());
    }

    let (_, body) = app.get("/api/movies?offset=5&limit=10").await;
    assert_eq!(body["data"]["perPage"], 2);

    for order in ["title", "rating", "id", "release_date", "length", "awards"] {
        let (status, _) = app.get(&format!("/api/movies?order={order}")).await;
        assert_eq!(status, StatusCode::OK, "order={order}");
    }

    let (status, body) = app.get("/api/movies?order=genre").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"].as_str().unwrap().contains("title, rating, id, release_date, length, awards"));

    let (status, _) = app.get("/api/movies?limit=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_counts_outside_sql_range_are_rejected() {
    let app = TestApp::spawn().await;
    app.movie("Alien", 8.5, "1979-05-25", None).await;

    for uri in [
        "/api/movies?limit=9223372036854775808",
        "/api/movies?offset=18446744073709551615",
        "/api/movies/new?limit=9223372036854775808",
        "/api/movies/recommended?limit=18446744073709551615",
        "/api/genres?limit=18446744073709551615",
        "/api/movies?limit=-1",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["ok"], false, "{uri}");
    }

    let (status, body) = app.get("/api/movies?limit=9223372036854775807").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["perPage"], 1);
}

#[tokio::test]
async fn test_newest_and_recommended() {
    let app = TestApp::spawn().await;
    app.movie("Old", 9.1, "1990-01-01", None).await;
    app.movie("Recent", 6.0, "2020-06-01", None).await;
    app.movie("Middle", 8.0, "2005-03-15", None).await;

    let (status, body) = app.get("/api/movies/new?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let movies = body["data"]["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0]["title"], "Recent");
    assert_eq!(movies[1]["title"], "Middle");
    assert!(body["data"].get("total").is_none());
    for movie in movies {
        assert_eq!(movie["link"], format!("http://{HOST}/api/movies/{}", movie["id"]));
        assert!(movie.get("genre_id").is_none());
    }

    let (status, body) = app.get("/api/movies/recommended").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body["data"]["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["Old", "Middle"]);
    for movie in body["data"]["movies"].as_array().unwrap() {
        assert_eq!(movie["link"], format!("http://{HOST}/api/movies/{}", movie["id"]));
    }
}

#[tokio::test]
async fn test_movie_detail() {
    let app = TestApp::spawn().await;
    let genre = app.genre("Horror", 2).await;
    let alien = app.movie("Alien", 8.5, "1979-05-25", Some(genre.id)).await;
    let ripley = app.actor("Sigourney", None).await;
    app.cast(alien.id, ripley.id).await;

    let (status, body) = app.get(&format!("/api/movies/{}", alien.id)).await;
    assert_eq!(status, StatusCode::OK);
    let movie = &body["data"]["movie"];
    assert_eq!(movie["release_date"], "1979-05-25T00:00:00+00:00");
    assert_eq!(movie["genre"], json!({ "id": genre.id, "name": "Horror", "ranking": 2 }));
    assert_eq!(movie["actors"][0]["first_name"], "Sigourney");
    assert!(movie["actors"][0].get("created_at").is_none());
    assert!(movie.get("genre_id").is_none());
    assert!(movie.get("created_at").is_none());
    assert!(movie.get("updated_at").is_none());
    assert!(movie.get("link").is_none());

    let (status, _) = app.get("/api/movies/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/movies/999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_movie() {
    let app = TestApp::spawn().await;
    let genre = app.genre("Animation", 1).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/movies/create",
            Some(json!({
                "title": "  Toy Story  ",
                "rating": 8.3,
                "awards": 1,
                "release_date": "1995-11-22",
                "length": 81,
                "genre_id": genre.id,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["meta"]["status"], 201);
    assert_eq!(body["data"]["movie"]["title"], "Toy Story");
    assert_eq!(body["data"]["movie"]["genre_id"], genre.id);
    assert!(body["data"]["movie"]["id"].as_i64().unwrap() > 0);

    let (status, body) = app
        .request(
            "POST",
            "/api/movies/create",
            Some(json!({
                "title": "Sequel",
                "rating": 7.0,
                "awards": 0,
                "release_date": "2999-01-01",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
    assert_eq!(body["msg"][0]["path"], "release_date");

    let (status, body) = app.request("POST", "/api/movies/create", Some(json!({}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let paths: Vec<_> = body["msg"].as_array().unwrap().iter().map(|e| e["path"].clone()).collect();
    assert_eq!(paths, [json!("title"), json!("rating"), json!("awards"), json!("release_date")]);

    assert_eq!(movie::Entity::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_created_release_dates_sort_as_dates() {
    let app = TestApp::spawn().await;
    for (title, release_date) in [("Basic", "19700101"), ("Extended", "1969-12-31"), ("Spaced", " 1980-01-01")] {
        let (status, _) = app
            .request(
                "POST",
                "/api/movies/create",
                Some(json!({ "title": title, "rating": 7.0, "awards": 1, "release_date": release_date })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{title}");
    }

    let (_, body) = app.get("/api/movies/new").await;
    let newest: Vec<_> = body["data"]["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| (m["title"].as_str().unwrap().to_string(), m["release_date"].as_str().unwrap().to_string()))
        .collect();
    assert_eq!(
        newest,
        [
            ("Spaced".to_string(), "1980-01-01".to_string()),
            ("Basic".to_string(), "1970-01-01".to_string()),
            ("Extended".to_string(), "1969-12-31".to_string()),
        ]
    );

    let basic = movie::Entity::find()
        .filter(movie::Column::Title.eq("Basic"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(basic.release_date, "1970-01-01");

    let (status, body) = app
        .request("PUT", &format!("/api/movies/{}", basic.id), Some(json!({ "release_date": "19710101" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["movie"]["release_date"], "1971-01-01");
}

#[tokio::test]
async fn test_update_movie() {
    let app = TestApp::spawn().await;
    let alien = app.movie("Alien", 8.5, "1979-05-25", None).await;

    let (status, body) = app
        .request("PUT", &format!("/api/movies/{}", alien.id), Some(json!({ "title": "", "rating": 0 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["movie"]["title"], "Alien");
    assert_eq!(body["data"]["movie"]["rating"], 8.5);

    let (status, body) = app
        .request("PUT", &format!("/api/movies/{}", alien.id), Some(json!({ "title": "Aliens", "awards": 6 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["movie"]["title"], "Aliens");
    assert_eq!(body["data"]["movie"]["awards"], 6);

    let stored = movie::Entity::find_by_id(alien.id).one(&app.db).await.unwrap().unwrap();
    assert_eq!(stored.title, "Aliens");
    assert_eq!(stored.rating, 8.5);

    let (status, _) = app.request("PUT", "/api/movies/999999", Some(json!({ "title": "Nope" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_movie_cascades() {
    let app = TestApp::spawn().await;
    let alien = app.movie("Alien", 8.5, "1979-05-25", None).await;
    let other = app.movie("Heat", 8.3, "1995-12-15", None).await;
    let fan = app.actor("Sigourney", Some(alien.id)).await;
    let bystander = app.actor("Al", Some(other.id)).await;
    app.cast(alien.id, fan.id).await;
    app.cast(alien.id, bystander.id).await;
    app.cast(other.id, bystander.id).await;

    let (status, body) = app.request("DELETE", &format!("/api/movies/{}", alien.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedMovie"]["title"], "Alien");

    let fan = actor::Entity::find_by_id(fan.id).one(&app.db).await.unwrap().unwrap();
    assert_eq!(fan.favorite_movie_id, None);
    let bystander = actor::Entity::find_by_id(bystander.id).one(&app.db).await.unwrap().unwrap();
    assert_eq!(bystander.favorite_movie_id, Some(other.id));

    let remaining = actor_movie::Entity::find()
        .filter(actor_movie::Column::MovieId.eq(alien.id))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    assert_eq!(actor_movie::Entity::find().count(&app.db).await.unwrap(), 1);
    assert!(movie::Entity::find_by_id(alien.id).one(&app.db).await.unwrap().is_none());

    let (status, _) = app.request("DELETE", &format!("/api/movies/{}", alien.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/directors").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], false);

    let (status, body) = app.request("POST", "/api/movies/create", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
}
