use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    database::Database,
    http_server::{
        http_routes::{self, artists, home, shows, venues},
        state::AppState,
    },
};

pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub database: Database,
}

pub fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/venues", get(venues::venues))
        .route("/venues/search", post(venues::search_venues))
        .route(
            "/venues/create",
            get(venues::create_venue_form).post(venues::create_venue_submission),
        )
        .route(
            "/venues/{id}",
            get(venues::show_venue).delete(venues::delete_venue),
        )
        .route(
            "/venues/{id}/edit",
            get(venues::edit_venue).post(venues::edit_venue_submission),
        )
        .route("/artists", get(artists::artists))
        .route("/artists/search", post(artists::search_artists))
        .route(
            "/artists/create",
            get(artists::create_artist_form).post(artists::create_artist_submission),
        )
        .route(
            "/artists/{id}",
            get(artists::show_artist).delete(artists::delete_artist),
        )
        .route(
            "/artists/{id}/edit",
            get(artists::edit_artist).post(artists::edit_artist_submission),
        )
        .route("/shows", get(shows::shows))
        .route(
            "/shows/create",
            get(shows::create_show_form).post(shows::create_show_submission),
        )
        .fallback(http_routes::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState::new(Arc::new(config.database)));
    let app = build_router(app_state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .wrap_err_with(|| eyre!("Failed to bind to {}", address))?;
    log::info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_artist, insert_show, insert_venue, test_db};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn router() -> (Router, Arc<Database>) {
        let db = test_db().await;
        (build_router(Arc::new(AppState::new(db.clone()))), db)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_home_page_is_html() {
        let (app, _) = router().await;
        let response = app.oneshot(get_request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_unknown_path_and_non_integer_id_are_404() {
        let (app, _) = router().await;

        let response = app.clone().oneshot(get_request("/nowhere")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("<h1>404</h1>"));

        let response = app.clone().oneshot(get_request("/venues/abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(get_request("/artists/77")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_venue_then_view_it() {
        let (app, _) = router().await;

        let response = app
            .clone()
            .oneshot(form_request(
                "/venues/create",
                "name=The+Musical+Hop&city=San+Francisco&state=CA&address=1015+Folsom+Street\
                 &genres=Jazz&genres=Reggae&seeking_talent=y",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            body_text(response)
                .await
                .contains("Venue The Musical Hop was successfully listed!")
        );

        let response = app.oneshot(get_request("/venues/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<h1>The Musical Hop</h1>"));
        assert!(html.contains("<p>Jazz, Reggae</p>"));
        assert!(html.contains("Currently seeking talent"));
    }

    #[tokio::test]
    async fn test_create_venue_missing_fields_reports_failure() {
        let (app, db) = router().await;

        let response = app
            .oneshot(form_request("/venues/create", "name=Half+Done&city=Austin"))
            .await
            .unwrap();
        assert!(
            body_text(response)
                .await
                .contains("An error occurred. Venue Half Done could not be listed.")
        );

        use sea_orm::{EntityTrait, PaginatorTrait};
        let count = crate::entities::venue::Entity::find()
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_edit_venue_redirects_with_flash() {
        let (app, db) = router().await;
        insert_venue(&db, "Old Name", "Austin", "TX").await;

        let response = app
            .clone()
            .oneshot(form_request(
                "/venues/1/edit",
                "name=New+Name&city=Austin&state=TX&address=2+Main+St",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/venues/1");
        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("flash="));

        let flash_pair = cookie.split(';').next().unwrap().to_string();
        let request = Request::builder()
            .uri("/venues/1")
            .header(header::COOKIE, flash_pair)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Venue New Name was successfully updated!"));
        assert!(html.contains("2 Main St"));
    }

    /// Posts an edit and follows the redirect with the flash cookie it set.
    async fn edit_and_follow(app: Router, uri: &str, body: &str) -> (String, String) {
        let response = app.clone().oneshot(form_request(uri, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string();
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let flash_pair = cookie.split(';').next().unwrap().to_string();

        let request = Request::builder()
            .uri(location.as_str())
            .header(header::COOKIE, flash_pair)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        (location, body_text(response).await)
    }

    #[tokio::test]
    async fn test_edit_missing_venue_reports_failure() {
        let (app, _) = router().await;

        let (location, html) = edit_and_follow(
            app,
            "/venues/8/edit",
            "name=Ghost&city=Austin&state=TX&address=2+Main+St",
        )
        .await;
        assert_eq!(location, "/");
        assert!(html.contains("An error occurred. Venue Ghost could not be updated."));
    }

    #[tokio::test]
    async fn test_edit_missing_artist_reports_failure() {
        let (app, _) = router().await;

        let (location, html) = edit_and_follow(
            app,
            "/artists/3/edit",
            "name=Nobody&city=Austin&state=TX",
        )
        .await;
        assert_eq!(location, "/");
        assert!(html.contains("An error occurred. Artist Nobody could not be updated."));
    }

    #[tokio::test]
    async fn test_edit_invalid_artist_stays_on_detail_page() {
        let (app, db) = router().await;
        insert_artist(&db, "Band").await;

        let (location, html) = edit_and_follow(app, "/artists/1/edit", "name=Band&city=").await;
        assert_eq!(location, "/artists/1");
        assert!(html.contains("An error occurred. Artist Band could not be updated."));
    }

    #[tokio::test]
    async fn test_delete_is_silent_whether_or_not_the_row_exists() {
        let (app, db) = router().await;
        let venue = insert_venue(&db, "Hall", "Austin", "TX").await;
        let artist = insert_artist(&db, "Band").await;
        insert_show(&db, artist.id, venue.id, Utc::now() + Duration::days(1)).await;

        for uri in ["/venues/1", "/venues/1", "/artists/1", "/artists/42"] {
            let request = Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NO_CONTENT, "uri: {uri}");
            assert!(body_text(response).await.is_empty());
        }

        let response = app.oneshot(get_request("/venues/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_artists() {
        let (app, db) = router().await;
        for name in ["Oak Ridge Boys", "The Oaks", "Elm Street Band"] {
            insert_artist(&db, name).await;
        }

        let response = app
            .oneshot(form_request("/artists/search", "search_term=oak"))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Number of search results for \"oak\": 2"));
        assert!(!html.contains("Elm Street Band"));
    }

    #[tokio::test]
    async fn test_create_show_with_unknown_venue_reports_failure() {
        let (app, db) = router().await;
        insert_artist(&db, "Band").await;

        let response = app
            .clone()
            .oneshot(form_request(
                "/shows/create",
                "artist_id=1&venue_id=9&start_time=2035-04-01T20%3A00",
            ))
            .await
            .unwrap();
        assert!(
            body_text(response)
                .await
                .contains("An error occurred. Show could not be listed.")
        );

        insert_venue(&db, "Hall", "Austin", "TX").await;
        let response = app
            .clone()
            .oneshot(form_request(
                "/shows/create",
                "artist_id=1&venue_id=1&start_time=2035-04-01T20%3A00",
            ))
            .await
            .unwrap();
        assert!(
            body_text(response)
                .await
                .contains("Show was successfully listed!")
        );

        let html = body_text(app.oneshot(get_request("/shows")).await.unwrap()).await;
        assert!(html.contains("Sunday April, 1, 2035 at 8:00PM"));
    }

    #[tokio::test]
    async fn test_show_form_offers_existing_rows() {
        let (app, db) = router().await;
        insert_artist(&db, "Band").await;
        insert_venue(&db, "Hall", "Austin", "TX").await;

        let html = body_text(app.oneshot(get_request("/shows/create")).await.unwrap()).await;
        assert!(html.contains(r#"<option value="1">Band</option>"#));
        assert!(html.contains(r#"<option value="1">Hall</option>"#));
    }
}
