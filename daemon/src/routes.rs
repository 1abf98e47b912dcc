//! The HTTP surface of the daemon.
//!
//! ```text
//! GET  /                                   liveness
//! GET  /test                               storage diagnostics
//! GET  /schema                             known collections
//! POST /api/artists                        create an artist profile
//! GET  /api/artists?limit=                 list artist profiles
//! GET  /api/artists/{id}                   read an artist profile
//! POST /api/artists/{artist_id}/tracks     create a track
//! GET  /api/artists/{artist_id}/tracks     list tracks (?status=&limit=)
//! POST /api/artists/{artist_id}/releases   create a release
//! GET  /api/artists/{artist_id}/releases   list releases (?status=&limit=)
//! ```
use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use surrealdb::engine::local::Db;
use warp::{Filter, Rejection, Reply, http::Method};

use aurca_storage::db::schemas::COLLECTIONS;

use crate::{
    errors::{handle_rejection, reject_on_error},
    services::records::{ListParams, RecordService},
};

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

pub const ROOT_MESSAGE: &str = "AURCA SOUND Backend Running";

/// Target the request log is written under.
pub const LOG_TARGET: &str = "aurca::api";

/// One entry of the `GET /schema` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaItem {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
struct LimitParams {
    #[serde(default)]
    limit: Option<u64>,
}

fn with_service(
    service: RecordService<Db>,
) -> impl Filter<Extract = (RecordService<Db>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

fn json_body() -> impl Filter<Extract = (Value,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// Every route, with errors rendered as JSON, CORS for any origin, and request logging.
#[inline]
pub fn filters(
    service: RecordService<Db>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(["content-type", "authorization", "accept", "origin"]);

    api(service)
        .recover(handle_rejection)
        .with(cors)
        .with(warp::log(LOG_TARGET))
}

/// The routes, without rejection handling.
#[inline]
pub fn api(
    service: RecordService<Db>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    log::info!("Creating API routes");

    // Paths are matched before methods so an unknown path is a 404 rather than a 405.
    let root = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "message": ROOT_MESSAGE })));

    let test = warp::path!("test")
        .and(warp::get())
        .and(with_service(service.clone()))
        .then(|service: RecordService<Db>| async move {
            warp::reply::json(&service.diagnostics().await)
        });

    let schema = warp::path!("schema").and(warp::get()).map(|| {
        let items: Vec<SchemaItem> = COLLECTIONS
            .iter()
            .map(|name| SchemaItem {
                name: (*name).to_owned(),
            })
            .collect();
        warp::reply::json(&items)
    });

    // Artists
    let artists_create = warp::path!("api" / "artists")
        .and(warp::post())
        .and(json_body())
        .and(with_service(service.clone()))
        .and_then(|payload: Value, service: RecordService<Db>| async move {
            service
                .create_artist(&payload)
                .await
                .map(|artist| warp::reply::json(&artist))
                .map_err(reject_on_error)
        });

    let artists_list = warp::path!("api" / "artists")
        .and(warp::get())
        .and(warp::query::<LimitParams>())
        .and(with_service(service.clone()))
        .and_then(|params: LimitParams, service: RecordService<Db>| async move {
            service
                .list_artists(params.limit)
                .await
                .map(|artists| warp::reply::json(&artists))
                .map_err(reject_on_error)
        });

    let artists_read = warp::path!("api" / "artists" / String)
        .and(warp::get())
        .and(with_service(service.clone()))
        .and_then(|id: String, service: RecordService<Db>| async move {
            service
                .read_artist(&id)
                .await
                .map(|artist| warp::reply::json(&artist))
                .map_err(reject_on_error)
        });

    // Tracks
    let tracks_create = warp::path!("api" / "artists" / String / "tracks")
        .and(warp::post())
        .and(json_body())
        .and(with_service(service.clone()))
        .and_then(
            |artist_id: String, payload: Value, service: RecordService<Db>| async move {
                service
                    .create_track(&artist_id, &payload)
                    .await
                    .map(|track| warp::reply::json(&track))
                    .map_err(reject_on_error)
            },
        );

    let tracks_list = warp::path!("api" / "artists" / String / "tracks")
        .and(warp::get())
        .and(warp::query::<ListParams>())
        .and(with_service(service.clone()))
        .and_then(
            |artist_id: String, params: ListParams, service: RecordService<Db>| async move {
                service
                    .list_tracks(&artist_id, params)
                    .await
                    .map(|tracks| warp::reply::json(&tracks))
                    .map_err(reject_on_error)
            },
        );

    // Releases
    let releases_create = warp::path!("api" / "artists" / String / "releases")
        .and(warp::post())
        .and(json_body())
        .and(with_service(service.clone()))
        .and_then(
            |artist_id: String, payload: Value, service: RecordService<Db>| async move {
                service
                    .create_release(&artist_id, &payload)
                    .await
                    .map(|release| warp::reply::json(&release))
                    .map_err(reject_on_error)
            },
        );

    let releases_list = warp::path!("api" / "artists" / String / "releases")
        .and(warp::get())
        .and(warp::query::<ListParams>())
        .and(with_service(service))
        .and_then(
            |artist_id: String, params: ListParams, service: RecordService<Db>| async move {
                service
                    .list_releases(&artist_id, params)
                    .await
                    .map(|releases| warp::reply::json(&releases))
                    .map_err(reject_on_error)
            },
        );

    root.or(test)
        .or(schema)
        .or(artists_create)
        .or(artists_list)
        .or(artists_read)
        .or(tracks_create)
        .or(tracks_list)
        .or(releases_create)
        .or(releases_list)
}
