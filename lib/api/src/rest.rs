use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer, Result as ActixResult};
use hearth_core::Error;
use hearth_profile::PreferenceProfile;
use hearth_rank::Recommender;
use hearth_storage::CorpusStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared handler state
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<CorpusStore>,
    pub recommender: Arc<Recommender>,
}

impl ApiState {
    pub fn new(store: Arc<CorpusStore>, recommender: Arc<Recommender>) -> Self {
        Self { store, recommender }
    }
}

#[derive(Deserialize)]
struct RecommendParams {
    k: Option<usize>,
}

#[derive(Serialize)]
struct EntryInfo {
    identifier: String,
    description: String,
    image_path: String,
}

pub struct RestApi;

impl RestApi {
    /// Serve until the server is stopped. When `images` is set, the directory is
    /// served under the recommender's image prefix so returned paths resolve.
    pub async fn start(state: ApiState, port: u16, images: Option<PathBuf>) -> std::io::Result<()> {
        let mount = state
            .recommender
            .config()
            .image_prefix
            .trim_end_matches('/')
            .to_string();
        if let Some(dir) = &images {
            info!("Serving images from {:?} at {}/", dir, mount);
        }

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            let mut app = App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(Self::configure);

            if let Some(dir) = &images {
                if mount.starts_with('/') && mount.len() > 1 {
                    app = app.service(actix_files::Files::new(&mount, dir));
                }
            }
            app
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Register the API routes; expects [`ApiState`] as app data.
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
            let body = bad_request(&err);
            InternalError::from_response(err, body).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            let body = bad_request(&err);
            InternalError::from_response(err, body).into()
        }))
        .route("/health", web::get().to(health))
            .route("/corpus", web::get().to(corpus_status))
            .route("/corpus/reload", web::post().to(reload_corpus))
            .route("/corpus/{identifier}", web::get().to(get_entry))
            .route("/recommend", web::post().to(recommend));
    }
}

fn bad_request(e: &dyn std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": e.to_string()
    }))
}

fn error_response(e: &Error) -> HttpResponse {
    let status = match e {
        Error::EmptyProfile | Error::UndefinedSimilarity(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Embedding(_) => StatusCode::BAD_GATEWAY,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    HttpResponse::build(status).json(serde_json::json!({
        "error": e.to_string()
    }))
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok"
    })))
}

async fn corpus_status(state: web::Data<ApiState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.store.current().status()))
}

async fn get_entry(
    state: web::Data<ApiState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let identifier = path.into_inner();
    let corpus = state.store.current();

    match corpus.index.get(&identifier) {
        Some(entry) => Ok(HttpResponse::Ok().json(EntryInfo {
            identifier: entry.identifier().to_string(),
            description: entry.description().to_string(),
            image_path: state.recommender.assembler().image_path(entry.identifier()),
        })),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Corpus entry not found"
        }))),
    }
}

async fn recommend(
    state: web::Data<ApiState>,
    params: web::Query<RecommendParams>,
    body: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    let corpus = state.store.current();
    let recommender = state.recommender.clone();
    let k = params.k.unwrap_or(recommender.config().k);
    let doc = body.into_inner();

    // Embedding calls may block on the network.
    let result = web::block(move || {
        let profile = PreferenceProfile::from_value(&doc)?;
        recommender.recommend_k(&corpus.index, &profile, k)
    })
    .await?;

    match result {
        Ok(document) => Ok(HttpResponse::Ok().json(document)),
        Err(e) => {
            warn!("Recommendation failed: {}", e);
            Ok(error_response(&e))
        }
    }
}

async fn reload_corpus(state: web::Data<ApiState>) -> ActixResult<HttpResponse> {
    let store = state.store.clone();
    match web::block(move || store.reload()).await? {
        Ok(loaded) => Ok(HttpResponse::Ok().json(loaded.status())),
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": e.to_string()
        }))),
    }
}
