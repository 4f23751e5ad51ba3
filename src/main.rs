use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use job_portal::config::{Settings, StoreBackend};
use job_portal::core::{ApplicationBatchProcessor, MatchEvaluator};
use job_portal::routes::{self, AppState};
use job_portal::services::{
    CacheManager, CachedJobStore, InMemoryJobBoard, JobBoardRepository, JobStore, PostgresClient,
    UserRepository, UserService,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap_or_default())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors, e.g. a non-numeric job id
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

fn io_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(io_error(e));
        }
    };

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting job portal service...");

    // Job board backend
    let (board, store, users): (
        Arc<dyn JobBoardRepository>,
        Arc<dyn JobStore>,
        Arc<dyn UserRepository>,
    ) = match settings.store.backend {
        StoreBackend::Postgres => {
            let db = &settings.database;
            let postgres = PostgresClient::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to initialize PostgreSQL: {}", e);
                io_error(e)
            })?;

            info!("PostgreSQL client initialized");
            let postgres = Arc::new(postgres);
            (
                postgres.clone() as Arc<dyn JobBoardRepository>,
                postgres.clone() as Arc<dyn JobStore>,
                postgres as Arc<dyn UserRepository>,
            )
        }
        StoreBackend::Memory => {
            warn!("Using in-memory job board, data is lost on restart");
            let memory = Arc::new(InMemoryJobBoard::new());
            (
                memory.clone() as Arc<dyn JobBoardRepository>,
                memory.clone() as Arc<dyn JobStore>,
                memory as Arc<dyn UserRepository>,
            )
        }
    };

    // Requirement cache in front of the store (optional - app can work without Redis)
    let store: Arc<dyn JobStore> = if settings.cache.enabled {
        let ttl = settings.cache.ttl_secs.unwrap_or(10);
        let l1_size = settings.cache.l1_cache_size.unwrap_or(1000);

        let cache = match CacheManager::new(&settings.cache.redis_url, l1_size, ttl).await {
            Ok(c) => {
                info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_size, ttl);
                c
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), using in-process cache only", e);
                CacheManager::in_memory(l1_size, ttl)
            }
        };

        Arc::new(CachedJobStore::new(store, Arc::new(cache)))
    } else {
        store
    };

    let policy = settings.matching.scoring_policy().map_err(|e| {
        error!("Invalid matching configuration: {}", e);
        io_error(e)
    })?;

    info!(
        "Matcher initialized (threshold: {}, max concurrency: {})",
        policy.threshold(),
        settings.matching.max_concurrency
    );

    let processor = ApplicationBatchProcessor::new(
        store,
        MatchEvaluator::new(policy),
        settings.matching.max_concurrency,
    );

    let app_state = AppState {
        board,
        users: UserService::new(users, settings.auth.bcrypt_cost),
        processor,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
