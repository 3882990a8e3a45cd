//! Endpoints used by entity-creation workflows.
//!
//! | method | path                                     | result                           |
//! |--------|------------------------------------------|----------------------------------|
//! | POST   | `/ids/{entity_type}`                     | `{"id"}`, allocated, not stored  |
//! | GET    | `/ids/{entity_type}/next`                | `{"id", "binding": false}`       |
//! | GET    | `/ids/{entity_type}/valid/{candidate}`   | `{"valid"}`                      |
//! | POST   | `/records/{entity_type}`                 | `201 {"customId", ...}`          |
//! | GET    | `/records/{entity_type}/{custom_id}`     | the stored record                |
//! | GET    | `/parse/{candidate}`                     | `{"id", "entityType", "number"}` |
//! | GET    | `/health`                                | `ok`                             |

use crate::server::{
    error::ApiError,
    state::AppState,
    telemetry::{increment_ids_allocated, increment_records_created},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use seqid::{EntityKind, FormattedId, RecordStore, StoredRecord, is_valid_formatted_id};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct PeekResponse {
    pub id: String,
    /// Always `false`: a peeked ID is a preview, not a reservation.
    pub binding: bool,
}

#[derive(Debug, Serialize)]
pub struct ValidResponse {
    pub valid: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub custom_id: String,
    pub entity_type: EntityKind,
    pub body: Value,
}

/// A formatted ID of any width, decomposed. `id` is the canonical form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResponse {
    pub id: FormattedId,
    pub entity_type: EntityKind,
    pub number: u64,
}

impl RecordResponse {
    fn new(kind: EntityKind, record: StoredRecord) -> Self {
        Self {
            custom_id: record.custom_id,
            entity_type: kind,
            body: record.body,
        }
    }
}

pub fn router<S>(state: AppState<S>) -> Router
where
    S: RecordStore + Clone + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/ids/{entity_type}", post(generate::<S>))
        .route("/ids/{entity_type}/next", get(peek::<S>))
        .route("/ids/{entity_type}/valid/{candidate}", get(validate))
        .route("/records/{entity_type}", post(create_record::<S>))
        .route("/records/{entity_type}/{custom_id}", get(get_record::<S>))
        .route("/parse/{candidate}", get(parse))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[tracing::instrument(skip(state))]
async fn generate<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(entity_type): Path<String>,
) -> Result<Json<IdResponse>, ApiError> {
    let kind: EntityKind = entity_type.parse()?;
    let id = state.registrar.allocator().generate(kind).await?;
    increment_ids_allocated(kind);
    Ok(Json(IdResponse { id }))
}

async fn peek<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(entity_type): Path<String>,
) -> Result<Json<PeekResponse>, ApiError> {
    let id = state.registrar.allocator().peek_next_id(&entity_type).await?;
    Ok(Json(PeekResponse { id, binding: false }))
}

async fn validate(Path((entity_type, candidate)): Path<(String, String)>) -> Json<ValidResponse> {
    Json(ValidResponse {
        valid: is_valid_formatted_id(&candidate, &entity_type),
    })
}

#[tracing::instrument(skip(state, body))]
async fn create_record<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(entity_type): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<RecordResponse>), ApiError> {
    let kind: EntityKind = entity_type.parse()?;
    let record = state.registrar.create(kind, body).await?;
    increment_records_created(kind);
    tracing::info!(custom_id = %record.custom_id, "record created");
    Ok((StatusCode::CREATED, Json(RecordResponse::new(kind, record))))
}

async fn get_record<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path((entity_type, custom_id)): Path<(String, String)>,
) -> Result<Result<Json<RecordResponse>, StatusCode>, ApiError> {
    let kind: EntityKind = entity_type.parse()?;
    let record = state
        .registrar
        .allocator()
        .store()
        .get(kind.key(), &custom_id)
        .await
        .map_err(seqid::Error::from)?;
    Ok(record
        .map(|record| Json(RecordResponse::new(kind, record)))
        .ok_or(StatusCode::NOT_FOUND))
}

async fn parse(Path(candidate): Path<String>) -> Result<Json<ParsedResponse>, ApiError> {
    let id = FormattedId::parse(&candidate)?;
    Ok(Json(ParsedResponse {
        id,
        entity_type: id.kind(),
        number: id.number(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use seqid::{AllocatorConfig, MemoryStore, StoreError};
    use serde_json::json;
    use tower::ServiceExt;

    const RETRY_MESSAGE: &str = "could not complete registration, please try again";

    /// Rejects every insert as a duplicate `customId`.
    #[derive(Clone, Default)]
    struct AlwaysTakenStore;

    impl RecordStore for AlwaysTakenStore {
        async fn custom_ids_with_prefix(&self, _: &str, _: &str) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }

        async fn insert(&self, _: &str, record: StoredRecord) -> Result<(), StoreError> {
            Err(StoreError::Duplicate(record.custom_id))
        }

        async fn get(&self, _: &str, _: &str) -> Result<Option<StoredRecord>, StoreError> {
            Ok(None)
        }

        async fn remove(&self, _: &str, _: &str) -> Result<Option<StoredRecord>, StoreError> {
            Ok(None)
        }
    }

    /// Fails every operation, as if the database were down.
    #[derive(Clone, Default)]
    struct UnavailableStore;

    impl RecordStore for UnavailableStore {
        async fn custom_ids_with_prefix(&self, _: &str, _: &str) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn insert(&self, _: &str, _: StoredRecord) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn get(&self, _: &str, _: &str) -> Result<Option<StoredRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn remove(&self, _: &str, _: &str) -> Result<Option<StoredRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    fn app<S>(store: S) -> Router
    where
        S: RecordStore + Clone + 'static,
    {
        router(AppState::new(store, AllocatorConfig::default()))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method("POST").uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = app(MemoryStore::new()).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn generate_returns_next_id() {
        let store = MemoryStore::new();
        store.seed("establishments", ["EST-0001", "EST-0002", "EST-0004"]);

        let (status, body) = send(app(store), post("/ids/establishments", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": "EST-0005" }));
    }

    #[tokio::test]
    async fn unknown_entity_type_is_not_found() {
        let (status, body) = send(app(MemoryStore::new()), post("/ids/spaceships", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "unknown entity type" }));
    }

    #[tokio::test]
    async fn peek_is_non_binding() {
        let store = MemoryStore::new();
        let (status, body) = send(app(store.clone()), get("/ids/tables/next")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": "TBL-001", "binding": false }));
        assert!(store.is_empty("tables"));
    }

    #[tokio::test]
    async fn validate_checks_fixed_width() {
        let app = app(MemoryStore::new());
        let (_, body) = send(app.clone(), get("/ids/tables/valid/TBL-001")).await;
        assert_eq!(body, json!({ "valid": true }));
        let (_, body) = send(app.clone(), get("/ids/tables/valid/TBL-1000")).await;
        assert_eq!(body, json!({ "valid": false }));
        let (_, body) = send(app, get("/ids/spaceships/valid/TBL-001")).await;
        assert_eq!(body, json!({ "valid": false }));
    }

    #[tokio::test]
    async fn create_record_persists_under_a_new_id() {
        let store = MemoryStore::new();
        let app = app(store.clone());

        let (status, body) = send(
            app.clone(),
            post("/records/orders", Some(json!({ "table": "TBL-004", "total": 12500 }))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({
                "customId": "ORD-000001",
                "entityType": "orders",
                "body": { "table": "TBL-004", "total": 12500 }
            })
        );
        assert_eq!(store.len("orders"), 1);

        let (status, body) = send(app.clone(), get("/records/orders/ORD-000001")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["customId"], "ORD-000001");

        let (status, _) = send(app, get("/records/orders/ORD-000002")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_record_for_unknown_type_is_not_found() {
        let (status, _) = send(
            app(MemoryStore::new()),
            post("/records/spaceships", Some(json!({}))),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn repeated_duplicates_are_a_conflict() {
        let (status, body) = send(
            app(AlwaysTakenStore),
            post("/records/orders", Some(json!({ "total": 900 }))),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": RETRY_MESSAGE }));
    }

    #[tokio::test]
    async fn unavailable_store_is_service_unavailable() {
        let (status, body) = send(
            app(UnavailableStore),
            post("/records/reservations", Some(json!({ "guests": 2 }))),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "error": RETRY_MESSAGE }));

        let (status, body) = send(app(UnavailableStore), get("/records/reservations/RES-000001")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "error": RETRY_MESSAGE }));
    }

    #[tokio::test]
    async fn generate_degrades_to_fallback_when_store_is_down() {
        let (status, body) = send(app(UnavailableStore), post("/ids/rooms", None)).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_str().unwrap();
        assert!(id.starts_with("ROOM-"), "{id}");
        assert!(!is_valid_formatted_id(id, "rooms"));
    }

    #[tokio::test]
    async fn exhausted_id_space_is_an_internal_error() {
        let store = MemoryStore::new();
        store.seed("orders", [format!("ORD-{}", u64::MAX)]);

        let (status, body) = send(app(store), post("/ids/orders", None)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": RETRY_MESSAGE }));
    }

    #[tokio::test]
    async fn parse_returns_canonical_form() {
        let (status, body) = send(app(MemoryStore::new()), get("/parse/TBL-1000")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "id": "TBL-1000", "entityType": "tables", "number": 1000 })
        );

        let (_, body) = send(app(MemoryStore::new()), get("/parse/EST-7")).await;
        assert_eq!(body["id"], "EST-0007");
    }

    #[tokio::test]
    async fn malformed_candidate_is_bad_request() {
        let (status, body) = send(
            app(MemoryStore::new()),
            get("/parse/EST-LZ3K9Q-00A1B2"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "the identifier is not valid" }));
    }
}
