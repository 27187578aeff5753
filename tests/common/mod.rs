#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use plaintes_dashboard::client::{ApiError, ApiResult, DashboardBackend};
use plaintes_dashboard::domain::complaint::{
    Complaint, ComplaintPage, ComplaintScope, NewComplaint,
};
use plaintes_dashboard::domain::filters::{FilterSelection, FilterVocabulary};
use plaintes_dashboard::domain::job::{JobKind, JobSummary};
use plaintes_dashboard::domain::statistics::{StatisticsSnapshot, TrendSeries};
use plaintes_dashboard::domain::suggestion::SuggestionSnapshot;
use plaintes_dashboard::domain::types::{ComplaintId, OrganisationId};
use plaintes_dashboard::fallback::FallbackMode;
use plaintes_dashboard::models::config::ServerConfig;

/// Port nothing listens on.
pub const UNREACHABLE_BACKEND: &str = "http://127.0.0.1:9";

pub fn server_config(backend_url: &str) -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".into(),
        port: 0,
        backend_url: backend_url.into(),
        request_timeout_ms: 2_000,
        status_timeout_ms: 500,
        fallback: FallbackMode::None,
    }
}

// -------------------------------------------------------------------------
// Fake backend served over HTTP

async fn statistics(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "nouvelles_plaintes": 4,
        "plaintes_en_attente": 2,
        "plaintes_en_cours": 1,
        "resolues_ce_mois": 9,
        "satisfaction_moyenne": 4.2,
        "par_service": [{"service": "Urgences", "total": 5}],
        "query": req.query_string(),
    }))
}

async fn available_filters() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "filtres": {
            "types_services": ["Cardiologie", "Urgences"],
            "priorites": ["haute", "moyenne", "basse"],
            "statuts": ["nouvelle", "en_cours"]
        }
    }))
}

async fn complaints(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "plaintes": [{"id": 1, "titre": "Attente aux urgences", "statut": "nouvelle"}],
        "total": 1,
        "page": 1,
        "limit": 10,
        "total_pages": 1,
        "query": req.query_string(),
    }))
}

async fn complaints_by_scope(scope: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "plaintes": [],
        "total": 0,
        "page": 1,
        "limit": 10,
        "total_pages": 0,
        "scope": scope.into_inner(),
    }))
}

async fn complaint(id: web::Path<i32>) -> HttpResponse {
    match id.into_inner() {
        404 => HttpResponse::NotFound().json(json!({"message": "Plainte introuvable"})),
        id => HttpResponse::Ok().json(json!({
            "id": id,
            "plainte_id": format!("PL-{id:04}"),
            "titre": "Bruit nocturne",
            "date_creation": "2024-03-01T08:30:00"
        })),
    }
}

async fn create_complaint(payload: web::Json<Value>) -> HttpResponse {
    let mut plainte = payload.into_inner();
    if let Some(fields) = plainte.as_object_mut() {
        fields.insert("id".into(), json!(77));
        fields.insert("plainte_id".into(), json!("PL-0077"));
    }
    HttpResponse::Created().json(json!({ "plainte": plainte }))
}

async fn suggestions() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "services": [{
            "service": "Urgences",
            "suggestions": [
                {"plainte_id": 1, "type": "reponse", "contenu": "Nous sommes désolés.", "confiance": 0.9},
                {"type": "inconnu", "contenu": "ignoré"}
            ]
        }]
    }))
}

async fn process_service() -> HttpResponse {
    HttpResponse::Ok().json(json!({"message": "3 services traités", "traites": 3, "erreurs": 0}))
}

async fn process_files() -> HttpResponse {
    HttpResponse::ServiceUnavailable()
        .content_type("text/plain")
        .body("maintenance en cours")
}

async fn trends() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "periode": "7j",
        "points": [
            {"date": "2024-06-01", "total": 3, "resolues": 1},
            {"date": "pas une date", "total": 1, "resolues": 0}
        ]
    }))
}

async fn health(delay: web::Data<Duration>) -> HttpResponse {
    tokio::time::sleep(**delay).await;
    HttpResponse::Ok().json(json!({"status": "ok"}))
}

/// Starts the fake backend on an ephemeral port and returns its origin.
pub fn spawn_backend() -> String {
    spawn_backend_with_health_delay(Duration::ZERO)
}

/// Same as [`spawn_backend`] but `/health` answers after `delay`.
pub fn spawn_backend_with_health_delay(delay: Duration) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(delay))
            .route("/health", web::get().to(health))
            .route("/api/v1/dashboard/statistiques", web::get().to(statistics))
            .route(
                "/api/v1/dashboard/filtres-disponibles",
                web::get().to(available_filters),
            )
            .route("/api/v1/plaintes", web::get().to(complaints))
            .route("/api/v1/plaintes", web::post().to(create_complaint))
            .route(
                "/api/v1/plaintes/{scope:en-cours|traitees|en-attente}",
                web::get().to(complaints_by_scope),
            )
            .route("/api/v1/plaintes/{id}", web::get().to(complaint))
            .route("/api/v1/suggestions/par-service", web::get().to(suggestions))
            .route("/api/v1/process-service", web::post().to(process_service))
            .route("/api/v1/process-files", web::post().to(process_files))
            .route("/api/v1/statistiques/tendances", web::get().to(trends))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("bind fake backend");

    let address = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{address}")
}

// -------------------------------------------------------------------------
// In-process scripted backend for store tests

/// Backend whose statistics, suggestions and vocabulary answers can be held
/// back and released in any order.
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<HashMap<&'static str, usize>>,
    held_stats: Mutex<VecDeque<oneshot::Receiver<ApiResult<StatisticsSnapshot>>>>,
    held_suggestions: Mutex<VecDeque<oneshot::Receiver<ApiResult<SuggestionSnapshot>>>>,
    held_vocabulary: Mutex<VecDeque<oneshot::Receiver<ApiResult<FilterVocabulary>>>>,
    stats: Mutex<Option<ApiResult<StatisticsSnapshot>>>,
    vocabulary: Mutex<Option<ApiResult<FilterVocabulary>>>,
}

impl ScriptedBackend {
    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    fn record(&self, method: &'static str) {
        *self.calls.lock().unwrap().entry(method).or_default() += 1;
    }

    /// The next statistics call waits for the returned sender.
    pub fn hold_stats(&self) -> oneshot::Sender<ApiResult<StatisticsSnapshot>> {
        let (tx, rx) = oneshot::channel();
        self.held_stats.lock().unwrap().push_back(rx);
        tx
    }

    /// The next suggestions call waits for the returned sender.
    pub fn hold_suggestions(&self) -> oneshot::Sender<ApiResult<SuggestionSnapshot>> {
        let (tx, rx) = oneshot::channel();
        self.held_suggestions.lock().unwrap().push_back(rx);
        tx
    }

    /// The next vocabulary call waits for the returned sender.
    pub fn hold_vocabulary(&self) -> oneshot::Sender<ApiResult<FilterVocabulary>> {
        let (tx, rx) = oneshot::channel();
        self.held_vocabulary.lock().unwrap().push_back(rx);
        tx
    }

    /// Answer given by statistics calls that are not held.
    pub fn answer_stats_with(&self, result: ApiResult<StatisticsSnapshot>) {
        *self.stats.lock().unwrap() = Some(result);
    }

    pub fn answer_vocabulary_with(&self, result: ApiResult<FilterVocabulary>) {
        *self.vocabulary.lock().unwrap() = Some(result);
    }
}

pub fn vocabulary() -> FilterVocabulary {
    FilterVocabulary {
        types_services: vec!["Cardiologie".into(), "Urgences".into()],
        priorites: vec!["haute".into(), "basse".into()],
        ..FilterVocabulary::default()
    }
}

pub fn snapshot(nouvelles: u64) -> StatisticsSnapshot {
    StatisticsSnapshot {
        nouvelles,
        ..StatisticsSnapshot::default()
    }
}

#[async_trait]
impl DashboardBackend for ScriptedBackend {
    async fn list_complaints(
        &self,
        _filters: &FilterSelection,
        page: u32,
        limit: u32,
    ) -> ApiResult<ComplaintPage> {
        self.record("list_complaints");
        Ok(ComplaintPage {
            page,
            limit,
            ..ComplaintPage::default()
        })
    }

    async fn list_complaints_by_scope(
        &self,
        _scope: ComplaintScope,
        page: u32,
        limit: u32,
    ) -> ApiResult<ComplaintPage> {
        self.record("list_complaints_by_scope");
        Ok(ComplaintPage {
            page,
            limit,
            ..ComplaintPage::default()
        })
    }

    async fn get_complaint(&self, id: ComplaintId) -> ApiResult<Complaint> {
        self.record("get_complaint");
        Ok(Complaint {
            id: id.get(),
            ..Complaint::default()
        })
    }

    async fn get_statistics(&self, _filters: &FilterSelection) -> ApiResult<StatisticsSnapshot> {
        self.record("get_statistics");
        let held = self.held_stats.lock().unwrap().pop_front();
        if let Some(answer) = held {
            return answer
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("answer dropped".into())));
        }
        let answer = self.stats.lock().unwrap().clone();
        answer.unwrap_or_else(|| Ok(StatisticsSnapshot::default()))
    }

    async fn get_suggestions_by_service(&self) -> ApiResult<SuggestionSnapshot> {
        self.record("get_suggestions_by_service");
        let held = self.held_suggestions.lock().unwrap().pop_front();
        if let Some(answer) = held {
            return answer
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("answer dropped".into())));
        }
        Ok(SuggestionSnapshot::default())
    }

    async fn create_complaint(&self, payload: &NewComplaint) -> ApiResult<Complaint> {
        self.record("create_complaint");
        Ok(Complaint {
            id: 77,
            plainte_id: Some("PL-0077".into()),
            titre: payload.titre.to_string(),
            ..Complaint::default()
        })
    }

    async fn get_available_filters(
        &self,
        _organisation_id: OrganisationId,
    ) -> ApiResult<FilterVocabulary> {
        self.record("get_available_filters");
        let held = self.held_vocabulary.lock().unwrap().pop_front();
        if let Some(answer) = held {
            return answer
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("answer dropped".into())));
        }
        let answer = self.vocabulary.lock().unwrap().clone();
        answer.unwrap_or_else(|| Ok(vocabulary()))
    }

    async fn get_trends(&self, periode: &str) -> ApiResult<TrendSeries> {
        self.record("get_trends");
        Ok(TrendSeries {
            periode: periode.to_string(),
            points: Vec::new(),
        })
    }

    async fn run_job(&self, _job: JobKind) -> ApiResult<JobSummary> {
        self.record("run_job");
        Ok(JobSummary::default())
    }
}

/// Gives spawned tasks a chance to run.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

pub async fn wait_for_calls(backend: &ScriptedBackend, method: &str, count: usize) {
    while backend.calls(method) < count {
        tokio::task::yield_now().await;
    }
}
