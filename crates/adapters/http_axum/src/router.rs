//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use verdant_app::ports::{
    Clock, GrowthRepository, Notifier, PlantRepository, RandomSource, TaskRepository,
};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the API routes under `/api`, plus a `/health` liveness check.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<P, G, T, N, R, C>(state: AppState<P, G, T, N, R, C>) -> Router
where
    P: PlantRepository + Send + Sync + 'static,
    G: GrowthRepository + Send + Sync + 'static,
    T: TaskRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    R: RandomSource + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use tower::ServiceExt;
    use verdant_app::notifier::LogNotifier;
    use verdant_app::ports::{FixedClock, PlantFilter, SeededRandom};
    use verdant_app::services::{
        CleanupService, GrowthEngine, HealthMonitor, MaintenanceScheduler, PestEngine,
        ReminderService,
    };
    use verdant_domain::error::VerdantError;
    use verdant_domain::growth::GrowthRecord;
    use verdant_domain::id::{GrowthRecordId, OwnerId, PlantId, TaskId};
    use verdant_domain::plant::Plant;
    use verdant_domain::task::{MaintenanceTask, MaintenanceType};
    use verdant_domain::time::Timestamp;

    use crate::extract::OWNER_HEADER;

    #[derive(Clone, Copy)]
    struct EmptyStore;

    impl PlantRepository for EmptyStore {
        async fn list_plants(&self, _filter: PlantFilter) -> Result<Vec<Plant>, VerdantError> {
            Ok(vec![])
        }
        async fn get_plant(&self, _id: PlantId) -> Result<Option<Plant>, VerdantError> {
            Ok(None)
        }
        async fn plant_exists(&self, _id: PlantId) -> Result<bool, VerdantError> {
            Ok(false)
        }
    }

    impl GrowthRepository for EmptyStore {
        async fn find_current_growth(
            &self,
            _plant_id: PlantId,
        ) -> Result<Option<GrowthRecord>, VerdantError> {
            Ok(None)
        }
        async fn insert_growth(&self, record: GrowthRecord) -> Result<GrowthRecord, VerdantError> {
            Ok(record)
        }
        async fn update_growth(&self, record: GrowthRecord) -> Result<GrowthRecord, VerdantError> {
            Ok(record)
        }
        async fn list_all_growth(&self) -> Result<Vec<GrowthRecord>, VerdantError> {
            Ok(vec![])
        }
        async fn delete_growth(&self, _id: GrowthRecordId) -> Result<(), VerdantError> {
            Ok(())
        }
    }

    impl TaskRepository for EmptyStore {
        async fn list_incomplete_tasks(
            &self,
            _plant_id: Option<PlantId>,
            _owner_id: Option<OwnerId>,
        ) -> Result<Vec<MaintenanceTask>, VerdantError> {
            Ok(vec![])
        }
        async fn exists_active_task(
            &self,
            _plant_id: PlantId,
            _task_type: MaintenanceType,
        ) -> Result<bool, VerdantError> {
            Ok(false)
        }
        async fn exists_task_scheduled_between(
            &self,
            _plant_id: PlantId,
            _task_type: MaintenanceType,
            _start: Timestamp,
            _end: Timestamp,
        ) -> Result<bool, VerdantError> {
            Ok(false)
        }
        async fn insert_task(&self, task: MaintenanceTask) -> Result<MaintenanceTask, VerdantError> {
            Ok(task)
        }
        async fn count_overdue_tasks(
            &self,
            _owner_id: OwnerId,
            _now: Timestamp,
        ) -> Result<u64, VerdantError> {
            Ok(2)
        }
        async fn list_tasks_by_type(
            &self,
            _task_type: MaintenanceType,
        ) -> Result<Vec<MaintenanceTask>, VerdantError> {
            Ok(vec![])
        }
        async fn list_all_tasks(&self) -> Result<Vec<MaintenanceTask>, VerdantError> {
            Ok(vec![])
        }
        async fn delete_task(&self, _id: TaskId) -> Result<(), VerdantError> {
            Ok(())
        }
    }

    type TestState = AppState<
        EmptyStore,
        EmptyStore,
        EmptyStore,
        Arc<LogNotifier>,
        Arc<SeededRandom>,
        Arc<FixedClock>,
    >;

    fn test_state() -> TestState {
        let clock = Arc::new(FixedClock::at(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        ));
        let notifier = Arc::new(LogNotifier::default());
        let random = Arc::new(SeededRandom::seeded(7));
        AppState {
            scheduler: Arc::new(MaintenanceScheduler::new(
                EmptyStore,
                EmptyStore,
                Arc::clone(&clock),
            )),
            growth: Arc::new(GrowthEngine::new(
                EmptyStore,
                EmptyStore,
                EmptyStore,
                Arc::clone(&clock),
            )),
            health: Arc::new(HealthMonitor::new(
                EmptyStore,
                EmptyStore,
                EmptyStore,
                Arc::clone(&clock),
            )),
            pests: Arc::new(PestEngine::new(
                EmptyStore,
                EmptyStore,
                Arc::clone(&notifier),
                random,
                Arc::clone(&clock),
            )),
            reminders: Arc::new(ReminderService::new(
                EmptyStore,
                EmptyStore,
                notifier,
                clock,
            )),
            cleanup: Arc::new(CleanupService::new(EmptyStore, EmptyStore, EmptyStore)),
        }
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_run_growth_pass_when_triggered() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::post("/api/jobs/growth")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["processed"], 0);
        assert_eq!(body["updated"], 0);
    }

    #[tokio::test]
    async fn should_reject_get_on_trigger_route() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::get("/api/jobs/maintenance")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn should_return_bad_request_when_owner_header_missing() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::get("/api/reminders/today")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_report_reminder_counts_for_owner() {
        let app = build(test_state());
        let owner = OwnerId::new();

        let response = app
            .oneshot(
                Request::get("/api/reminders/today")
                    .header(OWNER_HEADER, owner.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["owner_id"], owner.to_string());
        assert_eq!(body["has_tasks_due_today"], false);
        assert_eq!(body["tasks_due_today"], 0);
        assert_eq!(body["overdue_tasks"], 2);
    }

    #[tokio::test]
    async fn should_return_bad_request_when_plant_id_malformed() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::post("/api/plants/not-a-uuid/health-check")
                    .header(OWNER_HEADER, OwnerId::new().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_not_found_when_checking_unknown_plant() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::post(format!("/api/plants/{}/health-check", PlantId::new()))
                    .header(OWNER_HEADER, OwnerId::new().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn should_return_empty_pest_statistics() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::get("/api/pests/statistics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body, serde_json::json!({"total": 0, "active": 0, "completed": 0}));
    }

    #[tokio::test]
    async fn should_clean_up_single_deleted_plant() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::post(format!("/api/jobs/cleanup/{}", PlantId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["tasks_deleted"], 0);
        assert_eq!(body["growth_deleted"], 0);
    }

    #[tokio::test]
    async fn should_reject_cleanup_with_malformed_plant_id() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::post("/api/jobs/cleanup/garden-gnome")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
