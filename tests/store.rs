use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use plaintes_dashboard::client::ApiError;
use plaintes_dashboard::domain::filters::{FilterField, FilterSelection, FilterVocabulary};
use plaintes_dashboard::domain::notification::{NotificationItem, NotificationKind};
use plaintes_dashboard::domain::suggestion::SuggestionSnapshot;
use plaintes_dashboard::domain::types::{ComplaintId, NotificationId, OrganisationId};
use plaintes_dashboard::fallback::{DemoData, FallbackSource};
use plaintes_dashboard::forms::complaint::CreateComplaintForm;
use plaintes_dashboard::store::{Resource, ResourceStatus, Store, StoreOptions};

mod common;

use common::{ScriptedBackend, settle, snapshot, vocabulary, wait_for_calls};

fn store_with(backend: &Arc<ScriptedBackend>) -> Store<ScriptedBackend> {
    Store::new(Arc::clone(backend))
}

#[tokio::test]
async fn last_issued_statistics_win_when_older_resolves_last() {
    let backend = Arc::new(ScriptedBackend::default());
    let older_answer = backend.hold_stats();
    let newer_answer = backend.hold_stats();
    let store = store_with(&backend);

    let older = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_stats(&FilterSelection::default()).await }
    });
    wait_for_calls(&backend, "get_statistics", 1).await;
    let newer = tokio::spawn({
        let store = store.clone();
        async move {
            let filters = FilterSelection::default().with(FilterField::Priorite, "haute");
            store.fetch_stats(&filters).await
        }
    });
    wait_for_calls(&backend, "get_statistics", 2).await;

    newer_answer.send(Ok(snapshot(7))).unwrap();
    assert!(newer.await.unwrap());
    older_answer.send(Ok(snapshot(3))).unwrap();
    assert!(!older.await.unwrap());

    let state = store.snapshot();
    assert_eq!(state.stats, Some(snapshot(7)));
    assert_eq!(state.status(Resource::Stats), ResourceStatus::Ready);
}

#[tokio::test]
async fn last_issued_statistics_win_when_older_resolves_first() {
    let backend = Arc::new(ScriptedBackend::default());
    let older_answer = backend.hold_stats();
    let newer_answer = backend.hold_stats();
    let store = store_with(&backend);

    let older = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_stats(&FilterSelection::default()).await }
    });
    wait_for_calls(&backend, "get_statistics", 1).await;
    let newer = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_stats(&FilterSelection::default()).await }
    });
    wait_for_calls(&backend, "get_statistics", 2).await;

    older_answer.send(Ok(snapshot(3))).unwrap();
    assert!(!older.await.unwrap());
    // The stale answer neither lands nor ends the loading phase.
    assert_eq!(store.read(|state| state.stats.clone()), None);
    assert!(store.read(|state| state.loading().stats));

    newer_answer.send(Ok(snapshot(7))).unwrap();
    assert!(newer.await.unwrap());
    assert_eq!(store.read(|state| state.stats.clone()), Some(snapshot(7)));
}

#[tokio::test]
async fn stale_failure_does_not_notify() {
    let backend = Arc::new(ScriptedBackend::default());
    let older_answer = backend.hold_stats();
    let store = store_with(&backend);

    let older = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_stats(&FilterSelection::default()).await }
    });
    wait_for_calls(&backend, "get_statistics", 1).await;
    assert!(store.fetch_stats(&FilterSelection::default()).await);

    older_answer
        .send(Err(ApiError::Network("timeout".into())))
        .unwrap();
    assert!(!older.await.unwrap());

    let state = store.snapshot();
    assert_eq!(state.status(Resource::Stats), ResourceStatus::Ready);
    assert!(state.notifications.is_empty());
}

#[tokio::test]
async fn backend_error_keeps_previous_statistics() {
    let backend = Arc::new(ScriptedBackend::default());
    let store = store_with(&backend);
    backend.answer_stats_with(Ok(snapshot(5)));
    assert!(store.fetch_stats(&FilterSelection::default()).await);

    backend.answer_stats_with(Err(ApiError::Backend {
        status: 500,
        detail: "Erreur interne".into(),
    }));
    assert!(!store.fetch_stats(&FilterSelection::default()).await);

    let state = store.snapshot();
    assert_eq!(state.stats, Some(snapshot(5)));
    assert_eq!(state.status(Resource::Stats), ResourceStatus::Failed);
    assert!(!state.loading().stats);
    let latest = state.notifications.latest().unwrap();
    assert_eq!(latest.kind, NotificationKind::Error);
    assert!(latest.message.contains("Erreur interne"));
}

#[tokio::test]
async fn first_failure_uses_the_configured_fallback() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.answer_stats_with(Err(ApiError::Network("refused".into())));
    let store = Store::with_options(
        Arc::clone(&backend),
        StoreOptions {
            fallback: Arc::new(DemoData),
            ..StoreOptions::default()
        },
    );

    assert!(!store.fetch_stats(&FilterSelection::default()).await);

    let state = store.snapshot();
    assert_eq!(state.stats, Some(DemoData.statistics()));
    assert_eq!(state.status(Resource::Stats), ResourceStatus::Failed);
    assert!(
        state
            .notifications
            .latest()
            .unwrap()
            .message
            .contains("connection error")
    );
}

#[tokio::test]
async fn suggestions_in_flight_are_not_fetched_twice() {
    let backend = Arc::new(ScriptedBackend::default());
    let answer = backend.hold_suggestions();
    let store = store_with(&backend);

    let first = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_suggestions().await }
    });
    wait_for_calls(&backend, "get_suggestions_by_service", 1).await;
    assert_eq!(
        store.read(|state| state.status(Resource::Suggestions)),
        ResourceStatus::Loading
    );

    assert!(!store.fetch_suggestions().await);
    assert_eq!(backend.calls("get_suggestions_by_service"), 1);

    answer.send(Ok(SuggestionSnapshot::default())).unwrap();
    assert!(first.await.unwrap());
    assert!(!store.fetch_suggestions().await);
    assert_eq!(backend.calls("get_suggestions_by_service"), 1);

    store.invalidate_suggestions();
    assert!(store.fetch_suggestions().await);
    assert_eq!(backend.calls("get_suggestions_by_service"), 2);
}

#[tokio::test]
async fn filters_wait_for_the_vocabulary() {
    let backend = Arc::new(ScriptedBackend::default());
    let store = store_with(&backend);

    assert!(
        !store
            .update_filter(FilterField::TypeService, "Urgences")
            .await
    );
    assert_eq!(backend.calls("get_statistics"), 0);

    assert!(store.load_filters().await);
    assert!(!store.load_filters().await);
    assert!(store.sync_filters().await);
    assert_eq!(backend.calls("get_available_filters"), 1);
    assert_eq!(backend.calls("get_statistics"), 1);
    assert_eq!(backend.calls("list_complaints"), 1);

    let state = store.snapshot();
    assert_eq!(state.vocabulary, Some(vocabulary()));
    assert_eq!(state.filters.type_service, "Urgences");
    assert_eq!(state.complaints.map(|page| page.page), Some(1));
}

#[tokio::test]
async fn reset_restores_the_canonical_default() {
    let backend = Arc::new(ScriptedBackend::default());
    let store = store_with(&backend);
    store.initialize().await;
    assert_eq!(backend.calls("get_statistics"), 1);

    assert!(store.update_filter(FilterField::Priorite, "haute").await);
    assert!(!store.update_filter(FilterField::Priorite, "haute").await);
    assert_eq!(backend.calls("get_statistics"), 2);

    assert!(store.reset_filters().await);
    assert_eq!(store.read(|state| state.filters.clone()), FilterSelection::default());
    assert_eq!(backend.calls("get_statistics"), 3);

    assert!(!store.reset_filters().await);
    assert_eq!(backend.calls("get_statistics"), 3);
}

#[tokio::test]
async fn organisation_change_refetches_everything() {
    let backend = Arc::new(ScriptedBackend::default());
    let store = store_with(&backend);
    store.initialize().await;

    assert!(store.set_organisation(OrganisationId::new(2).unwrap()).await);

    assert_eq!(backend.calls("get_available_filters"), 2);
    assert_eq!(backend.calls("get_statistics"), 2);
    assert_eq!(
        store.read(|state| state.filters.organisation_id.get()),
        2
    );
}

#[tokio::test]
async fn organisation_change_waits_for_the_new_vocabulary() {
    let backend = Arc::new(ScriptedBackend::default());
    let store = store_with(&backend);
    store.initialize().await;
    let answer = backend.hold_vocabulary();

    let switch = tokio::spawn({
        let store = store.clone();
        async move { store.set_organisation(OrganisationId::new(2).unwrap()).await }
    });
    wait_for_calls(&backend, "get_available_filters", 2).await;

    assert_eq!(store.read(|state| state.vocabulary.clone()), None);
    assert!(!store.sync_filters().await);
    assert_eq!(backend.calls("get_statistics"), 1);

    answer.send(Ok(vocabulary())).unwrap();
    assert!(switch.await.unwrap());
    assert_eq!(backend.calls("get_statistics"), 2);
}

#[tokio::test]
async fn failed_reload_does_not_offer_the_previous_tenant_vocabulary() {
    let backend = Arc::new(ScriptedBackend::default());
    let store = store_with(&backend);
    store.initialize().await;
    assert_eq!(store.read(|state| state.vocabulary.clone()), Some(vocabulary()));

    backend.answer_vocabulary_with(Err(ApiError::Backend {
        status: 500,
        detail: "Erreur interne".into(),
    }));
    assert!(store.set_organisation(OrganisationId::new(2).unwrap()).await);

    let state = store.snapshot();
    assert_eq!(state.filters.organisation_id.get(), 2);
    assert_eq!(state.status(Resource::Filters), ResourceStatus::Failed);
    assert_eq!(state.vocabulary, Some(FilterVocabulary::default()));
    assert_eq!(
        state.notifications.latest().map(|n| n.kind),
        Some(NotificationKind::Error)
    );
}

#[tokio::test]
async fn concurrent_field_updates_are_both_kept() {
    let backend = Arc::new(ScriptedBackend::default());
    let store = store_with(&backend);
    store.initialize().await;

    tokio::join!(
        store.update_filter(FilterField::Priorite, "haute"),
        store.update_filter(FilterField::TypeService, "Urgences"),
    );

    let filters = store.read(|state| state.filters.clone());
    assert_eq!(filters.priorite, "haute");
    assert_eq!(filters.type_service, "Urgences");
}

#[tokio::test]
async fn failed_vocabulary_may_be_retried() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.answer_vocabulary_with(Err(ApiError::Network("refused".into())));
    let store = store_with(&backend);

    assert!(store.load_filters().await);
    assert_eq!(
        store.read(|state| state.status(Resource::Filters)),
        ResourceStatus::Failed
    );

    backend.answer_vocabulary_with(Ok(vocabulary()));
    assert!(store.load_filters().await);
    assert_eq!(store.read(|state| state.vocabulary.clone()), Some(vocabulary()));
}

#[tokio::test]
async fn validated_form_creates_a_complaint_with_default_deadline() {
    let backend = Arc::new(ScriptedBackend::default());
    let store = store_with(&backend);
    store.initialize().await;
    store.open_plainte_modal();

    let form = CreateComplaintForm {
        titre: "Chambre bruyante".into(),
        description: "Travaux la nuit".into(),
        type_service: "Urgences".into(),
        nom_plaignant: "Bernard".into(),
        ..CreateComplaintForm::default()
    };
    let payload = form
        .into_new_complaint(NaiveDate::from_ymd_opt(2024, 2, 26).unwrap())
        .unwrap();
    assert_eq!(
        payload.date_limite_reponse,
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    );

    let created = store.create_complaint(payload).await.unwrap();

    assert_eq!(created.id, 77);
    let state = store.snapshot();
    assert!(!state.ui.plainte_modal_open);
    assert_eq!(
        state.notifications.latest().map(|n| n.kind),
        Some(NotificationKind::Success)
    );
    // Creation refreshes the filtered views.
    assert_eq!(backend.calls("get_statistics"), 2);
    assert_eq!(backend.calls("list_complaints"), 2);
}

#[tokio::test]
async fn detail_panel_loads_the_selected_complaint() {
    let backend = Arc::new(ScriptedBackend::default());
    let store = store_with(&backend);
    let id = ComplaintId::new(12).unwrap();

    assert!(store.open_plainte_panel(id).await);

    let state = store.snapshot();
    assert!(state.ui.plainte_panel_open);
    assert_eq!(state.complaint_detail.map(|c| c.id), Some(12));
}

#[tokio::test]
async fn scoped_lists_and_trends_are_stored() {
    let backend = Arc::new(ScriptedBackend::default());
    let store = store_with(&backend);

    assert!(
        store
            .fetch_complaints_by_scope(
                plaintes_dashboard::domain::complaint::ComplaintScope::Traitees,
                2,
                25
            )
            .await
    );
    assert!(store.fetch_trends("30j").await);

    let state = store.snapshot();
    assert_eq!(state.complaints.map(|page| (page.page, page.limit)), Some((2, 25)));
    assert_eq!(state.trends.map(|t| t.periode), Some("30j".to_string()));
}

#[tokio::test]
async fn subscribers_see_ui_changes_only() {
    let backend = Arc::new(ScriptedBackend::default());
    let store = store_with(&backend);
    let mut receiver = store.subscribe();

    assert!(!store.remove_notification(NotificationId::new()));
    assert!(!receiver.has_changed().unwrap());

    store.open_plainte_modal();
    assert!(receiver.has_changed().unwrap());
    assert!(receiver.borrow_and_update().ui.plainte_modal_open);

    store.close_plainte_panel();
    assert!(!receiver.borrow_and_update().ui.plainte_modal_open);
}

#[tokio::test(start_paused = true)]
async fn notifications_expire_after_their_duration() {
    let store = store_with(&Arc::new(ScriptedBackend::default()));
    let lasting = store.notify_success("Plainte créée");
    let brief = store.push_notification(NotificationItem::new(
        NotificationKind::Error,
        "Erreur brève",
        Duration::from_secs(1),
    ));

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    settle().await;
    store.read(|state| {
        assert!(state.notifications.get(lasting).is_some());
        assert!(state.notifications.get(brief).is_none());
    });

    tokio::time::sleep(Duration::from_secs(4)).await;
    settle().await;
    assert!(store.read(|state| state.notifications.is_empty()));

    // Manual removal after expiry is a no-op.
    assert!(!store.remove_notification(lasting));
}
