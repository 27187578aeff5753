//! Application store: canonical client-side state plus the actions that
//! orchestrate fetch, mutate and notify.
//!
//! The state lives in a [`tokio::sync::watch`] channel. Every mutation is a
//! single `send_modify` / `send_if_modified` closure, so the store is the only
//! writer and views simply hold a receiver from [`Store::subscribe`].
//!
//! Each backend resource owns a [`ResourceTracker`]. Completions carrying a
//! stale [`Ticket`] are discarded, so the last issued fetch always wins no
//! matter in which order the responses arrive.

use std::sync::{Arc, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use crate::client::{ApiResult, DashboardBackend};
use crate::domain::complaint::{Complaint, ComplaintPage, ComplaintScope, NewComplaint};
use crate::domain::filters::{FilterField, FilterSelection, FilterVocabulary};
use crate::domain::job::{JobKind, JobSummary};
use crate::domain::notification::NotificationItem;
use crate::domain::statistics::{StatisticsSnapshot, TrendSeries};
use crate::domain::suggestion::SuggestionSnapshot;
use crate::domain::types::{ComplaintId, NotificationId, OrganisationId};
use crate::fallback::{FallbackSource, NoFallback};
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

pub mod notifications;
pub mod resource;
pub mod sync;

pub use notifications::NotificationQueue;
pub use resource::{Resource, ResourceStatus, ResourceTracker, Resources, Ticket};
pub use sync::FilterSync;

/// Pure UI toggles; never trigger network calls by themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UiFlags {
    pub plainte_modal_open: bool,
    pub plainte_panel_open: bool,
    pub selected_plainte: Option<ComplaintId>,
}

/// One loading flag per resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadingState {
    pub stats: bool,
    pub suggestions: bool,
    pub plaintes: bool,
    pub filtres: bool,
    pub tendances: bool,
    pub detail: bool,
}

/// Everything the dashboard renders.
#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    pub filters: FilterSelection,
    pub vocabulary: Option<FilterVocabulary>,
    pub stats: Option<StatisticsSnapshot>,
    pub suggestions: Option<SuggestionSnapshot>,
    pub complaints: Option<ComplaintPage>,
    pub complaint_detail: Option<Complaint>,
    pub trends: Option<TrendSeries>,
    pub ui: UiFlags,
    pub notifications: NotificationQueue,
    resources: Resources,
    sync: FilterSync,
}

impl DashboardState {
    pub fn status(&self, resource: Resource) -> ResourceStatus {
        self.resources.get(resource).status()
    }

    pub fn loading(&self) -> LoadingState {
        let is_loading = |resource| self.resources.get(resource).is_loading();
        LoadingState {
            stats: is_loading(Resource::Stats),
            suggestions: is_loading(Resource::Suggestions),
            plaintes: is_loading(Resource::Complaints),
            filtres: is_loading(Resource::Filters),
            tendances: is_loading(Resource::Trends),
            detail: is_loading(Resource::Detail),
        }
    }

    pub fn vocabulary_loaded(&self) -> bool {
        self.vocabulary.is_some()
    }
}

/// Tunables for a [`Store`].
#[derive(Clone)]
pub struct StoreOptions {
    /// Page size used when filters trigger a complaint list fetch.
    pub page_size: u32,
    pub fallback: Arc<dyn FallbackSource>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_ITEMS_PER_PAGE,
            fallback: Arc::new(NoFallback),
        }
    }
}

struct StoreInner<B> {
    backend: Arc<B>,
    state: watch::Sender<DashboardState>,
    fallback: Arc<dyn FallbackSource>,
    page_size: u32,
}

/// Cloneable handle to the dashboard state container.
pub struct Store<B> {
    inner: Arc<StoreInner<B>>,
}

impl<B> Clone for Store<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B> Store<B>
where
    B: DashboardBackend + 'static,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_options(backend, StoreOptions::default())
    }

    pub fn with_options(backend: Arc<B>, options: StoreOptions) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self {
            inner: Arc::new(StoreInner {
                backend,
                state,
                fallback: options.fallback,
                page_size: options.page_size.max(1),
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.inner.state.borrow().clone()
    }

    /// Reads the current state without cloning it.
    pub fn read<R>(&self, read: impl FnOnce(&DashboardState) -> R) -> R {
        read(&self.inner.state.borrow())
    }

    // ---------------------------------------------------------------------
    // Bootstrapping and filters

    /// Loads the vocabulary and the suggestions, then the filtered views.
    pub async fn initialize(&self) {
        tokio::join!(self.load_filters(), self.fetch_suggestions());
        self.sync_filters().await;
    }

    /// Fetches the filter vocabulary once; false if already loading or loaded.
    pub async fn load_filters(&self) -> bool {
        let mut started = None;
        let mut organisation_id = OrganisationId::default();
        self.inner.state.send_if_modified(|state| {
            organisation_id = state.filters.organisation_id;
            started = state.resources.get_mut(Resource::Filters).begin_once();
            started.is_some()
        });
        let Some(ticket) = started else {
            log::debug!("Filter vocabulary already loading or loaded");
            return false;
        };

        let result = self
            .inner
            .backend
            .get_available_filters(organisation_id)
            .await;
        self.complete(
            Resource::Filters,
            ticket,
            result,
            "Impossible de charger les filtres",
            |state, vocabulary| state.vocabulary = Some(vocabulary),
            |state, fallback| {
                if state.vocabulary.is_none() {
                    state.vocabulary = Some(fallback.vocabulary());
                }
            },
        );
        true
    }

    /// Drops the vocabulary cache and fetches it again.
    pub async fn reload_filters(&self) -> bool {
        self.inner.state.send_modify(|state| {
            state.resources.get_mut(Resource::Filters).invalidate();
        });
        self.load_filters().await
    }

    /// Replaces the whole selection and re-fetches if needed.
    pub async fn set_filters(&self, filters: FilterSelection) -> bool {
        self.inner
            .state
            .send_if_modified(|state| replace_if_changed(&mut state.filters, filters));
        self.sync_filters().await
    }

    pub async fn update_filter(&self, field: FilterField, value: impl Into<String>) -> bool {
        let value = value.into();
        self.inner.state.send_if_modified(|state| {
            let mut filters = state.filters.clone();
            filters.set(field, value);
            replace_if_changed(&mut state.filters, filters)
        });
        self.sync_filters().await
    }

    /// Restores the canonical default selection.
    pub async fn reset_filters(&self) -> bool {
        self.set_filters(FilterSelection::default()).await
    }

    /// Switches tenant: clears the selection and reloads its vocabulary.
    ///
    /// The previous tenant's vocabulary is dropped first, so filtered fetches
    /// stay gated until the new one (or its fallback) is installed.
    pub async fn set_organisation(&self, organisation_id: OrganisationId) -> bool {
        self.inner.state.send_modify(|state| {
            state.filters = FilterSelection::for_organisation(organisation_id);
            state.vocabulary = None;
        });
        self.reload_filters().await;
        self.sync_filters().await
    }

    /// Fetches statistics and the first complaint page when the selection
    /// changed since the last triggered fetch and the vocabulary is loaded.
    pub async fn sync_filters(&self) -> bool {
        let mut triggered = None;
        self.inner.state.send_if_modified(|state| {
            let loaded = state.vocabulary.is_some();
            if state.sync.should_fetch(loaded, &state.filters) {
                triggered = Some(state.filters.clone());
            }
            false
        });
        let Some(filters) = triggered else {
            return false;
        };

        let limit = self.inner.page_size;
        tokio::join!(
            self.fetch_stats(&filters),
            self.fetch_complaints(&filters, 1, limit)
        );
        true
    }

    /// Re-fetches the filtered views even if the selection did not change.
    pub async fn refresh(&self) -> bool {
        self.inner
            .state
            .send_if_modified(|state| {
                state.sync.forget();
                false
            });
        self.sync_filters().await
    }

    // ---------------------------------------------------------------------
    // Resources

    /// Loads statistics for `filters`; supersedes any fetch in flight.
    pub async fn fetch_stats(&self, filters: &FilterSelection) -> bool {
        let ticket = self.begin(Resource::Stats);
        let result = self.inner.backend.get_statistics(filters).await;
        self.complete(
            Resource::Stats,
            ticket,
            result,
            "Impossible de charger les statistiques",
            |state, stats| state.stats = Some(stats),
            |state, fallback| {
                if state.stats.is_none() {
                    state.stats = Some(fallback.statistics());
                }
            },
        )
    }

    /// Loads the suggestion cache at most once per session.
    ///
    /// Returns false without calling the backend when suggestions are
    /// already loading or loaded; see [`Store::invalidate_suggestions`].
    pub async fn fetch_suggestions(&self) -> bool {
        let mut started = None;
        self.inner.state.send_if_modified(|state| {
            started = state.resources.get_mut(Resource::Suggestions).begin_once();
            started.is_some()
        });
        let Some(ticket) = started else {
            log::debug!("Suggestions already loading or loaded");
            return false;
        };

        let result = self.inner.backend.get_suggestions_by_service().await;
        self.complete(
            Resource::Suggestions,
            ticket,
            result,
            "Impossible de charger les suggestions IA",
            |state, suggestions| state.suggestions = Some(suggestions),
            |state, fallback| {
                if state.suggestions.is_none() {
                    state.suggestions = Some(fallback.suggestions());
                }
            },
        );
        true
    }

    /// Allows the next [`Store::fetch_suggestions`] to hit the backend again.
    pub fn invalidate_suggestions(&self) {
        self.inner.state.send_modify(|state| {
            state.resources.get_mut(Resource::Suggestions).invalidate();
        });
    }

    pub async fn fetch_complaints(&self, filters: &FilterSelection, page: u32, limit: u32) -> bool {
        let ticket = self.begin(Resource::Complaints);
        let result = self
            .inner
            .backend
            .list_complaints(filters, page, limit)
            .await;
        self.complete_complaints(ticket, result)
    }

    pub async fn fetch_complaints_by_scope(
        &self,
        scope: ComplaintScope,
        page: u32,
        limit: u32,
    ) -> bool {
        let ticket = self.begin(Resource::Complaints);
        let result = self
            .inner
            .backend
            .list_complaints_by_scope(scope, page, limit)
            .await;
        self.complete_complaints(ticket, result)
    }

    /// Loads another page of the list for the current selection.
    pub async fn goto_page(&self, page: u32) -> bool {
        let filters = self.read(|state| state.filters.clone());
        self.fetch_complaints(&filters, page, self.inner.page_size)
            .await
    }

    fn complete_complaints(&self, ticket: Ticket, result: ApiResult<ComplaintPage>) -> bool {
        self.complete(
            Resource::Complaints,
            ticket,
            result,
            "Impossible de charger les plaintes",
            |state, page| state.complaints = Some(page),
            |state, fallback| {
                if state.complaints.is_none() {
                    state.complaints = Some(fallback.complaints());
                }
            },
        )
    }

    pub async fn fetch_trends(&self, periode: &str) -> bool {
        let ticket = self.begin(Resource::Trends);
        let result = self.inner.backend.get_trends(periode).await;
        self.complete(
            Resource::Trends,
            ticket,
            result,
            "Impossible de charger les tendances",
            |state, trends| state.trends = Some(trends),
            |state, fallback| {
                if state.trends.is_none() {
                    state.trends = Some(fallback.trends(periode));
                }
            },
        )
    }

    // ---------------------------------------------------------------------
    // Complaint panel and modal

    pub fn open_plainte_modal(&self) {
        self.inner
            .state
            .send_if_modified(|state| replace_if_changed(&mut state.ui.plainte_modal_open, true));
    }

    /// Closes both the creation modal and the detail panel.
    pub fn close_plainte_panel(&self) {
        self.inner.state.send_modify(|state| {
            state.ui = UiFlags::default();
            state.resources.get_mut(Resource::Detail).invalidate();
        });
    }

    /// Opens the detail panel for `id` and loads the complaint.
    pub async fn open_plainte_panel(&self, id: ComplaintId) -> bool {
        let mut ticket = Ticket::default();
        self.inner.state.send_modify(|state| {
            state.ui.plainte_panel_open = true;
            state.ui.selected_plainte = Some(id);
            if state
                .complaint_detail
                .as_ref()
                .is_some_and(|detail| detail.id != id.get())
            {
                state.complaint_detail = None;
            }
            ticket = state.resources.get_mut(Resource::Detail).begin();
        });

        let result = self.inner.backend.get_complaint(id).await;
        self.complete(
            Resource::Detail,
            ticket,
            result,
            "Impossible de charger la plainte",
            |state, complaint| state.complaint_detail = Some(complaint),
            |_, _| {},
        )
    }

    /// Submits a new complaint; on success closes the modal and refreshes the views.
    pub async fn create_complaint(&self, payload: NewComplaint) -> Option<Complaint> {
        match self.inner.backend.create_complaint(&payload).await {
            Ok(created) => {
                self.inner.state.send_modify(|state| {
                    state.ui.plainte_modal_open = false;
                });
                let reference = created
                    .plainte_id
                    .clone()
                    .unwrap_or_else(|| created.id.to_string());
                log::info!("Complaint {reference} created");
                self.notify_success(format!("Plainte {reference} créée avec succès"));
                self.refresh().await;
                Some(created)
            }
            Err(err) => {
                log::error!("Failed to create complaint: {err}");
                self.notify_error(format!(
                    "Erreur lors de la création de la plainte : {}",
                    err.detail()
                ));
                None
            }
        }
    }

    /// Triggers a backend batch job and refreshes what it may have changed.
    pub async fn run_job(&self, job: JobKind) -> Option<JobSummary> {
        match self.inner.backend.run_job(job).await {
            Ok(summary) => {
                let message = if summary.message.trim().is_empty() {
                    format!(
                        "{} terminé : {} élément(s) traité(s)",
                        capitalize(job.label()),
                        summary.traites
                    )
                } else {
                    summary.message.clone()
                };
                log::info!(
                    "Job {:?} finished: {} processed, {} failed",
                    job,
                    summary.traites,
                    summary.erreurs
                );
                self.notify_success(message);
                if job == JobKind::ProcessService {
                    self.invalidate_suggestions();
                    tokio::join!(self.fetch_suggestions(), self.refresh());
                } else {
                    self.refresh().await;
                }
                Some(summary)
            }
            Err(err) => {
                log::error!("Job {job:?} failed: {err}");
                self.notify_error(format!("Échec du {} : {}", job.label(), err.detail()));
                None
            }
        }
    }

    // ---------------------------------------------------------------------
    // Notifications

    pub fn notify_success(&self, message: impl Into<String>) -> NotificationId {
        self.push_notification(NotificationItem::success(message))
    }

    pub fn notify_error(&self, message: impl Into<String>) -> NotificationId {
        self.push_notification(NotificationItem::error(message))
    }

    /// Enqueues `item` and schedules its removal after `item.duration`.
    pub fn push_notification(&self, item: NotificationItem) -> NotificationId {
        let duration = item.duration;
        let mut id = item.id;
        self.inner.state.send_modify(|state| {
            id = state.notifications.push(item);
        });
        self.schedule_expiry(id, duration);
        id
    }

    /// Removes a notification; unknown ids leave the queue untouched.
    pub fn remove_notification(&self, id: NotificationId) -> bool {
        self.inner
            .state
            .send_if_modified(|state| state.notifications.remove(id))
    }

    fn schedule_expiry(&self, id: NotificationId, duration: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            log::warn!("No async runtime: notification {id} will not expire");
            return;
        };
        let weak: Weak<StoreInner<B>> = Arc::downgrade(&self.inner);
        handle.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(inner) = weak.upgrade() {
                Store { inner }.remove_notification(id);
            }
        });
    }

    // ---------------------------------------------------------------------
    // Lifecycle plumbing

    fn begin(&self, resource: Resource) -> Ticket {
        let mut ticket = Ticket::default();
        self.inner.state.send_modify(|state| {
            ticket = state.resources.get_mut(resource).begin();
        });
        ticket
    }

    /// Applies a completion if `ticket` is still current.
    ///
    /// On success the snapshot is replaced wholesale. On failure the
    /// previous snapshot is kept, `recover` may substitute fallback data, and
    /// an error notification is enqueued. Returns true only when a successful
    /// result was applied.
    fn complete<T>(
        &self,
        resource: Resource,
        ticket: Ticket,
        result: ApiResult<T>,
        context: &str,
        apply: impl FnOnce(&mut DashboardState, T),
        recover: impl FnOnce(&mut DashboardState, &dyn FallbackSource),
    ) -> bool {
        match result {
            Ok(value) => {
                let applied = self.inner.state.send_if_modified(|state| {
                    if !state.resources.get_mut(resource).succeed(ticket) {
                        return false;
                    }
                    apply(state, value);
                    true
                });
                if !applied {
                    log::debug!(
                        "Discarding stale {} response #{}",
                        resource.as_str(),
                        ticket.sequence()
                    );
                }
                applied
            }
            Err(err) => {
                let fallback = Arc::clone(&self.inner.fallback);
                let applied = self.inner.state.send_if_modified(|state| {
                    if !state.resources.get_mut(resource).fail(ticket) {
                        return false;
                    }
                    recover(state, fallback.as_ref());
                    true
                });
                if applied {
                    log::error!("{context}: {err}");
                    if fallback.name() != "none" {
                        log::warn!(
                            "Using {} data for {} where nothing was loaded yet",
                            fallback.name(),
                            resource.as_str()
                        );
                    }
                    self.notify_error(format!("{context} : {}", err.detail()));
                } else {
                    log::debug!(
                        "Discarding stale {} failure #{}: {err}",
                        resource.as_str(),
                        ticket.sequence()
                    );
                }
                false
            }
        }
    }
}

/// Writes `value` into `slot`, reporting whether anything changed.
fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
