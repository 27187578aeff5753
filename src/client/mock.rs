//! Mock backend for isolating the store in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::client::{ApiResult, DashboardBackend};
use crate::domain::complaint::{Complaint, ComplaintPage, ComplaintScope, NewComplaint};
use crate::domain::filters::{FilterSelection, FilterVocabulary};
use crate::domain::job::{JobKind, JobSummary};
use crate::domain::statistics::{StatisticsSnapshot, TrendSeries};
use crate::domain::suggestion::SuggestionSnapshot;
use crate::domain::types::{ComplaintId, OrganisationId};

mock! {
    pub Backend {}

    #[async_trait]
    impl DashboardBackend for Backend {
        async fn list_complaints(
            &self,
            filters: &FilterSelection,
            page: u32,
            limit: u32,
        ) -> ApiResult<ComplaintPage>;
        async fn list_complaints_by_scope(
            &self,
            scope: ComplaintScope,
            page: u32,
            limit: u32,
        ) -> ApiResult<ComplaintPage>;
        async fn get_complaint(&self, id: ComplaintId) -> ApiResult<Complaint>;
        async fn get_statistics(&self, filters: &FilterSelection) -> ApiResult<StatisticsSnapshot>;
        async fn get_suggestions_by_service(&self) -> ApiResult<SuggestionSnapshot>;
        async fn create_complaint(&self, payload: &NewComplaint) -> ApiResult<Complaint>;
        async fn get_available_filters(
            &self,
            organisation_id: OrganisationId,
        ) -> ApiResult<FilterVocabulary>;
        async fn get_trends(&self, periode: &str) -> ApiResult<TrendSeries>;
        async fn run_job(&self, job: JobKind) -> ApiResult<JobSummary>;
    }
}
