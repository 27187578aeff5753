//! Per-resource fetch state machine.
//!
//! Every fetch takes a [`Ticket`] from the resource's tracker. Only the
//! ticket issued last may move the resource out of `Loading`; completions
//! holding an older ticket are stale and must be dropped.

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Proof that a fetch was started; carries its sequence number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Resources the store fetches independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Stats,
    Suggestions,
    Complaints,
    Filters,
    Trends,
    Detail,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Stats => "stats",
            Resource::Suggestions => "suggestions",
            Resource::Complaints => "plaintes",
            Resource::Filters => "filtres",
            Resource::Trends => "tendances",
            Resource::Detail => "detail",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceTracker {
    status: ResourceStatus,
    issued: u64,
}

impl ResourceTracker {
    pub fn status(&self) -> ResourceStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == ResourceStatus::Loading
    }

    /// Starts a fetch that supersedes any one in flight.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.status = ResourceStatus::Loading;
        Ticket(self.issued)
    }

    /// Starts a fetch only if the resource is neither loading nor loaded.
    pub fn begin_once(&mut self) -> Option<Ticket> {
        match self.status {
            ResourceStatus::Loading | ResourceStatus::Ready => None,
            ResourceStatus::Idle | ResourceStatus::Failed => Some(self.begin()),
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 != 0 && ticket.0 == self.issued
    }

    /// Marks the resource ready; false when the ticket is stale.
    pub fn succeed(&mut self, ticket: Ticket) -> bool {
        self.settle(ticket, ResourceStatus::Ready)
    }

    /// Marks the resource failed; false when the ticket is stale.
    pub fn fail(&mut self, ticket: Ticket) -> bool {
        self.settle(ticket, ResourceStatus::Failed)
    }

    /// Back to `Idle`; any fetch still in flight becomes stale.
    pub fn invalidate(&mut self) {
        self.issued += 1;
        self.status = ResourceStatus::Idle;
    }

    fn settle(&mut self, ticket: Ticket, status: ResourceStatus) -> bool {
        if !self.is_current(ticket) || !self.is_loading() {
            return false;
        }
        self.status = status;
        true
    }
}

/// Trackers for every [`Resource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resources {
    stats: ResourceTracker,
    suggestions: ResourceTracker,
    complaints: ResourceTracker,
    filters: ResourceTracker,
    trends: ResourceTracker,
    detail: ResourceTracker,
}

impl Resources {
    pub fn get(&self, resource: Resource) -> &ResourceTracker {
        match resource {
            Resource::Stats => &self.stats,
            Resource::Suggestions => &self.suggestions,
            Resource::Complaints => &self.complaints,
            Resource::Filters => &self.filters,
            Resource::Trends => &self.trends,
            Resource::Detail => &self.detail,
        }
    }

    pub fn get_mut(&mut self, resource: Resource) -> &mut ResourceTracker {
        match resource {
            Resource::Stats => &mut self.stats,
            Resource::Suggestions => &mut self.suggestions,
            Resource::Complaints => &mut self.complaints,
            Resource::Filters => &mut self.filters,
            Resource::Trends => &mut self.trends,
            Resource::Detail => &mut self.detail,
        }
    }
}
