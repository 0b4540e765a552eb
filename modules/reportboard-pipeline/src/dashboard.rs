//! The recompute step.
//!
//! `Dashboard` holds the two inputs (store snapshot, criteria) and the
//! clock. Any input change rebuilds the whole view and pushes it to every
//! registered sink. Nothing is cached between recomputes.

use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use reportboard_common::Report;

use crate::aggregate::{aggregate, Aggregates};
use crate::clock::{Clock, SystemClock};
use crate::criteria::{CriteriaUpdate, FilterCriteria};
use crate::filter::filter_reports;
use crate::store::RecordStore;
use crate::summary::{summarize, SummaryCards};

/// Everything the presentation side renders, re-emitted in full each time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub criteria: FilterCriteria,
    pub evaluated_at: NaiveDateTime,
    /// Filtered sequence, in store order.
    pub reports: Vec<Report>,
    /// Reports passing the filter.
    pub shown: usize,
    /// Reports in the store.
    pub total: usize,
    pub summary: SummaryCards,
    pub aggregates: Aggregates,
}

/// Receives every recomputed view.
pub trait ViewSink: Send + Sync {
    fn render(&self, view: &DashboardView);
}

/// Sink that keeps every view it was given. Thread-safe.
#[derive(Default)]
pub struct MemoryViewSink {
    views: Mutex<Vec<DashboardView>>,
}

impl MemoryViewSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> Vec<DashboardView> {
        self.views.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<DashboardView> {
        self.views.lock().unwrap().last().cloned()
    }
}

impl ViewSink for MemoryViewSink {
    fn render(&self, view: &DashboardView) {
        self.views.lock().unwrap().push(view.clone());
    }
}

pub struct Dashboard {
    store: RecordStore,
    criteria: FilterCriteria,
    clock: Arc<dyn Clock>,
    sinks: Vec<Arc<dyn ViewSink>>,
}

impl Dashboard {
    pub fn new(store: RecordStore, criteria: FilterCriteria) -> Self {
        Self {
            store,
            criteria,
            clock: Arc::new(SystemClock),
            sinks: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn add_sink(&mut self, sink: Arc<dyn ViewSink>) {
        self.sinks.push(sink);
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Compute the view at the clock's current instant without publishing.
    pub fn view(&self) -> DashboardView {
        self.view_at(self.clock.now())
    }

    pub fn view_at(&self, now: NaiveDateTime) -> DashboardView {
        let filtered = filter_reports(self.store.records(), &self.criteria, now);
        let aggregates = aggregate(filtered.iter().copied());

        DashboardView {
            criteria: self.criteria.clone(),
            evaluated_at: now,
            shown: filtered.len(),
            reports: filtered.into_iter().cloned().collect(),
            total: self.store.len(),
            summary: summarize(self.store.iter()),
            aggregates,
        }
    }

    /// Replace the records snapshot.
    pub fn reload(&mut self, store: RecordStore) -> DashboardView {
        self.store = store;
        self.publish()
    }

    /// Apply a partial criteria change. An empty update still recomputes.
    pub fn update(&mut self, update: CriteriaUpdate) -> DashboardView {
        self.criteria.apply(update);
        self.publish()
    }

    /// Back to the identity criteria.
    pub fn reset_filters(&mut self) -> DashboardView {
        self.criteria = FilterCriteria::default();
        self.publish()
    }

    /// Recompute and publish with unchanged inputs, e.g. after the clock moved.
    pub fn refresh(&mut self) -> DashboardView {
        self.publish()
    }

    fn publish(&self) -> DashboardView {
        let view = self.view();
        debug!(
            search = %view.criteria.search_term,
            category = %view.criteria.category,
            window = %view.criteria.time_window,
            shown = view.shown,
            total = view.total,
            sinks = self.sinks.len(),
            "Dashboard recomputed"
        );
        for sink in &self.sinks {
            sink.render(&view);
        }
        view
    }
}
