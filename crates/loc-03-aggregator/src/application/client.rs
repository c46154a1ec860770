//! # Multi-Source Client
//!
//! Runs one query against the sources in scope. With every source in scope
//! the results are merged; with one pinned source the call goes straight
//! through.

use crate::algorithms::{flatten, scatter};
use crate::config::AggregatorConfig;
use crate::domain::{AggregateError, Gathered};
use crate::ports::Source;
use std::fmt;
use std::future::Future;
use tracing::{debug, warn};

/// Sources a client queries.
#[derive(Clone, Debug)]
pub enum Scope<S> {
    /// Every known source; results are merged.
    All(Vec<S>),
    /// A single source; no merge step.
    Pinned(S),
}

/// Fan-out client over independently operated sources.
#[derive(Clone, Debug)]
pub struct MultiSourceClient<S> {
    scope: Scope<S>,
    config: AggregatorConfig,
}

impl<S: Source> MultiSourceClient<S> {
    /// Query every source.
    pub fn new(sources: Vec<S>) -> Self {
        Self {
            scope: Scope::All(sources),
            config: AggregatorConfig::default(),
        }
    }

    /// Query one source only.
    pub fn pinned(source: S) -> Self {
        Self {
            scope: Scope::Pinned(source),
            config: AggregatorConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: AggregatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Current scope.
    pub fn scope(&self) -> &Scope<S> {
        &self.scope
    }

    /// True when a single source is pinned.
    pub fn is_pinned(&self) -> bool {
        matches!(self.scope, Scope::Pinned(_))
    }

    /// Sources in scope.
    pub fn sources(&self) -> &[S] {
        match &self.scope {
            Scope::All(sources) => sources,
            Scope::Pinned(source) => std::slice::from_ref(source),
        }
    }

    /// Source with the given identity.
    pub fn source(&self, source_id: &str) -> Option<&S> {
        self.sources().iter().find(|s| s.source_id() == source_id)
    }

    /// A client pinned to one of the sources in scope.
    pub fn pin(&self, source_id: &str) -> Option<MultiSourceClient<S>>
    where
        S: Clone,
    {
        self.source(source_id).map(|source| MultiSourceClient {
            scope: Scope::Pinned(source.clone()),
            config: self.config.clone(),
        })
    }

    /// Query every source in scope and settle each outcome.
    pub async fn scatter<'a, T, E, F, Fut>(&'a self, query: F) -> Gathered<T, E>
    where
        F: Fn(&'a S) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        scatter(self.sources(), query).await
    }

    /// Union of the arrays returned by the sources in scope.
    ///
    /// Failed sources contribute nothing and are logged. The call fails only
    /// when sources were queried and none answered. A pinned source's error
    /// is returned unchanged.
    pub async fn fetch_all<'a, T, E, F, Fut>(&'a self, query: F) -> Result<Vec<T>, AggregateError<E>>
    where
        F: Fn(&'a S) -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
        E: fmt::Display,
    {
        if let Scope::Pinned(source) = &self.scope {
            debug!("[loc-03] Pinned query on {}", source.source_id());
            return query(source).await.map_err(AggregateError::Source);
        }

        let gathered = self.scatter(query).await;
        for failure in &gathered.failures {
            warn!(
                "[loc-03] Source {} failed: {}",
                failure.source_id, failure.error
            );
        }
        if gathered.all_failed() && self.config.fail_when_all_sources_fail {
            return Err(AggregateError::AllSourcesFailed {
                failures: gathered.failure_messages(),
            });
        }
        debug!(
            "[loc-03] Gathered {}/{} sources",
            gathered.succeeded(),
            gathered.queried()
        );
        Ok(flatten(gathered))
    }

    /// Like [`Self::fetch_all`] for queries returning at most one value each.
    pub async fn fetch_any<'a, T, E, F, Fut>(&'a self, query: F) -> Result<Vec<T>, AggregateError<E>>
    where
        F: Fn(&'a S) -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
        E: fmt::Display,
    {
        self.fetch_all(|source| {
            let pending = query(source);
            async move { pending.await.map(|value| value.into_iter().collect::<Vec<_>>()) }
        })
        .await
    }
}
