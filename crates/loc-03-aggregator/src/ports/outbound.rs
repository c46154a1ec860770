//! # Outbound Ports

use std::sync::Arc;

/// An independently operated endpoint the aggregator can query.
pub trait Source: Send + Sync {
    /// Stable identity, used in logs and failure reports.
    fn source_id(&self) -> &str;
}

impl<S: Source + ?Sized> Source for Arc<S> {
    fn source_id(&self) -> &str {
        (**self).source_id()
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn source_id(&self) -> &str {
        (**self).source_id()
    }
}
