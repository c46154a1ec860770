//! # Scatter-Gather
//!
//! Issue one query per source, all in flight at once on the current task, and
//! settle each independently. A failing source never aborts its siblings.

use crate::domain::{Gathered, SourceFailure};
use crate::ports::Source;
use futures::future::join_all;
use std::future::Future;

/// Query every source concurrently and collect every outcome.
pub async fn scatter<'a, S, T, E, F, Fut>(sources: &'a [S], query: F) -> Gathered<T, E>
where
    S: Source,
    F: Fn(&'a S) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let settled = join_all(sources.iter().map(|source| {
        let pending = query(source);
        async move { (source.source_id().to_string(), pending.await) }
    }))
    .await;

    let mut gathered = Gathered::default();
    for (source_id, outcome) in settled {
        match outcome {
            Ok(value) => gathered.values.push((source_id, value)),
            Err(error) => gathered.failures.push(SourceFailure { source_id, error }),
        }
    }
    gathered
}

/// Concatenate per-source arrays, keeping each source's own order.
pub fn flatten<T, E>(gathered: Gathered<Vec<T>, E>) -> Vec<T> {
    gathered.into_values().into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node(&'static str, Result<Vec<u32>, String>);

    impl Source for Node {
        fn source_id(&self) -> &str {
            self.0
        }
    }

    #[tokio::test]
    async fn test_scatter_settles_each_source() {
        let nodes = vec![
            Node("a", Ok(vec![1, 2])),
            Node("b", Err("unreachable".into())),
            Node("c", Ok(vec![3])),
        ];
        let gathered = scatter(&nodes, |node| async move { node.1.clone() }).await;

        assert_eq!(gathered.queried(), 3);
        assert_eq!(gathered.failed_sources(), vec!["b"]);
        assert_eq!(flatten(gathered), vec![1, 2, 3]);
    }

    #[test]
    fn test_scatter_without_sources() {
        let nodes: Vec<Node> = Vec::new();
        let gathered = tokio_test::block_on(scatter(&nodes, |node| async move { node.1.clone() }));
        assert_eq!(gathered.queried(), 0);
        assert!(!gathered.all_failed());
    }
}
