//! Concurrent multi-request execution.

use futures_util::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::document::Document;
use crate::transport::Transport;

use super::{AlmaClient, Params};

/// Split record ids into consecutive chunks of at most `size` ids.
///
/// Order is preserved within and across chunks. A `size` of zero is
/// treated as one.
pub fn chunk_record_ids<S: AsRef<str>>(ids: &[S], size: usize) -> Vec<Vec<String>> {
    ids.chunks(size.max(1))
        .map(|chunk| chunk.iter().map(|id| id.as_ref().to_string()).collect())
        .collect()
}

impl<T: Transport> AlmaClient<T> {
    /// Perform one request per parameter set, all concurrently.
    ///
    /// Every request is awaited before returning. Documents come back in
    /// the order of `param_sets`. If any request fails the whole batch fails
    /// with the first failure observed; the other results are dropped.
    ///
    /// # Errors
    ///
    /// The first error, of any kind, returned by [`AlmaClient::request`].
    #[instrument(skip(self, param_sets), fields(requests = param_sets.len()))]
    pub async fn multi_request(
        &self,
        method: &str,
        param_sets: &[Params],
        check_status: bool,
    ) -> Result<Vec<Document>> {
        let mut pending: FuturesUnordered<_> = param_sets
            .iter()
            .enumerate()
            .map(|(index, params)| async move {
                (index, self.request(method, params, check_status).await)
            })
            .collect();

        let mut documents = Vec::with_capacity(param_sets.len());
        let mut first_error = None;

        while let Some((index, result)) = pending.next().await {
            match result {
                Ok(doc) => documents.push((index, doc)),
                Err(err) => {
                    warn!(chunk = index, error = %err, "batch request failed");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        debug!("all {} batch requests succeeded", documents.len());
        documents.sort_by_key(|(index, _)| *index);
        Ok(documents.into_iter().map(|(_, doc)| doc).collect())
    }
}
