//! Pagination Engine: walks pages of a GET endpoint through
//! the Resilient Client, invoking a per-page callback and honoring
//! cooperative cancellation between page fetches.

mod config;
mod error;

pub use config::PaginationConfig;
pub use error::PaginationError;

use hevy_sync_client::{HttpMethod, ResilientClient};
use hevy_sync_core::{Clock, DurableStore};
use hevy_sync_transport::Transport;
use std::future::Future;

#[cfg(feature = "metrics")]
use metrics::counter;

/// Walks `path` page by page, starting at 1, via `client`. `data_key` names
/// the JSON array field each page's payload carries its items under.
/// `extra_params` are merged into every page's query alongside `page` and
/// `page_size`. Returns the total number of items the callback processed.
///
/// `on_page` may fail with its own error type `E` (e.g. a tabular-store
/// write failure) — that propagates as [`PaginationError::Callback`]
/// rather than being swallowed.
#[allow(clippy::too_many_arguments)]
pub async fn fetch_paginated<T, D, C, F, Fut, E>(
    client: &ResilientClient<T, D, C>,
    path: &str,
    page_size: u32,
    data_key: &str,
    extra_params: &[(String, String)],
    config: &PaginationConfig,
    cancel_check: Option<&dyn Fn() -> bool>,
    mut on_page: F,
) -> Result<u64, PaginationError<E>>
where
    T: Transport,
    D: DurableStore,
    C: Clock,
    F: FnMut(Vec<serde_json::Value>) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut page: u32 = 1;
    let mut total: u64 = 0;

    loop {
        if let Some(check) = cancel_check {
            if check() {
                return Err(PaginationError::CancelledByTimeout {
                    path: path.to_string(),
                    page,
                });
            }
        }

        if page > config.max_pages {
            #[cfg(feature = "metrics")]
            counter!("pagination_page_cap_exceeded_total", "path" => path.to_string()).increment(1);

            return Err(PaginationError::PageCapExceeded {
                path: path.to_string(),
                page,
                total,
            });
        }

        let mut query = vec![
            ("page".to_string(), page.to_string()),
            ("page_size".to_string(), page_size.to_string()),
        ];
        query.extend_from_slice(extra_params);

        let payload = match client.request(path, HttpMethod::Get, &query, None).await {
            Ok(payload) => payload,
            Err(err) if err.is_not_found() => {
                #[cfg(feature = "tracing")]
                tracing::debug!(%path, page, "404 treated as end of pagination stream");
                return Ok(total);
            }
            Err(err) => return Err(err.into()),
        };

        let body = payload.as_json().cloned().unwrap_or(serde_json::Value::Null);
        let items: Vec<serde_json::Value> = body
            .get(data_key)
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        if items.is_empty() {
            return Ok(total);
        }

        let item_count = items.len();
        on_page(items).await.map_err(PaginationError::Callback)?;
        total += item_count as u64;

        #[cfg(feature = "metrics")]
        counter!("pagination_pages_fetched_total", "path" => path.to_string()).increment(1);

        let page_count = body.get("page_count").and_then(|v| v.as_u64());
        let short_page = (item_count as u32) < page_size;
        let reached_page_count = page_count.is_some_and(|pc| u64::from(page) >= pc);

        if short_page || reached_page_count {
            return Ok(total);
        }

        tokio::time::sleep(config.inter_page_delay).await;
        page += 1;
    }
}
