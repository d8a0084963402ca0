use hevy_sync_core::SyncConfig;
use std::time::Duration;

/// Tunables for [`crate::fetch_paginated`] pulled from the crate-wide config.
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    pub max_pages: u32,
    pub inter_page_delay: Duration,
}

impl PaginationConfig {
    pub fn from_sync_config(config: &SyncConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            inter_page_delay: config.inter_page_delay,
        }
    }
}
