//! Page fetching for export operations
//!
//! This module provides the paged-query contract the export coordinator
//! consumes, plus its MongoDB implementation. A page is one bounded, sorted,
//! optionally projected skip/limit query; repeated calls with increasing
//! skip yield a stable, non-overlapping, order-consistent record sequence
//! for an unmodified data set.

use async_trait::async_trait;
use bson::Document;
use futures::TryStreamExt;
use mongodb::Collection;
use tracing::debug;

use crate::error::Result;
use crate::request::ExportRequest;

/// Trait for fetching one bounded page of raw records
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the records at `[skip, skip + limit)` of the sorted result set.
    ///
    /// # Arguments
    /// * `skip` - Number of records to skip
    /// * `limit` - Maximum number of records to return
    ///
    /// # Returns
    /// * `Result<Vec<Document>>` - Raw records in sort order, size 0..=limit
    async fn fetch_page(&self, skip: u64, limit: u64) -> Result<Vec<Document>>;
}

/// MongoDB-backed page fetcher
///
/// Holds the query shape of one export request and replays it per page with
/// the driver's native skip/limit paging. This bounds peak memory to one
/// page of records at the cost of O(page) redundant skip work server-side.
pub struct MongoPageFetcher {
    collection: Collection<Document>,
    filter: Document,
    sort: Document,
    projection: Option<Document>,
}

impl MongoPageFetcher {
    /// Create a fetcher for an export request.
    ///
    /// # Arguments
    /// * `collection` - Collection to query
    /// * `request` - Export request supplying filter, sort and projection
    pub fn new(collection: Collection<Document>, request: &ExportRequest) -> Self {
        Self {
            collection,
            filter: request.filter.clone(),
            sort: request.sort.clone(),
            projection: request.projection.clone(),
        }
    }
}

#[async_trait]
impl PageFetcher for MongoPageFetcher {
    async fn fetch_page(&self, skip: u64, limit: u64) -> Result<Vec<Document>> {
        let mut find_opts = mongodb::options::FindOptions::default();
        find_opts.limit = Some(limit as i64);
        find_opts.skip = Some(skip);
        find_opts.sort = Some(self.sort.clone());

        if let Some(ref projection) = self.projection {
            find_opts.projection = Some(projection.clone());
        }

        let mut cursor = self
            .collection
            .find(self.filter.clone())
            .with_options(find_opts)
            .await?;

        let mut page = Vec::with_capacity(limit as usize);
        while let Some(doc) = cursor.try_next().await? {
            page.push(doc);
        }

        debug!("Fetched page of {} documents (skip {})", page.len(), skip);
        Ok(page)
    }
}
