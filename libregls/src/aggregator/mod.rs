//! Repository aggregation.
//!
//! The [`Aggregator`] walks the catalog, resolves every tag of every matching
//! repository on a bounded pool, orders tags newest first, truncates them and
//! turns the survivors into presentation-ready [`Row`]s.
//!
//! Fan-out happens in two stages:
//!
//! 1. repositories run concurrently and are joined in catalog order
//! 2. inside a repository every tag is a task on a `JoinSet`, and results land
//!    in a pre-sized slot vector so tag order survives completion order
//!
//! A single semaphore caps the number of in-flight registry calls across both
//! stages. Each HTTP request holds one permit for its own duration, so a tag
//! task never holds a permit while waiting for another.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::client::RegistryClient;
use crate::error::{RegistryError, Result};
use crate::format::{created_sort_key, format_created};
use crate::resolver::{TagRecord, TagResolver};


/// Number of tags kept per repository unless all tags are requested.
pub const DEFAULT_TAG_LIMIT: usize = 5;

/// Default bound on concurrent registry requests.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// What to do when a tag (or a repository's tag list) cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole run on the first failure.
    Strict,
    /// Skip the failing tag or repository and record it.
    #[default]
    BestEffort,
}

/// Options controlling one aggregation run.
///
/// # Examples
///
/// ```
/// use libregls::aggregator::{FailurePolicy, ListOptions};
///
/// let options = ListOptions::new()
///     .with_prefix("app")
///     .with_show_all(true)
///     .with_policy(FailurePolicy::Strict)
///     .with_concurrency(4);
/// assert_eq!(options.concurrency, 4);
/// ```
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Only repositories whose name starts with this prefix are processed
    pub prefix: Option<String>,
    /// Disable the per-repository tag limit
    pub show_all: bool,
    /// Failure handling policy
    pub policy: FailurePolicy,
    /// Maximum number of registry requests in flight
    pub concurrency: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            show_all: false,
            policy: FailurePolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the repository name prefix filter. An empty prefix matches everything.
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    pub fn with_show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the concurrency bound. Values below 1 are raised to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Returns true if `repository` passes the prefix filter.
    pub fn matches(&self, repository: &str) -> bool {
        self.prefix
            .as_deref()
            .is_none_or(|prefix| repository.starts_with(prefix))
    }
}

/// One presentation-ready line of the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub repository: String,
    pub tag: String,
    /// Architectures joined with a comma
    pub architecture: String,
    /// `YYYY-MM-DD HH:MM:SS`, or the raw value when it could not be parsed
    pub created: String,
}

impl From<&TagRecord> for Row {
    fn from(record: &TagRecord) -> Self {
        let created = match format_created(&record.created) {
            Ok(formatted) => formatted,
            Err(e) => {
                warn!(
                    repository = %record.repository,
                    tag = %record.tag,
                    error = %e,
                    "showing unformatted creation time"
                );
                record.created.clone()
            }
        };

        Self {
            repository: record.repository.clone(),
            tag: record.tag.clone(),
            architecture: record.joined_architectures(),
            created,
        }
    }
}

/// A tag, or a whole repository, skipped under [`FailurePolicy::BestEffort`].
#[derive(Debug)]
pub struct TagFailure {
    pub repository: String,
    /// `None` when the repository's tag list itself could not be fetched
    pub tag: Option<String>,
    pub error: RegistryError,
}

/// Result of a full aggregation run.
#[derive(Debug, Default)]
pub struct Inventory {
    pub rows: Vec<Row>,
    pub failures: Vec<TagFailure>,
}

/// Rows and failures for a single repository.
#[derive(Debug, Default)]
struct RepositoryReport {
    rows: Vec<Row>,
    failures: Vec<TagFailure>,
}

/// Orders tag records newest first.
///
/// The sort is stable: records with equal timestamps keep their relative
/// order. Unparseable timestamps sort last.
pub fn sort_newest_first(records: &mut [TagRecord]) {
    records.sort_by_cached_key(|r| std::cmp::Reverse(created_sort_key(&r.created)));
}

/// Applies the per-repository tag limit.
pub fn truncate_tags(records: &mut Vec<TagRecord>, show_all: bool) {
    if !show_all {
        records.truncate(DEFAULT_TAG_LIMIT);
    }
}

/// Drives a full inventory run against one registry.
pub struct Aggregator {
    client: RegistryClient,
    resolver: TagResolver,
    options: ListOptions,
    permits: Arc<Semaphore>,
}

impl Aggregator {
    pub fn new(client: RegistryClient, options: ListOptions) -> Self {
        let permits = Arc::new(Semaphore::new(options.concurrency.max(1)));
        Self {
            resolver: TagResolver::with_permits(client.clone(), Arc::clone(&permits)),
            client,
            options,
            permits,
        }
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Lists the catalog and aggregates every matching repository.
    ///
    /// A catalog failure is always returned as an error. Other failures follow
    /// the configured [`FailurePolicy`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libregls::aggregator::{Aggregator, ListOptions};
    /// use libregls::client::RegistryClient;
    ///
    /// # async fn example() -> libregls::error::Result<()> {
    /// let client = RegistryClient::new("https://registry.internal:5000")?;
    /// let inventory = Aggregator::new(client, ListOptions::new()).run().await?;
    /// for row in &inventory.rows {
    ///     println!("{} {} {} {}", row.repository, row.tag, row.architecture, row.created);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self) -> Result<Inventory> {
        let repositories = self.client.list_repositories().await?;
        let selected: Vec<&String> = repositories
            .iter()
            .filter(|repo| self.options.matches(repo))
            .collect();

        debug!(
            total = repositories.len(),
            selected = selected.len(),
            "catalog listed"
        );

        let reports = try_join_all(
            selected
                .iter()
                .map(|repository| self.aggregate_repository(repository)),
        )
        .await?;

        let mut inventory = Inventory::default();
        for report in reports {
            inventory.rows.extend(report.rows);
            inventory.failures.extend(report.failures);
        }

        info!(
            rows = inventory.rows.len(),
            failures = inventory.failures.len(),
            "inventory complete"
        );

        Ok(inventory)
    }

    async fn aggregate_repository(&self, repository: &str) -> Result<RepositoryReport> {
        let tags = {
            let _permit = self.acquire().await?;
            self.client.list_tags(repository).await
        };

        let tags = match tags {
            Ok(tags) => tags,
            Err(error) => return self.skip_repository(repository, error),
        };

        let (mut records, failures) = self.resolve_tags(repository, tags).await?;

        sort_newest_first(&mut records);
        truncate_tags(&mut records, self.options.show_all);

        Ok(RepositoryReport {
            rows: records.iter().map(Row::from).collect(),
            failures,
        })
    }

    /// Resolves every tag of `repository`. The resolver's HTTP calls share the
    /// run's request permits.
    async fn resolve_tags(
        &self,
        repository: &str,
        tags: Vec<String>,
    ) -> Result<(Vec<TagRecord>, Vec<TagFailure>)> {
        let mut slots: Vec<Option<Result<TagRecord>>> = Vec::with_capacity(tags.len());
        slots.resize_with(tags.len(), || None);

        let mut set = JoinSet::new();
        for (slot, tag) in tags.iter().enumerate() {
            let resolver = self.resolver.clone();
            let repository = repository.to_string();
            let tag = tag.clone();

            set.spawn(async move { (slot, resolver.resolve(&repository, &tag).await) });
        }

        while let Some(joined) = set.join_next().await {
            let (slot, result) = joined.map_err(|e| {
                RegistryError::task(format!("tag resolution for {} failed: {}", repository, e))
            })?;

            // Dropping the set on early return aborts the remaining tasks
            let result = match result {
                Err(e) if self.options.policy == FailurePolicy::Strict => return Err(e),
                other => other,
            };
            slots[slot] = Some(result);
        }

        let mut records = Vec::with_capacity(tags.len());
        let mut failures = Vec::new();
        for (tag, slot) in tags.into_iter().zip(slots) {
            match slot {
                Some(Ok(record)) => records.push(record),
                Some(Err(error)) => {
                    warn!(repository, tag = %tag, error = %error, "skipping tag");
                    failures.push(TagFailure {
                        repository: repository.to_string(),
                        tag: Some(tag),
                        error,
                    });
                }
                None => {
                    return Err(RegistryError::task(format!(
                        "no result for {}:{}",
                        repository, tag
                    )));
                }
            }
        }

        Ok((records, failures))
    }

    fn skip_repository(&self, repository: &str, error: RegistryError) -> Result<RepositoryReport> {
        if self.options.policy == FailurePolicy::Strict {
            return Err(error);
        }

        warn!(repository, error = %error, "skipping repository");
        Ok(RepositoryReport {
            rows: Vec::new(),
            failures: vec![TagFailure {
                repository: repository.to_string(),
                tag: None,
                error,
            }],
        })
    }

    async fn acquire(&self) -> Result<tokio::sync::SemaphorePermit<'_>> {
        self.permits
            .acquire()
            .await
            .map_err(|_| RegistryError::task("request pool closed"))
    }
}
