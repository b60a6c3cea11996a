//! Concurrent reconciliation of declarations against their registries
//!
//! One task per declaration, bounded by a semaphore. Results come back in
//! declaration order regardless of completion order, and a failed lookup
//! never affects its siblings.

use crate::domain::{ErrorKind, PackageDeclaration, UpdateResult};
use crate::registry::RegistryClient;
use crate::update::UpdateJudge;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Default number of lookups in flight
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Fans declarations out to the registry client
#[derive(Clone)]
pub struct Reconciler {
    client: RegistryClient,
    judge: UpdateJudge,
    concurrency: usize,
    deadline: Option<Duration>,
}

impl Reconciler {
    /// Create a reconciler with default concurrency and no deadline
    pub fn new(client: RegistryClient) -> Self {
        Self {
            client,
            judge: UpdateJudge::new(),
            concurrency: DEFAULT_CONCURRENCY,
            deadline: None,
        }
    }

    /// Set the maximum number of lookups in flight (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set a deadline for the whole batch
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Returns the concurrency limit
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the registry client
    pub fn client(&self) -> &RegistryClient {
        &self.client
    }

    /// Check every declaration, one result per declaration in input order
    pub async fn check_all(&self, declarations: &[PackageDeclaration]) -> Vec<UpdateResult> {
        self.check_all_with(declarations, |_| {}).await
    }

    /// Like `check_all`, calling `on_result` as each lookup completes
    pub async fn check_all_with<F>(
        &self,
        declarations: &[PackageDeclaration],
        mut on_result: F,
    ) -> Vec<UpdateResult>
    where
        F: FnMut(&UpdateResult),
    {
        if declarations.is_empty() {
            return Vec::new();
        }

        info!(
            count = declarations.len(),
            concurrency = self.concurrency,
            "checking declarations"
        );

        self.client.cache().purge_expired();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, declaration) in declarations.iter().enumerate() {
            let client = self.client.clone();
            let semaphore = Arc::clone(&semaphore);
            let kind = declaration.registry;
            let name = declaration.name.clone();

            tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();
                let lookup = client.latest_version(kind, &name).await;
                (index, lookup)
            });
        }

        let mut slots: Vec<Option<UpdateResult>> = vec![None; declarations.len()];
        let judge = self.judge;

        let collect = async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((index, lookup)) => {
                        let result = judge.judge(&declarations[index], lookup);
                        debug!(
                            package = %result.package,
                            constraint = declarations[index].constraint.kind_name(),
                            status = %result.status(),
                            "checked"
                        );
                        on_result(&result);
                        slots[index] = Some(result);
                    }
                    Err(e) => warn!(error = %e, "lookup task failed"),
                }
            }
        };

        let timed_out = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, collect).await.is_err(),
            None => {
                collect.await;
                false
            }
        };

        if timed_out {
            warn!(
                pending = tasks.len(),
                "batch deadline reached, aborting remaining lookups"
            );
            tasks.abort_all();
        }

        // Slots still empty were aborted by the deadline or their task panicked
        let fallback = if timed_out {
            ErrorKind::Timeout
        } else {
            ErrorKind::NetworkError
        };

        slots
            .into_iter()
            .zip(declarations)
            .map(|(slot, declaration)| {
                slot.unwrap_or_else(|| UpdateResult::failed(declaration, fallback))
            })
            .collect()
    }
}
