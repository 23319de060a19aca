use crate::error::{ProxyError, Result};
use crate::github::client::RepositorySource;
use crate::github::types::{Branch, Lookup, RepositoryResult, RepositorySummary};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, debug_span, error, info, warn, Instrument};

#[derive(Clone)]
pub struct RepositoryAggregator {
    source: Arc<dyn RepositorySource>,
}

impl RepositoryAggregator {
    pub fn new(source: Arc<dyn RepositorySource>) -> Self {
        Self { source }
    }

    pub async fn collect(&self, username: &str) -> Result<Lookup<Vec<RepositoryResult>>> {
        let repos = match self.source.list_repositories(username).await {
            Ok(Lookup::Found(repos)) => repos,
            Ok(Lookup::NotFound) => {
                warn!(username, "user not found upstream");
                return Ok(Lookup::NotFound);
            }
            Err(e) => {
                error!(username, error = %e, "listing repositories failed");
                return Err(e);
            }
        };

        let total = repos.len();
        let owned: Vec<RepositorySummary> = repos.into_iter().filter(|r| !r.is_fork).collect();
        debug!(username, total, owned = owned.len(), "filtered forks");

        match fetch_branches(Arc::clone(&self.source), owned).await {
            Ok(results) => {
                info!(username, repositories = results.len(), "aggregated repositories");
                Ok(Lookup::Found(results))
            }
            Err(e) => {
                error!(username, error = %e, "branch fan-out failed");
                Err(e)
            }
        }
    }
}

async fn fetch_branches(
    source: Arc<dyn RepositorySource>,
    repos: Vec<RepositorySummary>,
) -> Result<Vec<RepositoryResult>> {
    if repos.is_empty() {
        return Ok(Vec::new());
    }

    // Dropping the set (e.g. the request future is cancelled) aborts every task.
    let mut join_set: JoinSet<(usize, Result<Vec<Branch>>)> = JoinSet::new();
    for (idx, repo) in repos.iter().enumerate() {
        let source = Arc::clone(&source);
        let owner = repo.owner_login.clone();
        let name = repo.name.clone();
        let span = debug_span!("branches", owner = %owner, repo = %name);
        join_set.spawn(
            async move {
                let branches = source.list_branches(&owner, &name).await;
                (idx, branches)
            }
            .instrument(span),
        );
    }

    let mut slots: Vec<Option<Vec<Branch>>> = vec![None; repos.len()];
    let mut first_error: Option<ProxyError> = None;

    while let Some(joined) = join_set.join_next().await {
        let failure = match joined {
            Ok((idx, Ok(branches))) => {
                slots[idx] = Some(branches);
                continue;
            }
            Ok((_, Err(e))) => e,
            Err(e) => ProxyError::Task(e),
        };

        if first_error.is_none() {
            join_set.abort_all();
            first_error = Some(failure);
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    assemble(repos, slots)
}

fn assemble(
    repos: Vec<RepositorySummary>,
    slots: Vec<Option<Vec<Branch>>>,
) -> Result<Vec<RepositoryResult>> {
    repos
        .into_iter()
        .zip(slots)
        .map(|(repo, branches)| match branches {
            Some(b) => Ok(RepositoryResult::new(repo, b)),
            None => Err(ProxyError::MissingBranches {
                owner: repo.owner_login,
                repo: repo.name,
            }),
        })
        .collect()
}
