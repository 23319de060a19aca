use serde::{Deserialize, Serialize};

// GET /users/{username}/repos
#[derive(Clone, Debug, Deserialize)]
pub struct GitHubRepository {
    pub name: String,
    pub fork: bool,
    pub owner: Owner,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositorySummary {
    pub name: String,
    pub is_fork: bool,
    pub owner_login: String,
}

impl From<GitHubRepository> for RepositorySummary {
    fn from(repo: GitHubRepository) -> Self {
        Self {
            name: repo.name,
            is_fork: repo.fork,
            owner_login: repo.owner.login,
        }
    }
}

// Same shape upstream and outbound.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: CommitRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryResult {
    pub repository_name: String,
    pub owner_login: String,
    pub branches: Vec<Branch>,
}

impl RepositoryResult {
    pub fn new(repo: RepositorySummary, branches: Vec<Branch>) -> Self {
        Self {
            repository_name: repo.name,
            owner_login: repo.owner_login,
            branches,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}
