use crate::error::{ProxyError, Result};
use crate::github::types::{Branch, GitHubRepository, Lookup, RepositorySummary};
use async_trait::async_trait;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::debug;

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[async_trait]
pub trait RepositorySource: Send + Sync {
    async fn list_repositories(&self, username: &str) -> Result<Lookup<Vec<RepositorySummary>>>;

    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>>;
}

#[derive(Clone)]
pub struct GitHubClient {
    octo: Octocrab,
}

impl GitHubClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let octo = Octocrab::builder()
            .base_uri(base_url)
            .map_err(|e| ProxyError::Config(format!("invalid github base url {base_url}: {e}")))?
            .add_retry_config(RetryConfig::None)
            .build()?;

        Ok(Self { octo })
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn list_repositories(&self, username: &str) -> Result<Lookup<Vec<RepositorySummary>>> {
        let route = format!("/users/{}/repos", encode_segment(username));
        debug!(%route, "listing repositories");

        let response: std::result::Result<Vec<GitHubRepository>, octocrab::Error> =
            self.octo.get(&route, None::<&()>).await;

        match response {
            Ok(repos) => Ok(Lookup::Found(
                repos.into_iter().map(RepositorySummary::from).collect(),
            )),
            Err(e) if is_not_found(&e) => Ok(Lookup::NotFound),
            Err(e) => Err(ProxyError::GitHub(e)),
        }
    }

    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>> {
        let route = format!(
            "/repos/{}/{}/branches",
            encode_segment(owner),
            encode_segment(repo)
        );
        debug!(%route, "listing branches");

        let response: std::result::Result<Vec<Branch>, octocrab::Error> =
            self.octo.get(&route, None::<&()>).await;

        match response {
            Ok(branches) => Ok(branches),
            // The repository was listed moments ago; losing it is a failure, not "no branches".
            Err(e) if is_not_found(&e) => Err(ProxyError::BranchesNotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            Err(e) => Err(ProxyError::GitHub(e)),
        }
    }
}

fn is_not_found(e: &octocrab::Error) -> bool {
    matches!(e, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
