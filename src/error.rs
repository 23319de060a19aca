use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("github error: {0}")]
    GitHub(#[from] octocrab::Error),

    #[error("branches not found for {owner}/{repo}")]
    BranchesNotFound { owner: String, repo: String },

    #[error("branch listing for {owner}/{repo} never completed")]
    MissingBranches { owner: String, repo: String },

    #[error("branch fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ProxyError {
    fn from(e: figment::Error) -> Self {
        ProxyError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
