use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not a mygit repository: {0}")]
    NotInitialized(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] mygit_store::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
