use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid {kind} id: {source}")]
    InvalidId {
        kind: &'static str,
        #[source]
        source: uuid::Error,
    },
}
