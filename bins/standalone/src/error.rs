#[derive(Debug, thiserror::Error)]
pub enum StandaloneError {
    #[error("config ({context}): {detail}")]
    Config { context: &'static str, detail: String },

    #[error("input '{path}': {source}")]
    Input {
        path: String,
        source: std::io::Error,
    },

    #[error("output: {0}")]
    Output(#[from] std::io::Error),

    #[error("{0}")]
    Relay(#[from] relay_api::RelayError),

    #[error("{failed} of {total} events failed")]
    Failed { failed: usize, total: usize },
}
