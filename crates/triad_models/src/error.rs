//! Error types for the model registry.

/// Error resolving a model key into a usable configuration or client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// No static or discovered model has this key.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// The model needs a secret that is not set.
    #[error("model '{model}' is not available: set the {env_var} environment variable")]
    MissingApiKey {
        /// The model key.
        model: String,
        /// The environment variable holding the secret.
        env_var: String,
    },

    /// An HTTP model has no endpoint to talk to.
    #[error("model '{0}' has no base url configured")]
    MissingBaseUrl(String),

    /// A configured header name or value cannot be sent over HTTP.
    #[error("invalid header '{name}' for model '{model}'")]
    InvalidHeader {
        /// The model key.
        model: String,
        /// The offending header name.
        name: String,
    },

    /// The underlying HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Client(String),
}
