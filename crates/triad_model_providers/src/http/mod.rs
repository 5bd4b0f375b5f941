//! Generic HTTP provider backend.
//!
//! For vendor deployments discovered from `HTTP_<MODEL>_API_KEY_<VENDOR>`
//! variables. Requests use the Chat Completions body and are posted to the
//! configured URL verbatim.

mod provider;

pub use provider::HttpProvider;
