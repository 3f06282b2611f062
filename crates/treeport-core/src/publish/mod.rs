//! Publishing a project tree to a GitHub repository.
//!
//! [`RemotePublisher`] drives a [`GitHubClient`], which talks to the
//! REST API through a [`Transport`]. Production code uses
//! [`ReqwestTransport`]; tests script responses.

mod client;
mod publisher;
mod transport;

pub use client::GitHubClient;
pub use publisher::RemotePublisher;
pub use publisher::RepoState;
pub use transport::HttpMethod;
pub use transport::HttpRequest;
pub use transport::HttpResponse;
pub use transport::ReqwestTransport;
pub use transport::Transport;
