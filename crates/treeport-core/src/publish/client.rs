//! Minimal GitHub REST client for the git data and contents APIs.

use super::transport::HttpMethod;
use super::transport::HttpRequest;
use super::transport::HttpResponse;
use super::transport::Transport;
use crate::ExportError;
use crate::PublishConfig;
use crate::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;
use serde_json::Value;
use serde_json::json;

const ACCEPT: &str = "application/vnd.github.v3+json";

/// Fallback message when an error body has no `message` field.
const UNKNOWN_ERROR: &str = "Unknown error";

/// GitHub client bound to one repository.
///
/// Every request carries `Authorization: token <TOKEN>`,
/// `Accept: application/vnd.github.v3+json` and a `User-Agent`.
pub struct GitHubClient<T: Transport> {
    transport: T,
    repo_url: String,
    token: String,
    user_agent: String,
}

impl<T: Transport> GitHubClient<T> {
    /// Creates a client for the repository named by `config`.
    pub fn new(transport: T, config: &PublishConfig) -> Self {
        Self {
            transport,
            repo_url: config.repo_url(),
            token: config.token.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Checks whether `refs/heads/{branch}` exists.
    ///
    /// Only a 404 means "missing". Any other status, errors included, is
    /// taken as an existing branch.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Transport` if the request fails.
    pub fn branch_exists(&self, branch: &str) -> Result<bool> {
        let url = format!("{}/git/refs/heads/{branch}", self.repo_url);
        let response = self.send(HttpMethod::Get, url, None)?;
        if response.status != 404 && !response.is_success() {
            tracing::warn!(
                branch,
                status = response.status,
                "unexpected status checking branch, assuming it exists"
            );
        }
        Ok(response.status != 404)
    }

    /// Creates an empty tree and returns its sha.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a body
    /// without `sha`.
    pub fn create_tree_empty(&self) -> Result<String> {
        const OP: &str = "Failed to create empty tree";
        let url = format!("{}/git/trees", self.repo_url);
        let response = self.send(HttpMethod::Post, url, Some(json!({ "tree": [] })))?;
        let response = expect_success(OP, response)?;
        extract_sha(OP, &response.body)
    }

    /// Creates a parentless commit of `tree` and returns its sha.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a body
    /// without `sha`.
    pub fn create_commit(&self, message: &str, tree: &str) -> Result<String> {
        const OP: &str = "Failed to create initial commit";
        let url = format!("{}/git/commits", self.repo_url);
        let body = json!({
            "message": message,
            "tree": tree,
            "parents": [],
        });
        let response = self.send(HttpMethod::Post, url, Some(body))?;
        let response = expect_success(OP, response)?;
        extract_sha(OP, &response.body)
    }

    /// Points a new `refs/heads/{branch}` at `sha`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub fn create_ref(&self, branch: &str, sha: &str) -> Result<()> {
        let url = format!("{}/git/refs", self.repo_url);
        let body = json!({
            "ref": format!("refs/heads/{branch}"),
            "sha": sha,
        });
        let response = self.send(HttpMethod::Post, url, Some(body))?;
        expect_success(&format!("Failed to create {branch} branch"), response)?;
        Ok(())
    }

    /// Returns the content sha of `path` on `branch`, or `None` if it does
    /// not exist there.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::RemoteApi` carrying the status reason phrase for
    /// any non-2xx status other than 404.
    pub fn file_sha(&self, path: &str, branch: &str) -> Result<Option<String>> {
        let operation = format!("Failed to get file SHA for {path}");
        let url = self.contents_url(path, Some(branch))?;
        let response = self.send(HttpMethod::Get, url, None)?;

        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            let message = reqwest::StatusCode::from_u16(response.status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or(UNKNOWN_ERROR)
                .to_string();
            return Err(ExportError::RemoteApi {
                operation,
                status: response.status,
                message,
            });
        }

        extract_sha(&operation, &response.body).map(Some)
    }

    /// Creates or replaces `path` on `branch` with `content`.
    ///
    /// `sha` must be the current content sha when replacing; it is left out
    /// of the body when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub fn put_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        branch: &str,
        sha: Option<&str>,
    ) -> Result<Value> {
        let url = self.contents_url(path, None)?;
        let mut body = json!({
            "message": message,
            "content": STANDARD.encode(content.as_bytes()),
            "branch": branch,
        });
        if let Some(sha) = sha {
            body["sha"] = Value::String(sha.to_string());
        }

        let response = self.send(HttpMethod::Put, url, Some(body))?;
        let response = expect_success(&format!("Failed to upload {path}"), response)?;
        Ok(response.body)
    }

    /// Builds `{repo}/contents/{path}`, percent-encoding each path segment.
    fn contents_url(&self, path: &str, branch: Option<&str>) -> Result<String> {
        let invalid = || ExportError::InvalidConfig {
            reason: format!("invalid repository URL: {}", self.repo_url),
        };
        let mut url = Url::parse(&self.repo_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .push("contents")
            .extend(path.split('/'));
        if let Some(branch) = branch {
            url.query_pairs_mut().append_pair("ref", branch);
        }
        Ok(url.into())
    }

    fn send(&self, method: HttpMethod, url: String, body: Option<Value>) -> Result<HttpResponse> {
        let mut request = HttpRequest::new(method, url)
            .with_header("Authorization", format!("token {}", self.token))
            .with_header("Accept", ACCEPT)
            .with_header("User-Agent", self.user_agent.as_str());
        if let Some(body) = body {
            request = request.with_body(body);
        }

        tracing::trace!(method = %request.method, url = %request.url, "sending request");
        self.transport.send(&request)
    }
}

fn expect_success(operation: &str, response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }
    let message = response
        .body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_ERROR)
        .to_string();
    Err(ExportError::RemoteApi {
        operation: operation.to_string(),
        status: response.status,
        message,
    })
}

fn extract_sha(operation: &str, body: &Value) -> Result<String> {
    body.get("sha")
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ExportError::MalformedResponse {
            operation: operation.to_string(),
            reason: "response has no sha".to_string(),
        })
}
