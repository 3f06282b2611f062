//! Test doubles for exporting and publishing.
//!
//! Scripted HTTP transport, in-memory save target, recording progress
//! callback and a zip reader, shared by unit and integration tests.
//! Outside this crate's own tests it requires the `test-utils` feature.
//!
//! # Panics
//!
//! Functions in this module panic on malformed input since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use crate::ExportError;
use crate::ProgressCallback;
use crate::Result;
use crate::archive::SaveTarget;
use crate::fs::MemoryFs;
use crate::publish::HttpRequest;
use crate::publish::HttpResponse;
use crate::publish::Transport;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;
use std::io::Read;
use std::path::PathBuf;

/// Transport that replays queued responses and records every request.
///
/// Running out of responses is a transport error, so an unexpected extra
/// request fails the operation under test.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use treeport_core::publish::HttpMethod;
/// use treeport_core::publish::HttpRequest;
/// use treeport_core::publish::Transport;
/// use treeport_core::test_utils::ScriptedTransport;
///
/// let transport = ScriptedTransport::new().respond(200, json!({"sha": "abc"}));
/// let response = transport.send(&HttpRequest::new(HttpMethod::Get, "https://x"))?;
/// assert_eq!(response.status, 200);
/// assert_eq!(transport.requests().len(), 1);
/// # Ok::<(), treeport_core::ExportError>(())
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<std::result::Result<HttpResponse, String>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Creates a transport with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    #[must_use]
    pub fn respond(self, status: u16, body: Value) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queues a transport failure.
    #[must_use]
    pub fn fail(self, reason: &str) -> Self {
        self.responses.borrow_mut().push_back(Err(reason.to_string()));
        self
    }

    /// Requests sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// Number of queued responses not consumed yet.
    pub fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request.clone());
        let operation = format!("{} {}", request.method, request.url);
        match self.responses.borrow_mut().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(ExportError::Transport { operation, reason }),
            None => Err(ExportError::Transport {
                operation,
                reason: "no scripted response left".to_string(),
            }),
        }
    }
}

/// Save target that keeps archives in memory.
#[derive(Debug, Default)]
pub struct MemorySaveTarget {
    saved: RefCell<Vec<(String, Vec<u8>)>>,
    failing: bool,
}

impl MemorySaveTarget {
    /// Creates a target that accepts every save.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a target whose saves fail with an I/O error.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            saved: RefCell::default(),
            failing: true,
        }
    }

    /// `(file_name, bytes)` of every successful save.
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.borrow().clone()
    }
}

impl SaveTarget for MemorySaveTarget {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        if self.failing {
            return Err(std::io::Error::other("save target unavailable").into());
        }
        self.saved
            .borrow_mut()
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from("memory").join(file_name))
    }
}

/// Progress callback that records every call.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    /// Paths passed to `on_entry_start`, in call order.
    pub started: Vec<String>,
    /// Paths passed to `on_entry_complete`, in call order.
    pub completed: Vec<String>,
    /// `(total, current)` of every `on_entry_start` call.
    pub positions: Vec<(usize, usize)>,
    /// Whether `on_complete` was called.
    pub finished: bool,
}

impl ProgressCallback for RecordingProgress {
    fn on_entry_start(&mut self, path: &str, total: usize, current: usize) {
        self.started.push(path.to_string());
        self.positions.push((total, current));
    }

    fn on_entry_complete(&mut self, path: &str) {
        self.completed.push(path.to_string());
    }

    fn on_complete(&mut self) {
        self.finished = true;
    }
}

/// Reads every entry of a zip archive as `(name, text)` in archive order.
///
/// # Examples
///
/// ```
/// use treeport_core::archive::ProjectArchive;
/// use treeport_core::test_utils::read_zip;
///
/// let mut archive = ProjectArchive::new();
/// archive.insert("a.txt", "x");
/// let entries = read_zip(&archive.to_zip(Some(6))?);
/// assert_eq!(entries, [("a.txt".to_string(), "x".to_string())]);
/// # Ok::<(), treeport_core::ExportError>(())
/// ```
#[must_use]
pub fn read_zip(bytes: &[u8]) -> Vec<(String, String)> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut file = zip.by_index(i).unwrap();
            let mut content = String::new();
            file.read_to_string(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}

/// A small web project rooted at `/home/project`, with excluded noise.
///
/// Non-excluded files, in walker order: `/home/project/index.html`,
/// `/home/project/src/main.ts`, `/home/project/src/styles/app.css`,
/// `/home/project/README.md`.
#[must_use]
pub fn project_fs() -> MemoryFs {
    MemoryFs::new()
        .with_file("/home/project/index.html", "<div id=\"app\"></div>\n")
        .with_file("/home/project/src/main.ts", "console.log('hi');\n")
        .with_file("/home/project/src/styles/app.css", "body { margin: 0; }\n")
        .with_file("/home/project/node_modules/vite/index.js", "export {};\n")
        .with_file("/home/project/dist/index.js", "bundled\n")
        .with_file("/home/project/.env", "SECRET=1\n")
        .with_file("/home/project/package-lock.json", "{}\n")
        .with_file("/home/project/README.md", "# demo\n")
}
