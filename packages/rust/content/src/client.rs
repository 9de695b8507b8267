//! The content client and its shared dispatch routine.

use std::sync::Arc;

use chrono::Utc;
use ftapi_shared::{Config, FtApiError, Result, instance_config};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::descriptor::{CallKind, PathShape};
use crate::events::{ContentEvent, EventSink};
use crate::paths::redact;
use crate::transport::Transport;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Counts of completed requests for one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Handle to the requests spawned by one call.
///
/// Dropping it leaves the requests running; events are still published.
#[derive(Debug)]
pub struct Dispatch {
    kind: CallKind,
    paths: Vec<String>,
    handles: Vec<JoinHandle<bool>>,
    /// Requests that could not be scheduled; their error events are already published.
    rejected: usize,
}

impl Dispatch {
    pub fn kind(&self) -> CallKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.handles.len() + self.rejected
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Paths handed to the transport, in dispatch order (API key included).
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Wait for every request to complete.
    pub async fn join(self) -> DispatchSummary {
        let mut summary = DispatchSummary {
            succeeded: 0,
            failed: self.rejected,
        };
        for handle in self.handles {
            match handle.await {
                Ok(true) => summary.succeeded += 1,
                Ok(false) => summary.failed += 1,
                Err(e) => {
                    warn!(kind = %self.kind, error = %e, "request task did not complete");
                    summary.failed += 1;
                }
            }
        }
        info!(
            kind = %self.kind,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "dispatch complete"
        );
        summary
    }

    /// Cancel requests that have not completed yet. Cancelled requests publish nothing.
    pub fn abort(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// ContentClient
// ---------------------------------------------------------------------------

/// Client for the four supported content API calls.
///
/// Getters spawn one Tokio task per request and return immediately. Tasks go
/// to the runtime set with [`ContentClient::with_runtime`], or else the
/// current one; with neither, each request is reported as an error event.
/// Results arrive as [`ContentEvent`]s on the injected sink.
pub struct ContentClient<T, S> {
    config: Arc<Config>,
    transport: Arc<T>,
    sink: Arc<S>,
    runtime: Option<Handle>,
}

impl<T, S> Clone for ContentClient<T, S> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
            sink: Arc::clone(&self.sink),
            runtime: self.runtime.clone(),
        }
    }
}

impl<T: Transport, S: EventSink + 'static> ContentClient<T, S> {
    /// Create a client whose instance configuration is the defaults plus `api_key`.
    ///
    /// Fails with `InvalidArgument` if the key is empty.
    pub fn new(api_key: &str, transport: T, sink: S) -> Result<Self> {
        Self::from_config(instance_config(Some(api_key))?, transport, sink)
    }

    /// Create a client from a pre-built instance layer, which must carry an API key.
    pub fn from_config(config: Config, transport: T, sink: S) -> Result<Self> {
        instance_config(config.get_str(ftapi_shared::API_KEY))?;
        Ok(Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
            sink: Arc::new(sink),
            runtime: None,
        })
    }

    /// Spawn requests on `handle`, so getters also work outside a runtime.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// The instance configuration. Never modified by calls.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The configuration a call with `call_config` would use.
    pub fn effective_config(&self, call_config: Option<&Config>) -> Config {
        self.config.merge(call_config)
    }

    /// Fetch content items by id.
    pub fn get_api_content<I: AsRef<str>>(
        &self,
        ids: &[I],
        call_config: Option<&Config>,
    ) -> Dispatch {
        self.fetch_items(Some(ids), call_config, CallKind::ApiContent)
    }

    /// Fetch site pages by id.
    pub fn get_page<I: AsRef<str>>(&self, ids: &[I], call_config: Option<&Config>) -> Dispatch {
        self.fetch_items(Some(ids), call_config, CallKind::Page)
    }

    /// Fetch the main content of site pages by id.
    pub fn get_page_main_content<I: AsRef<str>>(
        &self,
        ids: &[I],
        call_config: Option<&Config>,
    ) -> Dispatch {
        self.fetch_items(Some(ids), call_config, CallKind::PageMainContent)
    }

    /// Fetch the page collection.
    pub fn get_pages(&self, call_config: Option<&Config>) -> Dispatch {
        self.fetch_items::<&str>(None, call_config, CallKind::Pages)
    }

    /// Shared dispatch routine behind every getter.
    ///
    /// Builds each path from the merged configuration, then spawns one task
    /// per path that awaits the transport and publishes exactly one event.
    /// Ids are ignored for collection calls.
    #[instrument(skip_all, fields(kind = %kind))]
    pub fn fetch_items<I: AsRef<str>>(
        &self,
        ids: Option<&[I]>,
        call_config: Option<&Config>,
        kind: CallKind,
    ) -> Dispatch {
        let descriptor = kind.descriptor();
        let effective = self.effective_config(call_config);

        let missing = descriptor.missing_keys(&effective);
        if !missing.is_empty() {
            warn!(?missing, "configuration keys missing, rendering them empty");
        }

        let requests: Vec<(Option<String>, String)> = match descriptor.shape {
            PathShape::Collection(build) => vec![(None, build(&effective))],
            PathShape::Item(build) => ids
                .unwrap_or_default()
                .iter()
                .map(|id| {
                    let id = id.as_ref();
                    (Some(id.to_string()), build(&effective, id))
                })
                .collect(),
        };

        debug!(requests = requests.len(), "dispatching");

        let mut paths = Vec::with_capacity(requests.len());
        let mut handles = Vec::with_capacity(requests.len());
        let mut rejected = 0;
        let runtime = self.runtime.clone().or_else(|| Handle::try_current().ok());
        for (id, path) in requests {
            debug!(id = ?id, path = %redact(&path), "request built");
            paths.push(path.clone());
            match &runtime {
                Some(runtime) => handles.push(self.spawn_request(runtime, kind, id, path)),
                None => {
                    let error = FtApiError::Runtime(
                        "no Tokio runtime to run the request on".to_string(),
                    );
                    warn!(%kind, id = ?id, %error, "request not dispatched");
                    self.sink.publish(ContentEvent::Error {
                        kind,
                        id,
                        error,
                        received_at: Utc::now(),
                    });
                    rejected += 1;
                }
            }
        }

        Dispatch {
            kind,
            paths,
            handles,
            rejected,
        }
    }

    fn spawn_request(
        &self,
        runtime: &Handle,
        kind: CallKind,
        id: Option<String>,
        path: String,
    ) -> JoinHandle<bool> {
        let transport = Arc::clone(&self.transport);
        let sink = Arc::clone(&self.sink);

        runtime.spawn(async move {
            let result = transport.request(&path).await;
            let received_at = Utc::now();
            match result {
                Ok(data) => {
                    sink.publish(ContentEvent::ItemReceived {
                        kind,
                        id,
                        data,
                        received_at,
                    });
                    true
                }
                Err(error) => {
                    warn!(%kind, id = ?id, %error, "request failed");
                    sink.publish(ContentEvent::Error {
                        kind,
                        id,
                        error,
                        received_at,
                    });
                    false
                }
            }
        })
    }
}
