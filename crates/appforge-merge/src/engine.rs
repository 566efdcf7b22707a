//! Merge engine actor
//!
//! The engine owns the session on a spawned task. Handles send commands over
//! an unbounded channel and receive replies through [`Ticket`]s:
//! - Commands run one at a time in the order they were sent
//! - Anything other than a baseline load waits in a FIFO until a baseline exists
//! - A load requested while another is in flight joins the in-flight load

use crate::config::{AppForgeConfig, PolicyConfig};
use crate::error::EngineError;
use crate::event::{EventSink, MergeEvent};
use crate::report::MergeReport;
use crate::policy::MergePolicyResolver;
use crate::session::MergeSession;
use appforge_extract::{ExtractionAudit, ResponseExtractor};
use appforge_files::{FileSet, OrganizedView};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

type Reply<T> = oneshot::Sender<Result<T, EngineError>>;
type BaselineSource = BoxFuture<'static, Result<FileSet, String>>;

/// Pending reply from the engine task
///
/// The command is already queued when the ticket is created, so dropping a
/// ticket does not cancel the work.
#[derive(Debug)]
#[must_use = "tickets resolve to the engine's reply"]
pub struct Ticket<T> {
    rx: oneshot::Receiver<Result<T, EngineError>>,
}

impl<T> Future for Ticket<T> {
    type Output = Result<T, EngineError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|reply| reply.unwrap_or_else(|_| Err(EngineError::Stopped)))
    }
}

/// Extraction audit and merge report for one raw response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseMerge {
    /// What the extractor skipped or deduplicated
    pub audit: ExtractionAudit,
    /// What the merge did
    pub report: MergeReport,
}

enum Command {
    LoadBaseline {
        source: BaselineSource,
        reply: Reply<()>,
    },
    Merge {
        incoming: FileSet,
        reply: Reply<MergeReport>,
    },
    MergeResponse {
        blob: String,
        reply: Reply<ResponseMerge>,
    },
    MergedFiles {
        reply: Reply<FileSet>,
    },
    LatestReport {
        reply: Reply<Option<MergeReport>>,
    },
    OrganizedView {
        reply: Reply<OrganizedView>,
    },
}

/// Engine builder
#[derive(Debug, Default)]
pub struct MergeEngine {
    policy: PolicyConfig,
    resolver: Option<MergePolicyResolver>,
    extractor: ResponseExtractor,
    events: EventSink,
}

impl MergeEngine {
    /// Create builder with default policy and extractor
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// From a loaded configuration file
    #[must_use]
    pub fn from_config(config: AppForgeConfig) -> Self {
        Self {
            policy: config.policy,
            resolver: None,
            extractor: ResponseExtractor::with_config(config.extractor),
            events: EventSink::disabled(),
        }
    }

    /// With policy configuration
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    /// With a custom policy table; union sections still come from the policy configuration
    #[inline]
    #[must_use]
    pub fn with_resolver(mut self, resolver: MergePolicyResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// With extractor used by [`MergeEngineHandle::merge_response`]
    #[inline]
    #[must_use]
    pub fn with_extractor(mut self, extractor: ResponseExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// With event sink
    #[inline]
    #[must_use]
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Spawn the engine task on the current tokio runtime
    #[must_use]
    pub fn spawn(self) -> MergeEngineHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = EngineState {
            policy: self.policy,
            resolver: self.resolver,
            extractor: self.extractor,
            events: self.events,
            session: None,
            loading: None,
            load_waiters: Vec::new(),
            pending: VecDeque::new(),
        };
        tokio::spawn(state.run(rx));
        MergeEngineHandle { tx }
    }
}

/// Cloneable handle to a running engine
///
/// The task exits once every handle is dropped and outstanding work is done.
#[derive(Debug, Clone)]
pub struct MergeEngineHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::LoadBaseline { .. } => "LoadBaseline",
            Self::Merge { .. } => "Merge",
            Self::MergeResponse { .. } => "MergeResponse",
            Self::MergedFiles { .. } => "MergedFiles",
            Self::LatestReport { .. } => "LatestReport",
            Self::OrganizedView { .. } => "OrganizedView",
        })
    }
}

impl MergeEngineHandle {
    fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Ticket<T> {
        let (reply, rx) = oneshot::channel();
        // A closed engine drops the command and its reply, which the ticket reports as stopped.
        let _ = self.tx.send(command(reply));
        Ticket { rx }
    }

    /// Seed the engine with a ready baseline
    ///
    /// Loading is one-time: once a baseline is installed, later loads resolve
    /// immediately and their files are ignored.
    pub fn load_baseline(&self, files: FileSet) -> Ticket<()> {
        self.load_baseline_with(async move { Ok::<_, Infallible>(files) })
    }

    /// Seed the engine from an asynchronous source such as a scaffold generator
    ///
    /// Operations sent while the source runs are queued and run in order
    /// once it completes. If it fails, callers waiting on the load get
    /// [`EngineError::BaselineLoad`] and queued operations stay queued for
    /// the next load.
    pub fn load_baseline_with<F, E>(&self, source: F) -> Ticket<()>
    where
        F: Future<Output = Result<FileSet, E>> + Send + 'static,
        E: Display,
    {
        let source = async move { source.await.map_err(|e| e.to_string()) }.boxed();
        self.request(|reply| Command::LoadBaseline { source, reply })
    }

    /// Merge an already-extracted batch
    pub fn merge(&self, incoming: FileSet) -> Ticket<MergeReport> {
        self.request(|reply| Command::Merge { incoming, reply })
    }

    /// Extract records from a raw model response and merge them
    pub fn merge_response(&self, blob: impl Into<String>) -> Ticket<ResponseMerge> {
        let blob = blob.into();
        self.request(|reply| Command::MergeResponse { blob, reply })
    }

    /// Snapshot of the working set
    pub fn merged_files(&self) -> Ticket<FileSet> {
        self.request(|reply| Command::MergedFiles { reply })
    }

    /// Report of the last successful merge
    pub fn latest_report(&self) -> Ticket<Option<MergeReport>> {
        self.request(|reply| Command::LatestReport { reply })
    }

    /// Working set paths grouped by top-level directory
    pub fn organized_view(&self) -> Ticket<OrganizedView> {
        self.request(|reply| Command::OrganizedView { reply })
    }
}

struct EngineState {
    policy: PolicyConfig,
    resolver: Option<MergePolicyResolver>,
    extractor: ResponseExtractor,
    events: EventSink,
    session: Option<MergeSession>,
    loading: Option<BaselineSource>,
    load_waiters: Vec<Reply<()>>,
    pending: VecDeque<Command>,
}

enum Step {
    Loaded(Result<FileSet, String>),
    Received(Option<Command>),
}

impl EngineState {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        let mut open = true;
        loop {
            let Some(mut load) = self.loading.take() else {
                if !open {
                    break;
                }
                match rx.recv().await {
                    Some(command) => self.handle(command),
                    None => break,
                }
                continue;
            };

            let step = tokio::select! {
                result = &mut load => Step::Loaded(result),
                command = rx.recv(), if open => Step::Received(command),
            };

            match step {
                Step::Loaded(result) => self.finish_load(result),
                Step::Received(command) => {
                    self.loading = Some(load);
                    match command {
                        Some(command) => self.handle(command),
                        None => open = false,
                    }
                }
            }
        }
        debug!(queued = self.pending.len(), "merge engine stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::LoadBaseline { source, reply } => {
                if self.session.is_some() {
                    debug!("baseline already loaded, ignoring repeated load");
                    let _ = reply.send(Ok(()));
                } else if self.loading.is_some() {
                    debug!("baseline load in flight, joining it");
                    self.load_waiters.push(reply);
                } else {
                    debug!("baseline load started");
                    self.loading = Some(source);
                    self.load_waiters.push(reply);
                }
            }
            command if self.session.is_none() => {
                debug!(command = ?command, "baseline not loaded, queueing");
                self.pending.push_back(command);
            }
            command => self.execute(command),
        }
    }

    fn finish_load(&mut self, result: Result<FileSet, String>) {
        let waiters = std::mem::take(&mut self.load_waiters);
        match result {
            Ok(files) => {
                info!(files = files.len(), queued = self.pending.len(), "baseline loaded");
                self.events.emit(MergeEvent::BaselineLoaded { files: files.len() });
                let mut session = MergeSession::with_policy(files, &self.policy).with_events(self.events.clone());
                if let Some(resolver) = &self.resolver {
                    session = session.with_resolver(resolver.clone());
                }
                self.session = Some(session);
                for waiter in waiters {
                    let _ = waiter.send(Ok(()));
                }
                while let Some(command) = self.pending.pop_front() {
                    self.execute(command);
                }
            }
            Err(message) => {
                warn!(error = %message, queued = self.pending.len(), "baseline load failed");
                for waiter in waiters {
                    let _ = waiter.send(Err(EngineError::BaselineLoad {
                        message: message.clone(),
                    }));
                }
            }
        }
    }

    fn execute(&mut self, command: Command) {
        let Some(session) = self.session.as_mut() else {
            self.pending.push_back(command);
            return;
        };

        match command {
            Command::LoadBaseline { reply, .. } => {
                let _ = reply.send(Ok(()));
            }
            Command::Merge { incoming, reply } => {
                let _ = reply.send(session.merge(&incoming).map_err(EngineError::from));
            }
            Command::MergeResponse { blob, reply } => {
                let extraction = self.extractor.extract_with_audit(&blob);
                let result = session
                    .merge_records(extraction.records)
                    .map(|report| ResponseMerge {
                        audit: extraction.audit,
                        report,
                    })
                    .map_err(EngineError::from);
                let _ = reply.send(result);
            }
            Command::MergedFiles { reply } => {
                let _ = reply.send(Ok(session.merged().clone()));
            }
            Command::LatestReport { reply } => {
                let _ = reply.send(Ok(session.latest_report().cloned()));
            }
            Command::OrganizedView { reply } => {
                let _ = reply.send(Ok(session.organized_view()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_test_utils::{file_set, minimal_baseline, responses};

    #[tokio::test]
    async fn reads_wait_for_the_baseline() {
        let engine = MergeEngine::new().spawn();
        let files = engine.merged_files();
        engine.load_baseline(minimal_baseline()).await.unwrap();
        assert_eq!(files.await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn repeated_loads_keep_the_first_baseline() {
        let engine = MergeEngine::new().spawn();
        engine.load_baseline(minimal_baseline()).await.unwrap();
        engine.load_baseline(file_set(&[("other.ts", "x")])).await.unwrap();

        let files = engine.merged_files().await.unwrap();
        assert!(files.contains("config.json"));
        assert!(!files.contains("other.ts"));
    }

    #[tokio::test]
    async fn failed_load_keeps_merges_queued() {
        let engine = MergeEngine::new().spawn();
        let failed = engine.load_baseline_with(async { Err::<FileSet, _>("scaffold crashed") });
        let merge = engine.merge(file_set(&[("screens/home.tsx", "new")]));

        let err = failed.await.unwrap_err();
        assert_eq!(
            err,
            EngineError::BaselineLoad {
                message: "scaffold crashed".into()
            }
        );

        engine.load_baseline(minimal_baseline()).await.unwrap();
        let report = merge.await.unwrap();
        assert_eq!(report.replaced.len(), 1);
    }

    #[tokio::test]
    async fn merge_response_reports_the_audit() {
        let engine = MergeEngine::new().spawn();
        engine.load_baseline(minimal_baseline()).await.unwrap();

        let merged = engine.merge_response(responses::BASIC_SCENARIO).await.unwrap();
        assert_eq!(merged.audit.strategy, Some("marker_blocks"));
        assert_eq!(merged.report.summary(), "1 added, 1 replaced, 0 kept");
        assert_eq!(engine.latest_report().await.unwrap(), Some(merged.report));
    }

    #[tokio::test]
    async fn organized_view_groups_the_working_set() {
        let engine = MergeEngine::new().spawn();
        engine.load_baseline(minimal_baseline()).await.unwrap();
        let view = engine.organized_view().await.unwrap();
        let groups: Vec<_> = view.group_names().collect();
        assert_eq!(groups, vec![".", "screens"]);
    }
}
