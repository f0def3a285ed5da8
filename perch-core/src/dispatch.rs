use std::sync::OnceLock;
use tokio::runtime::{Builder, Handle, Runtime};

/// Worker threads in the runtime used when no tokio runtime is running.
const FALLBACK_WORKERS: usize = 4;

static FALLBACK: OnceLock<Option<Runtime>> = OnceLock::new();

/// Where observer notifications run.
///
/// Every notification is fire-and-forget: the assigning thread schedules it and
/// moves on. Handlers may run concurrently with each other and with later
/// assignments.
#[derive(Clone, Debug, Default)]
pub enum Dispatcher {
    /// Spawn onto the tokio runtime the caller is running in. Outside a runtime,
    /// notifications go to a process-wide runtime built on first use.
    #[default]
    Ambient,
    /// Always spawn onto this runtime, wherever the assignment happens.
    Handle(Handle),
}

impl Dispatcher {
    /// Pin dispatch to a specific runtime.
    pub fn handle(handle: Handle) -> Self {
        Dispatcher::Handle(handle)
    }

    /// Schedule `job` without waiting for it.
    pub(crate) fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Dispatcher::Handle(handle) => {
                handle.spawn(async move { job() });
            }
            Dispatcher::Ambient => match Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move { job() });
                }
                Err(_) => match fallback() {
                    Some(handle) => {
                        handle.spawn(async move { job() });
                    }
                    None => {
                        tracing::error!(
                            target: "perch-core::Dispatch",
                            "dropping notification: no runtime"
                        );
                    }
                },
            },
        }
    }
}

/// Handle to the shared runtime, or `None` if it could not be built.
fn fallback() -> Option<&'static Handle> {
    FALLBACK
        .get_or_init(|| {
            tracing::debug!(
                target: "perch-core::Dispatch",
                "no tokio runtime; starting fallback runtime"
            );
            Builder::new_multi_thread()
                .worker_threads(FALLBACK_WORKERS)
                .thread_name("perch-dispatch")
                .build()
                .map_err(|err| {
                    tracing::error!(
                        target: "perch-core::Dispatch",
                        "fallback runtime failed: {}",
                        err
                    );
                })
                .ok()
        })
        .as_ref()
        .map(Runtime::handle)
}
