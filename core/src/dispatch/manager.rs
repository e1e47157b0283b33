//! dispatch/manager.rs
//! Job lifecycle and the fallback loop.
//!
//! A submit either continues a registered decompress job on the handler it
//! is bound to, or creates a job and walks the policy's candidate list until
//! one handler accepts it. Skip-class handler errors move on to the next
//! candidate; any other error aborts the call after the handler's partial
//! state for the job is released.
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{debug, info, trace, warn};

use crate::config::ManagerConfig;
use crate::dispatch::ids::JobIdAllocator;
use crate::dispatch::job::{Buffer, Completion, Endpoint, Job, JobParams, Submission};
use crate::scheduler::{buffer_size_policy, PolicyFn, PolicyParameters};
use crate::strategy::{
    AnalyticsHandler, Handler, HandlerError, IsaHandler, JobRequest, OffloadHandler, SoftwareHandler, StrategyType,
    Work,
};
use crate::telemetry::DispatchCounters;
use crate::types::{Direction, DispatchError, JobId, Result};

fn relock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pair the call's buffer with the job's endpoint.
fn work<'a>(buffer: Buffer<'a>, endpoint: &'a Endpoint) -> Result<Work<'a>> {
    match (buffer, endpoint) {
        (Buffer::Input(input), Endpoint::Sink(sink)) => Ok(Work::Compress { input, sink }),
        (Buffer::Output(output), Endpoint::Source(source)) => Ok(Work::Decompress { output, source }),
        (buffer, endpoint) => Err(DispatchError::BufferMismatch { direction: endpoint.direction(), buffer: buffer.kind() }),
    }
}

pub struct Manager {
    bank: Vec<StrategyType>,
    available: RwLock<Vec<StrategyType>>,
    policy: RwLock<PolicyFn>,

    offload: OffloadHandler,
    analytics: AnalyticsHandler,
    isa: IsaHandler,
    software: SoftwareHandler,

    jobs: Mutex<HashMap<JobId, Job>>,
    ids: JobIdAllocator,
    counters: Mutex<DispatchCounters>,
}

impl Manager {
    pub fn new(config: ManagerConfig) -> Result<Self> {
        config.validate()?;
        info!(
            strategies = ?config.strategies,
            threshold = config.size_threshold,
            offload_mode = ?config.offload_mode,
            "dispatch manager ready"
        );
        Ok(Self::build(config))
    }

    fn build(config: ManagerConfig) -> Self {
        Self {
            available: RwLock::new(config.strategies.clone()),
            policy: RwLock::new(buffer_size_policy(config.size_threshold)),
            offload: OffloadHandler::new(
                config.offload.installed,
                config.capacity(StrategyType::Offload),
                config.offload_mode,
                config.session_buffer_size,
            ),
            analytics: AnalyticsHandler::new(config.analytics.installed, config.capacity(StrategyType::Analytics)),
            isa: IsaHandler::new(config.isa.installed, config.capacity(StrategyType::Isa)),
            software: SoftwareHandler::new(),
            jobs: Mutex::new(HashMap::new()),
            ids: JobIdAllocator::new(),
            counters: Mutex::new(DispatchCounters::default()),
            bank: config.strategies,
        }
    }

    pub fn handler(&self, strategy: StrategyType) -> &dyn Handler {
        match strategy {
            StrategyType::Offload => &self.offload,
            StrategyType::Analytics => &self.analytics,
            StrategyType::Isa => &self.isa,
            StrategyType::Software => &self.software,
        }
    }

    /// Strategies this manager was configured with.
    pub fn bank(&self) -> &[StrategyType] {
        &self.bank
    }

    /// Bank minus strategies found not installed.
    pub fn available_strategies(&self) -> Vec<StrategyType> {
        self.available.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn policy(&self) -> PolicyFn {
        self.policy.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set_policy(&self, policy: PolicyFn) {
        *self.policy.write().unwrap_or_else(PoisonError::into_inner) = policy;
    }

    /// Jobs registered between continuation calls.
    pub fn live_jobs(&self) -> usize {
        relock(&self.jobs).len()
    }

    /// Whether `id` is referenced by the registry or by any handler.
    pub fn is_live(&self, id: JobId) -> bool {
        relock(&self.jobs).contains_key(&id) || StrategyType::ALL.iter().any(|s| self.handler(*s).is_bound(id))
    }

    pub fn counters(&self) -> DispatchCounters {
        relock(&self.counters).clone()
    }

    fn count(&self, f: impl FnOnce(&mut DispatchCounters)) {
        f(&mut relock(&self.counters));
    }

    /// Submit with the manager's current policy.
    pub fn submit(&self, buffer: Buffer<'_>, params: &JobParams) -> Result<Submission> {
        let policy = self.policy();
        self.submit_with_policy(buffer, params, policy.as_ref())
    }

    /// Run one unit of work, choosing backends with `policy`.
    ///
    /// A decompress call whose `params.id` names a retained job continues on
    /// the backend that job is bound to, without consulting the policy.
    /// Anything else starts a new job and tries the policy's candidates in
    /// order, skipping backends that are full, missing or lack the algorithm.
    ///
    /// # Errors
    /// - `InvalidLevel` / `BufferMismatch` before any backend runs.
    /// - `InvalidStrategy` if the policy names a strategy outside the bank.
    /// - `NoWorkingStrategies` once every candidate was skipped.
    /// - `JobNotFound` if a continued job was released meanwhile.
    /// - `Handler` for codec or I/O failures. Partial backend state is released.
    pub fn submit_with_policy<P>(&self, buffer: Buffer<'_>, params: &JobParams, policy: &P) -> Result<Submission>
    where
        P: Fn(&PolicyParameters<'_>) -> Vec<StrategyType> + ?Sized,
    {
        let direction = params.direction();
        if direction == Direction::Compress {
            params.algorithm.validate_level(params.level)?;
        }
        let buffer_size = buffer.len();
        let work = work(buffer, &params.endpoint)?;

        if direction == Direction::Decompress {
            if let Some(id) = params.id {
                let bound = relock(&self.jobs).get(&id).map(|job| (job.strategy(), job.params.algorithm));
                if let Some((strategy, algorithm)) = bound {
                    let strategy = strategy.ok_or(DispatchError::JobNotFound(id))?;
                    let mut req = JobRequest { id, algorithm, level: params.level, work };
                    return self.continue_job(&mut req, strategy, buffer_size);
                }
            }
        }

        self.start_job(work, params, buffer_size, policy)
    }

    fn continue_job(&self, req: &mut JobRequest<'_>, strategy: StrategyType, buffer_size: usize) -> Result<Submission> {
        let id = req.id;
        let handler = self.handler(strategy);
        debug!(job = %id, %strategy, len = buffer_size, "continuation");

        let progress = match handler.resume(req) {
            Ok(p) => p,
            Err(HandlerError::JobNotFound { .. }) => {
                // released by another caller after the registry lookup
                relock(&self.jobs).remove(&id);
                return Err(DispatchError::JobNotFound(id));
            }
            Err(e) => {
                relock(&self.jobs).remove(&id);
                self.discard(id, handler);
                self.count(|c| c.failed_submissions += 1);
                return Err(e.into());
            }
        };

        if let Some(job) = relock(&self.jobs).get_mut(&id) {
            job.calls += 1;
            job.last_buffer_len = buffer_size;
        }
        self.count(|c| {
            c.continuations += 1;
            c.record_served(strategy, Direction::Decompress, progress.bytes);
        });

        if Completion::after(Direction::Decompress, progress.end_of_stream) == Completion::Finished {
            self.finish(id, handler)?;
        }
        Ok(Submission { bytes: progress.bytes, id, end_of_stream: progress.end_of_stream, strategy })
    }

    fn start_job<P>(&self, work: Work<'_>, params: &JobParams, buffer_size: usize, policy: &P) -> Result<Submission>
    where
        P: Fn(&PolicyParameters<'_>) -> Vec<StrategyType> + ?Sized,
    {
        let id = self.ids.allocate();
        let mut job = Job::new(id, params);
        let direction = job.direction();

        let available = self.available_strategies();
        let candidates = policy(&PolicyParameters { buffer_size, strategies: &available, params });
        debug!(
            job = %id,
            %direction,
            algorithm = %params.algorithm,
            len = buffer_size,
            ?candidates,
            "job created"
        );
        self.count(|c| c.jobs_created += 1);

        let mut req = JobRequest { id, algorithm: params.algorithm, level: params.level, work };
        for strategy in candidates {
            if !self.bank.contains(&strategy) {
                self.count(|c| c.failed_submissions += 1);
                return Err(DispatchError::InvalidStrategy(strategy));
            }
            let handler = self.handler(strategy);

            match handler.request(&mut req) {
                Ok(progress) => {
                    job.bind(strategy);
                    job.calls = 1;
                    job.last_buffer_len = buffer_size;
                    debug!(job = %id, %strategy, bytes = progress.bytes, "job bound");
                    self.count(|c| c.record_served(strategy, direction, progress.bytes));

                    match Completion::after(direction, progress.end_of_stream) {
                        Completion::Finished => self.finish(id, handler)?,
                        Completion::Retained => {
                            relock(&self.jobs).insert(id, job);
                        }
                    }
                    return Ok(Submission { bytes: progress.bytes, id, end_of_stream: progress.end_of_stream, strategy });
                }
                Err(e) if e.is_skippable() => {
                    trace!(job = %id, %strategy, error = %e, "candidate skipped");
                    self.count(|c| c.skipped_candidates += 1);
                    if matches!(e, HandlerError::NotInstalled(_)) {
                        self.disable(strategy);
                    }
                }
                Err(e) => {
                    debug!(job = %id, %strategy, error = %e, "job failed");
                    self.discard(id, handler);
                    self.count(|c| c.failed_submissions += 1);
                    return Err(e.into());
                }
            }
        }

        debug!(job = %id, "no working strategies");
        self.count(|c| c.failed_submissions += 1);
        Err(DispatchError::NoWorkingStrategies)
    }

    /// Tear down a job the caller no longer wants, typically a decompress
    /// stream abandoned before end-of-stream.
    pub fn release(&self, id: JobId) -> Result<()> {
        let job = relock(&self.jobs).remove(&id).ok_or(DispatchError::JobNotFound(id))?;
        let Some(strategy) = job.strategy() else {
            return Ok(());
        };

        match self.handler(strategy).release(id) {
            Ok(()) => {
                debug!(job = %id, %strategy, "job released");
                self.count(|c| c.jobs_abandoned += 1);
                Ok(())
            }
            Err(HandlerError::JobNotFound { .. }) => Err(DispatchError::JobNotFound(id)),
            Err(e @ HandlerError::SessionBusy { .. }) => {
                relock(&self.jobs).insert(id, job);
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Completion rule said `Finished`: release handler state and deregister.
    fn finish(&self, id: JobId, handler: &dyn Handler) -> Result<()> {
        match handler.release(id) {
            Ok(()) | Err(HandlerError::JobNotFound { .. }) => {}
            Err(HandlerError::SessionBusy { .. }) => {
                debug!(job = %id, "session still in use, release deferred");
                return Ok(());
            }
            Err(e) => {
                relock(&self.jobs).remove(&id);
                return Err(e.into());
            }
        }
        relock(&self.jobs).remove(&id);
        debug!(job = %id, strategy = %handler.strategy(), "job finished");
        self.count(|c| c.jobs_completed += 1);
        Ok(())
    }

    /// Best-effort cleanup after a hard error.
    fn discard(&self, id: JobId, handler: &dyn Handler) {
        if let Err(e) = handler.release(id) {
            if !e.is_job_not_found() {
                debug!(job = %id, error = %e, "cleanup after failure");
            }
        }
    }

    fn disable(&self, strategy: StrategyType) {
        let mut available = self.available.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(pos) = available.iter().position(|s| *s == strategy) {
            available.remove(pos);
            drop(available);
            warn!(%strategy, "strategy not installed, disabled");
            self.count(|c| c.disabled_strategies += 1);
        }
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::build(ManagerConfig::default())
    }
}
