//! Synchronization Controller
//!
//! Drives the collection through `Uninitialized -> Loading -> Ready`, runs
//! toggle/delete mutations through the service, and reconciles the cache
//! from the server's answers. Everything lives on one cooperative executor,
//! so state sits in `Cell`/`RefCell` and no borrow is held across an await.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use futures::lock::{Mutex, OwnedMutexGuard};

use crate::api::TaskService;
use crate::cache::TaskCache;
use crate::error::{SyncError, SyncResult};
use crate::models::{Snapshot, Task, TaskId};

/// What happens to a mutation aimed at a task that already has one in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationPolicy {
    /// Wait until the earlier mutation has resolved, then run.
    #[default]
    Queue,
    /// Fail immediately with `SyncError::ConcurrentMutation`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    /// The last fetch failed; whatever the cache holds is not current.
    Failed(SyncError),
}

/// Everything a view needs to render.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncStatus {
    pub phase: Phase,
    pub tasks: Option<Snapshot>,
    /// Tasks with a mutation running or queued, sorted by id.
    pub pending: Vec<TaskId>,
}

type Listener = Box<dyn Fn(&SyncStatus)>;

struct Inner<S> {
    service: S,
    policy: MutationPolicy,
    cache: RefCell<TaskCache>,
    phase: RefCell<Phase>,
    /// One gate per task with a mutation running or queued.
    gates: RefCell<HashMap<TaskId, Arc<Mutex<()>>>>,
    attached: Cell<bool>,
    listeners: RefCell<Vec<Listener>>,
}

/// Cheap-to-clone handle; clones share the same cache and state.
pub struct SyncController<S> {
    inner: Rc<Inner<S>>,
}

impl<S> Clone for SyncController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: TaskService> SyncController<S> {
    pub fn new(service: S, policy: MutationPolicy) -> Self {
        Self {
            inner: Rc::new(Inner {
                service,
                policy,
                cache: RefCell::new(TaskCache::new()),
                phase: RefCell::new(Phase::Uninitialized),
                gates: RefCell::new(HashMap::new()),
                attached: Cell::new(true),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase.borrow().clone()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.inner.cache.borrow().get()
    }

    pub fn pending(&self) -> Vec<TaskId> {
        let mut pending: Vec<TaskId> = self
            .inner
            .gates
            .borrow()
            .iter()
            .filter(|(_, gate)| Arc::strong_count(gate) > 1)
            .map(|(id, _)| id.clone())
            .collect();
        pending.sort();
        pending
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            phase: self.phase(),
            tasks: self.snapshot(),
            pending: self.pending(),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.inner.attached.get()
    }

    /// Register a listener called with the new status after every change.
    pub fn subscribe(&self, listener: impl Fn(&SyncStatus) + 'static) {
        self.inner.listeners.borrow_mut().push(Box::new(listener));
    }

    /// The owning view is gone: outstanding results are dropped on arrival
    /// and every later request fails with `Detached`.
    pub fn detach(&self) {
        self.inner.attached.set(false);
        if let Ok(mut listeners) = self.inner.listeners.try_borrow_mut() {
            listeners.clear();
        }
        log::debug!("sync controller detached");
    }

    /// Fetch the collection if it has never been requested. Any other phase
    /// is a cache hit; a failed fetch is only retried through `reload`.
    pub async fn load(&self) -> SyncResult<()> {
        self.ensure_attached()?;
        if *self.inner.phase.borrow() != Phase::Uninitialized {
            return Ok(());
        }
        self.fetch().await
    }

    /// Explicit refetch, e.g. the retry affordance after a failure.
    pub async fn reload(&self) -> SyncResult<()> {
        self.ensure_attached()?;
        if *self.inner.phase.borrow() == Phase::Loading {
            return Ok(());
        }
        self.fetch().await
    }

    /// Toggle on the server, then reconcile the cache from the returned record.
    pub async fn request_toggle(&self, id: &TaskId) -> SyncResult<Task> {
        let _slot = self.begin_mutation(id).await?;

        log::debug!("toggling task {}", id);
        let result = self.inner.service.toggle(id).await;
        self.ensure_attached()?;

        let task = result.inspect_err(|err| log::warn!("toggle of task {} failed: {}", id, err))?;
        if task.id != *id {
            log::warn!("toggle of task {} answered with record {}", id, task.id);
        }
        if !self.inner.cache.borrow_mut().apply_update(&task) {
            log::debug!("toggled task {} is no longer cached", task.id);
        }
        Ok(task)
    }

    /// Delete on the server, then drop the task from the cache. A task that
    /// is already absent is a successful no-op without a request.
    pub async fn request_delete(&self, id: &TaskId) -> SyncResult<()> {
        self.ensure_ready()?;
        if !self.inner.cache.borrow().contains(id) {
            log::debug!("task {} already absent, nothing to delete", id);
            return Ok(());
        }

        let _slot = self.begin_mutation(id).await?;
        // A queued delete can find its task removed by the one before it.
        if !self.inner.cache.borrow().contains(id) {
            return Ok(());
        }

        log::debug!("deleting task {}", id);
        let result = self.inner.service.delete(id).await;
        self.ensure_attached()?;

        result.inspect_err(|err| log::warn!("delete of task {} failed: {}", id, err))?;
        self.inner.cache.borrow_mut().apply_delete(id);
        Ok(())
    }

    async fn fetch(&self) -> SyncResult<()> {
        self.set_phase(Phase::Loading);
        log::info!("fetching task collection");

        let result = self.inner.service.fetch_all().await;
        if !self.is_attached() {
            log::debug!("discarding fetch result for detached view");
            return Err(SyncError::Detached);
        }

        match result {
            Ok(tasks) => {
                log::info!("loaded {} task(s)", tasks.len());
                self.inner.cache.borrow_mut().replace(tasks);
                self.set_phase(Phase::Ready);
                Ok(())
            }
            Err(err) => {
                log::error!("failed to fetch task collection: {}", err);
                self.set_phase(Phase::Failed(err.clone()));
                Err(err)
            }
        }
    }

    /// Claim the per-task gate according to the mutation policy.
    async fn begin_mutation(&self, id: &TaskId) -> SyncResult<MutationSlot<'_, S>> {
        self.ensure_ready()?;

        let gate = self.gate(id);
        let guard = match self.inner.policy {
            MutationPolicy::Queue => Arc::clone(&gate).lock_owned().await,
            MutationPolicy::Reject => gate
                .try_lock_owned()
                .ok_or_else(|| SyncError::ConcurrentMutation(id.clone()))?,
        };
        drop(gate);

        let slot = MutationSlot {
            controller: self,
            id: id.clone(),
            guard: Some(guard),
        };
        self.notify();

        // The collection may have been reloaded or detached while queued.
        self.ensure_ready()?;
        Ok(slot)
    }

    fn gate(&self, id: &TaskId) -> Arc<Mutex<()>> {
        let mut gates = self.inner.gates.borrow_mut();
        Arc::clone(
            gates
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    fn release(&self, id: &TaskId) {
        {
            let mut gates = self.inner.gates.borrow_mut();
            if gates.get(id).is_some_and(|gate| Arc::strong_count(gate) == 1) {
                gates.remove(id);
            }
        }
        self.notify();
    }

    fn ensure_attached(&self) -> SyncResult<()> {
        if self.is_attached() {
            Ok(())
        } else {
            Err(SyncError::Detached)
        }
    }

    fn ensure_ready(&self) -> SyncResult<()> {
        self.ensure_attached()?;
        if *self.inner.phase.borrow() == Phase::Ready {
            Ok(())
        } else {
            Err(SyncError::NotReady)
        }
    }

    fn set_phase(&self, phase: Phase) {
        *self.inner.phase.borrow_mut() = phase;
        self.notify();
    }

    fn notify(&self) {
        if !self.is_attached() {
            return;
        }
        let status = self.status();
        for listener in self.inner.listeners.borrow().iter() {
            listener(&status);
        }
    }
}

/// Held for the duration of one mutation; releases the task's gate on drop.
struct MutationSlot<'a, S: TaskService> {
    controller: &'a SyncController<S>,
    id: TaskId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<S: TaskService> Drop for MutationSlot<'_, S> {
    fn drop(&mut self) {
        // Unlock first so the gate's reference count reflects only waiters.
        self.guard.take();
        self.controller.release(&self.id);
    }
}
