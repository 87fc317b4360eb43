use std::fmt::Debug;
use std::fmt::Display;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::trace;

use super::RecognitionListener;
use crate::alias::IOF;
use crate::ExecutionContext;
use crate::Job;
use crate::Recognition;
use crate::RecognitionDispatcher;
use crate::Result;
use crate::TypeConfig;

/// Registration token of one listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl Display for ListenerHandle {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

struct ListenerEntry<T>
where
    T: TypeConfig,
{
    handle: ListenerHandle,
    listener: Arc<dyn RecognitionListener<T>>,
}

impl<T> Clone for ListenerEntry<T>
where
    T: TypeConfig,
{
    fn clone(&self) -> Self {
        Self {
            handle: self.handle,
            listener: self.listener.clone(),
        }
    }
}

/// Same allocation, regardless of the vtable the pointer was coerced with
fn same_listener<T>(
    a: &Arc<dyn RecognitionListener<T>>,
    b: &Arc<dyn RecognitionListener<T>>,
) -> bool
where
    T: TypeConfig,
{
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Immutable, point-in-time view of the registered listeners
pub struct ListenerSnapshot<T>
where
    T: TypeConfig,
{
    entries: Arc<Vec<ListenerEntry<T>>>,
}

impl<T> ListenerSnapshot<T>
where
    T: TypeConfig,
{
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handles in delivery order
    pub fn handles(&self) -> Vec<ListenerHandle> {
        self.entries.iter().map(|e| e.handle).collect()
    }

    /// Invokes every snapshotted listener, in registration order, on the
    /// current thread.
    pub fn deliver(
        &self,
        source: &RecognitionDispatcher<T>,
        input: &IOF<T>,
        recognition: &Recognition<T>,
    ) {
        for entry in self.entries.iter() {
            entry.listener.on_result(source, input, recognition);
        }
    }
}

/// Thread-safe set of listeners with snapshot delivery
///
/// Readers load the current list without locking. Writers are serialized and
/// publish a fresh list, so a notification round in flight keeps delivering
/// to the listeners it started with.
pub struct ListenerRegistry<T>
where
    T: TypeConfig,
{
    entries: ArcSwap<Vec<ListenerEntry<T>>>,
    writer: Mutex<()>,
    next_id: AtomicU64,
}

impl<T> Debug for ListenerRegistry<T>
where
    T: TypeConfig,
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry").field("len", &self.len()).finish()
    }
}

impl<T> Default for ListenerRegistry<T>
where
    T: TypeConfig,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListenerRegistry<T>
where
    T: TypeConfig,
{
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(Vec::new()),
            writer: Mutex::new(()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers `listener`.
    ///
    /// Adding the same listener allocation again returns its existing handle
    /// and does not register a second entry.
    pub fn add(
        &self,
        listener: Arc<dyn RecognitionListener<T>>,
    ) -> ListenerHandle {
        let _guard = self.writer.lock();
        let current = self.entries.load_full();

        if let Some(existing) = current.iter().find(|e| same_listener(&e.listener, &listener)) {
            trace!(handle = %existing.handle, "Listener already registered");
            return existing.handle;
        }

        let handle = ListenerHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(ListenerEntry { handle, listener });
        self.entries.store(Arc::new(next));

        trace!(handle = %handle, listeners = current.len() + 1, "Listener registered");
        handle
    }

    /// Unregisters the listener behind `handle`. Unknown handles are ignored.
    pub fn remove(
        &self,
        handle: ListenerHandle,
    ) -> bool {
        let _guard = self.writer.lock();
        let current = self.entries.load_full();

        let Some(position) = current.iter().position(|e| e.handle == handle) else {
            return false;
        };

        let mut next: Vec<ListenerEntry<T>> = current.iter().cloned().collect();
        next.remove(position);
        let remaining = next.len();
        self.entries.store(Arc::new(next));

        trace!(handle = %handle, listeners = remaining, "Listener removed");
        true
    }

    pub fn contains(
        &self,
        handle: ListenerHandle,
    ) -> bool {
        self.entries.load().iter().any(|e| e.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> ListenerSnapshot<T> {
        ListenerSnapshot {
            entries: self.entries.load_full(),
        }
    }

    /// Delivers `(input, recognition)` to the current snapshot on `context`.
    ///
    /// With `wait` the call returns only after every snapshotted listener ran.
    /// An empty registry skips the handoff entirely.
    pub fn notify_all(
        &self,
        source: &RecognitionDispatcher<T>,
        input: IOF<T>,
        recognition: Recognition<T>,
        context: &dyn ExecutionContext,
        wait: bool,
    ) -> Result<()> {
        let snapshot = self.snapshot();
        if snapshot.is_empty() {
            trace!(context = context.name(), "No listeners to notify");
            return Ok(());
        }

        trace!(
            context = context.name(),
            listeners = snapshot.len(),
            wait,
            "Notifying listeners"
        );

        let source = source.clone();
        let job: Job = Box::new(move || snapshot.deliver(&source, &input, &recognition));
        if wait {
            context.execute_and_wait(job)?;
        } else {
            context.execute(job)?;
        }
        Ok(())
    }
}
