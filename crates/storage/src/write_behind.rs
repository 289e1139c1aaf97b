//! Background saver for annotation snapshots
//!
//! Callers hand over a full snapshot after every mutation and move on. A single
//! worker thread writes snapshots in submission order; if a document gets a
//! newer snapshot before its pending one is written, only the newest is kept.
//! Failed writes are logged and not retried, the caller's in-memory set stays
//! authoritative.

use crate::{AnnotationRepository, DocumentKey, KeyValueBackend};
use doc_model::AnnotationSet;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

/// Counters for completed write attempts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub written: u64,
    pub failed: u64,
    /// Snapshots replaced by a newer one before being written
    pub coalesced: u64,
}

#[derive(Debug, Default)]
struct Queue {
    order: VecDeque<DocumentKey>,
    snapshots: HashMap<DocumentKey, AnnotationSet>,
    in_flight: bool,
    stopping: bool,
    stats: WriteStats,
}

#[derive(Debug, Default)]
struct Shared {
    queue: Mutex<Queue>,
    changed: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, Queue>) -> MutexGuard<'a, Queue> {
        self.changed.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct WriteBehind {
    shared: Arc<Shared>,
    worker: Option<thread::JoinHandle<()>>,
}

impl WriteBehind {
    /// Start the worker thread writing through `repository`
    pub fn spawn<B>(repository: Arc<AnnotationRepository<B>>) -> std::io::Result<Self>
    where
        B: KeyValueBackend + 'static,
    {
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);

        let worker = thread::Builder::new()
            .name("annotation-writer".to_owned())
            .spawn(move || run_worker(&worker_shared, &repository))?;

        Ok(Self { shared, worker: Some(worker) })
    }

    /// Queue a snapshot for writing without waiting for it
    pub fn submit(&self, key: DocumentKey, set: AnnotationSet) {
        let mut queue = self.shared.lock();
        if queue.snapshots.insert(key.clone(), set).is_some() {
            queue.stats.coalesced += 1;
        } else {
            queue.order.push_back(key);
        }
        drop(queue);
        self.shared.changed.notify_all();
    }

    /// Block until every submitted snapshot has been attempted
    pub fn flush(&self) {
        let mut queue = self.shared.lock();
        while !queue.order.is_empty() || queue.in_flight {
            queue = self.shared.wait(queue);
        }
    }

    pub fn stats(&self) -> WriteStats {
        self.shared.lock().stats
    }
}

impl Drop for WriteBehind {
    fn drop(&mut self) {
        self.shared.lock().stopping = true;
        self.shared.changed.notify_all();

        // The worker drains the queue before it exits
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("annotation writer thread panicked");
            }
        }
    }
}

fn run_worker<B: KeyValueBackend>(shared: &Shared, repository: &AnnotationRepository<B>) {
    loop {
        let mut queue = shared.lock();
        while queue.order.is_empty() && !queue.stopping {
            queue = shared.wait(queue);
        }

        let Some(key) = queue.order.pop_front() else {
            // Stopping with nothing left to write
            return;
        };
        let Some(snapshot) = queue.snapshots.remove(&key) else {
            continue;
        };
        queue.in_flight = true;
        drop(queue);

        let result = repository.save(&key, &snapshot);

        let mut queue = shared.lock();
        queue.in_flight = false;
        match result {
            Ok(()) => queue.stats.written += 1,
            Err(err) => {
                queue.stats.failed += 1;
                log::warn!("failed to save annotations for {key}: {err}");
            }
        }
        drop(queue);
        shared.changed.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryBackend, StorageError};
    use doc_model::{AnnotatorConfig, Color, Point, Stroke};

    fn set_with_strokes(count: usize) -> AnnotationSet {
        let mut set = AnnotationSet::new();
        for index in 0..count {
            set.add_stroke(Stroke {
                id: format!("s{index}").into(),
                points: vec![Point::new(0.0, 0.0), Point::new(index as f32, 1.0)],
                color: Color::BLACK,
                page: 1,
                width: 3.0,
            });
        }
        set
    }

    fn repository<B: KeyValueBackend>(backend: B) -> Arc<AnnotationRepository<B>> {
        Arc::new(AnnotationRepository::new(backend, &AnnotatorConfig::default()))
    }

    fn spawn<B>(repository: &Arc<AnnotationRepository<B>>) -> WriteBehind
    where
        B: KeyValueBackend + 'static,
    {
        WriteBehind::spawn(Arc::clone(repository)).expect("writer thread should start")
    }

    #[test]
    fn flush_persists_latest_snapshot() {
        let repository = repository(MemoryBackend::new());
        let writer = spawn(&repository);
        let key = DocumentKey::from_uri("doc.pdf");

        for count in 1..=5 {
            writer.submit(key.clone(), set_with_strokes(count));
        }
        writer.flush();

        assert!(repository.load(&key).same_content(&set_with_strokes(5)));
        let stats = writer.stats();
        assert_eq!(stats.written + stats.coalesced, 5);
        assert_eq!(stats.failed, 0);
    }

    #[test]
    fn drop_drains_pending_writes() {
        let repository = repository(MemoryBackend::new());
        let first = DocumentKey::from_uri("first.pdf");
        let second = DocumentKey::from_uri("second.pdf");

        {
            let writer = spawn(&repository);
            writer.submit(first.clone(), set_with_strokes(1));
            writer.submit(second.clone(), set_with_strokes(2));
        }

        assert_eq!(repository.load(&first).strokes().len(), 1);
        assert_eq!(repository.load(&second).strokes().len(), 2);
    }

    struct FailingBackend;

    impl KeyValueBackend for FailingBackend {
        fn read(&self, _key: &DocumentKey) -> Result<Option<Vec<u8>>, StorageError> {
            Ok(None)
        }

        fn write(&self, _key: &DocumentKey, _bytes: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")))
        }

        fn remove(&self, _key: &DocumentKey) -> Result<(), StorageError> {
            Ok(())
        }

        fn keys(&self) -> Result<Vec<DocumentKey>, StorageError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn failed_writes_are_counted_not_retried() {
        let writer = spawn(&repository(FailingBackend));

        writer.submit(DocumentKey::from_uri("doc.pdf"), set_with_strokes(1));
        writer.flush();

        assert_eq!(writer.stats(), WriteStats { written: 0, failed: 1, coalesced: 0 });
    }
}
