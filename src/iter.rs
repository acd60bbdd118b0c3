use crate::shard::Shard;
use crate::tuple::Tuple;
use crossbeam_channel::{Receiver, Sender};
use std::iter::FusedIterator;

/// Every entry of a map, gathered by a concurrent fan-out over its shards.
///
/// One rayon task per shard pushes that shard's snapshot into an unbounded
/// channel. Construction returns once every task has finished and every
/// sender is gone, so draining never waits on a producer and the iterator
/// always terminates. Entries arrive in no particular order.
pub struct Range<V> {
    entries: Receiver<Tuple<V>>,
}

impl<V> Range<V>
where
    V: Send + Sync + 'static,
{
    pub(crate) fn collect(shards: &[Box<dyn Shard<V>>]) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();

        rayon::scope(|scope| {
            for shard in shards {
                let tx: Sender<Tuple<V>> = tx.clone();
                scope.spawn(move |_| {
                    for tuple in shard.all().values() {
                        // rx is held by this function, so the channel is open
                        if tx.send(tuple.clone()).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(tx);

        Self { entries: rx }
    }
}

impl<V> Iterator for Range<V> {
    type Item = Tuple<V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.try_recv().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len();
        (remaining, Some(remaining))
    }
}

impl<V> ExactSizeIterator for Range<V> {}

impl<V> FusedIterator for Range<V> {}

/// Lazy iterator that walks the shards in order, snapshotting each one only
/// when the previous shard's entries are exhausted.
///
/// Each shard is seen as a consistent snapshot, but different shards are
/// captured at different instants, so writes made during iteration may or
/// may not appear.
pub struct Iter<'a, V> {
    shards: &'a [Box<dyn Shard<V>>],
    current_shard: usize,
    buffer: std::vec::IntoIter<Tuple<V>>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(shards: &'a [Box<dyn Shard<V>>]) -> Self {
        Self {
            shards,
            current_shard: 0,
            buffer: Vec::new().into_iter(),
        }
    }

    /// Refill the buffer from the next non-empty shard.
    fn fill_buffer(&mut self) -> bool {
        while self.current_shard < self.shards.len() {
            let snapshot = self.shards[self.current_shard].all();
            self.current_shard += 1;

            if !snapshot.is_empty() {
                self.buffer = snapshot.values().cloned().collect::<Vec<_>>().into_iter();
                return true;
            }
        }
        false
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = Tuple<V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tuple) = self.buffer.next() {
                return Some(tuple);
            }
            if !self.fill_buffer() {
                return None;
            }
        }
    }
}

impl<'a, V> FusedIterator for Iter<'a, V> {}
