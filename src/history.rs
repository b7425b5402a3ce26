// Bounded rolling history for charts: one FIFO ring per stream.

use crate::models::HistoryPoint;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Number of points kept per stream unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 60;

/// Fixed-capacity FIFO of timestamped values. Length never exceeds `capacity`;
/// timestamps are non-decreasing.
#[derive(Debug, Clone)]
pub struct HistoryRing<T> {
    points: VecDeque<HistoryPoint<T>>,
    capacity: usize,
}

impl<T: Clone> HistoryRing<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends at the tail, evicting the oldest point once full. A timestamp older than the
    /// newest point is raised to the newest so ordering holds.
    pub fn push(&mut self, timestamp: u64, value: T) {
        let timestamp = match self.points.back() {
            Some(last) if timestamp < last.timestamp => last.timestamp,
            _ => timestamp,
        };
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(HistoryPoint { timestamp, value });
    }

    /// Oldest-first copy of the retained points.
    pub fn snapshot(&self) -> Vec<HistoryPoint<T>> {
        self.points.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// History rings keyed by stream. Writers for one stream must be serialized by the caller.
#[derive(Debug)]
pub struct HistoryStore<K, T> {
    rings: HashMap<K, HistoryRing<T>>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, T: Clone> HistoryStore<K, T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            rings: HashMap::new(),
            capacity,
        }
    }

    pub fn push(&mut self, stream: &K, timestamp: u64, value: T) {
        if let Some(ring) = self.rings.get_mut(stream) {
            ring.push(timestamp, value);
            return;
        }
        let mut ring = HistoryRing::new(self.capacity);
        ring.push(timestamp, value);
        self.rings.insert(stream.clone(), ring);
    }

    /// Oldest-first points of `stream`; empty for an unknown stream.
    pub fn snapshot(&self, stream: &K) -> Vec<HistoryPoint<T>> {
        self.rings
            .get(stream)
            .map(HistoryRing::snapshot)
            .unwrap_or_default()
    }

    /// Drops every stream for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.rings.retain(|k, _| keep(k));
    }

    pub fn streams(&self) -> impl Iterator<Item = &K> {
        self.rings.keys()
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_five_pushes_keep_last_sixty_in_order() {
        let mut ring = HistoryRing::new(DEFAULT_CAPACITY);
        for ts in 1..=65u64 {
            ring.push(ts, ts as f64);
        }
        let points = ring.snapshot();
        assert_eq!(points.len(), 60);
        let timestamps: Vec<u64> = points.iter().map(|p| p.timestamp).collect();
        assert_eq!(timestamps, (6..=65).collect::<Vec<u64>>());
    }

    #[test]
    fn sixty_first_push_evicts_only_the_oldest() {
        let mut ring = HistoryRing::new(60);
        for i in 0..61u64 {
            ring.push(i, i);
        }
        let values: Vec<u64> = ring.snapshot().iter().map(|p| p.value).collect();
        assert_eq!(values.first(), Some(&1));
        assert_eq!(values.last(), Some(&60));
        assert_eq!(values.len(), 60);
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let mut ring = HistoryRing::new(60);
        for i in 0..1000u64 {
            ring.push(i, ());
            assert!(ring.len() <= ring.capacity());
        }
    }

    #[test]
    fn out_of_order_timestamp_is_clamped() {
        let mut ring = HistoryRing::new(4);
        ring.push(10, 'a');
        ring.push(7, 'b');
        ring.push(12, 'c');
        let ts: Vec<u64> = ring.snapshot().iter().map(|p| p.timestamp).collect();
        assert_eq!(ts, vec![10, 10, 12]);
    }

    #[test]
    fn store_keeps_streams_independent() {
        let mut store: HistoryStore<&str, u32> = HistoryStore::new(2);
        store.push(&"eth0", 1, 10);
        store.push(&"eth0", 2, 20);
        store.push(&"eth0", 3, 30);
        store.push(&"wlan0", 3, 1);
        assert_eq!(
            store.snapshot(&"eth0").iter().map(|p| p.value).collect::<Vec<_>>(),
            vec![20, 30]
        );
        assert_eq!(store.snapshot(&"wlan0").len(), 1);
        assert!(store.snapshot(&"lo").is_empty());

        store.retain(|k| *k != "wlan0");
        assert_eq!(store.len(), 1);
    }
}
