//! Event table assembly.
//!
//! Slices are collected into per-slice buffers during extraction and joined
//! only once, when the writer builds its columns.

use crate::parser::schema::{ParticleRecord, Slice};
use log::debug;

/// All slices of one event, in ascending time order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventSlices {
    event_number: u32,
    slices: Vec<Slice>,
}

impl EventSlices {
    pub fn event_number(&self) -> u32 {
        self.event_number
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }

    pub fn record_count(&self) -> usize {
        self.slices.iter().map(Slice::len).sum()
    }

    /// True when no slice was produced; slices without particles still count
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Records in output order: ascending time, then trace order within a timestep
    pub fn records(&self) -> impl Iterator<Item = &ParticleRecord> + '_ {
        self.slices.iter().flat_map(|slice| slice.records.iter())
    }
}

/// Order slices by time and wrap them as one event table
///
/// **Public** - main entry point for aggregation
///
/// The sort is stable, so slices sharing a time keep extraction order.
/// Slices without a known time go last.
pub fn aggregate_slices(event_number: u32, mut slices: Vec<Slice>) -> EventSlices {
    slices.sort_by(|a, b| {
        sort_key(a)
            .total_cmp(&sort_key(b))
            .then(a.index.cmp(&b.index))
    });

    debug!(
        "Aggregated {} slices for event {}",
        slices.len(),
        event_number
    );

    EventSlices {
        event_number,
        slices,
    }
}

fn sort_key(slice: &Slice) -> f64 {
    slice.time.unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(t: f64, x: f64) -> ParticleRecord {
        ParticleRecord {
            t,
            x,
            y: 0.0,
            z: 0.0,
            p0: 1.0,
            px: 0.1,
            py: 0.1,
            pz: 0.1,
            m: 0.938,
            ityp: 1.0,
            di3: 1.0,
            ch: 1.0,
            pcn: 0.0,
            ncoll: 0.0,
            ppt: 0.0,
            eta: 0.0,
            nev: 1,
        }
    }

    fn slice(index: usize, t: f64, xs: &[f64]) -> Slice {
        Slice {
            index,
            separator: index * 10,
            time: Some(t),
            records: xs.iter().map(|&x| record(t, x)).collect(),
        }
    }

    #[test]
    fn test_aggregate_orders_by_time() {
        let table = aggregate_slices(
            1,
            vec![slice(0, 10.0, &[1.0]), slice(1, 5.0, &[2.0, 3.0])],
        );

        let times: Vec<f64> = table.records().map(|r| r.t).collect();
        assert_eq!(times, vec![5.0, 5.0, 10.0]);

        let xs: Vec<f64> = table.records().map(|r| r.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_counts() {
        let table = aggregate_slices(
            2,
            vec![slice(0, 5.0, &[1.0, 2.0]), slice(1, 10.0, &[3.0])],
        );
        assert_eq!(table.event_number(), 2);
        assert_eq!(table.slice_count(), 2);
        assert_eq!(table.record_count(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_particle_free_slices_are_not_empty() {
        let table = aggregate_slices(1, vec![slice(0, 5.0, &[])]);
        assert_eq!(table.slice_count(), 1);
        assert_eq!(table.record_count(), 0);
        assert!(!table.is_empty());
        assert!(aggregate_slices(1, Vec::new()).is_empty());
    }

    #[test]
    fn test_untimed_slice_sorts_last() {
        let mut untimed = slice(0, 0.0, &[]);
        untimed.time = None;
        let table = aggregate_slices(1, vec![untimed, slice(1, 5.0, &[1.0])]);
        assert_eq!(table.slices()[0].index, 1);
        assert_eq!(table.slices()[1].index, 0);
    }
}
