//! Small utilities to manage bounded history buffers for the sparklines.

use std::collections::VecDeque;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if dq.len() == cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

// Keeps an occupancy deque per camera with a fixed capacity
pub struct OccupancyHistory {
    deques: Vec<VecDeque<u64>>,
    cap: usize,
}

impl OccupancyHistory {
    pub fn new(cameras: usize, cap: usize) -> Self {
        Self {
            deques: (0..cameras).map(|_| VecDeque::with_capacity(cap)).collect(),
            cap,
        }
    }

    pub fn push_sample(&mut self, cam: usize, occupied: u32) {
        if let Some(dq) = self.deques.get_mut(cam) {
            push_capped(dq, occupied as u64, self.cap);
        }
    }

    /// Lot-wide occupancy over time: element-wise sum of the newest samples.
    pub fn total_series(&self) -> Vec<u64> {
        let len = self.deques.iter().map(VecDeque::len).max().unwrap_or(0);
        let mut out = vec![0u64; len];
        for dq in &self.deques {
            let offset = len - dq.len();
            for (i, v) in dq.iter().enumerate() {
                out[offset + i] += *v;
            }
        }
        out
    }
}
