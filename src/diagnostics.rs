use std::collections::VecDeque;

const DEFAULT_HISTORY_SECONDS: f32 = 5.0;
const DEFAULT_REPORT_INTERVAL: f32 = 5.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameSample {
    pub timestamp: f32,
    pub frame_time: f32,
    pub nodes: usize,
}

/// Rolling window of frame times with a periodic FPS log line.
#[derive(Clone, Debug)]
pub struct FrameStatsHistory {
    samples: VecDeque<FrameSample>,
    total_elapsed: f32,
    max_history: f32,
    report_interval: f32,
    last_report: f32,
}

impl FrameStatsHistory {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::new(),
            total_elapsed: 0.0,
            max_history: DEFAULT_HISTORY_SECONDS,
            report_interval: DEFAULT_REPORT_INTERVAL,
            last_report: 0.0,
        }
    }

    pub fn record(&mut self, dt_seconds: f32, nodes: usize) {
        self.total_elapsed += dt_seconds.max(0.0);
        self.samples.push_back(FrameSample {
            timestamp: self.total_elapsed,
            frame_time: dt_seconds,
            nodes,
        });

        let min_time = self.total_elapsed - self.max_history;
        while let Some(front) = self.samples.front() {
            if front.timestamp < min_time {
                self.samples.pop_front();
            } else {
                break;
            }
        }

        if self.total_elapsed - self.last_report >= self.report_interval {
            self.last_report = self.total_elapsed;
            log::info!(
                "{:.1} fps over the last {:.1}s ({} nodes)",
                self.average_fps(),
                self.span_seconds(),
                nodes
            );
        }
    }

    pub fn average_fps(&self) -> f32 {
        let total_dt: f32 = self.samples.iter().map(|s| s.frame_time).sum();
        if total_dt > 0.0 {
            self.samples.len() as f32 / total_dt
        } else {
            0.0
        }
    }

    pub fn latest(&self) -> Option<FrameSample> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn span_seconds(&self) -> f32 {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) => (last.timestamp - first.timestamp).max(0.0),
            _ => 0.0,
        }
    }
}

impl Default for FrameStatsHistory {
    fn default() -> Self {
        Self::new()
    }
}
