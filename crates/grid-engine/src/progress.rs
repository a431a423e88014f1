//! Text progress bar for long task loops.
//!
//! A [`ProgressReporter`] limits output to a fixed number of messages per
//! loop and never repeats the previous message.

use tracing::info;

const DEFAULT_WIDTH: usize = 50;
const DEFAULT_MESSAGES: usize = 100;

/// Render the bar for task `task_id` (0-based) of `ntask`.
///
/// Looks like `".....     | 50%"`. Terminal writers prefix it with `'\r'`
/// to redraw in place.
pub fn progress_bar(task_id: usize, ntask: usize, width: usize) -> String {
    let progress = if ntask == 0 {
        1.0
    } else {
        (task_id + 1) as f64 / ntask as f64
    };
    let dots = ".".repeat((progress * width as f64).ceil() as usize);
    format!("{:<width$}| {:.0}%", dots, 100.0 * progress, width = width)
}

/// Progress reporting state for one loop over `ntask` tasks.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    ntask: usize,
    nmsg: usize,
    width: usize,
    prev_msg: String,
}

impl ProgressReporter {
    pub fn new(ntask: usize) -> Self {
        Self {
            ntask,
            nmsg: DEFAULT_MESSAGES,
            width: DEFAULT_WIDTH,
            prev_msg: String::new(),
        }
    }

    /// Emit at most `nmsg` messages over the whole loop.
    pub fn with_messages(mut self, nmsg: usize) -> Self {
        self.nmsg = nmsg.max(1);
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Report that task `task_id` finished.
    ///
    /// Returns the bar when a message was emitted.
    pub fn update(&mut self, task_id: usize) -> Option<String> {
        let d = self.ntask as f64 / self.nmsg as f64;
        let last = task_id + 1 == self.ntask;
        let crossed = d >= 1.0
            && (((task_id as f64 - 1.0) / d).trunc() as i64) < ((task_id as f64 / d).trunc() as i64);
        if !(d < 1.0 || crossed || last) {
            return None;
        }

        let msg = progress_bar(task_id, self.ntask, self.width);
        if msg == self.prev_msg {
            return None;
        }
        info!(task = task_id, ntask = self.ntask, "{}", msg);
        self.prev_msg = msg.clone();
        Some(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_layout() {
        assert_eq!(progress_bar(1, 4, 8), "....    | 50%");
        assert_eq!(progress_bar(3, 4, 8), "........| 100%");
        assert_eq!(progress_bar(0, 0, 4), "....| 100%");
        // partial cells round up
        assert_eq!(progress_bar(0, 3, 4), "..  | 33%");
    }

    #[test]
    fn test_message_budget() {
        let mut reporter = ProgressReporter::new(1000).with_messages(10).with_width(10);
        let emitted: Vec<usize> = (0..1000).filter(|&t| reporter.update(t).is_some()).collect();
        assert_eq!(emitted, vec![100, 200, 300, 400, 500, 600, 700, 800, 900, 999]);
    }

    #[test]
    fn test_small_loops_report_every_task() {
        let mut reporter = ProgressReporter::new(4).with_width(8);
        let bars: Vec<String> = (0..4).filter_map(|t| reporter.update(t)).collect();
        assert_eq!(bars.len(), 4);
        assert_eq!(bars[3], "........| 100%");
    }

    #[test]
    fn test_repeated_message_suppressed() {
        let mut reporter = ProgressReporter::new(4).with_width(8);
        assert!(reporter.update(1).is_some());
        assert!(reporter.update(1).is_none());
    }
}
