//! Progress reporting for haircard generation.
//!
//! Generation runs through a fixed sequence of [`Stage`]s. A [`Progress`]
//! callback receives a [`ProgressEvent`] whenever a stage advances.
//!
//! # Example
//!
//! ```
//! use haircards::algo::progress::{Progress, Stage};
//!
//! let progress = Progress::new(|event| {
//!     eprintln!(
//!         "[{}/{}] {} {}/{}",
//!         event.stage.index() + 1,
//!         Stage::ALL.len(),
//!         event.stage,
//!         event.current,
//!         event.total
//!     );
//! });
//! progress.report(Stage::Simplify, 10, 200);
//! ```

use std::fmt;

/// Steps of a haircard generation run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Walking the hair mesh into strands.
    Extract,
    /// Bucketing and thinning strands.
    Downsample,
    /// Simplifying strand curves.
    Simplify,
    /// Building card meshes.
    Build,
    /// Assigning UV zones.
    Uv,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 5] = [
        Stage::Extract,
        Stage::Downsample,
        Stage::Simplify,
        Stage::Build,
        Stage::Uv,
    ];

    /// Position of this stage in [`Stage::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human readable stage name.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Extract => "extracting strands",
            Stage::Downsample => "downsampling",
            Stage::Simplify => "simplifying curves",
            Stage::Build => "building cards",
            Stage::Uv => "assigning UVs",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Stage being worked on.
    pub stage: Stage,
    /// Items finished within the stage.
    pub current: usize,
    /// Items in the stage, 0 when unknown.
    pub total: usize,
}

impl ProgressEvent {
    /// Completion of the whole run in `[0, 1]`, counting every stage equally.
    pub fn overall(&self) -> f64 {
        let within = if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64).min(1.0)
        };
        (self.stage.index() as f64 + within) / Stage::ALL.len() as f64
    }
}

/// A progress callback invoked during generation.
pub struct Progress {
    callback: Box<dyn Fn(&ProgressEvent)>,
}

impl Progress {
    /// Create a progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&ProgressEvent) + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report that `current` of `total` items of `stage` are done.
    #[inline]
    pub fn report(&self, stage: Stage, current: usize, total: usize) {
        (self.callback)(&ProgressEvent {
            stage,
            current,
            total,
        });
    }

    /// A reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_report_forwards_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let progress = Progress::new(move |event| sink.borrow_mut().push(*event));

        progress.report(Stage::Extract, 0, 0);
        progress.report(Stage::Build, 2, 4);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].stage, Stage::Build);
        assert_eq!((seen[1].current, seen[1].total), (2, 4));
    }

    #[test]
    fn test_overall_fraction() {
        let start = ProgressEvent {
            stage: Stage::Extract,
            current: 0,
            total: 0,
        };
        assert_eq!(start.overall(), 0.0);

        let half_build = ProgressEvent {
            stage: Stage::Build,
            current: 1,
            total: 2,
        };
        assert!((half_build.overall() - 3.5 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_stage_order() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
        assert_eq!(Stage::Uv.to_string(), "assigning UVs");
    }
}
