//! Destinations for intermediate stage images.
//!
//! Every stage hands a rendering of its output to an [`ImageSink`] under a fixed label. Sinks
//! never influence the computation: a failing sink is logged and the pipeline carries on.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use image::GrayImage;
use log::{trace, warn};

use crate::error::SnapshotError;

/// The pipeline stage a snapshot was taken after.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Gradient magnitudes.
    Gradient,
    /// Output of the single-level threshold.
    ThresholdGradient,
    /// Output of non-maximum suppression.
    CannyEdge,
    /// Output of the double threshold.
    HysteresisThreshold,
}

impl Stage {
    /// The label downstream tooling keys on. These strings are stable.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Gradient => "gradient",
            Stage::ThresholdGradient => "threshold-gradient",
            Stage::CannyEdge => "canny-edge",
            Stage::HysteresisThreshold => "hysteresis-threshold",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives stage snapshots.
pub trait ImageSink {
    /// Persists `image` as the output of `stage`.
    fn save(&mut self, image: &GrayImage, stage: Stage) -> Result<(), SnapshotError>;
}

/// Hands a snapshot to the sink, only logging failures.
pub(crate) fn emit(sink: &mut dyn ImageSink, image: &GrayImage, stage: Stage) {
    match sink.save(image, stage) {
        Ok(()) => trace!("saved {} snapshot ({}x{})", stage, image.width(), image.height()),
        Err(err) => warn!("could not save {} snapshot: {}", stage, err),
    }
}

/// Discards every snapshot.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl ImageSink for NullSink {
    fn save(&mut self, _: &GrayImage, _: Stage) -> Result<(), SnapshotError> {
        Ok(())
    }
}

/// Keeps snapshots in memory, in emission order.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    snapshots: Vec<(Stage, GrayImage)>,
}

impl MemorySink {
    pub fn new() -> MemorySink {
        MemorySink::default()
    }

    pub fn snapshots(&self) -> &[(Stage, GrayImage)] {
        &self.snapshots
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.snapshots.iter().map(|(stage, _)| *stage).collect()
    }

    /// The most recent snapshot taken after `stage`.
    pub fn get(&self, stage: Stage) -> Option<&GrayImage> {
        self.snapshots
            .iter()
            .rev()
            .find(|(s, _)| *s == stage)
            .map(|(_, image)| image)
    }
}

impl ImageSink for MemorySink {
    fn save(&mut self, image: &GrayImage, stage: Stage) -> Result<(), SnapshotError> {
        self.snapshots.push((stage, image.clone()));
        Ok(())
    }
}

/// Writes each snapshot to `<dir>/<label>.png`, replacing earlier files of the same stage.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> DirectorySink {
        DirectorySink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, stage: Stage) -> PathBuf {
        self.dir.join(format!("{}.png", stage.label()))
    }
}

impl ImageSink for DirectorySink {
    fn save(&mut self, image: &GrayImage, stage: Stage) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.dir)?;
        image.save(self.path_for(stage))?;
        Ok(())
    }
}
