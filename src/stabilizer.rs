//! Stabilization pipeline: startup fill, steady state and shutdown drain.

use nalgebra::Matrix2x3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::apparent::ApparentPathEnum;
use crate::filter::FilterKind;
use crate::path::PathTracker;
use crate::trajectory::{TrajectoryRecord, TrajectoryWriter};
use crate::video::{FrameImage, FrameSink, FrameSize, FrameSource, MotionEstimator, OutputSize, SinkControl, Warper};
use crate::warp::WarpSynthesizer;
use crate::window::{Frame, FrameWindow};
use crate::{Error, Result, Transform};

/// Configuration for the stabilizer.
///
/// Every field has a default, so a partial JSON/TOML document deserializes
/// into a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Minimum fraction of matched points the motion model must explain.
    pub min_inlier_ratio: f64,

    /// Inlier distance threshold, relative to the image dimensions.
    pub inlier_threshold: f64,

    /// Process error of the motion filter, relative to the image dimensions.
    pub process_error: f64,

    /// Measurement error of the motion filter, relative to the image dimensions.
    pub measurement_error: f64,

    /// Low-pass weight of the newest camera value, in (0, 1].
    pub low_pass: f64,

    /// Moving-average window in frames. Zero selects the low-pass strategy.
    pub avg_window: usize,

    /// Output zoom factor. Zero disables zooming.
    pub zoom: f64,

    /// Output resolution.
    pub output_size: OutputSize,

    /// Smoothing filter applied to the raw motion deltas.
    pub filter: FilterKind,

    /// Also render the displayed frame resized but not stabilized.
    pub show_original: bool,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            min_inlier_ratio: 0.5,
            inlier_threshold: 0.05,
            process_error: 0.5,
            measurement_error: 0.5,
            low_pass: 0.1,
            avg_window: 0,
            zoom: 0.0,
            output_size: OutputSize::Original,
            filter: FilterKind::Kalman,
            show_original: false,
        }
    }
}

impl StabilizerConfig {
    /// Check every parameter.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_inlier_ratio >= 0.0 && self.min_inlier_ratio <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "min_inlier_ratio must be in [0, 1], got {}",
                self.min_inlier_ratio
            )));
        }

        if !(self.inlier_threshold.is_finite() && self.inlier_threshold > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "inlier_threshold must be positive, got {}",
                self.inlier_threshold
            )));
        }

        for (name, value) in [
            ("process_error", self.process_error),
            ("measurement_error", self.measurement_error),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if !(self.low_pass > 0.0 && self.low_pass <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "low_pass must be in (0, 1], got {}",
                self.low_pass
            )));
        }

        if !(self.zoom.is_finite() && self.zoom >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "zoom must be non-negative, got {}",
                self.zoom
            )));
        }

        self.output_size.validate()
    }

    /// Whether the moving-average strategy is selected.
    pub fn is_windowed(&self) -> bool {
        self.avg_window > 0
    }

    /// Frames the display lags behind capture.
    pub fn lookahead(&self) -> usize {
        self.avg_window / 2
    }
}

/// One output frame.
#[derive(Debug, Clone)]
pub struct RenderedFrame<O> {
    /// Output frame number, starting at zero.
    pub index: usize,
    /// Warped image.
    pub image: O,
    /// Paths behind this frame.
    pub record: TrajectoryRecord,
    /// Warp matrix that produced `image`.
    pub transform: Matrix2x3<f64>,
    /// The same frame resized to the output size without stabilization,
    /// when `show_original` is set.
    pub original: Option<O>,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames read from the source.
    pub frames_read: usize,
    /// Frames handed to the sink.
    pub frames_rendered: usize,
    /// Transitions without a motion estimate.
    pub missing_estimates: usize,
}

/// Frame-by-frame stabilizer.
///
/// Owns the sliding window and the state of the path tracker and the
/// apparent-path strategy. Frames go in through [`Stabilizer::ingest`] (or
/// [`Stabilizer::ingest_virtual`] while draining); at most one frame becomes
/// renderable per ingest and is taken with [`Stabilizer::render`].
#[derive(Debug)]
pub struct Stabilizer<I> {
    config: StabilizerConfig,
    tracker: PathTracker,
    apparent: ApparentPathEnum,
    window: FrameWindow<I>,
    warp: WarpSynthesizer,
    /// Real and virtual frames pushed so far.
    ingested: usize,
    rendered: usize,
    pending: bool,
}

impl<I> Stabilizer<I> {
    /// Create a stabilizer from the first captured frame.
    ///
    /// The input size is fixed from `first`. In windowed mode, padding frames
    /// with zero paths are seeded behind it so the window fills after exactly
    /// `lookahead` further frames.
    pub fn new(config: StabilizerConfig, first: I) -> Result<Self>
    where
        I: FrameImage,
    {
        config.validate()?;

        let input_size = first.size();
        let output_size = config.output_size.resolve(input_size)?;

        let filter = config
            .filter
            .create(input_size, config.process_error, config.measurement_error);
        let apparent = ApparentPathEnum::from_config(config.avg_window, config.low_pass);

        let lookahead = apparent.lookahead();
        let window_len = apparent.window_len();
        let mut window = FrameWindow::new(window_len, lookahead);
        for _ in 0..window_len.saturating_sub(lookahead + 1) {
            window.push(Frame::padding());
        }
        window.push(Frame::captured(first));

        info!(
            input_width = input_size.width,
            input_height = input_size.height,
            output_width = output_size.width,
            output_height = output_size.height,
            window = window_len,
            lookahead,
            "stabilizer initialized"
        );

        let warp = WarpSynthesizer::new(input_size, output_size, config.zoom);
        Ok(Self {
            config,
            tracker: PathTracker::new(filter),
            apparent,
            window,
            warp,
            ingested: 1,
            rendered: 0,
            pending: lookahead == 0,
        })
    }

    /// Push a captured frame and compute its paths.
    ///
    /// The motion between the previous frame and `image` is estimated only
    /// when both carry an image; otherwise the transition counts as missing.
    pub fn ingest<E: MotionEstimator<I>>(&mut self, image: I, estimator: &mut E) {
        self.window.push(Frame::captured(image));

        let (prev_sensor, prev_camera, prev_apparent, raw_delta) =
            match (self.window.get(1), self.window.newest()) {
                (Some(prev), Some(next)) => {
                    let raw_delta = match (&prev.image, &next.image) {
                        (Some(p), Some(n)) => estimator
                            .estimate(
                                p,
                                n,
                                self.config.min_inlier_ratio,
                                self.config.inlier_threshold,
                            )
                            .map(|m| Transform::from_affine(&m)),
                        _ => None,
                    };
                    (prev.sensor, prev.camera, prev.apparent, raw_delta)
                }
                _ => (
                    Transform::IDENTITY,
                    Transform::IDENTITY,
                    Transform::IDENTITY,
                    None,
                ),
            };

        let step = self.tracker.integrate(prev_sensor, prev_camera, raw_delta);
        self.advance(prev_apparent, step.sensor, step.camera);

        if !self.pending {
            debug!(
                buffered = self.ingested,
                lookahead = self.lookahead(),
                "buffering"
            );
        }
    }

    /// Push a virtual frame repeating the newest sensor and camera values.
    ///
    /// Used after the input ends to flush the lookahead: each call makes the
    /// next buffered frame renderable. The motion filter is not stepped.
    pub fn ingest_virtual(&mut self) {
        let Some(last) = self.window.newest() else {
            return;
        };
        let next = Frame::repeating(last);
        let (sensor, camera, prev_apparent) = (last.sensor, last.camera, last.apparent);

        self.window.push(next);
        self.advance(prev_apparent, sensor, camera);
        debug!(ingested = self.ingested, "virtual frame");
    }

    fn advance(&mut self, prev_apparent: Transform, sensor: Transform, camera: Transform) {
        let evicted_camera = if self.window.is_overfull() {
            self.window.oldest().map(|f| f.camera)
        } else {
            None
        };

        let apparent = self.apparent.update(prev_apparent, camera, evicted_camera);
        if let Some(newest) = self.window.newest_mut() {
            newest.sensor = sensor;
            newest.camera = camera;
            newest.apparent = apparent;
        }

        if evicted_camera.is_some() {
            self.window.evict_oldest();
        }

        self.ingested += 1;
        self.pending = self.ingested > self.lookahead();
    }

    /// Render the displayed frame if the last ingest made one available.
    ///
    /// # Returns
    /// `Ok(None)` while the window is still filling, or if the frame was
    /// already rendered.
    pub fn render<W: Warper<I>>(&mut self, warper: &mut W) -> Result<Option<RenderedFrame<W::Output>>> {
        if !self.pending {
            return Ok(None);
        }
        self.pending = false;

        let offset = self.window.display_offset();
        let (Some(newest), Some(display)) = (self.window.newest(), self.window.display_frame()) else {
            return Err(Error::MissingImage { index: offset });
        };
        let image = display
            .image
            .as_ref()
            .ok_or(Error::MissingImage { index: offset })?;

        let (transform, output) =
            self.warp
                .synthesize(warper, image, newest.apparent, display.camera)?;
        let original = if self.config.show_original {
            Some(warper.warp(image, &self.warp.resize_matrix(), self.warp.output_size())?)
        } else {
            None
        };

        let record = TrajectoryRecord {
            frame: self.rendered,
            sensor: display.sensor,
            camera: display.camera,
            apparent: newest.apparent,
        };
        self.rendered += 1;

        Ok(Some(RenderedFrame {
            index: record.frame,
            image: output,
            record,
            transform,
            original,
        }))
    }

    /// Frames the display lags behind capture.
    pub fn lookahead(&self) -> usize {
        self.window.display_offset()
    }

    /// Whether the moving-average strategy is in use.
    pub fn is_windowed(&self) -> bool {
        self.apparent.is_windowed()
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    pub fn input_size(&self) -> FrameSize {
        self.warp.input_size()
    }

    pub fn output_size(&self) -> FrameSize {
        self.warp.output_size()
    }

    /// Size of a canvas holding the stabilized frame and, with
    /// `show_original`, the original one. Landscape outputs stack the two
    /// vertically, portrait and square outputs side by side.
    pub fn canvas_size(&self) -> FrameSize {
        let out = self.warp.output_size();
        match (self.config.show_original, out.width > out.height) {
            (false, _) => out,
            (true, true) => FrameSize::new(out.width, out.height.saturating_mul(2)),
            (true, false) => FrameSize::new(out.width.saturating_mul(2), out.height),
        }
    }

    pub fn window(&self) -> &FrameWindow<I> {
        &self.window
    }

    /// Frames rendered so far.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Transitions without a motion estimate.
    pub fn missing_estimates(&self) -> usize {
        self.tracker.missing_estimates()
    }
}

/// Stabilize every frame of `source` into `sink`.
///
/// Reads frames until the source is exhausted or the sink asks to stop, then
/// drains the lookahead so every captured frame is rendered exactly once.
/// When `trajectory` is given, one record is written per rendered frame.
#[instrument(skip_all, fields(avg_window = config.avg_window, low_pass = config.low_pass))]
pub fn run<I, S, E, W, K>(
    config: &StabilizerConfig,
    source: &mut S,
    estimator: &mut E,
    warper: &mut W,
    sink: &mut K,
    mut trajectory: Option<&mut TrajectoryWriter>,
) -> Result<RunSummary>
where
    I: FrameImage,
    S: FrameSource<I>,
    E: MotionEstimator<I>,
    W: Warper<I>,
    K: FrameSink<W::Output>,
{
    config.validate()?;

    let Some(first) = source.read()? else {
        info!("input stream is empty");
        return Ok(RunSummary::default());
    };

    let mut stabilizer = Stabilizer::new(config.clone(), first)?;
    let mut frames_read = 1;

    let mut control = emit(&mut stabilizer, warper, sink, trajectory.as_deref_mut())?;
    while control == SinkControl::Continue {
        let Some(image) = source.read()? else {
            break;
        };
        frames_read += 1;
        stabilizer.ingest(image, estimator);
        control = emit(&mut stabilizer, warper, sink, trajectory.as_deref_mut())?;
    }

    if control == SinkControl::Stop {
        info!(frames_read, "stop requested");
    }

    let lookahead = stabilizer.lookahead();
    if lookahead > 0 {
        debug!(frames = lookahead, "draining");
    }
    for _ in 0..lookahead {
        stabilizer.ingest_virtual();
        // Stop requests no longer matter: the buffered frames are flushed regardless
        emit(&mut stabilizer, warper, sink, trajectory.as_deref_mut())?;
    }

    if let Some(trajectory) = trajectory {
        trajectory.flush()?;
    }

    let summary = RunSummary {
        frames_read,
        frames_rendered: stabilizer.rendered(),
        missing_estimates: stabilizer.missing_estimates(),
    };
    info!(
        frames_read = summary.frames_read,
        frames_rendered = summary.frames_rendered,
        missing_estimates = summary.missing_estimates,
        "stabilization finished"
    );
    Ok(summary)
}

fn emit<I, W, K>(
    stabilizer: &mut Stabilizer<I>,
    warper: &mut W,
    sink: &mut K,
    trajectory: Option<&mut TrajectoryWriter>,
) -> Result<SinkControl>
where
    W: Warper<I>,
    K: FrameSink<W::Output>,
{
    let Some(frame) = stabilizer.render(warper)? else {
        return Ok(SinkControl::Continue);
    };
    if let Some(trajectory) = trajectory {
        trajectory.write_record(&frame.record)?;
    }
    sink.consume(frame)
}
