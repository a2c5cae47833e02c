//! Step response analysis
//!
//! Measures a capture the way the reference captures were measured, so a
//! simulated run and a recorded one can be compared number for number:
//!
//! - **Peak**: largest rate during INPUT.
//! - **Rise**: time from the first INPUT frame until the rate first reaches
//!   95 % of the peak, with the average acceleration over that span.
//! - **Decay**: time from the last RELEASE frame still near the peak until the
//!   rate falls to 5 % and 1 % of the INPUT peak.
//! - **Acceleration limit**: the median of the top half of the positive
//!   frame-to-frame accelerations over the first 60 INPUT frames. An
//!   acceleration capped controller produces a run of equal steps, and the
//!   median of the steepest half lands on that cap.
//!
//! Reference captures may store axes in a different order, so every
//! measurement takes a [`Signal`] that picks the column.

use airroll_core::Axis;

use crate::record::{Capture, FrameRecord, ManeuverPhase};

/// Fraction of peak that counts as "reached"
pub const RISE_FRACTION: f32 = 0.95;

/// Coarse decay threshold, as a fraction of peak
pub const DECAY_COARSE_FRACTION: f32 = 0.05;
/// Fine decay threshold, as a fraction of peak
pub const DECAY_FINE_FRACTION: f32 = 0.01;

/// INPUT frames examined for the acceleration limit
pub const ACCEL_WINDOW_FRAMES: usize = 60;

/// Fewer INPUT frames than this give no acceleration estimate
pub const ACCEL_MIN_FRAMES: usize = 10;

/// Largest peak difference that still matches, rad/s
pub const PEAK_TOLERANCE: f32 = 0.2;

/// Largest rise time difference that still matches, seconds
pub const RISE_TOLERANCE: f32 = 0.3;

/// Which rate a measurement reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Absolute rate about one axis column
    Axis(Axis),
    /// Norm of the angular velocity
    Magnitude,
}

impl Signal {
    /// Absolute value of this signal in one frame
    pub fn sample(self, frame: &FrameRecord) -> f32 {
        match self {
            Self::Axis(axis) => frame.rate(axis).abs(),
            Self::Magnitude => frame.magnitude,
        }
    }
}

/// Time to reach a fraction of peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiseTime {
    /// Seconds after the first frame
    pub time: f32,
    /// Rate that counted as reached, rad/s
    pub target: f32,
    /// `target / time`, zero when reached on the first frame
    pub avg_accel: f32,
}

impl RiseTime {
    /// Average acceleration over the rise in deg/s²
    pub fn avg_accel_deg(&self) -> f32 {
        self.avg_accel.to_degrees()
    }
}

/// Release decay times, `None` when the threshold is never reached
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecayTimes {
    /// Seconds until the rate falls below 5 % of peak
    pub to_5pct: Option<f32>,
    /// Seconds until the rate falls below 1 % of peak
    pub to_1pct: Option<f32>,
}

/// Estimated instantaneous acceleration cap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelLimit {
    /// Median of the steepest half, deg/s²
    pub median_deg: f32,
    /// Steepest single step, deg/s²
    pub max_deg: f32,
    /// Positive steps found in the window
    pub samples: usize,
}

impl AccelLimit {
    /// Median in rad/s²
    pub fn median_rad(&self) -> f32 {
        self.median_deg.to_radians()
    }

    /// Largest step in rad/s²
    pub fn max_rad(&self) -> f32 {
        self.max_deg.to_radians()
    }
}

/// Largest value of `signal`
pub fn peak_rate(frames: &[FrameRecord], signal: Signal) -> Option<f32> {
    frames.iter().map(|f| signal.sample(f)).reduce(f32::max)
}

/// First time `signal` reaches `fraction` of its peak, relative to the first frame
pub fn rise_time(frames: &[FrameRecord], signal: Signal, fraction: f32) -> Option<RiseTime> {
    let start = frames.first()?.time;
    let peak = peak_rate(frames, signal)?;
    if peak <= 0.0 {
        return None;
    }

    let target = fraction * peak;
    let reached = frames.iter().find(|f| signal.sample(f) >= target)?;
    let time = reached.time - start;
    Some(RiseTime {
        time,
        target,
        avg_accel: if time > 0.0 { target / time } else { 0.0 },
    })
}

/// Decay of `signal` from `peak` over release frames
///
/// Timing starts at the last frame still at or above 95 % of `peak`, or at the
/// first frame when the rate has already dropped below that.
pub fn decay_times(frames: &[FrameRecord], signal: Signal, peak: f32) -> DecayTimes {
    let start = frames
        .iter()
        .rposition(|f| signal.sample(f) >= RISE_FRACTION * peak)
        .unwrap_or(0);
    let Some(origin) = frames.get(start) else {
        return DecayTimes::default();
    };

    let mut decay = DecayTimes::default();
    for frame in &frames[start..] {
        let elapsed = frame.time - origin.time;
        let value = signal.sample(frame);
        if decay.to_5pct.is_none() && value <= peak * DECAY_COARSE_FRACTION {
            decay.to_5pct = Some(elapsed);
        }
        if value <= peak * DECAY_FINE_FRACTION {
            decay.to_1pct = Some(elapsed);
            break;
        }
    }
    decay
}

/// Acceleration cap estimate over the first INPUT frames
pub fn acceleration_limit(frames: &[FrameRecord], signal: Signal) -> Option<AccelLimit> {
    if frames.len() < ACCEL_MIN_FRAMES {
        return None;
    }

    let window = &frames[..frames.len().min(ACCEL_WINDOW_FRAMES)];
    let mut steps: Vec<f32> = window
        .windows(2)
        .filter_map(|pair| {
            let dt = pair[1].time - pair[0].time;
            if dt == 0.0 {
                return None;
            }
            let accel = (signal.sample(&pair[1]) - signal.sample(&pair[0])) / dt;
            (accel > 0.0).then(|| accel.to_degrees())
        })
        .collect();

    if steps.is_empty() {
        return None;
    }

    steps.sort_by(|a, b| b.total_cmp(a));
    let max_deg = steps[0];
    let mut top_half = steps[..(steps.len() / 2).max(1)].to_vec();
    top_half.sort_by(f32::total_cmp);

    Some(AccelLimit {
        median_deg: top_half[top_half.len() / 2],
        max_deg,
        samples: steps.len(),
    })
}

/// Everything measured on one capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseProfile {
    /// Peak rate during INPUT, rad/s
    pub peak: f32,
    /// Time to 95 % of peak
    pub rise: Option<RiseTime>,
    /// Decay after release
    pub decay: DecayTimes,
    /// Estimated acceleration cap
    pub accel_limit: Option<AccelLimit>,
    /// Number of INPUT frames measured
    pub input_frames: usize,
}

impl ResponseProfile {
    /// Measure `signal` over the INPUT and RELEASE frames of `capture`
    ///
    /// `None` when the capture has no INPUT frames.
    pub fn measure(capture: &Capture, signal: Signal) -> Option<Self> {
        let input = capture.phase(ManeuverPhase::Input);
        let release = capture.phase(ManeuverPhase::Release);
        let peak = peak_rate(&input, signal)?;

        Some(Self {
            peak,
            rise: rise_time(&input, signal, RISE_FRACTION),
            decay: decay_times(&release, signal, peak),
            accel_limit: acceleration_limit(&input, signal),
            input_frames: input.len(),
        })
    }
}

/// Simulated response against a reference response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// `|simulated - reference|` peak, rad/s
    pub peak_delta: f32,
    /// `|simulated - reference|` rise time, `None` if either never rose
    pub rise_delta: Option<f32>,
    /// Mean absolute rate difference over paired INPUT frames
    pub mean_abs_error: Option<f32>,
}

impl Comparison {
    /// Both peak and rise time within tolerance
    pub fn passed(&self) -> bool {
        self.peak_delta < PEAK_TOLERANCE
            && self.rise_delta.is_some_and(|d| d < RISE_TOLERANCE)
    }
}

/// Compare two captures, each read through its own column mapping
///
/// `None` when either capture has no INPUT frames.
pub fn compare(
    simulated: &Capture,
    simulated_signal: Signal,
    reference: &Capture,
    reference_signal: Signal,
) -> Option<Comparison> {
    let sim = ResponseProfile::measure(simulated, simulated_signal)?;
    let reference_profile = ResponseProfile::measure(reference, reference_signal)?;

    let rise_delta = match (sim.rise, reference_profile.rise) {
        (Some(a), Some(b)) => Some((a.time - b.time).abs()),
        _ => None,
    };

    let sim_input = simulated.phase(ManeuverPhase::Input);
    let ref_input = reference.phase(ManeuverPhase::Input);
    let paired = sim_input.len().min(ref_input.len());
    let mean_abs_error = (paired > 0).then(|| {
        sim_input
            .iter()
            .zip(&ref_input)
            .map(|(a, b)| (simulated_signal.sample(a) - reference_signal.sample(b)).abs())
            .sum::<f32>()
            / paired as f32
    });

    let comparison = Comparison {
        peak_delta: (sim.peak - reference_profile.peak).abs(),
        rise_delta,
        mean_abs_error,
    };
    if comparison.passed() {
        log::info!("Response matches reference (Δpeak {:.3} rad/s)", comparison.peak_delta);
    } else {
        log::warn!(
            "Response differs from reference: Δpeak {:.3} rad/s, Δt95 {:?}",
            comparison.peak_delta,
            comparison.rise_delta
        );
    }
    Some(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(index: u32, dt: f32, wx: f32, phase: ManeuverPhase) -> FrameRecord {
        FrameRecord {
            frame: index,
            time: index as f32 * dt,
            wx,
            wy: 0.0,
            wz: 0.0,
            magnitude: wx.abs(),
            input_pitch: 0.0,
            input_yaw: 0.0,
            input_roll: 0.0,
            dar_active: false,
            phase: Some(phase),
        }
    }

    // Ramp at `accel` rad/s² up to `cap`, then hold; followed by a linear release
    fn ramp_capture(accel: f32, cap: f32) -> Capture {
        let dt = 0.01;
        let mut frames = Vec::new();
        for i in 0..200 {
            let w = (accel * i as f32 * dt).min(cap);
            frames.push(frame(i, dt, w, ManeuverPhase::Input));
        }
        for i in 200..400 {
            let w = (cap - 2.0 * cap * (i - 200) as f32 * dt).max(0.0);
            frames.push(frame(i, dt, w, ManeuverPhase::Release));
        }
        Capture::new(frames)
    }

    #[test]
    fn rise_time_of_a_ramp() {
        let capture = ramp_capture(10.0, 5.0);
        let rise = rise_time(&capture.phase(ManeuverPhase::Input), Signal::Magnitude, 0.95)
            .unwrap();

        assert_relative_eq!(rise.target, 4.75, epsilon = 1e-5);
        assert_relative_eq!(rise.time, 0.48, epsilon = 1e-4);
        assert_relative_eq!(rise.avg_accel, 4.75 / 0.48, epsilon = 1e-2);
    }

    #[test]
    fn acceleration_limit_finds_the_ramp_slope() {
        let capture = ramp_capture(10.0, 5.0);
        let limit = acceleration_limit(&capture.phase(ManeuverPhase::Input), Signal::Axis(Axis::Pitch))
            .unwrap();

        assert_relative_eq!(limit.median_rad(), 10.0, epsilon = 1e-2);
        assert_eq!(limit.samples, 50);
    }

    #[test]
    fn acceleration_limit_ignores_a_single_spike() {
        let mut frames: Vec<_> = (0..30)
            .map(|i| frame(i, 0.01, 0.05 * i as f32, ManeuverPhase::Input))
            .collect();
        frames[10].wx += 1.0;
        let limit = acceleration_limit(&frames, Signal::Axis(Axis::Pitch)).unwrap();

        assert!(limit.max_deg > 5000.0);
        assert_relative_eq!(limit.median_rad(), 5.0, epsilon = 1e-2);
    }

    #[test]
    fn short_or_flat_input_has_no_limit() {
        let short: Vec<_> = (0..5).map(|i| frame(i, 0.01, i as f32, ManeuverPhase::Input)).collect();
        assert!(acceleration_limit(&short, Signal::Magnitude).is_none());

        let flat: Vec<_> = (0..20).map(|i| frame(i, 0.01, 1.0, ManeuverPhase::Input)).collect();
        assert!(acceleration_limit(&flat, Signal::Magnitude).is_none());
    }

    #[test]
    fn decay_from_release_start() {
        let capture = ramp_capture(10.0, 5.0);
        let profile = ResponseProfile::measure(&capture, Signal::Magnitude).unwrap();

        assert_relative_eq!(profile.peak, 5.0);
        // Timed from 4.8 rad/s, the last release frame above 95 %
        assert_relative_eq!(profile.decay.to_5pct.unwrap(), 0.46, epsilon = 1e-3);
        assert_relative_eq!(profile.decay.to_1pct.unwrap(), 0.48, epsilon = 1e-3);
    }

    #[test]
    fn signal_reads_absolute_axis_rate() {
        let f = frame(0, 0.01, -2.0, ManeuverPhase::Input);
        assert_eq!(Signal::Axis(Axis::Pitch).sample(&f), 2.0);
        assert_eq!(Signal::Axis(Axis::Roll).sample(&f), 0.0);
    }

    #[test]
    fn comparison_criteria() {
        let reference = ramp_capture(10.0, 5.0);

        let close = ramp_capture(11.0, 5.1);
        let result = compare(&close, Signal::Magnitude, &reference, Signal::Magnitude).unwrap();
        assert!(result.passed());

        let slow = ramp_capture(5.0, 5.0);
        let result = compare(&slow, Signal::Magnitude, &reference, Signal::Magnitude).unwrap();
        assert!(result.peak_delta < PEAK_TOLERANCE);
        assert!(!result.passed());

        let weak = ramp_capture(10.0, 4.0);
        let result = compare(&weak, Signal::Magnitude, &reference, Signal::Magnitude).unwrap();
        assert!(!result.passed());
    }

    #[test]
    fn comparison_needs_input_frames() {
        let empty = Capture::default();
        let reference = ramp_capture(10.0, 5.0);
        assert!(compare(&empty, Signal::Magnitude, &reference, Signal::Magnitude).is_none());
    }
}
