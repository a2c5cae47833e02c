//! Per-frame telemetry records and CSV captures
//!
//! One row per tick. Captures written here carry every column; reference
//! captures recorded elsewhere may leave out `frame`, `magnitude`, the input
//! columns or `phase`, and read back with the magnitude recomputed from the
//! rate components.
//!
//! ```text
//! frame,time,wx,wy,wz,magnitude,input_pitch,input_yaw,input_roll,dar_active,phase
//! 120,2.0,0.2381,0.0,0.0,0.2381,1.0,0.0,0.0,false,INPUT
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use airroll_core::{Axis, ControlInput, ControlMode, TickReport};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{TelemetryError, TelemetryResult};

/// Maneuver phase a frame belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManeuverPhase {
    /// Settling with the stick centered
    Stabilize,
    /// Stick held
    Input,
    /// Stick released, rates decaying
    Release,
}

/// One recorded tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRecord {
    /// Zero-based tick index
    pub frame: u32,
    /// Seconds since the start of the capture, taken before the tick
    pub time: f32,
    /// Pitch rate, rad/s
    pub wx: f32,
    /// Yaw rate, rad/s
    pub wy: f32,
    /// Roll rate, rad/s
    pub wz: f32,
    /// Norm of the angular velocity
    pub magnitude: f32,
    /// Pitch stick
    pub input_pitch: f32,
    /// Yaw stick
    pub input_yaw: f32,
    /// Roll input, signed
    pub input_roll: f32,
    /// DAR button held
    pub dar_active: bool,
    /// Maneuver phase, if labelled
    pub phase: Option<ManeuverPhase>,
}

impl FrameRecord {
    /// Build a row from a tick report and the input that produced it
    pub fn from_report(
        frame: u32,
        time: f32,
        input: &ControlInput,
        report: &TickReport,
        phase: ManeuverPhase,
    ) -> Self {
        let w = report.angular_velocity;
        Self {
            frame,
            time,
            wx: w.x,
            wy: w.y,
            wz: w.z,
            magnitude: w.norm(),
            input_pitch: input.stick.y,
            input_yaw: input.stick.x,
            input_roll: roll_input(input, report.mode),
            dar_active: report.mode.is_dar(),
            phase: Some(phase),
        }
    }

    /// Rate about one body axis
    pub fn rate(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Pitch => self.wx,
            Axis::Yaw => self.wy,
            Axis::Roll => self.wz,
        }
    }
}

// Stick x under free air roll, the spin direction under DAR
fn roll_input(input: &ControlInput, mode: ControlMode) -> f32 {
    match mode {
        ControlMode::FreeAirRoll => input.stick.x,
        ControlMode::DirectionalAirRoll(direction) => direction.sign(),
        _ => 0.0,
    }
}

/// Row shape accepted on read
#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    frame: Option<u32>,
    time: f32,
    wx: f32,
    wy: f32,
    wz: f32,
    #[serde(default)]
    magnitude: Option<f32>,
    #[serde(default)]
    input_pitch: Option<f32>,
    #[serde(default)]
    input_yaw: Option<f32>,
    #[serde(default)]
    input_roll: Option<f32>,
    #[serde(default, deserialize_with = "lenient_bool")]
    dar_active: bool,
    #[serde(default)]
    phase: Option<ManeuverPhase>,
}

impl RawFrame {
    fn into_record(self, index: usize) -> FrameRecord {
        let magnitude = self
            .magnitude
            .unwrap_or_else(|| (self.wx * self.wx + self.wy * self.wy + self.wz * self.wz).sqrt());
        FrameRecord {
            frame: self.frame.unwrap_or(index as u32),
            time: self.time,
            wx: self.wx,
            wy: self.wy,
            wz: self.wz,
            magnitude,
            input_pitch: self.input_pitch.unwrap_or(0.0),
            input_yaw: self.input_yaw.unwrap_or(0.0),
            input_roll: self.input_roll.unwrap_or(0.0),
            dar_active: self.dar_active,
            phase: self.phase,
        }
    }
}

// Accepts true/false in any case, 1/0 and an empty cell
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let text: Option<String> = Option::deserialize(deserializer)?;
    match text.as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(t) if t.eq_ignore_ascii_case("true") || t == "1" => Ok(true),
        Some(t) if t.eq_ignore_ascii_case("false") || t == "0" => Ok(false),
        Some(t) => Err(serde::de::Error::custom(format!("not a boolean: {t}"))),
    }
}

/// Ordered frames of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capture {
    frames: Vec<FrameRecord>,
}

impl Capture {
    /// Wrap recorded frames
    pub fn new(frames: Vec<FrameRecord>) -> Self {
        Self { frames }
    }

    /// All frames in order
    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Frame count
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no frames were recorded
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames tagged with `phase`, in order
    pub fn phase(&self, phase: ManeuverPhase) -> Vec<FrameRecord> {
        self.frames
            .iter()
            .filter(|f| f.phase == Some(phase))
            .copied()
            .collect()
    }

    /// True when at least one frame carries a phase
    pub fn is_phased(&self) -> bool {
        self.frames.iter().any(|f| f.phase.is_some())
    }

    /// Tag untagged frames by time: before `input_start` is STABILIZE, before
    /// `release_start` is INPUT, the rest RELEASE
    pub fn label_phases(&mut self, input_start: f32, release_start: f32) {
        for frame in self.frames.iter_mut().filter(|f| f.phase.is_none()) {
            frame.phase = Some(if frame.time < input_start {
                ManeuverPhase::Stabilize
            } else if frame.time < release_start {
                ManeuverPhase::Input
            } else {
                ManeuverPhase::Release
            });
        }
    }

    /// Parse CSV with a header row
    pub fn from_reader<R: Read>(reader: R) -> TelemetryResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut frames = Vec::new();
        for (index, row) in reader.deserialize::<RawFrame>().enumerate() {
            frames.push(row?.into_record(index));
        }
        Ok(Self { frames })
    }

    /// Write CSV with a header row
    pub fn to_writer<W: Write>(&self, writer: W) -> TelemetryResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_writer(writer);
        for frame in &self.frames {
            writer.serialize(frame)?;
        }
        writer.flush().map_err(|e| TelemetryError::Csv(e.into()))
    }

    /// Read a capture file
    pub fn read_csv(path: impl AsRef<Path>) -> TelemetryResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TelemetryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let capture = Self::from_reader(file)?;
        log::debug!("Read {} frames from {}", capture.len(), path.display());
        Ok(capture)
    }

    /// Write the capture to a file, replacing it
    pub fn write_csv(&self, path: impl AsRef<Path>) -> TelemetryResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| TelemetryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.to_writer(file)?;
        log::info!("Saved {} frames to {}", self.len(), path.display());
        Ok(())
    }
}

/// Collects frames while a maneuver runs
#[derive(Debug, Default)]
pub struct TelemetryRecorder {
    frames: Vec<FrameRecord>,
}

impl TelemetryRecorder {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty recorder with room for `frames` frames
    pub fn with_capacity(frames: usize) -> Self {
        Self { frames: Vec::with_capacity(frames) }
    }

    /// Append one tick; frame number and time follow from the count so far
    pub fn record(
        &mut self,
        dt: f32,
        input: &ControlInput,
        report: &TickReport,
        phase: ManeuverPhase,
    ) {
        let frame = self.frames.len() as u32;
        let time = self.frames.last().map_or(0.0, |last| last.time + dt);
        self.frames
            .push(FrameRecord::from_report(frame, time, input, report, phase));
    }

    /// Frames recorded so far
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True before the first frame
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Stop recording
    pub fn finish(self) -> Capture {
        Capture::new(self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const REFERENCE: &str = "\
time,wx,wy,wz,phase
0.0,0.0,0.0,0.0,STABILIZE
0.016,3.0,4.0,0.0,INPUT
0.033,0.0,0.0,1.0,RELEASE
";

    #[test]
    fn reference_capture_computes_magnitude() {
        let capture = Capture::from_reader(REFERENCE.as_bytes()).unwrap();
        assert_eq!(capture.len(), 3);

        let input = capture.phase(ManeuverPhase::Input);
        assert_eq!(input.len(), 1);
        assert_relative_eq!(input[0].magnitude, 5.0);
        assert_eq!(input[0].frame, 1);
        assert!(!input[0].dar_active);
    }

    #[test]
    fn capitalized_booleans_are_accepted() {
        let text = "frame,time,wx,wy,wz,magnitude,input_pitch,input_yaw,input_roll,dar_active\n\
                    0,0.0,0.0,0.0,5.49,5.49,0.0,0.0,1.0,True\n\
                    1,0.016,0.0,0.0,5.5,5.5,0.0,0.0,1.0,False\n";
        let capture = Capture::from_reader(text.as_bytes()).unwrap();
        assert!(capture.frames()[0].dar_active);
        assert!(!capture.frames()[1].dar_active);
        assert!(!capture.is_phased());
    }

    #[test]
    fn bad_boolean_is_an_error() {
        let text = "time,wx,wy,wz,dar_active\n0.0,0.0,0.0,0.0,maybe\n";
        assert!(matches!(
            Capture::from_reader(text.as_bytes()),
            Err(TelemetryError::Csv(_))
        ));
    }

    #[test]
    fn written_capture_reads_back() {
        let mut capture = Capture::from_reader(REFERENCE.as_bytes()).unwrap();
        capture.frames[1].dar_active = true;

        let mut buffer = Vec::new();
        capture.to_writer(&mut buffer).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("frame,time,wx,wy,wz,magnitude,"));
        assert!(text.contains("INPUT"));

        assert_eq!(Capture::from_reader(buffer.as_slice()).unwrap(), capture);
    }

    #[test]
    fn label_phases_by_time() {
        let text = "time,wx,wy,wz\n0.0,0,0,0\n1.0,0,0,0\n2.0,0,0,0\n";
        let mut capture = Capture::from_reader(text.as_bytes()).unwrap();
        capture.label_phases(0.5, 2.0);

        let phases: Vec<_> = capture.frames().iter().map(|f| f.phase).collect();
        assert_eq!(
            phases,
            vec![
                Some(ManeuverPhase::Stabilize),
                Some(ManeuverPhase::Input),
                Some(ManeuverPhase::Release)
            ]
        );
    }
}
