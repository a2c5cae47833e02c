//! Shared helpers for the integration tests
//!
//! - Tolerance assertions for scalar results
//! - Deterministic stick generator
//! - Scenario builders that run the engine for a number of frames

#![allow(dead_code)]

use airroll_core::{
    CalibrationRecord, CalibrationRepository, CalibrationSlot, ControlError, ControlFlags,
    ControlInput, ControlResult, ControlSettings, InMemoryRepository, RigidBody, Simulation,
    StickSample, TickOutcome, TickReport,
};

/// Frame time used by the reference captures
pub const FRAME_DT: f32 = 1.0 / 60.0;

#[macro_export]
macro_rules! assert_within_tolerance {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let diff = ($actual - $expected).abs();
        if diff > $tolerance {
            panic!(
                "Value {} not within tolerance {} of expected {} (diff: {})",
                $actual, $tolerance, $expected, diff
            );
        }
    };
}

/// Deterministic random number generator for tests
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        // Xorshift
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / 16777216.0
    }

    pub fn gen_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Random stick inside the unit square
    pub fn stick(&mut self) -> StickSample {
        StickSample::new(self.gen_range(-1.0, 1.0), self.gen_range(-1.0, 1.0))
    }
}

/// Engine with an empty in-memory repository and a default body
pub fn fresh() -> (Simulation<InMemoryRepository>, RigidBody) {
    (Simulation::new(InMemoryRepository::new()), RigidBody::default())
}

/// Stick input with no deadzone
pub fn stick(x: f32, y: f32) -> ControlInput {
    ControlInput::new(StickSample::new(x, y), 0.0)
}

/// Stick input with mode flags
pub fn stick_with(x: f32, y: f32, flags: ControlFlags) -> ControlInput {
    stick(x, y).with_flags(flags)
}

/// Run `frames` advanced ticks and return the last report
pub fn run<R: CalibrationRepository>(
    sim: &mut Simulation<R>,
    body: &mut RigidBody,
    settings: &ControlSettings,
    input: &ControlInput,
    frames: usize,
) -> TickReport {
    let mut last = None;
    for _ in 0..frames {
        match sim.tick(FRAME_DT, settings, input, body, false) {
            Ok(TickOutcome::Advanced(report)) => last = Some(report),
            Ok(TickOutcome::Paused) => panic!("unpaused tick reported Paused"),
            Err(e) => panic!("tick failed: {}", e),
        }
    }
    last.expect("at least one frame")
}

/// Repository that counts writes and can be told to refuse them
#[derive(Default)]
pub struct FlakyRepository {
    pub inner: InMemoryRepository,
    pub saves: usize,
    pub refuse: bool,
}

impl CalibrationRepository for FlakyRepository {
    fn load(&self, slot: CalibrationSlot) -> Option<CalibrationRecord> {
        self.inner.load(slot)
    }

    fn save(&mut self, slot: CalibrationSlot, record: &CalibrationRecord) -> ControlResult<()> {
        self.saves += 1;
        if self.refuse {
            return Err(ControlError::StorageUnavailable { reason: "disk full" });
        }
        self.inner.save(slot, record)
    }
}
