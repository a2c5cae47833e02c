//! Property tests for the per-tick invariants
//!
//! Random stick sequences, modes, timesteps and settings must never produce a
//! non-unit orientation or a velocity outside its caps.

mod common;

use airroll_core::{
    AirRoll, ControlFlags, ControlInput, ControlSettings, InMemoryRepository, RigidBody,
    Simulation, StickSample,
};
use proptest::prelude::*;

fn air_roll() -> impl Strategy<Value = AirRoll> {
    prop_oneof![
        Just(AirRoll::None),
        Just(AirRoll::Left),
        Just(AirRoll::Right),
        Just(AirRoll::Free),
    ]
}

prop_compose! {
    fn frame()(
        x in -1.2f32..1.2,
        y in -1.2f32..1.2,
        deadzone in 0.0f32..0.5,
        dar_button in any::<bool>(),
        air_roll in air_roll(),
        dt in 0.0f32..0.05,
    ) -> (ControlInput, f32) {
        let input = ControlInput::new(StickSample::new(x, y), deadzone)
            .with_flags(ControlFlags { dar_button, air_roll });
        (input, dt)
    }
}

prop_compose! {
    fn settings()(
        w_max in 0.5f32..12.0,
        w_max_pitch in 0.5f32..12.0,
        w_max_yaw in 0.5f32..12.0,
        max_accel_roll_deg in 100.0f32..5000.0,
        damp in 0.0f32..6.0,
        input_pow in 0.5f32..3.0,
    ) -> ControlSettings {
        ControlSettings {
            w_max,
            w_max_pitch,
            w_max_yaw,
            max_accel_roll_deg,
            damp,
            input_pow,
            ..ControlSettings::default()
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn orientation_stays_unit(frames in prop::collection::vec(frame(), 1..400)) {
        let mut sim = Simulation::new(InMemoryRepository::new());
        let mut body = RigidBody::default();
        let settings = ControlSettings::default();

        for (input, dt) in &frames {
            sim.tick(*dt, &settings, input, &mut body, false).unwrap();
            let norm = body.orientation.quaternion().norm();
            prop_assert!((norm - 1.0).abs() <= 1e-6, "norm {}", norm);
        }
    }

    #[test]
    fn velocity_stays_within_caps(
        settings in settings(),
        frames in prop::collection::vec(frame(), 1..300),
    ) {
        let mut sim = Simulation::new(InMemoryRepository::new());
        let mut body = RigidBody::default();

        for (input, dt) in &frames {
            sim.tick(*dt, &settings, input, &mut body, false).unwrap();
            let w = sim.angular_velocity();
            prop_assert!(w.norm() <= settings.w_max + 1e-4, "|w| = {}", w.norm());
            prop_assert!(w.x.abs() <= settings.w_max_pitch + 1e-6);
            prop_assert!(w.y.abs() <= settings.w_max_yaw + 1e-6);
        }
    }

    #[test]
    fn locked_axes_stay_zero(
        frames in prop::collection::vec(frame(), 1..200),
        lock_yaw in any::<bool>(),
    ) {
        let mut sim = Simulation::new(InMemoryRepository::new());
        let mut body = RigidBody::default();
        let settings = ControlSettings::default();

        sim.toggle_pitch_lock();
        if lock_yaw {
            sim.toggle_yaw_lock();
        }

        for (input, dt) in &frames {
            sim.tick(*dt, &settings, input, &mut body, false).unwrap();
            prop_assert_eq!(sim.angular_velocity().x, 0.0);
            if lock_yaw {
                prop_assert_eq!(sim.angular_velocity().y, 0.0);
            }
        }
    }

    /// Explicit Euler on the pitch PD loop (Kp + Kd = 40) stays monotone for dt < 25 ms
    #[test]
    fn released_stick_decays_monotonically(
        wx in -8.0f32..8.0,
        wy in -8.0f32..8.0,
        wz in -8.0f32..8.0,
        dt in 0.001f32..0.02,
    ) {
        let mut sim = Simulation::new(InMemoryRepository::new());
        let mut body = RigidBody::default();
        let settings = ControlSettings { w_max: 20.0, ..ControlSettings::default() };
        sim.set_angular_velocity(wx, wy, wz);

        let idle = ControlInput::default();
        let mut previous = sim.angular_velocity();
        for _ in 0..200 {
            sim.tick(dt, &settings, &idle, &mut body, false).unwrap();
            let w = sim.angular_velocity();
            prop_assert!(w.norm() <= previous.norm() + 1e-5);
            for i in 0..3 {
                prop_assert!(w[i] * previous[i] >= 0.0, "axis {} overshot", i);
            }
            previous = w;
        }
    }
}
