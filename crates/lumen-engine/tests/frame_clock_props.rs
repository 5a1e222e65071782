use lumen_engine::time::{FrameClock, ManualClockSource, TICKS_PER_SECOND};
use proptest::prelude::*;

const MAX_DELTA: u64 = TICKS_PER_SECOND / 10;

fn clock(fixed_step: Option<u64>) -> (FrameClock<ManualClockSource>, ManualClockSource) {
    let source = ManualClockSource::new(TICKS_PER_SECOND);
    let mut clock = FrameClock::with_source(source.clone());
    if let Some(target) = fixed_step {
        clock.set_fixed_time_step(true);
        clock.set_target_elapsed_ticks(target);
    }
    (clock, source)
}

proptest! {
    #[test]
    fn total_time_is_the_sum_of_step_times(
        target in 1_000u64..500_000,
        deltas in prop::collection::vec(0u64..3 * MAX_DELTA, 1..40),
    ) {
        let (mut clock, source) = clock(Some(target));
        let mut simulated = 0u64;

        for delta in deltas {
            source.advance(delta);
            clock.advance(|t| simulated += t.elapsed_ticks);
        }

        prop_assert_eq!(clock.total_ticks(), simulated);
    }

    #[test]
    fn fixed_steps_consume_whole_targets_and_keep_the_rest(
        target in 2_500u64..500_000,
        deltas in prop::collection::vec(0u64..MAX_DELTA, 1..40),
    ) {
        let (mut clock, source) = clock(Some(target));
        let mut remainder = 0u64;
        let snap = TICKS_PER_SECOND / 4000;

        for delta in deltas {
            source.advance(delta);

            let effective = if delta.abs_diff(target) < snap { target } else { delta };
            let expected = (remainder + effective) / target;

            let mut steps = 0u64;
            clock.advance(|t| {
                assert_eq!(t.elapsed_ticks, target);
                steps += 1;
            });

            prop_assert_eq!(steps, expected);
            remainder = (remainder + effective) % target;
            prop_assert!(remainder < target);
        }

        prop_assert_eq!(clock.frame_count(), clock.total_ticks() / target);
    }

    #[test]
    fn variable_step_runs_once_with_the_clamped_delta(
        deltas in prop::collection::vec(0u64..3 * MAX_DELTA, 1..40),
    ) {
        let (mut clock, source) = clock(None);

        for (i, delta) in deltas.iter().enumerate() {
            source.advance(*delta);

            let mut calls = 0;
            clock.advance(|t| {
                calls += 1;
                assert_eq!(t.elapsed_ticks, (*delta).min(MAX_DELTA));
            });

            prop_assert_eq!(calls, 1);
            prop_assert_eq!(clock.frame_count(), i as u64 + 1);
        }
    }
}
