//! Property tests for the aggregation building blocks and the state machine

use std::collections::VecDeque;

use proptest::prelude::*;

use easymoo_core::fsm::FsmInputs;
use easymoo_core::score::{composite_score, ScoreTerm};
use easymoo_core::{
    Debouncer, DeviceState, LinkState, Metric, Queue, QueueError, SlidingWindow, StateMachine,
};

#[derive(Debug, Clone)]
enum QueueOp {
    Enqueue(u16),
    Dequeue,
    Remove(u16),
}

fn queue_op() -> impl Strategy<Value = QueueOp> {
    prop_oneof![
        3 => any::<u16>().prop_map(QueueOp::Enqueue),
        2 => Just(QueueOp::Dequeue),
        1 => (0u16..8).prop_map(QueueOp::Remove),
    ]
}

#[derive(Debug, Clone, Copy)]
enum Event {
    Cycle(bool, bool, bool),
    Session,
}

fn fsm_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        5 => (any::<bool>(), any::<bool>(), any::<bool>())
            .prop_map(|(i, d, c)| Event::Cycle(i, d, c)),
        1 => Just(Event::Session),
    ]
}

proptest! {
    #[test]
    fn queue_matches_fifo_model(ops in prop::collection::vec(queue_op(), 0..64)) {
        let mut queue = Queue::new();
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                QueueOp::Enqueue(v) => {
                    queue.enqueue(v).unwrap();
                    model.push_back(v);
                }
                QueueOp::Dequeue => {
                    prop_assert_eq!(queue.dequeue().ok(), model.pop_front());
                }
                QueueOp::Remove(v) => {
                    let expected = match model.iter().position(|x| *x == v) {
                        Some(at) => model.remove(at).ok_or(QueueError::NotFound),
                        None => Err(QueueError::NotFound),
                    };
                    prop_assert_eq!(queue.remove(&v), expected);
                }
            }
            prop_assert_eq!(queue.len(), model.len());
        }

        prop_assert!(queue.iter().eq(model.iter()));
    }

    #[test]
    fn window_keeps_newest_in_order(
        capacity in 1usize..16,
        values in prop::collection::vec(-1000.0f32..1000.0, 0..64),
    ) {
        let mut window = SlidingWindow::new(capacity);
        for &v in &values {
            window.push(v).unwrap();
            prop_assert!(window.len() <= capacity);
        }

        let keep = values.len().min(capacity);
        let expected = &values[values.len() - keep..];
        let stored: Vec<f32> = window.iter().collect();
        prop_assert_eq!(&stored[..], expected);

        if keep > 0 {
            let mean = expected.iter().sum::<f32>() / keep as f32;
            prop_assert!((window.average() - mean).abs() <= 1e-3 * mean.abs().max(1.0));
        } else {
            prop_assert_eq!(window.average(), 0.0);
        }
    }

    #[test]
    fn debouncer_flags_only_full_streaks(
        critical in 1u32..10,
        inputs in prop::collection::vec(any::<bool>(), 0..80),
    ) {
        let mut debouncer = Debouncer::new("prop", critical).unwrap();
        for (i, &raw) in inputs.iter().enumerate() {
            let flag = debouncer.update(raw);
            let run = inputs[..=i].iter().rev().take_while(|b| **b).count() as u32;
            prop_assert_eq!(flag, run >= critical);
            prop_assert_eq!(debouncer.streak(), run);
        }
    }

    #[test]
    fn score_stays_in_range(
        light in -100.0f32..1000.0,
        accel in -100.0f32..1000.0,
        light_target in 0.1f32..100.0,
        accel_target in 0.1f32..100.0,
    ) {
        let terms = [
            ScoreTerm::new(Metric::Light, light_target),
            ScoreTerm::new(Metric::AccelMagnitude, accel_target),
        ];
        let score = composite_score(&terms, |m| match m {
            Metric::Light => light,
            _ => accel,
        });
        prop_assert!((0.0..=100.0).contains(&score.value()));
        prop_assert!(score.as_byte() <= 100);
    }

    #[test]
    fn exactly_one_state_is_active(events in prop::collection::vec(fsm_event(), 0..100)) {
        let mut fsm = StateMachine::new();
        for event in events {
            match event {
                Event::Cycle(inactive, dark_or_hot, connected) => {
                    let link = if connected { LinkState::Connected } else { LinkState::Idle };
                    let before = fsm.current();
                    let transition = fsm.update(FsmInputs { inactive, dark_or_hot, link });
                    match transition {
                        Some(t) => {
                            prop_assert_eq!(t.from, before);
                            // Talk is only reachable through begin_session
                            prop_assert_ne!(t.to, DeviceState::Talk);
                        }
                        None => prop_assert_eq!(fsm.current(), before),
                    }
                }
                Event::Session => {
                    fsm.begin_session();
                }
            }

            let active: Vec<DeviceState> = fsm
                .records()
                .iter()
                .filter(|r| r.active)
                .map(|r| r.state)
                .collect();
            prop_assert_eq!(active, vec![fsm.current()]);
        }
    }
}
