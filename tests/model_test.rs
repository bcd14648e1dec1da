//! Property test: ring buffer vs model `VecDeque` berkapasitas tetap.

#![cfg(not(feature = "loom"))]

use std::collections::VecDeque;

use proptest::prelude::*;
use spsc_ring::RingBuffer;

#[derive(Debug, Clone)]
enum Op {
    Push(u32),
    PushClone(u32),
    Pop,
    Front,
    FrontPop,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<u32>().prop_map(Op::Push),
        1 => any::<u32>().prop_map(Op::PushClone),
        2 => Just(Op::Pop),
        1 => Just(Op::Front),
        1 => Just(Op::FrontPop),
    ]
}

proptest! {
    #[test]
    fn behaves_like_bounded_fifo(
        requested in 0usize..40,
        ops in prop::collection::vec(op_strategy(), 0..300),
    ) {
        let (mut producer, mut consumer) = RingBuffer::new(requested).unwrap().split();

        let slots = requested.max(1).next_power_of_two().max(2);
        prop_assert_eq!(producer.buffer().buffer_size(), slots);
        let capacity = slots - 1;
        prop_assert_eq!(producer.capacity(), capacity);

        let mut model = VecDeque::new();

        for op in ops {
            match op {
                Op::Push(value) => {
                    let result = producer.try_push(value);
                    if model.len() < capacity {
                        prop_assert!(result.is_ok());
                        model.push_back(value);
                    } else {
                        prop_assert_eq!(result, Err(value));
                    }
                }
                Op::PushClone(value) => {
                    let pushed = producer.try_push_clone(&value);
                    prop_assert_eq!(pushed, model.len() < capacity);
                    if pushed {
                        model.push_back(value);
                    }
                }
                Op::Pop => {
                    prop_assert_eq!(consumer.try_pop(), model.pop_front());
                }
                Op::Front => {
                    prop_assert_eq!(consumer.front().copied(), model.front().copied());
                }
                Op::FrontPop => {
                    let had_front = consumer.front().is_some();
                    prop_assert_eq!(consumer.pop(), had_front);
                    prop_assert_eq!(had_front, model.pop_front().is_some());
                }
            }

            prop_assert_eq!(consumer.len(), model.len());
            prop_assert_eq!(consumer.is_empty(), model.is_empty());
            prop_assert_eq!(producer.is_full(), model.len() == capacity);
            prop_assert!(!(consumer.is_empty() && producer.is_full()));
        }
    }
}
