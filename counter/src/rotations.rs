// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use counter_common::{Event, EventKind};

/// Whole turns of a count that wraps at `ceiling`, one count per step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rotations {
    ceiling: u64,
    turns: i64,
}

impl Rotations {
    pub fn new(ceiling: u64) -> Self {
        Self { ceiling, turns: 0 }
    }

    pub fn turns(&self) -> i64 {
        self.turns
    }

    pub fn apply(&mut self, event: &Event) {
        self.turns += self.delta(event);
    }

    fn delta(&self, event: &Event) -> i64 {
        match event.kind() {
            EventKind::Overflow => 1,
            EventKind::Underflow => -1,
            // Reported with the value after wrapping: back at the floor when
            // counting up, at the ceiling when counting down.
            EventKind::OverflowUnderflow if event.value == 0 => 1,
            EventKind::OverflowUnderflow if event.value == self.ceiling => -1,
            EventKind::OverflowUnderflow => 0,
            EventKind::Threshold
            | EventKind::Index
            | EventKind::DirectionChange
            | EventKind::Timeout => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use counter_common::{ComponentRef, Watch};

    use super::*;

    fn event(kind: EventKind, value: u64) -> Event {
        Event {
            timestamp: 0,
            value,
            watch: Watch::new(ComponentRef::count(0), kind, 0),
            status: 0,
        }
    }

    #[test]
    fn overflow_and_underflow() {
        let mut rotations = Rotations::new(359);

        rotations.apply(&event(EventKind::Overflow, 0));
        rotations.apply(&event(EventKind::Overflow, 0));
        rotations.apply(&event(EventKind::Underflow, 359));
        assert_eq!(rotations.turns(), 1);

        rotations.apply(&event(EventKind::Underflow, 359));
        rotations.apply(&event(EventKind::Underflow, 359));
        assert_eq!(rotations.turns(), -1);
    }

    #[test]
    fn combined_event_uses_value() {
        let mut rotations = Rotations::new(359);

        rotations.apply(&event(EventKind::OverflowUnderflow, 0));
        assert_eq!(rotations.turns(), 1);
        rotations.apply(&event(EventKind::OverflowUnderflow, 359));
        rotations.apply(&event(EventKind::OverflowUnderflow, 359));
        assert_eq!(rotations.turns(), -1);
        rotations.apply(&event(EventKind::OverflowUnderflow, 100));
        assert_eq!(rotations.turns(), -1);
    }

    #[test]
    fn other_events_do_not_turn() {
        let mut rotations = Rotations::new(359);

        for kind in [
            EventKind::Threshold,
            EventKind::Index,
            EventKind::DirectionChange,
            EventKind::Timeout,
        ] {
            rotations.apply(&event(kind, 0));
        }
        assert_eq!(rotations.turns(), 0);
    }
}
