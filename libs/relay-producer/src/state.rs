use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProducerState {
    NotStarted = 0,
    Started = 1,
}

impl ProducerState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => ProducerState::Started,
            _ => ProducerState::NotStarted,
        }
    }
}

impl std::fmt::Display for ProducerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProducerState::NotStarted => f.write_str("not-started"),
            ProducerState::Started => f.write_str("started"),
        }
    }
}

/// [`ProducerState`] cell whose only mutation is a compare-and-set transition.
#[derive(Debug)]
pub struct AtomicProducerState(AtomicU8);

impl AtomicProducerState {
    pub fn new(state: ProducerState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub fn get(&self) -> ProducerState {
        ProducerState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move from `from` to `to`. Returns `false` and leaves the state untouched
    /// if the current state is not `from`.
    pub fn transition(&self, from: ProducerState, to: ProducerState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_only_from_expected_state() {
        let state = AtomicProducerState::new(ProducerState::NotStarted);
        assert!(!state.transition(ProducerState::Started, ProducerState::NotStarted));
        assert_eq!(state.get(), ProducerState::NotStarted);

        assert!(state.transition(ProducerState::NotStarted, ProducerState::Started));
        assert_eq!(state.get(), ProducerState::Started);
        assert!(!state.transition(ProducerState::NotStarted, ProducerState::Started));
    }

    #[test]
    fn single_winner_under_race() {
        let state = AtomicProducerState::new(ProducerState::NotStarted);
        let winners: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let state = &state;
                    s.spawn(move || state.transition(ProducerState::NotStarted, ProducerState::Started))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap() as usize).sum()
        });
        assert_eq!(winners, 1);
        assert_eq!(state.get(), ProducerState::Started);
    }

    #[test]
    fn display() {
        assert_eq!(ProducerState::Started.to_string(), "started");
        assert_eq!(ProducerState::NotStarted.to_string(), "not-started");
    }
}
