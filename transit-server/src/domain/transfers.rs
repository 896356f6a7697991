//! Transfer counting.
//!
//! A transfer is a change between two transit modes. Walking is never a
//! transfer, and the mode remembered between legs is always the mode of the
//! previous leg, walks included. So bus → walk → metro counts zero transfers:
//! stepping off the bus goes into `walk` (never counted), and boarding the
//! metro is compared against `walk`, not against the bus.
//!
//! Ranking depends on this rule; counting must not look through walks.

use super::{Leg, Mode};

/// Count transfers in an ordered leg sequence.
pub fn count_transfers(legs: &[Leg]) -> usize {
    count_mode_transfers(legs.iter().map(Leg::mode))
}

/// Count transfers in an ordered sequence of leg modes.
///
/// # Examples
///
/// ```
/// use transit_server::domain::{Mode, count_mode_transfers};
///
/// assert_eq!(count_mode_transfers([Mode::Bus, Mode::Metro]), 1);
/// assert_eq!(count_mode_transfers([Mode::Bus, Mode::Walk, Mode::Metro]), 0);
/// assert_eq!(count_mode_transfers([Mode::Walk, Mode::Bus, Mode::Bus]), 0);
/// ```
pub fn count_mode_transfers(modes: impl IntoIterator<Item = Mode>) -> usize {
    let mut modes = modes.into_iter();
    let Some(mut current) = modes.next() else {
        return 0;
    };

    let mut transfers = 0;
    for mode in modes {
        if mode != current && current != Mode::Walk && mode.is_transit() {
            transfers += 1;
        }
        current = mode;
    }
    transfers
}

#[cfg(test)]
mod tests {
    use super::*;
    use Mode::{Bus, Metro, Walk};

    #[test]
    fn empty_and_single() {
        assert_eq!(count_mode_transfers(Vec::<Mode>::new()), 0);
        assert_eq!(count_mode_transfers([Bus]), 0);
        assert_eq!(count_mode_transfers([Walk]), 0);
    }

    #[test]
    fn same_mode_is_free() {
        assert_eq!(count_mode_transfers([Bus, Bus, Bus]), 0);
        assert_eq!(count_mode_transfers([Metro, Metro]), 0);
        assert_eq!(count_mode_transfers([Walk, Walk]), 0);
    }

    #[test]
    fn direct_transit_change() {
        assert_eq!(count_mode_transfers([Bus, Metro]), 1);
        assert_eq!(count_mode_transfers([Metro, Bus]), 1);
        assert_eq!(count_mode_transfers([Bus, Metro, Bus]), 2);
    }

    #[test]
    fn walk_is_never_a_transfer() {
        assert_eq!(count_mode_transfers([Bus, Walk]), 0);
        assert_eq!(count_mode_transfers([Walk, Metro]), 0);
    }

    #[test]
    fn walk_resets_remembered_mode() {
        assert_eq!(count_mode_transfers([Bus, Walk, Metro]), 0);
        assert_eq!(count_mode_transfers([Metro, Walk, Walk, Bus]), 0);
        assert_eq!(count_mode_transfers([Bus, Walk, Bus, Metro]), 1);
        assert_eq!(count_mode_transfers([Metro, Bus, Walk, Metro, Bus]), 2);
    }
}
