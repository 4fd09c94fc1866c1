//! Strict two-player turn alternation.

use crate::{Player, PlayerKind};

/// Error raised when a rotation cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RotationError {
    /// Both members carry the same mark.
    #[display("both players use the same mark")]
    DuplicateMark,
}

impl std::error::Error for RotationError {}

/// Cycles between exactly two players.
///
/// The member order is fixed at construction. Before the first
/// [`switch`](Rotation::switch) there is no active player.
#[derive(Debug, Clone)]
pub struct Rotation {
    members: [Player; 2],
    current: Option<usize>,
}

impl Rotation {
    /// Creates a rotation over exactly two players.
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::DuplicateMark`] if the players share a
    /// mark; a game needs two distinguishable identities.
    pub fn new(first: Player, second: Player) -> Result<Self, RotationError> {
        if first.mark() == second.mark() {
            return Err(RotationError::DuplicateMark);
        }
        Ok(Self {
            members: [first, second],
            current: None,
        })
    }

    /// The active player, or `None` before the first switch.
    pub fn current(&self) -> Option<&Player> {
        self.current.map(|index| &self.members[index])
    }

    /// Advances to the other player and returns it. The first call
    /// selects the first member; every later call strictly alternates.
    pub fn switch(&mut self) -> &Player {
        let next = match self.current {
            None => 0,
            Some(index) => 1 - index,
        };
        self.current = Some(next);
        &self.members[next]
    }

    /// True if either member is automated.
    pub fn has_automated(&self) -> bool {
        self.members
            .iter()
            .any(|p| p.kind() == PlayerKind::Automated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mark;

    #[test]
    fn unset_before_first_switch() {
        let rotation =
            Rotation::new(Player::human(Mark::X), Player::automated(Mark::O)).unwrap();
        assert_eq!(rotation.current(), None);
    }

    #[test]
    fn switch_alternates_strictly() {
        let mut rotation =
            Rotation::new(Player::human(Mark::X), Player::automated(Mark::O)).unwrap();

        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(rotation.switch().mark());
        }
        assert_eq!(
            seen,
            vec![Mark::X, Mark::O, Mark::X, Mark::O, Mark::X, Mark::O, Mark::X]
        );
    }

    #[test]
    fn current_tracks_last_switch() {
        let mut rotation =
            Rotation::new(Player::human(Mark::X), Player::human(Mark::O)).unwrap();
        rotation.switch();
        assert_eq!(rotation.current().map(Player::mark), Some(Mark::X));
        rotation.switch();
        assert_eq!(rotation.current().map(Player::mark), Some(Mark::O));
    }

    #[test]
    fn duplicate_marks_rejected() {
        let result = Rotation::new(Player::human(Mark::X), Player::automated(Mark::X));
        assert_eq!(result.unwrap_err(), RotationError::DuplicateMark);
    }
}
