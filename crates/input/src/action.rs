/// A high-level action produced by any input device.
///
/// The camera update consumes actions, never raw key codes, so key
/// bindings live with the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    Ascend,
    Descend,
    /// Close the window and leave the frame loop.
    Quit,
}

impl Action {
    /// Movement actions in the order they are applied each frame.
    pub const MOVEMENT: [Action; 6] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::Ascend,
        Action::Descend,
    ];

    pub fn is_movement(self) -> bool {
        !matches!(self, Action::Quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_is_not_movement() {
        assert!(!Action::Quit.is_movement());
        assert!(Action::MOVEMENT.iter().all(|a| a.is_movement()));
    }

    #[test]
    fn movement_order_starts_with_forward() {
        assert_eq!(Action::MOVEMENT[0], Action::MoveForward);
        assert_eq!(Action::MOVEMENT.len(), 6);
    }
}
