use glam::Vec2;

/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    MouseLeft,
    MouseRight,
    MouseMiddle,
}

/// Controller - pointer and button state accumulated between frames
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Pointer movement in physical pixels since the last reset
    fn pointer_delta(&self) -> Vec2;

    /// Wheel movement in lines since the last reset, positive away from the user
    fn wheel_delta(&self) -> f32;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Scriptable controller for orbit tests.
    #[derive(Default)]
    pub struct MockController {
        pub pressed: Vec<Button>,
        pub pointer: Vec2,
        pub wheel: f32,
    }

    impl Controller for MockController {
        fn is_down(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }

        fn pointer_delta(&self) -> Vec2 {
            self.pointer
        }

        fn wheel_delta(&self) -> f32 {
            self.wheel
        }
    }

    #[test]
    fn test_controller_is_down() {
        let controller = MockController {
            pressed: vec![Button::MouseLeft],
            ..Default::default()
        };

        assert!(controller.is_down(Button::MouseLeft));
        assert!(!controller.is_down(Button::MouseRight));
    }

    #[test]
    fn test_controller_no_input() {
        let controller = MockController::default();
        assert_eq!(controller.pointer_delta(), Vec2::ZERO);
        assert_eq!(controller.wheel_delta(), 0.0);
    }
}
