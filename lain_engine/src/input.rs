use lain_site::Direction;
use serde::{Deserialize, Serialize};

/// Logical controller buttons. Physical keys and pads are mapped onto these
/// by the key bindings before a frame runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    L1,
    L2,
    R1,
    R2,
    Circle,
    Triangle,
    Cross,
    Square,
    Select,
    Start,
}

impl Button {
    pub const COUNT: usize = 14;

    pub const ALL: [Button; Button::COUNT] = [
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
        Button::L1,
        Button::L2,
        Button::R1,
        Button::R2,
        Button::Circle,
        Button::Triangle,
        Button::Cross,
        Button::Square,
        Button::Select,
        Button::Start,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Button::Left => Some(Direction::Left),
            Button::Right => Some(Direction::Right),
            Button::Up => Some(Direction::Up),
            Button::Down => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Buttons pressed during the current frame. Written by the input
/// collaborator, read by the active scene, cleared once the frame is done.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    pressed: [bool; Button::COUNT],
}

impl InputState {
    pub fn press(&mut self, button: Button) {
        self.pressed[button.index()] = true;
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed[button.index()]
    }

    pub fn any_pressed(&self) -> bool {
        self.pressed.iter().any(|&pressed| pressed)
    }

    pub fn pressed(&self) -> impl Iterator<Item = Button> + '_ {
        Button::ALL
            .into_iter()
            .filter(|button| self.is_pressed(*button))
    }

    /// First pressed d-pad direction, in button order.
    pub fn direction(&self) -> Option<Direction> {
        self.pressed().find_map(Button::direction)
    }

    pub fn reset(&mut self) {
        self.pressed = [false; Button::COUNT];
    }
}

impl FromIterator<Button> for InputState {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        let mut state = InputState::default();
        for button in iter {
            state.press(button);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_buttons_in_index_order() {
        for (idx, button) in Button::ALL.into_iter().enumerate() {
            assert_eq!(button.index(), idx);
        }
    }

    #[test]
    fn reset_clears_every_button() {
        let mut input: InputState = [Button::Circle, Button::Start].into_iter().collect();
        assert!(input.is_pressed(Button::Circle));
        assert_eq!(input.pressed().collect::<Vec<_>>(), vec![Button::Circle, Button::Start]);
        input.reset();
        assert!(!input.any_pressed());
    }

    #[test]
    fn direction_reads_the_dpad() {
        let input: InputState = [Button::Cross, Button::Down].into_iter().collect();
        assert_eq!(input.direction(), Some(Direction::Down));
        assert_eq!(InputState::default().direction(), None);
    }
}
