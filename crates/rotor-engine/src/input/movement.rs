use super::state::InputState;
use super::types::Key;

/// Named camera movement directions.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Back,
        Direction::Left,
        Direction::Right,
    ];

    const fn index(self) -> usize {
        match self {
            Direction::Forward => 0,
            Direction::Back => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Held flag per direction, sampled once per frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Movement {
    held: [bool; 4],
}

impl Movement {
    /// Samples `input` through `bindings`.
    pub fn sample(input: &InputState, bindings: &KeyBindings) -> Self {
        let mut movement = Self::default();
        for (key, direction) in &bindings.bindings {
            if input.key_down(*key) {
                movement.set(*direction, true);
            }
        }
        movement
    }

    pub fn held(&self, direction: Direction) -> bool {
        self.held[direction.index()]
    }

    pub fn set(&mut self, direction: Direction, held: bool) {
        self.held[direction.index()] = held;
    }

    pub fn any(&self) -> bool {
        self.held.iter().any(|h| *h)
    }
}

/// Key → direction mapping. Several keys may drive one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    pub bindings: Vec<(Key, Direction)>,
}

impl Default for KeyBindings {
    /// WASD plus arrow keys.
    fn default() -> Self {
        Self {
            bindings: vec![
                (Key::W, Direction::Forward),
                (Key::ArrowUp, Direction::Forward),
                (Key::S, Direction::Back),
                (Key::ArrowDown, Direction::Back),
                (Key::A, Direction::Left),
                (Key::ArrowLeft, Direction::Left),
                (Key::D, Direction::Right),
                (Key::ArrowRight, Direction::Right),
            ],
        }
    }
}
