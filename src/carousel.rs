//! Carousel Cursor
//!
//! Pure state transitions over the current project index. Moves wrap around
//! in both directions and are refused while the carousel is locked by a
//! running project.

/// Direction of a carousel move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarouselState {
    current_index: usize,
    len: usize,
    locked: bool,
}

impl CarouselState {
    /// Start at index 0 over `len` projects
    pub fn new(len: usize) -> Self {
        Self {
            current_index: 0,
            len,
            locked: false,
        }
    }

    /// Index of the displayed project, `None` when there are no projects
    pub fn current_index(&self) -> Option<usize> {
        (self.len > 0).then_some(self.current_index)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Advance one project, wrapping from last to first
    pub fn next(&self) -> Option<Self> {
        self.step(Direction::Next)
    }

    /// Go back one project, wrapping from first to last
    pub fn previous(&self) -> Option<Self> {
        self.step(Direction::Previous)
    }

    /// Returns the moved state, or `None` when the move is a no-op
    pub fn step(&self, direction: Direction) -> Option<Self> {
        if self.len == 0 || self.locked {
            return None;
        }

        let current_index = match direction {
            Direction::Next => (self.current_index + 1) % self.len,
            Direction::Previous => (self.current_index + self.len - 1) % self.len,
        };

        Some(Self {
            current_index,
            ..*self
        })
    }

    pub fn locked(&self) -> Self {
        Self {
            locked: true,
            ..*self
        }
    }

    pub fn unlocked(&self) -> Self {
        Self {
            locked: false,
            ..*self
        }
    }
}
