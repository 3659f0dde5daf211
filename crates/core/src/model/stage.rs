use std::fmt;

/// One of the successive quiz sessions, each with its own question pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    #[default]
    One,
    Two,
}

impl Stage {
    /// 1-based stage number.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Stage::One => 1,
            Stage::Two => 2,
        }
    }

    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Stage::One),
            2 => Some(Stage::Two),
            _ => None,
        }
    }

    /// The stage that follows this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Stage::One => Some(Stage::Two),
            Stage::Two => None,
        }
    }

    #[must_use]
    pub fn is_final(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}
