/// Player input, decoded from a line of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    /// Pick an option (0-based).
    Select(usize),
    Restart,
    /// Leave a finished session: next stage or a new game.
    Continue,
    Quit,
}

impl QuizIntent {
    /// Parse a line of input. Option numbers are 1-based.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(number) = input.parse::<usize>() {
            return number.checked_sub(1).map(Self::Select);
        }
        match input.to_ascii_lowercase().as_str() {
            "r" | "restart" => Some(Self::Restart),
            "n" | "next" | "continue" => Some(Self::Continue),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}
