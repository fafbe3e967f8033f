#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other,
}

/// Key event as delivered by the input box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
    /// True while an IME composition is in progress; Enter then confirms
    /// the candidate instead of submitting.
    pub is_composing: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            is_composing: false,
        }
    }

    pub fn enter() -> Self {
        Self::new(Key::Enter)
    }

    pub fn shift_enter() -> Self {
        Self {
            shift: true,
            ..Self::enter()
        }
    }

    pub fn composing(mut self) -> Self {
        self.is_composing = true;
        self
    }

    pub fn is_submit(&self) -> bool {
        self.key == Key::Enter && !self.shift && !self.is_composing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_plain_enter_submits() {
        assert!(KeyInput::enter().is_submit());
        assert!(!KeyInput::shift_enter().is_submit());
        assert!(!KeyInput::enter().composing().is_submit());
        assert!(!KeyInput::new(Key::Char('a')).is_submit());
        assert!(!KeyInput::new(Key::Other).is_submit());
    }
}
