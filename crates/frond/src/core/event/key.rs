//! Keyboard input primitives.
use std::ops::Add;

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
    /// Meta (command) is active.
    pub meta: bool,
}

impl Add<KeyCode> for Mods {
    type Output = Key;

    fn add(self, key: KeyCode) -> Self::Output {
        Key { mods: self, key }
    }
}

impl Add<char> for Mods {
    type Output = Key;

    fn add(self, other: char) -> Self::Output {
        Key {
            mods: self,
            key: other.into(),
        }
    }
}

impl Add<Self> for Mods {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
            meta: self.meta || other.meta,
        }
    }
}

/// No modifiers pressed.
#[allow(non_upper_case_globals)]
pub const Empty: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: false,
    meta: false,
};

/// Shift-only modifier state.
#[allow(non_upper_case_globals)]
pub const Shift: Mods = Mods {
    shift: true,
    ctrl: false,
    alt: false,
    meta: false,
};

/// Control-only modifier state.
#[allow(non_upper_case_globals)]
pub const Ctrl: Mods = Mods {
    shift: false,
    ctrl: true,
    alt: false,
    meta: false,
};

/// Meta-only modifier state.
#[allow(non_upper_case_globals)]
pub const Meta: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: false,
    meta: true,
};

/// Logical key codes, named after the DOM `key` values widgets inspect.
#[derive(Debug, PartialOrd, PartialEq, Hash, Eq, Clone, Copy)]
pub enum KeyCode {
    /// Backspace key.
    Backspace,
    /// Enter/return key.
    Enter,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Tab key. Shift+Tab is expressed through [`Mods::shift`].
    Tab,
    /// Delete key.
    Delete,
    /// Escape key.
    Esc,
    /// A character, including space.
    Char(char),
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

/// A keystroke along with modifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Modifier state.
    pub mods: Mods,
    /// Key code.
    pub key: KeyCode,
}

impl Key {
    /// The character this key would insert into a text field, if any. Keys
    /// combined with Ctrl, Alt or Meta are shortcuts and insert nothing.
    pub fn printable(&self) -> Option<char> {
        match self.key {
            KeyCode::Char(c) if !(self.mods.ctrl || self.mods.alt || self.mods.meta) => Some(c),
            _ => None,
        }
    }

    /// Is this Tab, with or without Shift?
    pub fn is_tab(&self) -> bool {
        self.key == KeyCode::Tab
    }

    /// Is this an activation key (Enter or Space)?
    pub fn is_activation(&self) -> bool {
        matches!(self.key, KeyCode::Enter | KeyCode::Char(' '))
    }

    /// Is this a single alphanumeric character without shortcut modifiers?
    pub fn alphanumeric(&self) -> Option<char> {
        self.printable().filter(|c| c.is_alphanumeric())
    }
}

impl PartialEq<KeyCode> for Key {
    fn eq(&self, c: &KeyCode) -> bool {
        // If there are modifiers, we never match.
        if self.mods != Empty {
            return false;
        }
        *c == self.key
    }
}

impl PartialEq<char> for Key {
    fn eq(&self, c: &char) -> bool {
        *self == KeyCode::Char(*c)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self {
            mods: Empty,
            key: KeyCode::Char(c),
        }
    }
}

impl From<KeyCode> for Key {
    fn from(c: KeyCode) -> Self {
        Self {
            mods: Empty,
            key: c,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::event::key::*;

    #[test]
    fn matching() {
        assert_eq!(Key::from('a'), 'a');
        assert_ne!(Shift + KeyCode::Tab, KeyCode::Tab);
        assert!((Shift + KeyCode::Tab).is_tab());
        assert_eq!((Ctrl + 'v').printable(), None);
        assert_eq!((Shift + 'A').printable(), Some('A'));
        assert!(Key::from(' ').is_activation());
        assert_eq!(Key::from('-').alphanumeric(), None);
    }
}
