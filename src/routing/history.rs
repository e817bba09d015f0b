//! In-memory navigation history.
//!
//! Models the browser's session history: a stack of locations with a cursor.
//! Pushing drops every entry ahead of the cursor, going back and forward
//! only moves the cursor.

/// What kind of change produced a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    Push,
    Replace,
    /// Back/forward traversal.
    Pop,
}

/// A completed history change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub kind: NavigationKind,
    pub from: String,
    pub to: String,
    /// Cursor movement; 0 for replace and for a push of the current location.
    pub delta: isize,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    pub fn location(&self) -> &str {
        &self.entries[self.index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Add an entry after the cursor. Pushing the current location again
    /// keeps the stack as is.
    pub fn push(&mut self, path: &str) -> Navigation {
        let from = self.location().to_string();
        if from == path {
            return Navigation {
                kind: NavigationKind::Push,
                from,
                to: path.to_string(),
                delta: 0,
            };
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(path.to_string());
        self.index += 1;
        Navigation {
            kind: NavigationKind::Push,
            from,
            to: path.to_string(),
            delta: 1,
        }
    }

    pub fn replace(&mut self, path: &str) -> Navigation {
        let from = std::mem::replace(&mut self.entries[self.index], path.to_string());
        Navigation {
            kind: NavigationKind::Replace,
            from,
            to: path.to_string(),
            delta: 0,
        }
    }

    /// Move the cursor by `delta`. Returns `None` when out of range or zero.
    pub fn go(&mut self, delta: isize) -> Option<Navigation> {
        if delta == 0 {
            return None;
        }
        let target = self.index.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }
        let from = self.location().to_string();
        self.index = target;
        Some(Navigation {
            kind: NavigationKind::Pop,
            from,
            to: self.location().to_string(),
            delta,
        })
    }

    pub fn back(&mut self) -> Option<Navigation> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Option<Navigation> {
        self.go(1)
    }
}
