//! Emoji palette shown above the input line

pub const PALETTE: &[&str] = &[
    "😊", "😂", "🥰", "😍", "😘", "😉", "😎", "🤔",
    "😢", "😭", "😡", "😴", "🥺", "😅", "🙃", "🤗",
    "👍", "👎", "👏", "🙏", "👋", "💪", "🤝", "✌️",
    "❤️", "💕", "💘", "💔", "🫶🏻", "✨", "🔥", "🎉",
    "🌹", "🌙", "☀️", "⭐", "🍕", "☕", "🎵", "💯",
];

pub const COLUMNS: usize = 8;

pub fn rows() -> usize {
    PALETTE.len().div_ceil(COLUMNS)
}

pub fn glyph(index: usize) -> Option<&'static str> {
    PALETTE.get(index).copied()
}

/// Selection cursor over the palette grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaletteCursor {
    pub index: usize,
}

impl PaletteCursor {
    pub fn left(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.index = (self.index + 1).min(PALETTE.len() - 1);
    }

    pub fn up(&mut self) {
        if self.index >= COLUMNS {
            self.index -= COLUMNS;
        }
    }

    pub fn down(&mut self) {
        if self.index + COLUMNS < PALETTE.len() {
            self.index += COLUMNS;
        }
    }

    pub fn row(&self) -> usize {
        self.index / COLUMNS
    }

    pub fn column(&self) -> usize {
        self.index % COLUMNS
    }

    pub fn selected(&self) -> &'static str {
        glyph(self.index).unwrap_or(PALETTE[0])
    }
}
