use ratatui::layout::Rect;
use crate::emoji::PaletteCursor;
use crate::history::{HistoryStore, Transcript};
use crate::state::ChatTurn;

/// Shown in place of a reply when the chat request fails for any reason
pub const FALLBACK_REPLY: &str = "Oops! Something went wrong 😢";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteMove {
    Left,
    Right,
    Up,
    Down,
}

/// Everything that can change the app state
#[derive(Debug)]
pub enum Action {
    // Draft editing
    InsertChar(char),
    InsertEmoji(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,

    // Dispatch
    Submit,
    Settle(anyhow::Result<String>),

    // Popups
    ToggleEmoji,
    MovePalette(PaletteMove),
    ToggleMenu,
    ClearChat,
    Dismiss,

    // View
    ScrollUp(u16),
    ScrollDown(u16),
    Tick,
    Quit,
}

/// Work the event loop has to carry out on behalf of [`App::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Dispatch { message: String },
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub title: String,

    // Conversation
    pub transcript: Transcript,
    pub store: HistoryStore,
    pub awaiting_reply: bool,

    // Draft
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Popups
    pub emoji_open: bool,
    pub palette: PaletteCursor,
    pub menu_open: bool,

    // Transcript viewport
    pub scroll: u16,
    pub follow: bool,       // keep the newest turn in view
    pub chat_height: u16,   // Height of chat area for scroll calculations
    pub chat_width: u16,    // Width of chat area for wrap calculations
    pub content_height: usize, // wrapped transcript lines, measured during render
    pub chat_area: Option<Rect>, // for mouse hit-testing (updated during render)

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl App {
    pub fn new(store: HistoryStore, title: impl Into<String>) -> Self {
        let transcript = store.load();

        Self {
            should_quit: false,
            title: title.into(),

            transcript,
            store,
            awaiting_reply: false,

            input: String::new(),
            cursor: 0,

            emoji_open: false,
            palette: PaletteCursor::default(),
            menu_open: false,

            scroll: 0,
            follow: true,
            chat_height: 0,
            chat_width: 0,
            content_height: 0,
            chat_area: None,

            animation_frame: 0,
        }
    }

    /// Apply one action. Returns the request to issue, if any.
    pub fn update(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::InsertChar(c) => {
                let byte_pos = char_to_byte_index(&self.input, self.cursor);
                self.input.insert(byte_pos, c);
                self.cursor += 1;
            }
            Action::InsertEmoji(glyph) => {
                let byte_pos = char_to_byte_index(&self.input, self.cursor);
                self.input.insert_str(byte_pos, &glyph);
                self.cursor += glyph.chars().count();
            }
            Action::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let byte_pos = char_to_byte_index(&self.input, self.cursor);
                    self.input.remove(byte_pos);
                }
            }
            Action::Delete => {
                if self.cursor < self.input.chars().count() {
                    let byte_pos = char_to_byte_index(&self.input, self.cursor);
                    self.input.remove(byte_pos);
                }
            }
            Action::CursorLeft => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Action::CursorRight => {
                self.cursor = (self.cursor + 1).min(self.input.chars().count());
            }
            Action::CursorHome => self.cursor = 0,
            Action::CursorEnd => self.cursor = self.input.chars().count(),

            Action::Submit => return self.submit(),
            Action::Settle(result) => self.settle(result),

            Action::ToggleEmoji => {
                self.emoji_open = !self.emoji_open;
                if self.emoji_open {
                    self.menu_open = false;
                }
            }
            Action::MovePalette(direction) => match direction {
                PaletteMove::Left => self.palette.left(),
                PaletteMove::Right => self.palette.right(),
                PaletteMove::Up => self.palette.up(),
                PaletteMove::Down => self.palette.down(),
            },
            Action::ToggleMenu => {
                self.menu_open = !self.menu_open;
                if self.menu_open {
                    self.emoji_open = false;
                }
            }
            Action::ClearChat => self.clear_chat(),
            Action::Dismiss => {
                if self.menu_open {
                    self.menu_open = false;
                } else if self.emoji_open {
                    self.emoji_open = false;
                } else {
                    self.should_quit = true;
                }
            }

            Action::ScrollUp(lines) => {
                self.follow = false;
                self.scroll = self.scroll.saturating_sub(lines);
            }
            Action::ScrollDown(lines) => {
                let max_scroll = self.max_scroll();
                self.scroll = self.scroll.saturating_add(lines).min(max_scroll);
                if self.scroll >= max_scroll {
                    self.follow = true;
                }
            }
            Action::Tick => self.tick_animation(),
            Action::Quit => self.should_quit = true,
        }
        None
    }

    fn submit(&mut self) -> Option<Effect> {
        if self.input.trim().is_empty() {
            return None;
        }
        if self.awaiting_reply {
            tracing::debug!("send ignored while a reply is outstanding");
            return None;
        }

        let message = std::mem::take(&mut self.input);
        self.cursor = 0;
        self.push_turn(ChatTurn::user(message.clone()));
        self.awaiting_reply = true;
        self.emoji_open = false;

        Some(Effect::Dispatch { message })
    }

    fn settle(&mut self, result: anyhow::Result<String>) {
        let turn = match result {
            Ok(text) => ChatTurn::assistant(text),
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                ChatTurn::assistant(FALLBACK_REPLY)
            }
        };
        self.push_turn(turn);
        self.awaiting_reply = false;
        self.animation_frame = 0;
    }

    fn clear_chat(&mut self) {
        self.transcript = match self.store.clear() {
            Ok(transcript) => transcript,
            Err(e) => {
                tracing::warn!(error = %e, "could not remove saved history");
                Transcript::seeded(self.store.greeting())
            }
        };
        self.menu_open = false;
        self.follow = true;
        self.scroll = 0;
    }

    fn push_turn(&mut self, turn: ChatTurn) {
        self.transcript.push(turn);
        self.follow = true;
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.transcript) {
            tracing::warn!(error = %e, "could not save history");
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.awaiting_reply {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Furthest the transcript can scroll while still filling the viewport
    pub fn max_scroll(&self) -> u16 {
        let overflow = self.content_height.saturating_sub(self.chat_height as usize);
        u16::try_from(overflow).unwrap_or(u16::MAX)
    }

    /// Scroll chat to bottom so the newest turn (or "Typing...") is visible
    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }
}
