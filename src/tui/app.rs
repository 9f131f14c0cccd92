// app state for the tui

use crate::core::ChatReply;
use crate::tui::session::ChatSession;
use crate::tui::theme::{Theme, ThemeKind, detect_theme};
use crate::Error;

pub struct App {
    pub running: bool,
    pub session: ChatSession,
    pub api_base: String,

    // input line, cursor counted in chars
    pub input: String,
    pub cursor: usize,
    history_index: Option<usize>,

    // lines scrolled up from the bottom of the transcript
    pub scroll: u16,

    pub last_model: Option<String>,
    pub last_latency: Option<String>,

    pub theme_kind: ThemeKind,
    pub theme: Theme,
}

impl App {
    pub fn new(api_base: &str) -> Self {
        Self::with_theme(api_base, detect_theme())
    }

    pub fn with_theme(api_base: &str, theme_kind: ThemeKind) -> Self {
        Self {
            running: true,
            session: ChatSession::new(),
            api_base: api_base.to_string(),
            input: String::new(),
            cursor: 0,
            history_index: None,
            scroll: 0,
            last_model: None,
            last_latency: None,
            theme_kind,
            theme: Theme::from_kind(theme_kind),
        }
    }

    pub fn cycle_theme(&mut self) {
        self.theme_kind = self.theme_kind.next();
        self.theme = Theme::from_kind(self.theme_kind);
    }

    // input editing
    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.input.insert(idx, c);
        self.cursor += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index();
            self.input.remove(idx);
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.input.chars().count() {
            let idx = self.byte_index();
            self.input.remove(idx);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    // recall earlier messages
    pub fn history_up(&mut self) {
        let sent: Vec<&str> = self.session.sent().collect();
        if sent.is_empty() {
            return;
        }
        let i = match self.history_index {
            None => sent.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.input = sent[i].to_string();
        self.history_index = Some(i);
        self.move_cursor_end();
    }

    pub fn history_down(&mut self) {
        let Some(i) = self.history_index else {
            return;
        };
        let next = self.session.sent().nth(i + 1).map(str::to_string);
        match next {
            Some(text) => {
                self.input = text;
                self.history_index = Some(i + 1);
                self.move_cursor_end();
            }
            None => {
                self.history_index = None;
                self.clear_input();
            }
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_add(3);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_sub(3);
    }

    /// Keeps the scroll offset within the rows that are actually off screen.
    pub fn clamp_scroll(&mut self, max: u16) {
        self.scroll = self.scroll.min(max);
    }

    /// Hands the input to the session. The input stays put if the session
    /// refuses it (blank, or a send already running).
    pub fn submit(&mut self) -> Option<String> {
        let message = self.session.begin_send(&self.input)?;
        self.clear_input();
        self.history_index = None;
        self.scroll = 0;
        Some(message)
    }

    pub fn finish(&mut self, outcome: Result<ChatReply, Error>) {
        if let Ok(reply) = &outcome {
            self.last_model = Some(reply.model.clone()).filter(|m| !m.is_empty());
            self.last_latency = Some(reply.response_time.clone()).filter(|t| !t.is_empty());
        }
        self.session.finish(outcome);
        self.scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::with_theme("http://127.0.0.1:3000", ThemeKind::Dark)
    }

    #[test]
    fn test_scroll_clamped_to_overflow() {
        let mut app = app();
        for _ in 0..50 {
            app.scroll_up();
        }
        app.clamp_scroll(4);
        assert_eq!(app.scroll, 4);

        // one press is enough to start moving back down
        app.scroll_down();
        assert_eq!(app.scroll, 1);
    }

    #[test]
    fn test_unicode_editing() {
        let mut app = app();
        for c in "héllo".chars() {
            app.insert_char(c);
        }
        app.move_cursor_left();
        app.delete_char();
        assert_eq!(app.input, "hélo");
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn test_history_recall() {
        let mut app = app();
        app.session.begin_send("first");
        app.finish(Err(Error::Transport("down".to_string())));
        app.session.begin_send("second");
        app.finish(Err(Error::Transport("down".to_string())));

        app.history_up();
        assert_eq!(app.input, "second");
        app.history_up();
        assert_eq!(app.input, "first");
        app.history_down();
        assert_eq!(app.input, "second");
        app.history_down();
        assert!(app.input.is_empty());
    }
}
