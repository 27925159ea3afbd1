// Single line text input used by the suggestion form.
// Cursor positions count chars, not bytes.

use ratatui::{
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Editing,
}

/// TextBox holds the state of the widget
#[derive(Debug, Clone)]
pub struct TextBox {
    /// Label shown before the text
    label: &'static str,
    /// Hint shown while the box is empty
    placeholder: &'static str,
    /// Required boxes gate the submit button
    required: bool,
    /// Current value of the input box
    input: String,
    /// Position of cursor in the editor area, in chars
    cursor_position: usize,
    /// Current input mode
    pub input_mode: InputMode,
}

impl TextBox {
    pub const fn new(label: &'static str, placeholder: &'static str, required: bool) -> Self {
        Self {
            label,
            placeholder,
            required,
            input: String::new(),
            cursor_position: 0,
            input_mode: InputMode::Normal,
        }
    }

    /// A required box is satisfied once it holds any text.
    pub fn is_satisfied(&self) -> bool {
        !self.required || !self.input.is_empty()
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_right);
    }

    pub fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index();
        self.input.insert(index, new_char);
        self.move_cursor_right();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }

        let current_index = self.cursor_position;
        let before_char_to_delete = self.input.chars().take(current_index - 1);
        let after_char_to_delete = self.input.chars().skip(current_index);

        self.input = before_char_to_delete.chain(after_char_to_delete).collect();
        self.move_cursor_left();
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input.len())
    }

    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.min(self.input.chars().count())
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.cursor_position = self.input.chars().count();
    }

    pub fn set_input_mode(&mut self, input_mode: InputMode) {
        self.input_mode = input_mode;
    }

    pub fn get_input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn get_input(&self) -> &str {
        &self.input
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn get_widget(&self) -> Paragraph<'static> {
        let marker = if self.required { "*" } else { "" };
        let label = Span::from(format!(" {}{}: ", self.label, marker));
        let value = if self.input.is_empty() {
            Span::styled(self.placeholder, Style::new().dark_gray().italic())
        } else {
            Span::from(self.input.clone())
        };

        let line = match self.input_mode {
            InputMode::Normal => Line::from(vec![label, value]),
            InputMode::Editing => Line::from(vec![label.yellow().bold(), value.yellow()]),
        };
        Paragraph::new(line).left_aligned()
    }
}
