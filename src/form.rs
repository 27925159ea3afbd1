// this file contains the suggestion form widget logic

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{
        block::{Position as TitlePosition, Title},
        Block, Borders, Clear, Paragraph,
    },
    Frame,
};

use crate::{
    suggestion::NewSuggestion,
    text_box::{InputMode, TextBox},
};

pub const SUCCESS_MESSAGE: &str = "Thanks! Your suggestion has been submitted successfully!";
pub const ERROR_MESSAGE: &str = "Oops! Something went wrong. Please try again.";

/// Outcome of the last submission attempt, as shown by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Song1,
    Artist1,
    Song2,
    Artist2,
    SuggesterName,
    SuggesterEmail,
    Reason,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Song1,
        FormField::Artist1,
        FormField::Song2,
        FormField::Artist2,
        FormField::SuggesterName,
        FormField::SuggesterEmail,
        FormField::Reason,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// The seven inputs of a suggestion. Holds only the field values and focus;
/// submit status belongs to the caller and is passed in for rendering.
#[derive(Debug, Clone)]
pub struct SuggestionForm {
    boxes: [TextBox; 7],
    focus: usize,
}

impl Default for SuggestionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionForm {
    pub fn new() -> Self {
        let mut form = Self {
            boxes: [
                TextBox::new("Song Title", "Enter song title", true),
                TextBox::new("Artist", "Enter artist name", true),
                TextBox::new("Second Song", "Song title (optional)", false),
                TextBox::new("Second Artist", "Artist (optional)", false),
                TextBox::new("Your Name / @", "How should we credit you?", true),
                TextBox::new("Email", "Get notified when I create your mashup", false),
                TextBox::new("Why this song?", "Tell me why this would make a great mashup...", false),
            ],
            focus: 0,
        };
        form.boxes[0].set_input_mode(InputMode::Editing);
        form
    }

    pub fn field(&self, field: FormField) -> &TextBox {
        &self.boxes[field.index()]
    }

    pub fn set_field(&mut self, field: FormField, value: &str) {
        self.boxes[field.index()].set_input(value);
    }

    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focus]
    }

    pub fn focus(&mut self, field: FormField) {
        self.boxes[self.focus].set_input_mode(InputMode::Normal);
        self.focus = field.index();
        self.boxes[self.focus].set_input_mode(InputMode::Editing);
    }

    pub fn focus_next(&mut self) {
        let next = (self.focus + 1) % self.boxes.len();
        self.focus(FormField::ALL[next]);
    }

    pub fn focus_previous(&mut self) {
        let previous = (self.focus + self.boxes.len() - 1) % self.boxes.len();
        self.focus(FormField::ALL[previous]);
    }

    pub fn enter_char(&mut self, c: char) {
        self.boxes[self.focus].enter_char(c);
    }

    pub fn delete_char(&mut self) {
        self.boxes[self.focus].delete_char();
    }

    pub fn move_cursor_left(&mut self) {
        self.boxes[self.focus].move_cursor_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.boxes[self.focus].move_cursor_right();
    }

    /// True when song title, artist and name all hold text.
    pub fn is_valid(&self) -> bool {
        self.boxes.iter().all(TextBox::is_satisfied)
    }

    pub fn can_submit(&self, status: SubmitStatus) -> bool {
        self.is_valid() && status != SubmitStatus::Submitting
    }

    pub fn to_payload(&self) -> NewSuggestion {
        let value = |field: FormField| Some(self.field(field).get_input().to_string());
        NewSuggestion {
            song1: value(FormField::Song1),
            artist1: value(FormField::Artist1),
            song2: value(FormField::Song2),
            artist2: value(FormField::Artist2),
            suggester_name: value(FormField::SuggesterName),
            suggester_email: value(FormField::SuggesterEmail),
            reason: value(FormField::Reason),
        }
    }

    // clears all input fields and puts focus back on the first one
    pub fn clear_all_boxes(&mut self) {
        self.boxes.iter_mut().for_each(TextBox::clear_input);
        self.focus(FormField::Song1);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, status: SubmitStatus) {
        let instructions = Title::from(Line::from(vec![
            " Close ".into(),
            "<Esc>".yellow().bold(),
            " Next Field ".into(),
            "<Tab>".yellow().bold(),
            " Submit ".into(),
            "<Enter> ".yellow().bold(),
        ]));
        let block = Block::default()
            .borders(Borders::all())
            .border_set(symbols::border::THICK)
            .title(Title::from(" Suggest a Song for Me ".bold()).alignment(Alignment::Center))
            .title(
                instructions
                    .alignment(Alignment::Center)
                    .position(TitlePosition::Bottom),
            );

        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(self.boxes.iter().map(|_| Constraint::Length(3)));
        constraints.push(Constraint::Length(1));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(block.inner(area));

        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        let banner = match status {
            SubmitStatus::Success => Line::from(SUCCESS_MESSAGE.green().bold()),
            SubmitStatus::Error => Line::from(ERROR_MESSAGE.red().bold()),
            SubmitStatus::Idle | SubmitStatus::Submitting => Line::default(),
        };
        frame.render_widget(Paragraph::new(banner).centered(), rows[0]);

        for (text_box, row) in self.boxes.iter().zip(rows.iter().skip(1)) {
            let border_style = match text_box.get_input_mode() {
                InputMode::Editing => Style::new().yellow(),
                InputMode::Normal => Style::new(),
            };
            frame.render_widget(
                text_box
                    .get_widget()
                    .block(Block::default().borders(Borders::ALL).border_style(border_style)),
                *row,
            );
        }

        let button = match status {
            SubmitStatus::Submitting => Span::from("[ Submitting... ]").dark_gray(),
            _ if self.can_submit(status) => Span::from("[ Submit Suggestion ]").magenta().bold(),
            _ => Span::from("[ Submit Suggestion ]").dark_gray(),
        };
        if let Some(row) = rows.last() {
            frame.render_widget(Paragraph::new(Line::from(button)).centered(), *row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SuggestionForm {
        let mut form = SuggestionForm::new();
        form.set_field(FormField::Song1, "Levitating");
        form.set_field(FormField::Artist1, "Dua Lipa");
        form.set_field(FormField::SuggesterName, "Alex");
        form
    }

    #[test]
    fn required_fields_gate_submit() {
        let mut form = filled();
        assert!(form.can_submit(SubmitStatus::Idle));
        assert!(form.can_submit(SubmitStatus::Error));

        form.set_field(FormField::Song1, "");
        assert!(!form.is_valid());
        assert!(!form.can_submit(SubmitStatus::Idle));
    }

    #[test]
    fn optional_fields_do_not_gate_submit() {
        let mut form = filled();
        form.set_field(FormField::SuggesterEmail, "");
        form.set_field(FormField::Reason, "");
        assert!(form.is_valid());
    }

    #[test]
    fn in_flight_submission_disables_submit() {
        assert!(!filled().can_submit(SubmitStatus::Submitting));
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = SuggestionForm::new();
        assert_eq!(form.focused(), FormField::Song1);

        form.focus_previous();
        assert_eq!(form.focused(), FormField::Reason);
        assert_eq!(form.field(FormField::Reason).get_input_mode(), InputMode::Editing);
        assert_eq!(form.field(FormField::Song1).get_input_mode(), InputMode::Normal);

        form.focus_next();
        form.focus_next();
        assert_eq!(form.focused(), FormField::Artist1);
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = SuggestionForm::new();
        form.focus(FormField::SuggesterName);
        "Yo".chars().for_each(|c| form.enter_char(c));
        assert_eq!(form.field(FormField::SuggesterName).get_input(), "Yo");
        assert_eq!(form.field(FormField::Song1).get_input(), "");
    }

    #[test]
    fn payload_carries_all_seven_fields() {
        let mut form = filled();
        form.set_field(FormField::Reason, "great drop");
        let payload = form.to_payload();
        assert_eq!(payload.song1.as_deref(), Some("Levitating"));
        assert_eq!(payload.suggester_name.as_deref(), Some("Alex"));
        assert_eq!(payload.reason.as_deref(), Some("great drop"));
        assert_eq!(payload.song2.as_deref(), Some(""));
        assert!(payload.validate().is_some());
    }

    #[test]
    fn clearing_resets_values_and_focus() {
        let mut form = filled();
        form.focus(FormField::Reason);
        form.clear_all_boxes();
        assert!(FormField::ALL.iter().all(|f| form.field(*f).get_input().is_empty()));
        assert_eq!(form.focused(), FormField::Song1);
    }
}
