use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{
        block::{Position as TitlePosition, Title},
        Block, Borders, List, ListItem, ListState as ListSelection, Paragraph, Wrap,
    },
    Frame,
};

use crate::{
    api::SuggestionApi,
    controller::SiteController,
    suggestion::Suggestion,
    tui,
};

const TICK_RATE: Duration = Duration::from_millis(100);
const FORM_WIDTH: u16 = 72;
const FORM_HEIGHT: u16 = 27;

pub const EMPTY_LIST_MESSAGE: &str = "No suggestions yet! Be the first to help me out with a song idea.";

/// What the event loop has to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Submit,
}

/// Terminal front end around the site controller
pub struct App<A: SuggestionApi> {
    controller: SiteController<A>,
    selected_row: usize,
    exit: bool,
}

impl<A: SuggestionApi> App<A> {
    pub fn new(controller: SiteController<A>) -> Self {
        Self {
            controller,
            selected_row: 0,
            exit: false,
        }
    }

    pub fn controller(&self) -> &SiteController<A> {
        &self.controller
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    /// runs the application's main loop until the user quits
    pub async fn run(&mut self, terminal: &mut tui::Tui) -> io::Result<()> {
        terminal.draw(|frame| self.render_frame(frame))?;
        self.controller.load().await;

        while !self.exit {
            terminal.draw(|frame| self.render_frame(frame))?;

            if event::poll(TICK_RATE)? {
                if let Event::Key(key_event) = event::read()? {
                    if key_event.kind == KeyEventKind::Press
                        && self.handle_key_event(key_event) == Action::Submit
                    {
                        self.submit(terminal).await?;
                    }
                }
            }

            self.controller.tick(Instant::now());
        }
        Ok(())
    }

    // draws the in-flight state before waiting on the endpoint
    async fn submit(&mut self, terminal: &mut tui::Tui) -> io::Result<()> {
        let Some(payload) = self.controller.begin_submit() else {
            return Ok(());
        };
        terminal.draw(|frame| self.render_frame(frame))?;
        self.controller.send_submission(payload).await;
        self.selected_row = 0;
        Ok(())
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Action {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
            self.exit = true;
            return Action::None;
        }

        if self.controller.is_form_visible() {
            return self.handle_form_key(key_event);
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exit = true,
            KeyCode::Char('n') => self.controller.open_form(),
            KeyCode::Char('l') | KeyCode::Char(' ') => self.like_selected(),
            KeyCode::Up | KeyCode::Char('k') => self.selected_row = self.selected_row.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.controller.suggestions().len().saturating_sub(1);
                self.selected_row = (self.selected_row + 1).min(last);
            }
            _ => {}
        }
        Action::None
    }

    fn handle_form_key(&mut self, key_event: KeyEvent) -> Action {
        match key_event.code {
            KeyCode::Esc => {
                self.controller.close_form();
                return Action::None;
            }
            KeyCode::Enter => return Action::Submit,
            _ => {}
        }

        let form = self.controller.form_mut();
        match key_event.code {
            KeyCode::Tab => form.focus_next(),
            KeyCode::BackTab => form.focus_previous(),
            KeyCode::Backspace => form.delete_char(),
            KeyCode::Left => form.move_cursor_left(),
            KeyCode::Right => form.move_cursor_right(),
            KeyCode::Char(input_char) => form.enter_char(input_char),
            _ => {}
        }
        Action::None
    }

    fn like_selected(&mut self) {
        let id = self
            .controller
            .suggestions()
            .get(self.selected_row)
            .map(|suggestion| suggestion.id.clone());
        if let Some(id) = id {
            self.controller.like(&id);
        }
    }

    pub fn render_frame(&self, frame: &mut Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(3)])
            .split(frame.size());

        self.render_header(frame, layout[0]);
        self.render_list(frame, layout[1]);

        if self.controller.is_form_visible() {
            let area = centered_rect(frame.size(), FORM_WIDTH, FORM_HEIGHT);
            self.controller
                .form()
                .render(frame, area, self.controller.status());
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = Title::from(" Mashup Suggestions ".bold().magenta());
        let block = Block::default()
            .title(title.alignment(Alignment::Center))
            .borders(Borders::ALL)
            .border_set(border::THICK);

        let stats = Line::from(vec![
            format!("{} suggestions", self.controller.suggestions().len()).into(),
            "   ".into(),
            format!("{} likes", self.controller.total_likes()).into(),
        ]);
        let tagline = Line::from("Help me create the perfect mashup".italic());

        frame.render_widget(
            Paragraph::new(vec![tagline, stats]).centered().block(block),
            area,
        );
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let instructions = Title::from(Line::from(vec![
            " Suggest Song ".into(),
            "<N>".yellow().bold(),
            " Like ".into(),
            "<L>".yellow().bold(),
            " Move ".into(),
            "<J/K>".yellow().bold(),
            " Quit ".into(),
            "<Q> ".yellow().bold(),
        ]));
        let block = Block::default()
            .title(Title::from(" What You've Suggested So Far ").alignment(Alignment::Center))
            .title(
                instructions
                    .alignment(Alignment::Center)
                    .position(TitlePosition::Bottom),
            )
            .borders(Borders::ALL)
            .border_set(border::THICK);

        let suggestions = self.controller.suggestions();
        if suggestions.is_empty() {
            frame.render_widget(
                Paragraph::new(EMPTY_LIST_MESSAGE.dark_gray())
                    .centered()
                    .wrap(Wrap { trim: true })
                    .block(block),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = suggestions.iter().map(suggestion_to_item).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::new().reversed())
            .highlight_symbol(">> ");

        let mut selection = ListSelection::default().with_selected(Some(self.selected_row));
        frame.render_stateful_widget(list, area, &mut selection);
    }
}

fn suggestion_to_item(suggestion: &Suggestion) -> ListItem<'static> {
    let mut lines = vec![Line::from(vec![
        Span::from(format!("\"{}\" by {}", suggestion.song1, suggestion.artist1)).bold(),
        Span::from(format!("   \u{2665} {}", suggestion.likes)).magenta(),
    ])];

    if suggestion.has_second_song() {
        lines.push(Line::from(
            format!("  + \"{}\" by {}", suggestion.song2, suggestion.artist2).bold(),
        ));
    }
    if !suggestion.reason.is_empty() {
        lines.push(Line::from(format!("  \"{}\"", suggestion.reason).italic()));
    }
    lines.push(Line::from(
        format!(
            "  Suggested by {} on {}",
            suggestion.suggester_name,
            suggestion.timestamp.format("%Y-%m-%d")
        )
        .dark_gray(),
    ));
    lines.push(Line::default());

    ListItem::new(Text::from(lines))
}

// fixed size box in the middle of `area`, shrunk to fit small terminals
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
