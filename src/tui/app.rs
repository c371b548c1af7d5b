use std::io::stdout;
use std::time::Duration;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Terminal,
};

use super::host_form_state::HostFormState;
use super::theme::{self, Theme};
use crate::commands::save::request_from_page;
use crate::controller::{HostManagement, IndexPage, SaveRequest};
use crate::error::Result;
use crate::messages::{Language, Response};
use crate::models::HostInput;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Save,
    Quit,
}

/// Editable copy of the settings page. Nothing is stored until saved.
pub struct App {
    pub page: IndexPage,
    pub hosts: Vec<HostInput>,
    pub status: bool,
    pub selected: usize,
    pub form: Option<HostFormState>,
    pub response: Option<Response>,
    pub dirty: bool,
}

impl App {
    pub fn new(page: IndexPage) -> Self {
        let request = request_from_page(&page);
        App {
            page,
            hosts: request.hosts,
            status: request.status,
            selected: 0,
            form: None,
            response: None,
            dirty: false,
        }
    }

    /// Swaps in a freshly loaded page, keeping the last response.
    pub fn reload(&mut self, page: IndexPage) {
        let response = self.response.take();
        *self = App::new(page);
        self.response = response;
    }

    pub fn request(&self) -> SaveRequest {
        SaveRequest { hosts: self.hosts.clone(), status: self.status }
    }

    fn clamp(&mut self) {
        if self.selected >= self.hosts.len() {
            self.selected = self.hosts.len().saturating_sub(1);
        }
    }

    fn submit_form(&mut self) {
        if let Some(form) = self.form.take() {
            let input = form.to_input();
            if input.default {
                self.hosts.iter_mut().for_each(|h| h.default = false);
            }
            self.hosts.push(input);
            self.selected = self.hosts.len() - 1;
            self.dirty = true;
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Action {
        let Some(form) = self.form.as_mut() else {
            return Action::None;
        };
        match code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left | KeyCode::Right => form.toggle(),
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Enter if form.selected_field == HostFormState::SUBMIT => self.submit_form(),
            KeyCode::Enter => form.next_field(),
            KeyCode::Char(c) => form.push_char(c),
            _ => {}
        }
        Action::None
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        if self.form.is_some() {
            return self.handle_form_key(code);
        }
        match code {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                self.selected = self.selected.saturating_add(1);
                self.clamp();
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.hosts.len().saturating_sub(1),
            KeyCode::Char('a') => self.form = Some(HostFormState::default()),
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.selected < self.hosts.len() {
                    self.hosts.remove(self.selected);
                    self.clamp();
                    self.dirty = true;
                }
            }
            KeyCode::Char(' ') => {
                if self.selected < self.hosts.len() {
                    let selected = self.selected;
                    self.hosts.iter_mut().enumerate().for_each(|(i, h)| h.default = i == selected);
                    self.dirty = true;
                }
            }
            KeyCode::Char('p') => {
                if let Some(host) = self.hosts.get_mut(self.selected) {
                    host.protocol = Some(match host.protocol.as_deref() {
                        Some("https") => "http".to_string(),
                        _ => "https".to_string(),
                    });
                    self.dirty = true;
                }
            }
            KeyCode::Char('e') => {
                self.status = !self.status;
                self.dirty = true;
            }
            KeyCode::Char('s') => return Action::Save,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
            _ => {}
        }
        Action::None
    }
}

fn host_line<'a>(host: &'a HostInput, theme: &Theme) -> Line<'a> {
    let mut spans = vec![
        Span::styled(
            format!("{}://", host.protocol.as_deref().unwrap_or("?")),
            Style::default().fg(theme.muted),
        ),
        Span::styled(host.hostname.as_deref().unwrap_or(""), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("/"),
    ];
    if host.default {
        spans.push(Span::styled("  [default]", Style::default().fg(theme.accent)));
    }
    Line::from(spans)
}

fn response_lines<'a>(app: &'a App, lang: &'a Language, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    if let Some(err) = &app.page.read_error {
        lines.push(Line::from(Span::styled(err.as_str(), Style::default().fg(theme.error))));
    }
    if let Some(response) = &app.response {
        for (key, text) in response.error.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("{key}: "), Style::default().fg(theme.muted)),
                Span::styled(text, Style::default().fg(theme.error)),
            ]));
        }
        if let Some(success) = &response.success {
            lines.push(Line::from(Span::styled(
                format!("{}{success}", lang.get("msg_success_prefix")),
                Style::default().fg(theme.accent),
            )));
        }
    }
    if app.dirty {
        lines.push(Line::from(Span::styled("Unsaved changes, press 's' to save.", Style::default().fg(theme.muted))));
    }
    lines
}

fn draw_form(f: &mut Frame, form: &HostFormState, lang: &Language, theme: &Theme) {
    let area = f.area();
    let width = area.width.min(60);
    let height = area.height.min(6);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let focus = |i: usize| {
        if form.selected_field == i {
            Style::default().fg(theme.accent).add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(theme.fg)
        }
    };
    let lines = vec![
        Line::from(vec![
            Span::raw(format!("{}: ", lang.get("entry_host_protocol"))),
            Span::styled(form.protocol.as_str(), focus(HostFormState::PROTOCOL)),
        ]),
        Line::from(vec![
            Span::raw(format!("{}: ", lang.get("entry_hostname"))),
            Span::styled(format!("{}|", form.hostname), focus(HostFormState::HOSTNAME)),
        ]),
        Line::from(vec![
            Span::raw(format!("{}: ", lang.get("entry_default"))),
            Span::styled(if form.default { "[x]" } else { "[ ]" }, focus(HostFormState::DEFAULT)),
        ]),
        Line::from(Span::styled(format!("[ {} ]", lang.get("button_host_add")), focus(HostFormState::SUBMIT))),
    ];
    let p = Paragraph::new(lines)
        .block(Block::default().title(lang.get("button_host_add")).borders(Borders::ALL))
        .style(Style::default().bg(theme.bg).fg(theme.fg));
    f.render_widget(Clear, popup);
    f.render_widget(p, popup);
}

fn draw(f: &mut Frame, app: &App, list_state: &mut ListState, lang: &Language, theme: &Theme) {
    let vchunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5), Constraint::Length(6), Constraint::Length(3)])
        .split(f.area());

    let public = if app.page.public_dir.is_empty() { lang.get("text_dir_root") } else { app.page.public_dir.as_str() };
    let status = if app.status { lang.get("text_enabled") } else { lang.get("text_disabled") };
    let summary = Paragraph::new(vec![
        Line::from(format!("{}: {}", lang.get("text_dir_admin"), app.page.admin_dir)),
        Line::from(format!("{}: {public}", lang.get("text_dir_public"))),
        Line::from(vec![
            Span::raw(format!("{}: ", lang.get("text_status_title"))),
            Span::styled(status, Style::default().fg(if app.status { theme.accent } else { theme.muted })),
        ]),
    ])
    .block(Block::default().title(lang.get("heading_title")).borders(Borders::ALL));
    f.render_widget(summary, vchunks[0]);

    let items: Vec<ListItem> = app.hosts.iter().map(|h| ListItem::new(host_line(h, theme))).collect();
    let list = List::new(items)
        .block(Block::default().title(lang.get("text_hosts_title")).borders(Borders::ALL))
        .highlight_symbol("> ")
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    list_state.select((!app.hosts.is_empty()).then_some(app.selected));
    f.render_stateful_widget(list, vchunks[1], list_state);

    let messages = Paragraph::new(response_lines(app, lang, theme))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Messages").borders(Borders::ALL));
    f.render_widget(messages, vchunks[2]);

    let help = Paragraph::new("up/down move | a add | d remove | space default | p protocol | e enable/disable | s save | q quit")
        .style(Style::default().fg(theme.muted))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, vchunks[3]);

    if let Some(form) = &app.form {
        draw_form(f, form, lang, theme);
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(stdout(), LeaveAlternateScreen, Show);
}

/// Interactive host editor over the settings page.
pub fn run_tui(controller: &mut HostManagement) -> Result<()> {
    let theme = theme::load();
    let mut app = App::new(controller.index());
    let mut list_state = ListState::default();

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout())) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e.into());
        }
    };

    let result = loop {
        let lang = controller.language();
        if let Err(e) = terminal.draw(|f| draw(f, &app, &mut list_state, lang, &theme)) {
            break Err(e.into());
        }
        match event::poll(Duration::from_millis(150)) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => break Err(e.into()),
        }
        let Ok(Event::Key(k)) = event::read() else {
            continue;
        };
        if k.kind != KeyEventKind::Press {
            continue;
        }
        match app.handle_key(k.code) {
            Action::None => {}
            Action::Quit => break Ok(()),
            Action::Save => {
                let response = controller.save(&app.request());
                app.response = Some(response);
                app.reload(controller.index());
            }
        }
    };

    restore_terminal();
    result
}
