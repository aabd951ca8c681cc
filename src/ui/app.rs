use std::mem;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use log::{debug, info};
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    Tabs, Wrap,
};
use ratatui::Frame;

use crate::dispatch::Dispatcher;
use crate::view::{
    Completion, CreationDialog, Debouncer, FieldKind, InventoryTab, Route, Task, MENU,
};

use super::forms::{field_cursor_offset, field_line, ConfirmDelete, RenameForm};
use super::helpers::{centered_rect, key_hints, page_title};
use super::screens::Screen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the navigation column on the left.
const MENU_WIDTH: u16 = 16;
/// Rows skipped by PageUp / PageDown.
const PAGE_STEP: isize = 10;

/// Fine-grained modes scoped to the current screen. Creation dialogs are not
/// a mode: they live on their page and survive closing.
enum Mode {
    Normal,
    Searching(SearchState),
    Renaming(RenameForm),
    ConfirmDelete(ConfirmDelete),
}

/// State for an active inline search.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    dispatcher: Dispatcher,
    route: Route,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    debouncer: Option<Debouncer<String>>,
}

impl App {
    /// Open `route` and start its first fetch. A zero `search_delay` applies
    /// search terms on every keystroke.
    pub fn new(dispatcher: Dispatcher, route: Route, search_delay: Duration) -> Self {
        let (screen, job) = Screen::open(route);
        let mut app = Self {
            dispatcher,
            route,
            screen,
            mode: Mode::Normal,
            status: None,
            debouncer: (!search_delay.is_zero()).then(|| Debouncer::new(search_delay)),
        };
        app.dispatcher.submit(job);
        app
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Replace the current page with a freshly mounted one.
    pub fn navigate(&mut self, route: Route) {
        info!("opening {route}");
        let (screen, job) = Screen::open(route);
        self.screen = screen;
        self.route = route;
        self.mode = Mode::Normal;
        if let Some(debouncer) = self.debouncer.as_mut() {
            debouncer.cancel();
        }
        self.dispatcher.submit(job);
    }

    /// Apply finished requests and any search term whose quiet period ended.
    /// Called once per frame.
    pub fn tick(&mut self) {
        while let Some(completion) = self.dispatcher.try_next() {
            self.apply(completion);
        }
        self.flush_search(Instant::now());
    }

    fn flush_search(&mut self, now: Instant) {
        let ready = self.debouncer.as_mut().and_then(|d| d.poll(now));
        if let Some(term) = ready {
            self.screen.set_search(term);
        }
    }

    fn apply(&mut self, completion: Completion) {
        if !self.screen.owns(&completion) {
            debug!(
                "dropping {:?} for a page that is no longer shown",
                completion.job.task
            );
            return;
        }

        let outcome = match (&completion.job.task, completion.result.is_ok()) {
            (Task::Rename { .. }, true) => Some("Saved."),
            (Task::Delete { .. }, true) => Some("Deleted."),
            _ => None,
        };
        let was_submitting = self.screen.dialog().map(|d| d.is_submitting());

        let jobs = self.screen.complete(completion);

        match (was_submitting, self.screen.dialog().map(|d| d.is_submitting())) {
            (Some(true), None) => self.set_status("Saved.", StatusKind::Info),
            (Some(true), Some(false)) => self.clear_status(),
            _ => {
                if let Some(text) = outcome {
                    self.set_status(text, StatusKind::Info);
                }
            }
        }
        self.dispatcher.submit_all(jobs);
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.screen.dialog().is_some() {
            self.handle_dialog_key(code);
            return false;
        }

        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        let mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::Renaming(form) => self.handle_rename(code, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        self.mode = mode;
        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Char(digit @ '1'..='4') => {
                let index = digit as usize - '1' as usize;
                if let Some((_, route)) = MENU.get(index) {
                    self.clear_status();
                    self.navigate(*route);
                }
            }
            KeyCode::Up => self.screen.move_selection(-1),
            KeyCode::Down => self.screen.move_selection(1),
            KeyCode::PageUp => self.screen.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.screen.move_selection(PAGE_STEP),
            KeyCode::Home => self.screen.move_selection(isize::MIN / 2),
            KeyCode::End => self.screen.move_selection(isize::MAX / 2),
            KeyCode::Char('/') | KeyCode::Char('f') => {
                return Mode::Searching(SearchState {
                    query: self.screen.search().to_string(),
                });
            }
            KeyCode::Char('r') => {
                let job = self.screen.reload();
                self.dispatcher.submit(job);
            }
            KeyCode::Char('+') | KeyCode::Char('a') => self.open_dialog(),
            KeyCode::Char('e') | KeyCode::Char('E') => return self.begin_rename(),
            KeyCode::Char('-') | KeyCode::Delete => return self.begin_delete(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.sell_selected(),
            KeyCode::Tab | KeyCode::BackTab => self.switch_tab(),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
        Mode::Normal
    }

    fn handle_dialog_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.screen.close_dialog();
                self.set_status("Cancelled.", StatusKind::Info);
            }
            KeyCode::Enter => self.submit_dialog(),
            other => {
                let Some(dialog) = self.screen.dialog_mut() else {
                    return;
                };
                match other {
                    KeyCode::Tab | KeyCode::BackTab => dialog.next_field(),
                    KeyCode::Up => dialog.cycle_option(-1),
                    KeyCode::Down => dialog.cycle_option(1),
                    KeyCode::Backspace => dialog.backspace(),
                    KeyCode::Char(ch) => {
                        dialog.push_char(ch);
                    }
                    _ => {}
                }
            }
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.apply_search_now(String::new());
                return Mode::Normal;
            }
            KeyCode::Enter => {
                self.apply_search_now(state.query);
                return Mode::Normal;
            }
            KeyCode::Up => self.screen.move_selection(-1),
            KeyCode::Down => self.screen.move_selection(1),
            KeyCode::Backspace => {
                state.query.pop();
                self.queue_search(state.query.clone());
            }
            KeyCode::Char(ch) => {
                state.query.push(ch);
                self.queue_search(state.query.clone());
            }
            _ => {}
        }
        Mode::Searching(state)
    }

    fn handle_rename(&mut self, code: KeyCode, mut form: RenameForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_inputs() {
                Ok(name) => {
                    if let Some(job) = self.screen.update(form.id, name) {
                        self.set_status(format!("Saving {}...", form.noun), StatusKind::Info);
                        self.dispatcher.submit(job);
                    }
                    return Mode::Normal;
                }
                Err(err) => form.error = Some(err.to_string()),
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Renaming(form)
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(job) = self.screen.delete(confirm.id) {
                    self.set_status(format!("Deleting {}...", confirm.noun), StatusKind::Info);
                    self.dispatcher.submit(job);
                }
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn queue_search(&mut self, term: String) {
        match self.debouncer.as_mut() {
            Some(debouncer) => debouncer.push(term, Instant::now()),
            None => self.screen.set_search(term),
        }
    }

    fn apply_search_now(&mut self, term: String) {
        if let Some(debouncer) = self.debouncer.as_mut() {
            debouncer.cancel();
        }
        self.screen.set_search(term);
    }

    fn open_dialog(&mut self) {
        if !self.screen.has_dialog() {
            return;
        }
        self.clear_status();
        if let Some(job) = self.screen.open_dialog() {
            self.dispatcher.submit(job);
        }
    }

    fn submit_dialog(&mut self) {
        if self.screen.dialog().is_some_and(|d| d.is_submitting()) {
            return;
        }
        match self.screen.submit_dialog() {
            Some(job) => {
                self.set_status("Saving...", StatusKind::Info);
                self.dispatcher.submit(job);
            }
            None => self.set_status("Fill in the required fields first.", StatusKind::Error),
        }
    }

    fn begin_rename(&mut self) -> Mode {
        let Some(noun) = self.screen.noun() else {
            return Mode::Normal;
        };
        match self.screen.selected_row() {
            Some((id, label)) => {
                self.clear_status();
                Mode::Renaming(RenameForm::new(id, noun, &label))
            }
            None => {
                self.set_status(format!("No {noun} selected to edit."), StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn begin_delete(&mut self) -> Mode {
        let Some(noun) = self.screen.noun() else {
            return Mode::Normal;
        };
        match self.screen.selected_row() {
            Some((id, label)) => {
                self.clear_status();
                Mode::ConfirmDelete(ConfirmDelete::new(id, noun, label))
            }
            None => {
                self.set_status(format!("No {noun} selected to remove."), StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn sell_selected(&mut self) {
        let Screen::Shop(page) = &mut self.screen else {
            return;
        };
        let Some((id, title)) = page.selected_book().map(|b| (b.id, b.title.clone())) else {
            return;
        };
        if page.sell(id) {
            self.set_status(format!("Sold \"{title}\"."), StatusKind::Info);
        } else {
            self.set_status(format!("\"{title}\" is already sold."), StatusKind::Error);
        }
    }

    fn switch_tab(&mut self) {
        let Screen::Inventory(page) = &mut self.screen else {
            return;
        };
        if let Some(job) = page.select_tab(page.tab().toggled()) {
            self.dispatcher.submit(job);
        }
    }

    fn open_selected(&mut self) {
        match &self.screen {
            Screen::Stores(_) => {
                if let Some((id, _)) = self.screen.selected_row() {
                    self.clear_status();
                    self.navigate(Route::StoreInventory(id));
                }
            }
            Screen::Shop(page) => {
                let Some(book) = page.selected_book() else {
                    return;
                };
                let link = book.cover.trim().to_string();
                let title = book.title.clone();
                if link.is_empty() {
                    self.set_status("This book does not have a cover.", StatusKind::Error);
                } else if let Err(err) = open_link(&link) {
                    self.set_status(format!("Failed to open link: {err}"), StatusKind::Error);
                } else {
                    self.set_status(format!("Opened cover of \"{title}\"."), StatusKind::Info);
                }
            }
            _ => {}
        }
    }

    fn go_back(&mut self) {
        if matches!(self.screen, Screen::Inventory(_)) {
            self.clear_status();
            self.navigate(Route::Stores);
        } else if !self.screen.search().is_empty() {
            self.apply_search_now(String::new());
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(MENU_WIDTH), Constraint::Min(0)])
            .split(content_area);
        self.draw_menu(frame, columns[0]);

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(columns[1]);
        self.draw_search_bar(frame, sections[0]);

        match &self.screen {
            Screen::Shop(page) => {
                let rows = page
                    .visible()
                    .into_iter()
                    .map(|book| {
                        let style = if book.sold {
                            Style::default()
                                .fg(Color::DarkGray)
                                .add_modifier(Modifier::CROSSED_OUT)
                        } else {
                            Style::default()
                        };
                        Row::new(vec![
                            Cell::from(book.title.clone()),
                            Cell::from(book.author.clone()),
                            Cell::from(book.stores.join(", ")),
                            Cell::from(book.pages.to_string()),
                            Cell::from(if book.sold { "SOLD" } else { "In stock" }),
                        ])
                        .style(style)
                    })
                    .collect();
                self.draw_table(
                    frame,
                    sections[1],
                    &["Title", "Author", "Available at", "Pages", ""],
                    &[
                        Constraint::Percentage(35),
                        Constraint::Percentage(25),
                        Constraint::Percentage(25),
                        Constraint::Length(6),
                        Constraint::Length(9),
                    ],
                    rows,
                    page.selected(),
                );
            }
            Screen::Books(page) => {
                let rows = page
                    .visible()
                    .into_iter()
                    .map(|book| {
                        Row::new(vec![
                            book.id.to_string(),
                            book.title.clone(),
                            book.author.clone(),
                            book.pages.to_string(),
                        ])
                    })
                    .collect();
                self.draw_table(
                    frame,
                    sections[1],
                    &["ID", "Title", "Author", "Pages"],
                    &[
                        Constraint::Length(6),
                        Constraint::Percentage(50),
                        Constraint::Percentage(35),
                        Constraint::Length(6),
                    ],
                    rows,
                    page.selected(),
                );
            }
            Screen::Authors(page) => {
                let rows = page
                    .visible()
                    .into_iter()
                    .map(|author| Row::new(vec![author.id.to_string(), author.name.clone()]))
                    .collect();
                self.draw_table(
                    frame,
                    sections[1],
                    &["ID", "Name"],
                    &[Constraint::Length(6), Constraint::Min(0)],
                    rows,
                    page.selected(),
                );
            }
            Screen::Stores(page) => {
                let rows = page
                    .visible()
                    .into_iter()
                    .map(|store| {
                        Row::new(vec![
                            store.id.to_string(),
                            store.name.clone(),
                            store.location.clone(),
                        ])
                    })
                    .collect();
                self.draw_table(
                    frame,
                    sections[1],
                    &["ID", "Name", "Location"],
                    &[
                        Constraint::Length(6),
                        Constraint::Percentage(45),
                        Constraint::Percentage(45),
                    ],
                    rows,
                    page.selected(),
                );
            }
            Screen::Inventory(page) => {
                let parts = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(3), Constraint::Min(0)])
                    .split(sections[1]);
                let titles = [InventoryTab::Books, InventoryTab::Authors].map(|t| t.title());
                let selected_tab = match page.tab() {
                    InventoryTab::Books => 0,
                    InventoryTab::Authors => 1,
                };
                let tabs = Tabs::new(titles)
                    .block(Block::default().borders(Borders::ALL))
                    .select(selected_tab)
                    .highlight_style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    );
                frame.render_widget(tabs, parts[0]);

                match page.tab() {
                    InventoryTab::Books => {
                        let rows = page
                            .visible_books()
                            .into_iter()
                            .map(|book| {
                                Row::new(vec![
                                    book.id.to_string(),
                                    book.title.clone(),
                                    book.pages.to_string(),
                                ])
                            })
                            .collect();
                        self.draw_table(
                            frame,
                            parts[1],
                            &["ID", "Title", "Pages"],
                            &[
                                Constraint::Length(6),
                                Constraint::Min(0),
                                Constraint::Length(6),
                            ],
                            rows,
                            page.selected(),
                        );
                    }
                    InventoryTab::Authors => {
                        let rows = page
                            .visible_authors()
                            .into_iter()
                            .map(|author| {
                                Row::new(vec![author.id.to_string(), author.name.clone()])
                            })
                            .collect();
                        self.draw_table(
                            frame,
                            parts[1],
                            &["ID", "Name"],
                            &[Constraint::Length(6), Constraint::Min(0)],
                            rows,
                            page.selected(),
                        );
                    }
                }
            }
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Some(dialog) = self.screen.dialog() {
            self.draw_dialog(frame, area, dialog);
            return;
        }
        match &self.mode {
            Mode::Renaming(form) => self.draw_rename_form(frame, area, form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(_) | Mode::Normal => {}
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = MENU
            .iter()
            .enumerate()
            .map(|(index, (label, _))| ListItem::new(format!("{} {label}", index + 1)))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Bookstore "))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(self.route.menu_index());
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(page_title(&self.screen.title(), self.screen.is_loading()));
        let inner = block.inner(area);

        let line = match &self.mode {
            Mode::Searching(state) => Line::from(format!("Search: {}", state.query)),
            _ if self.screen.search().is_empty() => Line::from(Span::styled(
                "Search: press / to filter",
                Style::default().fg(Color::DarkGray),
            )),
            _ => Line::from(format!("Search: {}", self.screen.search())),
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        if let Mode::Searching(state) = &self.mode {
            let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }

    fn draw_table(
        &self,
        frame: &mut Frame,
        area: Rect,
        header: &[&'static str],
        widths: &[Constraint],
        rows: Vec<Row<'static>>,
        selected: usize,
    ) {
        let block = Block::default().borders(Borders::ALL);
        if rows.is_empty() {
            let message = if self.screen.is_loading() {
                "Loading...".to_string()
            } else if self.screen.search().is_empty() {
                "Nothing here yet.".to_string()
            } else {
                format!("No matches for \"{}\".", self.screen.search())
            };
            let paragraph = Paragraph::new(Span::styled(
                message,
                Style::default().fg(Color::DarkGray),
            ))
            .block(block)
            .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(header.iter().copied())
            .style(Style::default().add_modifier(Modifier::BOLD));
        let table = Table::new(rows, widths.iter().copied())
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = TableState::default().with_selected(Some(selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        if self.screen.dialog().is_some() {
            return key_hints(&[
                ("Enter", "Submit"),
                ("Tab", "Next Field"),
                ("↑↓", "Choose"),
                ("Esc", "Close"),
            ]);
        }
        match (&self.screen, &self.mode) {
            (_, Mode::Searching(_)) => key_hints(&[
                ("↑↓", "Navigate"),
                ("Enter", "Keep Filter"),
                ("Esc", "Clear"),
            ]),
            (_, Mode::Renaming(_)) => key_hints(&[("Enter", "Save"), ("Esc", "Cancel")]),
            (_, Mode::ConfirmDelete(_)) => key_hints(&[("Y", "Delete"), ("N/Esc", "Keep")]),
            (Screen::Shop(_), Mode::Normal) => key_hints(&[
                ("1-4", "Pages"),
                ("/", "Search"),
                ("S", "Sell"),
                ("Enter", "Open Cover"),
                ("r", "Reload"),
                ("q", "Quit"),
            ]),
            (Screen::Stores(_), Mode::Normal) => key_hints(&[
                ("1-4", "Pages"),
                ("/", "Search"),
                ("+", "Add"),
                ("E", "Rename"),
                ("-", "Delete"),
                ("Enter", "Inventory"),
                ("q", "Quit"),
            ]),
            (Screen::Inventory(_), Mode::Normal) => key_hints(&[
                ("Tab", "Books/Authors"),
                ("/", "Search"),
                ("+", "Add Stock"),
                ("E", "Rename"),
                ("-", "Delete"),
                ("Esc", "Back"),
                ("q", "Quit"),
            ]),
            (_, Mode::Normal) => key_hints(&[
                ("1-4", "Pages"),
                ("/", "Search"),
                ("+", "Add"),
                ("E", "Rename"),
                ("-", "Delete"),
                ("r", "Reload"),
                ("q", "Quit"),
            ]),
        }
    }

    fn draw_dialog(&self, frame: &mut Frame, area: Rect, dialog: &dyn CreationDialog) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(dialog.title()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let fields = dialog.fields();
        let mut lines: Vec<Line> = fields.iter().map(field_line).collect();
        lines.push(Line::from(""));

        let (hint, color) = if dialog.is_submitting() {
            ("Saving...", Color::Yellow)
        } else if dialog.is_loading_options() {
            ("Loading options...", Color::Yellow)
        } else {
            (
                "Enter to submit • Tab to switch • ↑↓ to choose • Esc to close",
                Color::Gray,
            )
        };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(color))));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let active = fields.iter().enumerate().find(|(_, field)| field.active);
        if let Some((row, field)) = active {
            if field.kind != FieldKind::Choice {
                let cursor_x = inner.x + field_cursor_offset(field) as u16;
                frame.set_cursor_position((cursor_x, inner.y + row as u16));
            }
        }
    }

    fn draw_rename_form(&self, frame: &mut Frame, area: Rect, form: &RenameForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let title = format!("Rename {}", form.noun);
        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![form.build_line(), Line::from("")];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = "Name: ".len() as u16;
        frame.set_cursor_position((inner.x + prefix + form.value_len() as u16, inner.y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete {} {} ({})?",
                confirm.noun, confirm.id, confirm.label
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::api::fake::{author, book, store, FakeCatalog};
    use crate::models::EntityId;

    fn app(fake: &Arc<FakeCatalog>, route: Route) -> App {
        let dispatcher = Dispatcher::new(fake.clone());
        App::new(dispatcher, route, Duration::ZERO)
    }

    fn settle(app: &mut App) {
        while app.dispatcher.in_flight() > 0 {
            match app.dispatcher.wait(Duration::from_secs(5)) {
                Some(completion) => app.apply(completion),
                None => panic!("a job never completed"),
            }
        }
    }

    fn press(app: &mut App, keys: &str) {
        for ch in keys.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn authors() -> Arc<FakeCatalog> {
        Arc::new(FakeCatalog::new().with_authors(vec![
            author(1, "Ayn Rand"),
            author(2, "Ursula Le Guin"),
        ]))
    }

    #[test]
    fn shows_fetched_rows_once_settled() {
        let fake = authors();
        let mut app = app(&fake, Route::Authors);
        assert!(render(&app).contains("loading"));

        settle(&mut app);
        let screen = render(&app);
        assert!(screen.contains("Ayn Rand"));
        assert!(screen.contains("Ursula Le Guin"));
    }

    #[test]
    fn creating_an_author_closes_dialog_and_reloads() {
        let fake = authors();
        let mut app = app(&fake, Route::Authors);
        settle(&mut app);

        press(&mut app, "+");
        assert!(render(&app).contains("New Author"));
        press(&mut app, "Zed");
        app.handle_key(KeyCode::Enter);
        settle(&mut app);

        assert!(app.screen.dialog().is_none());
        assert!(fake.calls().iter().any(|call| call == "create_author"));
        assert!(render(&app).contains("Zed"));
        assert_eq!(app.status.as_ref().map(|s| s.text.as_str()), Some("Saved."));
    }

    #[test]
    fn blank_author_is_never_sent() {
        let fake = authors();
        let mut app = app(&fake, Route::Authors);
        settle(&mut app);

        press(&mut app, "+");
        app.handle_key(KeyCode::Enter);
        settle(&mut app);

        assert!(!fake.calls().iter().any(|call| call == "create_author"));
        assert!(app.screen.dialog().is_some());
    }

    #[test]
    fn leaving_a_page_drops_its_pending_fetch() {
        let fake = Arc::new(FakeCatalog::new().with_books(vec![book(1, "Dune")]));
        let mut app = app(&fake, Route::Books);
        app.navigate(Route::Authors);
        settle(&mut app);

        assert_eq!(app.route(), Route::Authors);
        assert!(!render(&app).contains("Dune"));
    }

    #[test]
    fn rename_sends_the_whole_draft() {
        let fake = authors();
        let mut app = app(&fake, Route::Authors);
        settle(&mut app);

        press(&mut app, "e");
        for _ in 0.."Ayn Rand".len() {
            app.handle_key(KeyCode::Backspace);
        }
        press(&mut app, "A. Rand");
        assert!(fake.calls().iter().all(|call| call != "rename"));
        app.handle_key(KeyCode::Enter);
        settle(&mut app);

        assert!(fake.calls().iter().any(|call| call == "rename"));
        assert!(render(&app).contains("A. Rand"));
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let fake = authors();
        let mut app = app(&fake, Route::Authors);
        settle(&mut app);

        press(&mut app, "-n");
        settle(&mut app);
        assert!(!fake.calls().iter().any(|call| call == "delete_author"));

        press(&mut app, "-y");
        settle(&mut app);
        assert!(fake.calls().iter().any(|call| call == "delete_author"));
        assert!(!render(&app).contains("Ayn Rand"));
    }

    #[test]
    fn enter_on_a_store_opens_its_inventory() {
        let fake = Arc::new(
            FakeCatalog::new()
                .with_stores(vec![store(4, "Corner Books")])
                .with_store_stock(4, vec![book(7, "Dune")], vec![author(3, "Frank Herbert")]),
        );
        let mut app = app(&fake, Route::Stores);
        settle(&mut app);

        app.handle_key(KeyCode::Enter);
        assert_eq!(app.route(), Route::StoreInventory(EntityId(4)));
        settle(&mut app);
        assert!(render(&app).contains("Dune"));

        app.handle_key(KeyCode::Tab);
        settle(&mut app);
        assert!(render(&app).contains("Frank Herbert"));

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.route(), Route::Stores);
    }

    #[test]
    fn number_keys_switch_pages() {
        let fake = authors();
        let mut app = app(&fake, Route::Shop);
        press(&mut app, "3");
        assert_eq!(app.route(), Route::Books);
        press(&mut app, "2");
        assert_eq!(app.route(), Route::Authors);
        settle(&mut app);
    }

    #[test]
    fn debounced_search_applies_after_quiet_period() {
        let fake = authors();
        let dispatcher = Dispatcher::new(fake.clone());
        let mut app = App::new(dispatcher, Route::Authors, Duration::from_millis(300));
        settle(&mut app);

        press(&mut app, "/ursula");
        assert_eq!(app.screen.search(), "");

        app.flush_search(Instant::now() + Duration::from_secs(1));
        assert_eq!(app.screen.search(), "ursula");
        assert!(!render(&app).contains("Ayn Rand"));
    }

    #[test]
    fn selling_marks_the_book() {
        let fake = Arc::new(FakeCatalog::new().with_books(vec![book(1, "Dune")]));
        let mut app = app(&fake, Route::Shop);
        settle(&mut app);

        press(&mut app, "s");
        assert!(render(&app).contains("SOLD"));
        press(&mut app, "s");
        assert!(matches!(
            app.status.as_ref().map(|s| &s.kind),
            Some(StatusKind::Error)
        ));
    }
}
