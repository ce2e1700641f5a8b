use std::io;
use std::time::Duration;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Position, Rect};
use regex::Regex;

use crate::click::{ClickIntent, ClickRouter, Clock, SystemClock};
use crate::io::kv::KvStore;
use crate::io::paths::DataDir;
use crate::model::{Catalog, Category, TrackerConfig};
use crate::ops::filter::{self, ItemQuery, ItemView, StateFilter};
use crate::ops::progress::ProgressStore;

use super::input;
use super::render;
use super::theme::Theme;

/// Longest the event loop sleeps when no click timer is pending
pub const MAX_POLL: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
}

/// Identity of a card on screen. Each card gets its own click window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub category: String,
    pub item: String,
}

/// A transient line in the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// One row of the card grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridRow {
    /// Group heading, e.g. "Artifacts"
    Group { id: String, name: String },
    /// Cards `start..end` of the visible item list
    Cards { start: usize, end: usize },
}

impl GridRow {
    pub fn height(&self) -> u16 {
        match self {
            GridRow::Group { .. } => 1,
            GridRow::Cards { .. } => render::grid_view::CARD_HEIGHT,
        }
    }
}

/// Main application state
pub struct App {
    pub catalog: Catalog,
    pub store: ProgressStore,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    /// Index into `catalog.categories`
    pub current: usize,
    /// Cursor index into the visible item list
    pub cursor: usize,
    /// First visible grid row
    pub scroll: usize,
    pub filter: StateFilter,
    /// Search mode: current query being typed
    pub search_input: String,
    /// Last executed search pattern
    pub last_search: Option<String>,
    /// Item ID shown in the detail popup
    pub detail: Option<String>,
    pub show_help: bool,
    pub show_key_hints: bool,
    pub message: Option<StatusMessage>,
    pub clicks: ClickRouter<CardKey>,
    pub clock: Box<dyn Clock>,
    /// Cards per grid row, set by the last render
    pub grid_columns: usize,
    /// Screen rectangles of the cards drawn by the last render
    pub card_hits: Vec<(Rect, String)>,
    /// Screen rectangles of the category tabs drawn by the last render
    pub tab_hits: Vec<(Rect, usize)>,
}

impl App {
    /// Build the app. The catalog must have at least one category.
    pub fn new(
        catalog: Catalog,
        store: ProgressStore,
        config: &TrackerConfig,
        clock: Box<dyn Clock>,
    ) -> Self {
        let current = config
            .ui
            .default_category
            .as_deref()
            .and_then(|wanted| {
                catalog
                    .categories
                    .values()
                    .position(|c| c.id == wanted || c.name.eq_ignore_ascii_case(wanted))
            })
            .unwrap_or(0);

        App {
            catalog,
            store,
            theme: Theme::from_config(&config.ui),
            mode: Mode::Navigate,
            should_quit: false,
            current,
            cursor: 0,
            scroll: 0,
            filter: StateFilter::All,
            search_input: String::new(),
            last_search: None,
            detail: None,
            show_help: false,
            show_key_hints: config.ui.show_key_hints,
            message: None,
            clicks: ClickRouter::new(config.click.delay()),
            clock,
            grid_columns: 1,
            card_hits: Vec::new(),
            tab_hits: Vec::new(),
        }
    }

    pub fn category(&self) -> &Category {
        &self.catalog.categories[self.current]
    }

    pub fn category_count(&self) -> usize {
        self.catalog.categories.len()
    }

    /// Get the active search regex for filtering and highlighting.
    /// In Search mode: compiles from current input. In Navigate: from last_search.
    pub fn active_search_re(&self) -> Option<Regex> {
        match self.mode {
            Mode::Search => filter::search_regex(&self.search_input),
            Mode::Navigate => filter::search_regex(self.last_search.as_deref()?),
        }
    }

    /// Items of the current category that pass the filter and search
    pub fn visible_items(&self) -> Vec<ItemView<'_>> {
        let query = ItemQuery {
            filter: self.filter,
            group: None,
            search: self.active_search_re(),
        };
        filter::filter_items(self.category(), &self.store, &query).unwrap_or_default()
    }

    /// ID of the item under the cursor
    pub fn cursor_item_id(&self) -> Option<String> {
        self.visible_items()
            .get(self.cursor)
            .map(|v| v.item.id.clone())
    }

    /// Keep the cursor inside the visible list after it shrinks
    pub fn clamp_cursor(&mut self) {
        let len = self.visible_items().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    /// Switch to another category. Pending click timers belong to the old
    /// cards, so they are dropped without firing.
    pub fn switch_category(&mut self, index: usize) {
        if index >= self.category_count() {
            return;
        }
        self.clicks.cancel_all();
        self.current = index;
        self.cursor = 0;
        self.scroll = 0;
        self.detail = None;
        tracing::debug!(category = %self.category().id, "switched category");
    }

    pub fn next_category(&mut self) {
        let n = self.category_count();
        self.switch_category((self.current + 1) % n);
    }

    pub fn prev_category(&mut self) {
        let n = self.category_count();
        self.switch_category((self.current + n - 1) % n);
    }

    pub fn open_detail(&mut self, item_id: &str) {
        self.detail = Some(item_id.to_string());
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Move an item to its next state, reporting store errors in the status row
    pub fn advance_item(&mut self, item_id: &str) {
        let category_id = self.category().id.clone();
        match self.store.advance(&category_id, item_id) {
            Ok(state) => {
                let category = self.category();
                let name = category
                    .find_item(item_id)
                    .map(|(_, item)| item.name.clone())
                    .unwrap_or_else(|_| item_id.to_string());
                let text = format!("{}: {}", name, category.state_label(state));
                self.set_message(text, false);
                // A filter may have just hidden the item
                self.clamp_cursor();
            }
            Err(e) => {
                tracing::error!(category = %category_id, item = item_id, "advance failed: {}", e);
                self.set_message(format!("could not save: {}", e), true);
            }
        }
    }

    pub fn set_message(&mut self, text: String, is_error: bool) {
        self.message = Some(StatusMessage { text, is_error });
    }

    /// Carry out a resolved click gesture
    pub fn apply_intent(&mut self, card: &CardKey, intent: ClickIntent) {
        if card.category != self.category().id {
            return;
        }
        tracing::debug!(item = %card.item, ?intent, "click resolved");
        match intent {
            ClickIntent::Single => self.open_detail(&card.item),
            ClickIntent::Double => self.advance_item(&card.item),
        }
    }

    /// A pointer press on a card. Moves the cursor there and feeds the
    /// card's disambiguator.
    pub fn click_card(&mut self, item_id: &str) {
        let pos = self
            .visible_items()
            .iter()
            .position(|v| v.item.id == item_id);
        if let Some(pos) = pos {
            self.cursor = pos;
        }
        let key = CardKey {
            category: self.category().id.clone(),
            item: item_id.to_string(),
        };
        let now = self.clock.now();
        if let Some((card, intent)) = self.clicks.register_click(key, now) {
            self.apply_intent(&card, intent);
        }
    }

    /// Fire expired click timers
    pub fn tick(&mut self) {
        let now = self.clock.now();
        for (card, intent) in self.clicks.poll(now) {
            self.apply_intent(&card, intent);
        }
    }

    /// How long the event loop may wait for input
    pub fn poll_timeout(&self) -> Duration {
        self.clicks.poll_timeout(self.clock.now(), MAX_POLL)
    }

    pub fn quit(&mut self) {
        self.clicks.cancel_all();
        self.should_quit = true;
    }

    /// Card under a screen cell, from the last render
    pub fn card_at(&self, column: u16, row: u16) -> Option<&str> {
        let pos = Position::new(column, row);
        self.card_hits
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, id)| id.as_str())
    }

    /// Category tab under a screen cell, from the last render
    pub fn tab_at(&self, column: u16, row: u16) -> Option<usize> {
        let pos = Position::new(column, row);
        self.tab_hits
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, index)| *index)
    }
}

/// Lay the visible items out as grid rows. Each group starts a new row
/// under its own heading.
pub fn build_grid_rows(items: &[ItemView], columns: usize) -> Vec<GridRow> {
    let columns = columns.max(1);
    let mut rows = Vec::new();
    let mut i = 0;
    while i < items.len() {
        let group = items[i].group;
        rows.push(GridRow::Group {
            id: group.id.clone(),
            name: group.name.clone(),
        });
        let group_end = items[i..]
            .iter()
            .position(|v| v.group.id != group.id)
            .map_or(items.len(), |p| i + p);
        let mut start = i;
        while start < group_end {
            let end = (start + columns).min(group_end);
            rows.push(GridRow::Cards { start, end });
            start = end;
        }
        i = group_end;
    }
    rows
}

/// Index of the grid row holding item `cursor`
pub fn row_of(rows: &[GridRow], cursor: usize) -> Option<usize> {
    rows.iter().position(|r| match r {
        GridRow::Cards { start, end } => cursor >= *start && cursor < *end,
        GridRow::Group { .. } => false,
    })
}

/// Cursor after moving one card row up or down, keeping the column when it
/// exists in the target row
pub fn move_vertical(rows: &[GridRow], cursor: usize, down: bool) -> usize {
    let card_rows: Vec<(usize, usize)> = rows
        .iter()
        .filter_map(|r| match r {
            GridRow::Cards { start, end } => Some((*start, *end)),
            GridRow::Group { .. } => None,
        })
        .collect();
    let Some(pos) = card_rows
        .iter()
        .position(|(s, e)| cursor >= *s && cursor < *e)
    else {
        return cursor;
    };
    let col = cursor - card_rows[pos].0;
    let target = if down {
        pos + 1
    } else if pos == 0 {
        return cursor;
    } else {
        pos - 1
    };
    match card_rows.get(target) {
        Some((s, e)) => (s + col).min(e - 1),
        None => cursor,
    }
}

/// Adjust `scroll` so row `cursor_row` fits in `height` lines. Scrolling up
/// also brings the group heading into view.
pub fn adjust_scroll(rows: &[GridRow], scroll: usize, cursor_row: usize, height: u16) -> usize {
    let mut scroll = scroll.min(rows.len().saturating_sub(1));
    if cursor_row < scroll {
        scroll = cursor_row;
        if scroll > 0 && matches!(rows[scroll - 1], GridRow::Group { .. }) {
            scroll -= 1;
        }
        return scroll;
    }
    let used = |from: usize| -> u32 {
        rows[from..=cursor_row]
            .iter()
            .map(|r| u32::from(r.height()))
            .sum()
    };
    while scroll < cursor_row && used(scroll) > u32::from(height) {
        scroll += 1;
    }
    scroll
}

/// Run the TUI application
pub fn run(data_dir: &DataDir, config: TrackerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::builtin()?;
    if catalog.categories.is_empty() {
        return Err("catalog has no categories".into());
    }
    let kv = KvStore::open_file(&data_dir.progress_path())?;
    let store = ProgressStore::new(kv);
    let mut app = App::new(catalog, store, &config, Box::new(SystemClock));
    tracing::info!(category = %app.category().id, "tui started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    tracing::info!("tui stopped");
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(app.poll_timeout())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }
        app.tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
