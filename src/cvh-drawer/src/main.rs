//! CVH Drawer - fast application launcher for CVH Linux
//!
//! Type to search installed applications by name, alias, package id,
//! keypad digits or a near miss; an empty query shows favorites and
//! recently used apps.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::{io, path::PathBuf, time::Duration};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cvh_drawer::{
    apps, browse,
    config::Config,
    store::{self, AppStore},
    AppRecord,
};

/// CVH Drawer - fast application launcher
#[derive(Parser, Debug)]
#[command(name = "cvh-drawer")]
#[command(author = "CVH Linux Team")]
#[command(version = "0.1.0")]
#[command(about = "Fast application launcher with ranked search")]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// App store file (overrides the configured one)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Use the store as-is instead of rescanning desktop entries
    #[arg(long, global = true)]
    no_refresh: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Initial query for the interactive picker
    #[arg(short, long, default_value = "")]
    query: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print ranked matches for a query
    Search {
        query: String,

        /// Maximum number of results (defaults to max_results from config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print favorites, recent and all other apps
    List {
        #[arg(long)]
        json: bool,
    },
    /// Launch an app by id and record the launch
    Launch { id: String },
    /// Toggle whether an app is hidden from results
    Hide { id: String },
    /// Toggle whether an app is a favorite
    Favorite { id: String },
    /// Set an app's alias, or clear it when omitted
    Alias { id: String, alias: Option<String> },
    /// Rescan desktop entries into the store
    Refresh,
}

/// A displayable list row
#[derive(Clone, Debug)]
struct Row {
    id: String,
    name: String,
    tag: &'static str,
}

impl Row {
    fn new(app: &AppRecord, tag: &'static str) -> Self {
        Self {
            id: app.package_name.clone(),
            name: app.app_name.clone(),
            tag,
        }
    }
}

/// Rows for `query`: ranked matches, or browse sections when blank
fn rows(records: &[AppRecord], query: &str, config: &Config) -> Vec<Row> {
    let query = query.trim();
    if query.is_empty() {
        let sections = browse(records, config.recent_limit);
        return sections
            .favorites
            .iter()
            .map(|app| Row::new(app, "favorite"))
            .chain(sections.recent.iter().map(|app| Row::new(app, "recent")))
            .chain(sections.others.iter().map(|app| Row::new(app, "")))
            .collect();
    }

    cvh_drawer::search(query, records)
        .iter()
        .take(config.max_results)
        .map(|m| Row::new(m.app, m.kind.label()))
        .collect()
}

/// Application state
struct App {
    /// Current query string
    query: String,
    /// All known apps
    records: Vec<AppRecord>,
    /// Rows for the current query, already ranked
    filtered: Vec<Row>,
    /// Currently selected index in filtered list
    selected: usize,
    /// List state for scrolling
    list_state: ListState,
    config: Config,
    /// Should quit
    should_quit: bool,
    /// Id of the chosen app (if any)
    selected_item: Option<String>,
}

impl App {
    fn new(records: Vec<AppRecord>, config: Config, query: String) -> Self {
        let mut app = App {
            query,
            records,
            filtered: Vec::new(),
            selected: 0,
            list_state: ListState::default(),
            config,
            should_quit: false,
            selected_item: None,
        };

        app.update_filter();
        app
    }

    fn update_filter(&mut self) {
        self.filtered = rows(&self.records, &self.query, &self.config);

        // Reset selection on every edit
        self.selected = 0;
        self.list_state
            .select((!self.filtered.is_empty()).then_some(0));
    }

    fn select_next(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + 1) % self.filtered.len();
            self.list_state.select(Some(self.selected));
        }
    }

    fn select_prev(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.filtered.len() - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    fn confirm_selection(&mut self) {
        if let Some(row) = self.filtered.get(self.selected) {
            self.selected_item = Some(row.id.clone());
        }
        self.should_quit = true;
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match (key, modifiers) {
            // Quit without selection
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            // Navigation
            (KeyCode::Down, _) | (KeyCode::Char('n'), KeyModifiers::CONTROL) => {
                self.select_next();
            }
            (KeyCode::Up, _) | (KeyCode::Char('p'), KeyModifiers::CONTROL) => {
                self.select_prev();
            }
            // Confirm selection
            (KeyCode::Enter, _) => {
                self.confirm_selection();
            }
            (KeyCode::Backspace, _) => {
                self.query.pop();
                self.update_filter();
            }
            // Clear query
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.query.clear();
                self.update_filter();
            }
            // Type character
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.query.push(c);
                self.update_filter();
            }
            _ => {}
        }
    }
}

fn parse_color(value: &str, fallback: Color) -> Color {
    value.parse().unwrap_or(fallback)
}

fn ui(frame: &mut Frame, app: &mut App) {
    let colors = &app.config.colors;
    let fg = parse_color(&colors.fg, Color::White);
    let bg = parse_color(&colors.bg, Color::Reset);
    let highlight = parse_color(&colors.highlight, Color::Cyan);
    let border = parse_color(&colors.border, Color::DarkGray);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Input
            Constraint::Min(1),     // List
        ])
        .split(frame.area());

    // Input box
    let input_block = if app.config.border {
        Block::default()
            .borders(Borders::ALL)
            .title(" CVH Drawer ")
            .border_style(Style::default().fg(highlight))
    } else {
        Block::default()
    };

    let input = Paragraph::new(format!("> {}", app.query))
        .style(Style::default().fg(fg).bg(bg))
        .block(input_block);
    frame.render_widget(input, chunks[0]);

    // Results list
    let items: Vec<ListItem> = app
        .filtered
        .iter()
        .map(|row| {
            let mut spans = vec![Span::raw(row.name.clone())];
            if !row.tag.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", row.tag),
                    Style::default().fg(border),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list_block = if app.config.border {
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {}/{} ", app.filtered.len(), app.records.len()))
            .border_style(Style::default().fg(border))
    } else {
        Block::default()
    };

    let list = List::new(items)
        .block(list_block)
        .style(Style::default().fg(fg).bg(bg))
        .highlight_style(
            Style::default()
                .fg(highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[1], &mut app.list_state);
}

fn run_tui(mut app: App) -> Result<Option<String>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|f| ui(f, &mut app))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    app.handle_key(key.code, key.modifiers);
                }
            }

            if app.should_quit {
                return Ok(());
            }
        }
    })();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    Ok(app.selected_item)
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "cvh_drawer=debug,warn"
    } else {
        "cvh_drawer=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Rescan desktop entries into the store and persist the result
fn refresh(store: &mut AppStore, config: &Config) -> Result<()> {
    let discovered = apps::load_applications(&config.app_dirs, &config.terminal)?;
    store.sync(discovered);
    store.save()?;
    Ok(())
}

/// Start `id` and count the launch
fn launch(store: &mut AppStore, id: &str) -> Result<()> {
    let Some(app) = store.get(id) else {
        bail!("unknown application: {id}");
    };
    if app.exec.is_empty() {
        bail!("{} has no launch command", app.app_name);
    }

    info!("Launching {} ({})", app.app_name, app.exec);
    std::process::Command::new("sh")
        .arg("-c")
        .arg(&app.exec)
        .spawn()
        .with_context(|| format!("Failed to launch {}", app.app_name))?;

    store.record_usage(id, store::now_millis())?;
    store.save()?;
    Ok(())
}

fn print_search(store: &AppStore, query: &str, limit: usize, json: bool) -> Result<()> {
    let results = cvh_drawer::search(query.trim(), store.records());
    let results = &results[..results.len().min(limit)];

    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    for m in results {
        println!(
            "{:.3}  {:<8}  {}  {}",
            m.score,
            m.kind.label(),
            m.app.package_name,
            m.app.app_name
        );
    }
    Ok(())
}

fn print_list(store: &AppStore, config: &Config, json: bool) -> Result<()> {
    let sections = browse(store.records(), config.recent_limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    for (title, entries) in [
        ("Favorites", &sections.favorites),
        ("Recent", &sections.recent),
        ("All apps", &sections.others),
    ] {
        if entries.is_empty() {
            continue;
        }
        println!("{}:", title);
        for app in entries {
            println!("  {}  {}", app.package_name, app.app_name);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = Config::load(args.config.as_deref())?;
    let store_path = args.store.clone().unwrap_or_else(|| config.store_path());
    let mut store = AppStore::open(&store_path)?;
    debug!("Using app store {}", store_path.display());

    if matches!(args.command, Some(Command::Refresh)) || !args.no_refresh {
        refresh(&mut store, &config)?;
    }

    match args.command {
        Some(Command::Search { query, limit, json }) => {
            print_search(&store, &query, limit.unwrap_or(config.max_results), json)?;
        }
        Some(Command::List { json }) => print_list(&store, &config, json)?,
        Some(Command::Launch { id }) => launch(&mut store, &id)?,
        Some(Command::Hide { id }) => {
            let hidden = store.toggle_hidden(&id)?;
            store.save()?;
            println!("{} is now {}", id, if hidden { "hidden" } else { "visible" });
        }
        Some(Command::Favorite { id }) => {
            let favorite = store.toggle_favorite(&id)?;
            store.save()?;
            println!(
                "{} {} favorites",
                id,
                if favorite { "added to" } else { "removed from" }
            );
        }
        Some(Command::Alias { id, alias }) => {
            store.set_alias(&id, alias)?;
            store.save()?;
        }
        Some(Command::Refresh) => {
            println!("{} applications in {}", store.records().len(), store.path().display());
        }
        None => {
            let app = App::new(store.records().to_vec(), config, args.query);
            if let Some(id) = run_tui(app)? {
                launch(&mut store, &id)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<AppRecord> {
        vec![
            AppRecord::new("firefox", "Firefox").favorite().with_exec("firefox"),
            AppRecord::new("gimp", "GIMP").with_usage(1, 10),
            AppRecord::new("files", "Files"),
        ]
    }

    fn ids(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_blank_query_browses() {
        let rows = rows(&records(), "  ", &Config::default());
        assert_eq!(ids(&rows), ["firefox", "gimp", "files"]);
        assert_eq!(rows[0].tag, "favorite");
        assert_eq!(rows[1].tag, "recent");
    }

    #[test]
    fn test_query_is_trimmed() {
        let rows = rows(&records(), " fi ", &Config::default());
        assert_eq!(ids(&rows), ["firefox", "files"]);
        assert_eq!(rows[0].tag, "prefix");
    }

    #[test]
    fn test_max_results() {
        let config = Config {
            max_results: 1,
            ..Config::default()
        };
        assert_eq!(rows(&records(), "fi", &config).len(), 1);
    }

    #[test]
    fn test_typing_and_selection() {
        let mut app = App::new(records(), Config::default(), String::new());
        assert_eq!(app.filtered.len(), 3);

        app.handle_key(KeyCode::Char('g'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('i'), KeyModifiers::NONE);
        assert_eq!(app.query, "gi");
        assert_eq!(app.filtered[0].id, "gimp");

        app.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        app.handle_key(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(app.selected, app.filtered.len() - 1);

        app.handle_key(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert!(app.query.is_empty());
        assert_eq!(app.selected, 0);

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.should_quit);
        assert_eq!(app.selected_item.as_deref(), Some("firefox"));
    }

    #[test]
    fn test_escape_quits_without_selection() {
        let mut app = App::new(records(), Config::default(), "gimp".into());
        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.should_quit);
        assert!(app.selected_item.is_none());
    }
}
