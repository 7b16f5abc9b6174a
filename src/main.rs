use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};

use gridiron_terminal::config::AppConfig;
use gridiron_terminal::datasets::Datasets;
use gridiron_terminal::logging::init_tracing;
use gridiron_terminal::provider::{DataProvider, spawn_provider};
use gridiron_terminal::render::{
    DisplayModel, NoticeLevel, SectionBody, loading_model, project,
};
use gridiron_terminal::router::LoadRequester;
use gridiron_terminal::scoreboard::{HttpScoreboardClient, OfflineClient, ScoreboardClient};
use gridiron_terminal::session::{Session, SessionGate};
use gridiron_terminal::state::{
    AppState, DataSource, Delta, LoginField, ProviderCommand, Screen, ViewName, apply_delta,
    view_label,
};
use gridiron_terminal::storage::FileStore;

/// Forwards router loads to the provider thread.
struct CommandLoader {
    tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl LoadRequester for CommandLoader {
    fn request_load(&mut self, view: ViewName, generation: u64) {
        let Some(tx) = &self.tx else {
            tracing::warn!(view = view.as_str(), "no provider to load from");
            return;
        };
        if tx.send(ProviderCommand::Load { view, generation }).is_err() {
            tracing::warn!(view = view.as_str(), "provider channel closed");
        }
    }
}

struct App {
    state: AppState,
    gate: SessionGate<FileStore>,
    loader: CommandLoader,
    should_quit: bool,
}

impl App {
    fn new(gate: SessionGate<FileStore>, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            gate,
            loader: CommandLoader { tx: cmd_tx },
            should_quit: false,
        }
    }

    fn restore_session(&mut self) {
        match self.gate.check_auth() {
            Some(session) => {
                self.state.push_log(format!(
                    "[INFO] Welcome back, {}",
                    session.user.display_name
                ));
                self.enter_session(session);
            }
            None => self.state.push_log("[INFO] Sign in to continue"),
        }
    }

    fn enter_session(&mut self, session: Session) {
        self.state
            .enter_session(&mut self.gate, session, &mut self.loader);
    }

    fn on_key(&mut self, key: KeyEvent) {
        match self.state.screen {
            Screen::Login => self.on_login_key(key),
            Screen::Main => self.on_main_key(key),
        }
    }

    fn on_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.state.login.toggle_focus()
            }
            KeyCode::Enter => {
                if self.state.login.focus == LoginField::Email {
                    self.state.login.focus = LoginField::Password;
                } else {
                    self.submit_login();
                }
            }
            KeyCode::Backspace => self.state.login.pop_char(),
            KeyCode::Char(ch) => self.state.login.push_char(ch),
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        let email = self.state.login.email.clone();
        let password = self.state.login.password.clone();
        match self.gate.login(&email, &password) {
            Ok(session) => {
                self.state
                    .push_log(format!("[INFO] Signed in as {}", session.user.display_name));
                self.enter_session(session);
            }
            Err(err) => {
                self.state.login.password.clear();
                self.state.login.error = Some(err.to_string());
                self.state.push_log("[WARN] Sign-in rejected");
            }
        }
    }

    fn on_main_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.state.help_overlay = false;
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(ch @ '1'..='6') => {
                let idx = ch as usize - '1' as usize;
                self.go(ViewName::ALL[idx].as_str());
            }
            KeyCode::Tab => {
                if let Some(view) = self.state.current_view() {
                    self.go(view.next().as_str());
                }
            }
            KeyCode::BackTab => {
                if let Some(view) = self.state.current_view() {
                    self.go(view.prev().as_str());
                }
            }
            KeyCode::Char('r') => {
                if let Some(view) = self.state.current_view() {
                    self.go(view.as_str());
                    self.state
                        .push_log(format!("[INFO] Reloading {}", view_label(view)));
                }
            }
            KeyCode::Char('f') => self.state.cycle_filter_value(),
            KeyCode::Char('F') => self.state.cycle_filter_field(),
            KeyCode::Char('c') => self.state.clear_filters(),
            KeyCode::Char('o') => self.state.logout(&mut self.gate),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn go(&mut self, requested: &str) {
        self.state
            .navigate(&mut self.gate, requested, &mut self.loader);
    }
}

fn start_provider<C>(
    client: C,
    config: &AppConfig,
    tx: mpsc::Sender<Delta>,
    cmd_rx: mpsc::Receiver<ProviderCommand>,
) where
    C: ScoreboardClient + Send + 'static,
{
    let mut provider = DataProvider::new(Datasets::bundled(), client);
    if let Some(seed) = config.prediction_seed {
        provider = provider.with_seed(seed);
    }
    spawn_provider(provider, tx, cmd_rx);
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env();
    let tracing_status = init_tracing(&config);

    let store_dir = config
        .storage_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("gridiron_terminal"));
    let store = FileStore::open_in(&store_dir);
    tracing::info!(path = %store.path().display(), "session store opened");
    let gate = SessionGate::new(store);

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    if config.offline {
        start_provider(OfflineClient, &config, tx, cmd_rx);
    } else {
        let client = HttpScoreboardClient::new(config.scoreboard_url.clone(), config.http_timeout);
        start_provider(client, &config, tx, cmd_rx);
    }

    let mut app = App::new(gate, Some(cmd_tx));
    if let Err(err) = tracing_status {
        app.state.push_log(format!("[WARN] Logging disabled: {err:#}"));
    }
    if config.offline {
        app.state.push_log("[INFO] Offline mode: scoreboard uses demo games");
    }
    app.restore_session();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    match app.state.screen {
        Screen::Login => render_login(frame, &app.state),
        Screen::Main => render_main(frame, &app.state),
    }
}

fn render_login(frame: &mut Frame, state: &AppState) {
    let area = centered_rect(60, 50, frame.size());
    frame.render_widget(Clear, area);

    let focus_style = Style::default().fg(Color::Yellow);
    let field_line = |label: &str, value: String, field: LoginField| {
        let focused = state.login.focus == field;
        let marker = if focused { "> " } else { "  " };
        let style = if focused { focus_style } else { Style::default() };
        Line::from(vec![
            Span::styled(format!("{marker}{label:<10}"), style),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        Line::styled(
            "IBY NFL ANALYTICS",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        field_line("Email", state.login.email.clone(), LoginField::Email),
        field_line(
            "Password",
            "*".repeat(state.login.password.chars().count()),
            LoginField::Password,
        ),
        Line::raw(""),
    ];
    if let Some(err) = &state.login.error {
        lines.push(Line::styled(err.clone(), Style::default().fg(Color::Red)));
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(
        "Local demo sign-in: any email with @ and a password of 6+ characters.",
        Style::default().fg(Color::DarkGray),
    ));
    lines.push(Line::styled(
        "Tab Switch field | Enter Sign in | Esc Quit",
        Style::default().fg(Color::DarkGray),
    ));

    let login = Paragraph::new(lines)
        .block(Block::default().title("Sign in").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(login, area);
}

fn render_main(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_nav(frame, chunks[0], state);

    let Some(view) = state.current_view() else {
        return;
    };
    let model = match state.current_result() {
        Some(result) => project(view, result, &state.filters),
        None => loading_model(view),
    };
    render_model(frame, chunks[1], state, &model);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "1-6 Views | Tab Next | r Reload | f Filter value | F Filter field | c Clear | j/k Scroll | o Sign out | ? Help | q Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn render_nav(frame: &mut Frame, area: Rect, state: &AppState) {
    let items = state.router.nav_items();
    let titles: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(idx, (view, _))| format!("{} {}", idx + 1, view_label(*view)))
        .collect();
    let selected = items
        .iter()
        .position(|(_, active)| *active)
        .unwrap_or(0);
    let user = state
        .session
        .as_ref()
        .map(|s| format!("IBY NFL ANALYTICS | {}", s.user.display_name))
        .unwrap_or_else(|| "IBY NFL ANALYTICS".to_string());

    let tabs = Tabs::new(titles)
        .block(Block::default().title(user).borders(Borders::ALL))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_model(frame: &mut Frame, area: Rect, state: &AppState, model: &DisplayModel) {
    let source = match model.source {
        Some(DataSource::Network) => " [live]",
        Some(DataSource::Bundled) => " [bundled]",
        Some(DataSource::Demo) => " [demo]",
        None => "",
    };
    let loading = if state.loading { " (refreshing)" } else { "" };
    let title = format!("{}{source}{loading}", model.title);

    let body = Paragraph::new(model_lines(state, model))
        .block(Block::default().title(title).borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll, 0));
    frame.render_widget(body, area);
}

fn model_lines(state: &AppState, model: &DisplayModel) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let dim = Style::default().fg(Color::DarkGray);

    if let Some(notice) = &model.notice {
        let color = match notice.level {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        };
        lines.push(Line::styled(notice.message.clone(), Style::default().fg(color)));
    }

    if let Some(field) = state.active_filter_field() {
        let active = if state.filters.is_empty() {
            "all".to_string()
        } else {
            model
                .filters
                .iter()
                .map(|chip| format!("{}={}", chip.field, chip.value))
                .collect::<Vec<_>>()
                .join(", ")
        };
        lines.push(Line::styled(
            format!("Filter field: {field} | Active: {active}"),
            dim,
        ));
    }
    if !lines.is_empty() {
        lines.push(Line::raw(""));
    }

    for section in &model.sections {
        lines.push(Line::styled(
            section.title.clone(),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ));
        match &section.body {
            SectionBody::Cards(cards) => {
                for card in cards {
                    let mut head = vec![Span::styled(
                        format!("> {}", card.title),
                        Style::default().add_modifier(Modifier::BOLD),
                    )];
                    if let Some(badge) = &card.badge {
                        head.push(Span::styled(
                            format!("  [{badge}]"),
                            Style::default().fg(Color::Green),
                        ));
                    }
                    lines.push(Line::from(head));
                    if !card.subtitle.is_empty() {
                        lines.push(Line::styled(format!("  {}", card.subtitle), dim));
                    }
                    for chunk in card.fields.chunks(3) {
                        let text = chunk
                            .iter()
                            .map(|f| format!("{}: {}", f.label, f.value))
                            .collect::<Vec<_>>()
                            .join(" | ");
                        lines.push(Line::raw(format!("  {text}")));
                    }
                }
            }
            SectionBody::List(items) => {
                for item in items {
                    let rank = item
                        .rank
                        .map(|r| format!("{r:>2}. "))
                        .unwrap_or_else(|| "    ".to_string());
                    let style = if item.highlight {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default()
                    };
                    lines.push(Line::from(vec![
                        Span::styled(format!("  {rank}{:<22}", item.label), style),
                        Span::styled(format!("{:<14}", item.detail), dim),
                        Span::raw(item.value.clone()),
                    ]));
                }
            }
            SectionBody::Empty(message) => lines.push(Line::styled(format!("  {message}"), dim)),
        }
        lines.push(Line::raw(""));
    }
    lines
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "IBY NFL Analytics - Help",
        "",
        "Views:",
        "  1-6          Dashboard, Teams, Players, Live Games, Statistics, Predictions",
        "  Tab / S-Tab  Next / previous view",
        "  r            Reload current view",
        "",
        "Filters:",
        "  f            Cycle value of the active filter",
        "  F            Switch filter field",
        "  c            Clear filters",
        "",
        "  j/k or ↑/↓   Scroll",
        "  o            Sign out",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
