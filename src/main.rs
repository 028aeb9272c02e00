use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use echodrill::app::{App, AppScreen};
use echodrill::config::Config;
use echodrill::event::{AppEvent, EventHandler};
use echodrill::session::controller::Mode;
use echodrill::speech::{CommandSpeaker, NullSpeaker, Speaker};
use echodrill::store::json_store::JsonStore;
use echodrill::store::schema::ExportData;
use echodrill::store::{MemoryStore, ProgressStore};
use echodrill::ui::components::progress_bar::ProgressBar;
use echodrill::ui::components::review_panel::ReviewPanel;
use echodrill::ui::components::sentence_area::SentenceArea;
use echodrill::ui::components::toast::ToastStack;
use echodrill::ui::components::word_area::WordArea;
use echodrill::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use echodrill::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "echodrill",
    version,
    about = "Terminal English dictation drill with spaced-repetition review"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Disable text-to-speech for this run")]
    no_speech: bool,

    #[arg(long, value_name = "PATH", help = "Write config and progress to a JSON file and exit")]
    export: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Replace config and progress from an export file and exit")]
    import: Option<PathBuf>,
}

/// Log to a file: the terminal belongs to the UI.
fn init_logging() {
    let dir = Config::data_dir();
    let file = fs::create_dir_all(&dir).and_then(|_| {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("echodrill.log"))
    });
    let Ok(file) = file else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("ECHODRILL_LOG", "warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn export_to(path: &Path, config: &Config) -> Result<()> {
    let store = JsonStore::new()?;
    let data = store.export_all(config);
    let json = serde_json::to_string_pretty(&data)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    println!("Exported progress to {}", path.display());
    Ok(())
}

fn import_from(path: &Path) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let data: ExportData = serde_json::from_str(&content)
        .with_context(|| format!("{} is not an echodrill export", path.display()))?;
    let store = JsonStore::new()?;
    store.import_all(&data)?;
    data.config.save()?;
    println!("Imported progress from {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("Using default config: {e}");
        Config::default()
    });
    let themes = Theme::available_themes();
    let theme_names: Vec<&str> = themes.iter().map(String::as_str).collect();
    config.validate(&theme_names);

    if let Some(path) = cli.export {
        return export_to(&path, &config);
    }
    if let Some(path) = cli.import {
        return import_from(&path);
    }

    if let Some(theme_name) = cli.theme {
        config.theme = theme_name;
    }
    if cli.no_speech {
        config.speech_enabled = false;
    }

    let theme: &'static Theme = Box::leak(Box::new(Theme::load(&config.theme).unwrap_or_default()));

    let store: Box<dyn ProgressStore> = match JsonStore::new() {
        Ok(store) => {
            if store.check_interrupted_import() {
                log::warn!("Recovered from an interrupted import");
            }
            Box::new(store)
        }
        Err(e) => {
            log::warn!("Progress will not be saved: {e}");
            Box::new(MemoryStore::default())
        }
    };
    let speaker: Box<dyn Speaker> = if config.speech_enabled {
        Box::new(CommandSpeaker::new(&config.speech_command))
    } else {
        Box::new(NullSpeaker)
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(config, theme, store, speaker);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("Exited with error: {err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => {
                handle_key(app, key);
                app.tick(Instant::now());
            }
            AppEvent::Tick => {
                app.tick(Instant::now());
            }
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Drill => handle_drill_key(app, key, ctrl),
        AppScreen::ReviewPicker => handle_review_key(app, key),
        AppScreen::ConfirmReset => handle_reset_key(app, key),
        AppScreen::Complete => handle_complete_key(app, key, ctrl),
    }
}

fn handle_drill_key(app: &mut App, key: KeyEvent, ctrl: bool) {
    if ctrl {
        match key.code {
            KeyCode::Char('s') => app.replay(),
            KeyCode::Char('p') => app.show_pronunciation(),
            KeyCode::Char('r') => app.open_review_picker(),
            KeyCode::Char('x') => app.request_reset(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_review_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_dialog(),
        KeyCode::Up | KeyCode::Char('k') => app.review_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.review_next(),
        KeyCode::Enter => app.start_selected_review(),
        KeyCode::Char('l') => app.defer_reviews(),
        _ => {}
    }
}

fn handle_reset_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(ch) => app.answer_reset(ch),
        _ => app.close_dialog(),
    }
}

fn handle_complete_key(app: &mut App, key: KeyEvent, ctrl: bool) {
    match key.code {
        KeyCode::Char('r') if ctrl => app.open_review_picker(),
        KeyCode::Char('x') if ctrl => app.request_reset(),
        KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let now = Utc::now();
    let queue = app.review_queue();
    let layout = AppLayout::new(area, !queue.is_empty());

    render_header(frame, app, &layout, queue.len());

    match app.screen {
        AppScreen::Complete => render_complete(frame, app, &layout),
        _ => render_drill(frame, app, &layout),
    }

    if let Some(sidebar) = layout.sidebar {
        frame.render_widget(
            ReviewPanel::new(
                &queue,
                app.config.review_banner_words,
                app.config.review_banner_sentences,
                now,
                app.theme,
            ),
            sidebar,
        );
    }
    if let Some(strip) = layout.review_strip {
        let strip_text = Paragraph::new(Line::from(Span::styled(
            ReviewPanel::summary(&queue),
            Style::default().fg(colors.warning()),
        )))
        .block(
            Block::bordered()
                .title(" Due for review (Ctrl+R) ")
                .border_style(Style::default().fg(colors.border())),
        );
        frame.render_widget(strip_text, strip);
    }

    if let Some(progress_area) = layout.progress {
        let cursor = app.session.progress.cursor();
        let bar = ProgressBar::new(
            "Course",
            app.catalog.completed_count(cursor),
            app.catalog.total_sentences(),
            app.theme,
        );
        frame.render_widget(bar, progress_area);
    }

    render_footer(frame, app, &layout);

    match app.screen {
        AppScreen::ReviewPicker => {
            let popup = centered_rect(60, 60, area);
            frame.render_widget(
                ReviewPanel::new(
                    &queue,
                    app.config.review_banner_words,
                    app.config.review_banner_sentences,
                    now,
                    app.theme,
                )
                .selected(app.review_selected),
                popup,
            );
        }
        AppScreen::ConfirmReset => render_reset_dialog(frame, app),
        _ => {}
    }

    frame.render_widget(ToastStack::new(&app.toasts, app.theme), area);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout, due: usize) {
    let colors = &app.theme.colors;
    let cursor = app.session.active_cursor();

    let mut info = match app.catalog.unit(cursor.unit) {
        Some(unit) if !app.finished => format!(
            " Unit {}/{}: {} ({}) | Sentence {}/{}",
            cursor.unit + 1,
            app.catalog.units().len(),
            unit.headword,
            unit.translation,
            cursor.step + 1,
            unit.sentences.len(),
        ),
        _ => " Course complete".to_string(),
    };
    info.push_str(&format!(" | Points {}", app.session.progress.points));
    if due > 0 {
        info.push_str(&format!(" | {due} due"));
    }
    if app.session.review.is_some() {
        info.push_str(" | Reviewing");
    }

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " echodrill ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);
}

fn render_drill(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    if let Some(word) = &app.word {
        let phonetic = app.lexicon.phonetic(&word.word);
        let translation = app.translate(&word.word);
        let remaining = match &app.session.mode {
            Mode::Word { pending } => pending.len().saturating_sub(1),
            Mode::Sentence => 0,
        };
        let area = WordArea::new(
            word,
            phonetic.as_deref(),
            &translation,
            remaining,
            app.theme,
        );
        frame.render_widget(area, layout.main);
        return;
    }

    let translation = app
        .session
        .current_sentence(&app.catalog)
        .map(|s| s.translation.as_str())
        .unwrap_or("");
    let area = SentenceArea::new(&app.sentence, translation, app.theme)
        .pronunciation(app.pronunciation.as_ref())
        .remediation_pending(app.awaiting_remediation());
    frame.render_widget(area, layout.main);
}

fn render_complete(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let colors = &app.theme.colors;
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Every unit is complete!",
            Style::default()
                .fg(colors.success())
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("Points earned: {}", app.session.progress.points),
            Style::default().fg(colors.fg()),
        )),
        Line::from(Span::styled(
            "Keep the due items fresh with Ctrl+R.",
            Style::default().fg(colors.text_pending()),
        )),
    ];
    let block = Block::bordered().border_style(Style::default().fg(colors.border_focused()));
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        layout.main,
    );
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let colors = &app.theme.colors;
    let hints: &[&str] = match app.screen {
        AppScreen::Drill if app.word.is_some() => &[
            "[Enter] Check",
            "[Ctrl+S] Listen",
            "[Esc] Quit",
        ],
        AppScreen::Drill => &[
            "[Enter] Check",
            "[Space] Next word",
            "[Ctrl+S] Listen",
            "[Ctrl+P] Pronounce (no point)",
            "[Ctrl+R] Review",
            "[Ctrl+X] Reset",
            "[Esc] Quit",
        ],
        AppScreen::ReviewPicker => &["[j/k] Move", "[Enter] Start", "[l] Later", "[Esc] Close"],
        AppScreen::ConfirmReset => &["[y] Reset", "[any key] Cancel"],
        AppScreen::Complete => &["[Ctrl+R] Review", "[Ctrl+X] Reset", "[Esc] Quit"],
    };
    let line = pack_hint_lines(hints, layout.footer.width as usize)
        .into_iter()
        .next()
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            line,
            Style::default().fg(colors.text_pending()),
        ))),
        layout.footer,
    );
}

fn render_reset_dialog(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let popup = centered_rect(40, 20, frame.area());
    frame.render_widget(Clear, popup);
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Reset all progress?",
            Style::default()
                .fg(colors.warning())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Points, review history and position are erased.",
            Style::default().fg(colors.fg()),
        )),
        Line::default(),
        Line::from(Span::styled(
            "y to confirm, any other key to cancel",
            Style::default().fg(colors.text_pending()),
        )),
    ];
    let block = Block::bordered()
        .title(" Confirm ")
        .border_style(Style::default().fg(colors.error()))
        .style(Style::default().bg(colors.bg()));
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        popup,
    );
}
