mod cli;
mod logging;

use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use phosphor_config::Config;
use phosphor_core::{Phosphor, Viewport};
use phosphor_field::FieldAnimator;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};

use crate::cli::Cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;
    let config = cli.load_config()?;

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }
    tracing::debug!(font = %config.style.font_family, "requested font");

    let terminal = match ratatui::try_init() {
        Ok(terminal) => terminal,
        Err(err) => {
            tracing::warn!(%err, "terminal unavailable, nothing to animate");
            return Ok(());
        }
    };
    let result = run(terminal, &config);
    ratatui::restore();
    result
}

/// Mount the field and run it. Returns quietly when there is no drawable area.
fn run(mut terminal: DefaultTerminal, config: &Config) -> color_eyre::Result<()> {
    let size = terminal.size()?;
    let viewport = Viewport::new(size.width, size.height, config.style.cell_metrics());
    let Some(animator) = FieldAnimator::mount(config.text.as_str(), config, viewport) else {
        return Ok(());
    };

    let _mouse = MouseCapture::enable()?;
    App::new(animator, config.display.fps).run(&mut terminal)
}

/// Reports pointer motion while alive.
struct MouseCapture;

impl MouseCapture {
    fn enable() -> io::Result<Self> {
        execute!(io::stdout(), EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for MouseCapture {
    fn drop(&mut self) {
        if let Err(err) = execute!(io::stdout(), DisableMouseCapture) {
            tracing::warn!(%err, "failed to release mouse capture");
        }
    }
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// The particle field.
    animator: FieldAnimator,
    /// Time between frame ticks.
    frame_period: Duration,
    /// Current accent preset.
    phosphor: Phosphor,
    /// Show the key help line.
    show_help: bool,
}

impl App {
    /// Construct a new instance of [`App`].
    ///
    /// Color cycling starts from the preset matching the configured accent,
    /// or from green for a custom accent.
    pub fn new(animator: FieldAnimator, fps: u32) -> Self {
        let phosphor = Phosphor::matching(animator.accent()).unwrap_or_default();
        Self {
            running: false,
            animator,
            frame_period: Duration::from_secs(1) / fps.max(1),
            phosphor,
            show_help: false,
        }
    }

    /// Run the application's main loop.
    ///
    /// Events are handled whole between frame ticks, so a resize never lands
    /// in the middle of a physics step.
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        self.animator.start();
        let mut next_tick = Instant::now();

        while self.running {
            let now = Instant::now();
            if now >= next_tick {
                self.animator.frame();
                terminal.draw(|frame| self.render(frame))?;
                next_tick += self.frame_period;
                // Drop frames instead of bursting to catch up
                if next_tick < now {
                    next_tick = now + self.frame_period;
                }
            }
            self.handle_crossterm_events(next_tick.saturating_duration_since(Instant::now()))?;
        }

        self.animator.stop();
        tracing::info!("stopped");
        Ok(())
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        self.animator.render(frame);

        if !self.show_help {
            return;
        }
        let [_, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let accent = Color::from(self.animator.accent());
        let mut spans = vec![
            "q".bold().fg(accent),
            " quit  ".dark_gray(),
            "space".bold().fg(accent),
            " pause  ".dark_gray(),
            "s".bold().fg(accent),
            " scanlines  ".dark_gray(),
            "n".bold().fg(accent),
            " noise  ".dark_gray(),
            "g".bold().fg(accent),
            " glow  ".dark_gray(),
            "c".bold().fg(accent),
            " color  ".dark_gray(),
            "r".bold().fg(accent),
            " reset".dark_gray(),
        ];
        if !self.animator.is_running() {
            spans.push("  PAUSED".bold().fg(accent));
        }
        frame.render_widget(Line::from(spans).centered(), help_area);
    }

    /// Waits up to `timeout` for one crossterm event and applies it.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(columns, rows) => self.animator.resize(columns, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            (_, KeyCode::Char('s')) => {
                let effects = self.animator.effects_mut();
                effects.scanlines = !effects.scanlines;
            }
            (_, KeyCode::Char('n')) => {
                let effects = self.animator.effects_mut();
                effects.noise = !effects.noise;
            }
            (_, KeyCode::Char('g')) => self.animator.toggle_glow(),
            (_, KeyCode::Char('c')) => self.cycle_phosphor(),
            (_, KeyCode::Char('r')) => self.animator.reseed(),
            (_, KeyCode::Char('h') | KeyCode::Char('?')) => self.show_help = !self.show_help,
            _ => {}
        }
    }

    /// Pointer motion moves the attraction target.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Moved | MouseEventKind::Drag(_) = mouse.kind {
            self.animator.pointer_moved_to_cell(mouse.column, mouse.row);
        }
    }

    fn toggle_pause(&mut self) {
        if self.animator.is_running() {
            self.animator.stop();
        } else {
            self.animator.start();
        }
    }

    /// Cycle through the phosphor presets.
    fn cycle_phosphor(&mut self) {
        self.phosphor = self.phosphor.next();
        self.animator.set_accent(self.phosphor.rgb());
        tracing::debug!(phosphor = self.phosphor.name(), "accent changed");
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::MouseButton;
    use phosphor_core::{CellMetrics, Rgb};

    fn app_with(config: &Config) -> App {
        let viewport = Viewport::new(80, 24, CellMetrics::from_font_size(10.0));
        let animator = FieldAnimator::mount("AB", config, viewport).unwrap();
        let mut app = App::new(animator, config.display.fps);
        app.running = true;
        app.animator.start();
        app
    }

    fn app() -> App {
        app_with(&Config::default())
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        app.on_key_event(KeyEvent::new(code, modifiers));
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_ctrl_c_quits_without_changing_color() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!app.running);
        assert_eq!(app.phosphor, Phosphor::Green);
        assert_eq!(app.animator.accent(), Rgb::TERMINAL_GREEN);
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = app();
            press(&mut app, code, KeyModifiers::NONE);
            assert!(!app.running);
        }
    }

    #[test]
    fn test_c_cycles_phosphor() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(app.running);
        assert_eq!(app.phosphor, Phosphor::Amber);
        assert_eq!(app.animator.accent(), Phosphor::Amber.rgb());
    }

    #[test]
    fn test_cycle_starts_from_configured_accent() {
        let mut config = Config::default();
        config.style.accent_color = Phosphor::Amber.rgb();
        let mut app = app_with(&config);
        assert_eq!(app.phosphor, Phosphor::Amber);

        press(&mut app, KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(app.animator.accent(), Phosphor::Cyan.rgb());
    }

    #[test]
    fn test_custom_accent_cycles_from_green() {
        let mut config = Config::default();
        config.style.accent_color = Rgb::new(12, 34, 56);
        let mut app = app_with(&config);
        assert_eq!(app.phosphor, Phosphor::Green);

        press(&mut app, KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(app.animator.accent(), Phosphor::Amber.rgb());
    }

    #[test]
    fn test_space_toggles_pause() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
        assert!(!app.animator.is_running());
        assert!(app.running);
        press(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
        assert!(app.animator.is_running());
    }

    #[test]
    fn test_effect_and_help_toggles() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'), KeyModifiers::NONE);
        assert!(app.animator.effects().scanlines);
        press(&mut app, KeyCode::Char('n'), KeyModifiers::NONE);
        assert!(app.animator.effects().noise);
        press(&mut app, KeyCode::Char('s'), KeyModifiers::NONE);
        assert!(!app.animator.effects().scanlines);

        press(&mut app, KeyCode::Char('?'), KeyModifiers::NONE);
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('h'), KeyModifiers::NONE);
        assert!(!app.show_help);
    }

    #[test]
    fn test_mouse_motion_moves_pointer_to_cell_center() {
        let mut app = app();
        let metrics = app.animator.viewport().metrics;

        app.on_mouse_event(mouse(MouseEventKind::Moved, 10, 5));
        assert_eq!(app.animator.pointer(), metrics.cell_center(10, 5));

        app.on_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 3, 4));
        assert_eq!(app.animator.pointer(), metrics.cell_center(3, 4));
    }

    #[test]
    fn test_clicks_and_scrolls_leave_pointer_alone() {
        let mut app = app();
        app.on_mouse_event(mouse(MouseEventKind::Moved, 10, 5));
        let pointer = app.animator.pointer();

        app.on_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 20));
        app.on_mouse_event(mouse(MouseEventKind::ScrollDown, 40, 20));
        assert_eq!(app.animator.pointer(), pointer);
    }
}
