//! Ratatui terminal UI for playing Tenzies.
//!
//! Keys:
//! - `1`..`9`, `0`: hold/release die 1..10
//! - `←`/`→`: move the cursor, `h`/`Enter`: hold/release the die under it
//! - `Space`/`r`: roll (or start a new game after a win)
//! - `q`/`Esc`: quit

mod sink;

pub use sink::EventSink;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Terminal;

use tz_core::{BestScoreStore, DiceSource, GameController, GameView, NUM_DICE};
use tz_logging::NdjsonError;

const HELP: &str = "1-0: hold | ←/→ + h: hold | space/r: roll | q: quit";
const HELD_COLOR: Color = Color::Rgb(0x59, 0xE3, 0x91);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Roll,
    Toggle(usize),
    ToggleCursor,
    CursorLeft,
    CursorRight,
    Quit,
}

pub fn key_to_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') | KeyCode::Char('r') => Some(Action::Roll),
        KeyCode::Char('0') => Some(Action::Toggle(NUM_DICE - 1)),
        KeyCode::Char(c @ '1'..='9') => Some(Action::Toggle((c as u8 - b'1') as usize)),
        KeyCode::Char('h') | KeyCode::Enter => Some(Action::ToggleCursor),
        KeyCode::Left => Some(Action::CursorLeft),
        KeyCode::Right => Some(Action::CursorRight),
        _ => None,
    }
}

pub struct App<S: DiceSource, B: BestScoreStore> {
    pub game: GameController<S, B>,
    pub cursor: usize,
    /// Bottom line. Doubles as the live region for the win announcement.
    pub status: String,
    sink: Option<EventSink>,
}

impl<S: DiceSource, B: BestScoreStore> App<S, B> {
    pub fn new(game: GameController<S, B>, sink: Option<EventSink>) -> Self {
        Self {
            game,
            cursor: 0,
            status: HELP.to_string(),
            sink,
        }
    }

    /// Apply one input action. Returns false on quit.
    pub fn handle(&mut self, action: Action, now: Instant) -> bool {
        match action {
            Action::Quit => return false,
            Action::Roll => {
                let was_won = self.game.is_won();
                self.game.roll(now);
                if was_won {
                    self.status = HELP.to_string();
                }
            }
            Action::Toggle(i) => {
                self.cursor = i.min(NUM_DICE - 1);
                self.game.hold_index(i, now);
            }
            Action::ToggleCursor => self.game.hold_index(self.cursor, now),
            Action::CursorLeft => self.cursor = self.cursor.saturating_sub(1),
            Action::CursorRight => self.cursor = (self.cursor + 1).min(NUM_DICE - 1),
        }
        self.pump();
        true
    }

    /// Advance the clock and flush controller output to the log and status line.
    pub fn on_tick(&mut self, now: Instant) {
        self.game.tick(now);
        self.pump();
    }

    fn pump(&mut self) {
        let events = self.game.drain_events();
        if let Some(sink) = self.sink.as_mut() {
            // A broken log disables logging for the rest of the session.
            if let Err(err) = events.iter().try_for_each(|e| sink.record(e)) {
                self.status = format!("event log: {err}");
                self.sink = None;
            }
        }
        // The win summary takes precedence over a log error.
        if let Some(msg) = self.game.take_announcement() {
            self.status = msg;
        }
    }

    /// Flush buffered log lines; called once the session is over.
    pub fn finish(&mut self) -> Result<(), NdjsonError> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

/// Take over the terminal and play until the user quits.
pub fn run<S: DiceSource, B: BestScoreStore>(
    app: &mut App<S, B>,
    poll: Duration,
) -> io::Result<()> {
    // Terminal init.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let res = event_loop(&mut terminal, app, poll);
    let restored = restore(&mut terminal);

    // Terminal is restored before anything goes to stderr.
    if let Err(e) = app.finish() {
        eprintln!("Failed to flush event log: {e}");
    }
    res.and(restored)
}

fn restore(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn event_loop<S: DiceSource, B: BestScoreStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S, B>,
    poll: Duration,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        // Wake up in time for the next clock tick so the display never lags.
        let timeout = app
            .game
            .until_next_tick(Instant::now())
            .map_or(poll, |d| d.min(poll));
        if event::poll(timeout)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press {
                    if let Some(action) = key_to_action(k.code) {
                        if !app.handle(action, Instant::now()) {
                            return Ok(());
                        }
                    }
                }
            }
        }
        app.on_tick(Instant::now());
    }
}

fn stats_line(v: &GameView) -> Line<'static> {
    let mut spans = Vec::new();
    if v.roll_count > 0 && !v.won {
        spans.push(Span::styled("Rolls: ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(format!("{}   ", v.roll_count)));
        spans.push(Span::styled("Time: ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(format!("{}s   ", v.elapsed_secs)));
    }
    if let (Some(r), Some(t)) = (v.best.rolls, v.best.time) {
        spans.push(Span::styled(
            "Best: ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!("{r} rolls in {t}s")));
    }
    Line::from(spans)
}

fn draw_dice(f: &mut ratatui::Frame, area: Rect, v: &GameView, cursor: usize) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, NUM_DICE as u32); NUM_DICE])
        .split(area);
    for (i, d) in v.dice.iter().enumerate() {
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if d.held {
            style = style.bg(HELD_COLOR).fg(Color::Black);
        }
        let mut border = Style::default();
        if i == cursor && !v.won {
            border = border.fg(Color::Cyan);
        }
        let label = format!("{}", (i + 1) % 10);
        let p = Paragraph::new(Line::from(Span::styled(format!(" {} ", d.value), style)))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(label),
            );
        f.render_widget(p, cols[i]);
    }
}

pub fn draw<S: DiceSource, B: BestScoreStore>(f: &mut ratatui::Frame, app: &App<S, B>) {
    let v = app.game.view();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(2),
            Constraint::Length(3),
        ])
        .split(f.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Tenzies",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(
            "Roll until all dice are the same. Hold each die to freeze it at its current value between rolls.",
        ),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(header, chunks[0]);

    f.render_widget(
        Paragraph::new(stats_line(&v)).alignment(Alignment::Center),
        chunks[1],
    );

    draw_dice(f, chunks[2], &v, app.cursor);

    let trigger = Paragraph::new(Line::from(Span::styled(
        v.trigger_label(),
        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(trigger, chunks[3]);

    if v.won {
        let mut lines = vec![Line::from(format!(
            "You won in {} rolls and {} seconds!",
            v.roll_count, v.elapsed_secs
        ))];
        if v.new_record {
            lines.push(Line::from(Span::styled(
                "New Record!",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        }
        f.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            chunks[4],
        );
    }

    let status = Paragraph::new(app.status.as_str())
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(status, chunks[5]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use tz_core::{win_announcement, BestScore, MemoryStore, ScriptedDice};

    fn app() -> App<ScriptedDice, MemoryStore> {
        let game = GameController::new(
            ScriptedDice::constant(3),
            MemoryStore::new(),
            Duration::from_secs(1),
        );
        App::new(game, None)
    }

    fn render(app: &App<ScriptedDice, MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 20)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn digit_keys_map_to_dice() {
        assert_eq!(key_to_action(KeyCode::Char('1')), Some(Action::Toggle(0)));
        assert_eq!(key_to_action(KeyCode::Char('9')), Some(Action::Toggle(8)));
        assert_eq!(key_to_action(KeyCode::Char('0')), Some(Action::Toggle(9)));
        assert_eq!(key_to_action(KeyCode::Char(' ')), Some(Action::Roll));
        assert_eq!(key_to_action(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(key_to_action(KeyCode::Char('x')), None);
    }

    #[test]
    fn cursor_stays_on_board() {
        let mut a = app();
        let now = Instant::now();
        a.handle(Action::CursorLeft, now);
        assert_eq!(a.cursor, 0);
        for _ in 0..20 {
            a.handle(Action::CursorRight, now);
        }
        assert_eq!(a.cursor, NUM_DICE - 1);
        a.handle(Action::ToggleCursor, now);
        assert!(a.game.state().dice[NUM_DICE - 1].held);
    }

    #[test]
    fn quit_returns_false() {
        let mut a = app();
        assert!(!a.handle(Action::Quit, Instant::now()));
    }

    #[test]
    fn fresh_board_renders_title_and_roll() {
        let a = app();
        let screen = render(&a);
        assert!(screen.contains("Tenzies"));
        assert!(screen.contains("Roll"));
        assert!(!screen.contains("Best:"));
        assert!(!screen.contains("Rolls:"));
    }

    #[test]
    fn win_shows_new_game_and_announces_once() {
        let mut a = app();
        let t0 = Instant::now();
        a.handle(Action::Roll, t0);
        a.on_tick(t0 + Duration::from_secs(2));
        assert!(render(&a).contains("Rolls: 1"));
        for i in 0..NUM_DICE {
            a.handle(Action::Toggle(i), t0 + Duration::from_secs(2));
        }
        assert!(a.game.is_won());
        assert_eq!(a.status, win_announcement(1, 2));
        assert_eq!(a.game.best(), BestScore::new(1, 2));

        let screen = render(&a);
        assert!(screen.contains("New Game"));
        assert!(screen.contains("You won in 1 rolls and 2 seconds!"));
        assert!(screen.contains("New Record!"));
        assert!(screen.contains("Best: 1 rolls in 2s"));

        // Starting over clears the live region back to help.
        a.handle(Action::Roll, t0 + Duration::from_secs(5));
        assert_eq!(a.status, HELP);
        assert!(!a.game.is_won());
    }

    fn full_disk_sink() -> EventSink {
        EventSink::open("/dev/full", 1, "s".to_string()).unwrap()
    }

    #[test]
    fn log_failure_on_winning_hold_keeps_announcement() {
        let mut a = app();
        let t0 = Instant::now();
        a.handle(Action::Roll, t0);
        for i in 0..NUM_DICE - 1 {
            a.handle(Action::Toggle(i), t0 + Duration::from_secs(2));
        }
        a.sink = Some(full_disk_sink());

        a.handle(Action::Toggle(NUM_DICE - 1), t0 + Duration::from_secs(2));
        assert!(a.game.is_won());
        assert_eq!(a.status, win_announcement(1, 2));
        assert!(a.sink.is_none());
    }

    #[test]
    fn log_failure_without_win_reaches_status() {
        let mut a = app();
        a.sink = Some(full_disk_sink());
        a.handle(Action::Roll, Instant::now());
        assert!(a.status.starts_with("event log: "), "{}", a.status);
        assert!(a.finish().is_ok());
    }

    #[test]
    fn finish_reports_failed_flush() {
        let mut a = app();
        a.sink = Some(EventSink::open("/dev/full", 0, "s".to_string()).unwrap());
        a.handle(Action::Roll, Instant::now());
        assert_eq!(a.status, HELP);
        assert!(a.finish().is_err());
    }
}
