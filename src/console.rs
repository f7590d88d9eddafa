use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue, style, terminal,
};
use fcars::{Grid, GridWindow, Pos2, ZoomMode, view};
use std::{io, time::Duration};

pub enum ConsoleCommand {
    Exit,
    /// Zoom the way a click does, picking the mode from the display size
    Zoom,
    ZoomOut,
    ZoomIn,
    Undo,
    Reset,
    Handled,
}

pub struct ConsoleRender {
    tl: Pos2,
    focus: Pos2,
    report: String,
}
impl ConsoleRender {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen)?;
        Ok(Self {
            tl: Pos2::zero(),
            focus: Pos2::zero(),
            report: String::new(),
        })
    }

    /// The cells available for the model, one line is kept for the footer
    pub fn display() -> io::Result<(u32, u32)> {
        let (cols, rows) = terminal::size()?;
        Ok((cols as u32, rows.saturating_sub(1) as u32))
    }

    #[inline]
    pub fn focus(&self) -> Pos2 {
        self.focus
    }

    /// Keeps the focus inside the model and the window on the focus
    fn follow(&mut self, model: &Grid, display: (u32, u32)) {
        let size = model.size() as i32;
        self.focus = self.focus.clamp_to(size);

        let (w, h) = (display.0.max(1) as i32, display.1.max(1) as i32);
        self.tl.x = self.tl.x.clamp(self.focus.x - w + 1, self.focus.x).clamp(0, (size - w).max(0));
        self.tl.y = self.tl.y.clamp(self.focus.y - h + 1, self.focus.y).clamp(0, (size - h).max(0));
    }

    pub fn render(&mut self, model: &Grid) -> io::Result<()> {
        let display = Self::display()?;
        self.follow(model, display);
        let br = self.tl + Pos2::new(display.0 as i32, display.1 as i32);

        let mut stdout = io::stdout();
        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        for cell in GridWindow::new(model, self.tl, br).iter() {
            let cell = cell - self.tl;
            queue!(stdout, cursor::MoveTo(cell.x as u16, cell.y as u16))?;
            io::Write::write_all(&mut stdout, "█".as_bytes())?;
        }

        // outline the area the next zoom-in keeps
        if ZoomMode::choose(display, model.size()) == ZoomMode::In {
            let next = view::zoom_in_view(self.focus, model.size());
            for corner in [
                next.min,
                Pos2::new(next.max.x - 1, next.min.y),
                Pos2::new(next.min.x, next.max.y - 1),
                next.max - Pos2::splat(1),
            ] {
                let at = corner - self.tl;
                if at.x >= 0 && at.y >= 0 && at.x < display.0 as i32 && at.y < display.1 as i32 {
                    queue!(
                        stdout,
                        cursor::MoveTo(at.x as u16, at.y as u16),
                        style::Print('+')
                    )?;
                }
            }
        }

        // write footer
        queue!(stdout, cursor::MoveTo(0, display.1 as u16))?;
        io::Write::write_all(&mut stdout, self.report.as_bytes())?;

        let at = self.focus - self.tl;
        queue!(stdout, cursor::MoveTo(at.x as u16, at.y as u16), cursor::Show)?;
        io::Write::flush(&mut stdout)
    }

    pub fn poll_events(&mut self, timeout: Duration) -> io::Result<Option<ConsoleCommand>> {
        // make sure event is preset for us to take
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let cmd = match event::read()? {
            event::Event::Key(KeyEvent {
                kind: KeyEventKind::Release,
                ..
            }) => ConsoleCommand::Handled,
            // CTRL+C
            event::Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }) => ConsoleCommand::Exit,
            event::Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => ConsoleCommand::Exit,
                KeyCode::Enter | KeyCode::Char(' ') => ConsoleCommand::Zoom,
                KeyCode::Char('o') => ConsoleCommand::ZoomOut,
                KeyCode::Char('i') => ConsoleCommand::ZoomIn,
                KeyCode::Char('u') => ConsoleCommand::Undo,
                KeyCode::Char('r') => ConsoleCommand::Reset,
                // arrows to move the focus
                KeyCode::Up => self.step_focus(0, -1),
                KeyCode::Down => self.step_focus(0, 1),
                KeyCode::Left => self.step_focus(-1, 0),
                KeyCode::Right => self.step_focus(1, 0),
                _ => ConsoleCommand::Handled,
            },
            _ => ConsoleCommand::Handled,
        };
        Ok(Some(cmd))
    }

    fn step_focus(&mut self, dx: i32, dy: i32) -> ConsoleCommand {
        self.focus = self.focus + Pos2::new(dx, dy);
        ConsoleCommand::Handled
    }

    pub fn set_report(&mut self, report: String) {
        self.report = report;
    }
}
impl Drop for ConsoleRender {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            log::error!("failed to disable raw mode: {}", err);
        }
        if let Err(err) = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show) {
            log::error!("failed to leave alternate screen: {}", err);
        }
    }
}
