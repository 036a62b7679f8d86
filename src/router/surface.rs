use std::collections::HashSet;
use std::io::Write;

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

use super::screens::ViewHandle;

/// Shows and hides screen views on behalf of the router.
///
/// Implementations must tolerate presenting a view that is already shown and
/// dismissing one that is not; both are no-ops.
pub trait PresentationSurface: Send {
    fn present(&mut self, view: &ViewHandle);

    fn dismiss(&mut self, view: &ViewHandle);
}

/// Terminal surface that writes one styled line per visible change.
pub struct TerminalSurface<W: Write + Send> {
    writer: W,
    shown: HashSet<ViewHandle>,
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            shown: HashSet::new(),
        }
    }

    pub fn is_shown(&self, view: &ViewHandle) -> bool {
        self.shown.contains(view)
    }

    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, color: Color, verb: &str, view: &ViewHandle) -> std::io::Result<()> {
        queue!(
            self.writer,
            SetForegroundColor(color),
            Print(format!("{verb:>9} ")),
            ResetColor,
            Print(view.id()),
            Print("\r\n")
        )?;
        self.writer.flush()
    }
}

impl<W: Write + Send> PresentationSurface for TerminalSurface<W> {
    fn present(&mut self, view: &ViewHandle) {
        if !self.shown.insert(view.clone()) {
            return;
        }
        let _ = self.write_line(Color::Green, "present", view);
    }

    fn dismiss(&mut self, view: &ViewHandle) {
        if !self.shown.remove(view) {
            return;
        }
        let _ = self.write_line(Color::DarkGrey, "dismiss", view);
    }
}
