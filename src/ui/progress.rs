use console::{style, Term};

const BAR_WIDTH: usize = 40;

/// Bounded progress bar drawn on stderr.
///
/// Nothing is drawn when stderr is not a terminal, so piped output and
/// tests stay clean.
pub struct ProgressBar {
    term: Term,
    total: usize,
    position: usize,
    unit: &'static str,
    visible: bool,
}

impl ProgressBar {
    pub fn new(total: usize, unit: &'static str) -> Self {
        let term = Term::stderr();
        let visible = total > 0 && term.is_term();
        Self::with_term(term, total, unit, visible)
    }

    /// A bar that tracks position without drawing
    pub fn hidden(total: usize, unit: &'static str) -> Self {
        Self::with_term(Term::stderr(), total, unit, false)
    }

    fn with_term(term: Term, total: usize, unit: &'static str, visible: bool) -> Self {
        let bar = ProgressBar {
            term,
            total,
            position: 0,
            unit,
            visible,
        };
        if bar.visible {
            let _ = bar.term.hide_cursor();
        }
        bar.draw();
        bar
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Advance by one step, saturating at the total
    pub fn inc(&mut self) {
        if self.position < self.total {
            self.position += 1;
        }
        self.draw();
    }

    /// Jump to the end and release the line
    pub fn finish(&mut self) {
        self.position = self.total;
        self.draw();
        self.release();
    }

    /// Text of the bar at the current position
    pub fn render(&self) -> String {
        let ratio = if self.total == 0 {
            1.0
        } else {
            self.position as f64 / self.total as f64
        };
        let filled = (ratio * BAR_WIDTH as f64).round() as usize;

        format!(
            "Progress |{}{}| {}% || {}/{} {}",
            style("\u{2588}".repeat(filled)).cyan(),
            "\u{2591}".repeat(BAR_WIDTH - filled),
            (ratio * 100.0).round() as usize,
            self.position,
            self.total,
            self.unit
        )
    }

    fn draw(&self) {
        if !self.visible {
            return;
        }
        let _ = self.term.clear_line();
        let _ = self.term.write_str(&self.render());
    }

    fn release(&mut self) {
        if self.visible {
            let _ = self.term.write_line("");
            let _ = self.term.show_cursor();
            self.visible = false;
        }
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(bar: &ProgressBar) -> String {
        console::strip_ansi_codes(&bar.render()).into_owned()
    }

    #[test]
    fn test_progress_renders_counts() {
        let mut bar = ProgressBar::hidden(4, "Tags");
        assert!(plain(&bar).ends_with("| 0% || 0/4 Tags"));

        bar.inc();
        bar.inc();
        assert_eq!(bar.position(), 2);
        assert!(plain(&bar).ends_with("| 50% || 2/4 Tags"));
    }

    #[test]
    fn test_progress_saturates() {
        let mut bar = ProgressBar::hidden(1, "Commits");
        bar.inc();
        bar.inc();
        assert_eq!(bar.position(), 1);
        bar.finish();
        assert!(plain(&bar).contains("100%"));
    }

    #[test]
    fn test_progress_empty_total() {
        let bar = ProgressBar::hidden(0, "Tags");
        assert!(plain(&bar).contains("100% || 0/0"));
    }
}
