//! Plain-text rendering of the ordering page.

use std::fmt::Write as _;
use std::io::{self, Write};

use street_kitchen_storefront::page::Surface;
use street_kitchen_storefront::view::PageView;
use url::Url;

/// [`Surface`] that writes to the terminal.
///
/// Notices go to stderr. With `follow` set, the menu is reprinted whenever
/// its text changes.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    follow: bool,
    last_menu: Option<String>,
}

impl TerminalSurface {
    #[must_use]
    pub fn new(follow: bool) -> Self {
        Self {
            follow,
            ..Self::default()
        }
    }
}

impl Surface for TerminalSurface {
    fn notify(&mut self, message: &str) {
        let _ = writeln!(io::stderr(), "! {message}");
    }

    fn navigate(&mut self, url: &Url) {
        let _ = writeln!(io::stdout(), "Order placed: {url}");
    }

    fn render(&mut self, view: &PageView) {
        if !self.follow || view.is_loading() {
            return;
        }
        let menu = menu_text(view);
        if self.last_menu.as_deref() == Some(menu.as_str()) {
            return;
        }
        let _ = write!(io::stdout(), "{menu}");
        self.last_menu = Some(menu);
    }
}

/// The menu as aligned text, one item per line.
#[must_use]
pub fn menu_text(view: &PageView) -> String {
    if view.is_loading() {
        return "Loading menu...\n".to_string();
    }

    let mut out = String::new();
    if view.rows().is_empty() {
        out.push_str("No items on the menu\n");
        return out;
    }

    let width = view.rows().iter().map(|row| row.name.chars().count()).max().unwrap_or(0);
    for row in view.rows() {
        let _ = write!(
            out,
            "{:>5}  {:<width$}  {:>10}",
            row.id.to_string(),
            row.name,
            row.price,
        );
        if !row.category.is_empty() {
            let _ = write!(out, "  [{}]", row.category);
        }
        if !row.available {
            out.push_str("  (unavailable)");
        }
        if row.quantity > 0 {
            let _ = write!(out, "  x{} = {}", row.quantity, row.line_total);
        }
        out.push('\n');
    }
    out
}

/// The order summary as text.
#[must_use]
pub fn summary_text(view: &PageView) -> String {
    let summary = view.summary();
    let mut out = String::new();
    for line in &summary.lines {
        let _ = writeln!(out, "  {:<30} {:>10}", line.label, line.line_total);
    }
    let _ = writeln!(out, "  {:<30} {:>10}", "Total", summary.total);
    let _ = writeln!(
        out,
        "  {:<30} {:>10}",
        format!("GST {}%", summary.gst_percent),
        summary.gst_amount
    );
    let _ = writeln!(out, "  {:<30} {:>10}", "Payable", summary.payable);
    out
}
