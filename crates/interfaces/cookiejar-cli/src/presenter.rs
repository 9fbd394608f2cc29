use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use cookiejar_app_core::{cookie_cards, watch_rows, Confirmer, Presenter};
use cookiejar_core::{DisplayRecord, WatchList};

/// Prints to the terminal. Mutating commands turn list rendering off and
/// report a one-line result instead.
#[derive(Debug, Clone, Copy)]
pub struct TextPresenter {
    lists: bool,
}

impl TextPresenter {
    pub fn new() -> Self {
        Self { lists: true }
    }

    pub fn quiet() -> Self {
        Self { lists: false }
    }
}

impl Default for TextPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for TextPresenter {
    fn render_watch_list(&self, list: &WatchList) {
        if self.lists {
            print!("{}", format_watch_table(list));
        }
    }

    fn render_cookies(&self, records: &[DisplayRecord]) {
        print!("{}", format_cookie_cards(records));
    }

    fn show_error(&self, message: &str) {
        eprintln!("Error: {message}");
    }
}

pub fn format_watch_table(list: &WatchList) -> String {
    if list.is_empty() {
        return "No watched cookies.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {:<20} {:<24} {}", "ID", "NAME", "DOMAIN", "DESC");
    let _ = writeln!(out, "{:-<16} {:-<20} {:-<24} {:-<24}", "", "", "", "");
    for row in watch_rows(list) {
        let _ = writeln!(
            out,
            "{:<16} {:<20} {:<24} {}",
            row.id, row.name, row.domain, row.desc
        );
    }
    out
}

pub fn format_cookie_cards(records: &[DisplayRecord]) -> String {
    if records.is_empty() {
        return "No watched cookies found.\n".to_string();
    }
    let mut out = String::new();
    for (i, card) in cookie_cards(records).into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{} = {}", card.label, card.value);
        if let Some(desc) = card.desc {
            let _ = writeln!(out, "  {desc}");
        }
        let _ = writeln!(out, "  from: {}", card.from);
    }
    out
}

/// Asks on the terminal; anything but `y`/`yes` declines.
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Used for `--yes`.
pub struct AutoConfirm;

impl Confirmer for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_every_entry_in_order() {
        let table = format_watch_table(&WatchList::builtin_default());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].starts_with("1 "));
        assert!(lines[4].contains("_ga"));
        assert!(lines[4].contains(".google.com"));
    }

    #[test]
    fn cards_show_value_desc_and_origin() {
        let records = vec![
            DisplayRecord {
                watch_index: 1,
                watch_id: "2".into(),
                name: "csrftoken".into(),
                value: "t0k".into(),
                domain: "localhost".into(),
                desc: None,
            },
            DisplayRecord {
                watch_index: 0,
                watch_id: "1".into(),
                name: "SESSION".into(),
                value: "abc".into(),
                domain: "localhost".into(),
                desc: Some("Local development session".into()),
            },
        ];
        assert_eq!(
            format_cookie_cards(&records),
            "SESSION = abc\n  Local development session\n  from: localhost\n\
             \ncsrftoken = t0k\n  from: localhost\n"
        );
    }

    #[test]
    fn empty_inputs_have_a_message() {
        assert_eq!(format_watch_table(&WatchList::new()), "No watched cookies.\n");
        assert_eq!(format_cookie_cards(&[]), "No watched cookies found.\n");
    }
}
