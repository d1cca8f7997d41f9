use std::io::IsTerminal;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputStyle {
    Plain,
    Rich,
}

pub fn current_output_style() -> OutputStyle {
    if std::io::stdout().is_terminal() {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

fn status_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightGreen.into()))
        .effects(Effects::BOLD)
}

fn detail_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::BrightBlue.into()))
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub fn print_status(style: OutputStyle, status: &str, message: &str) {
    match style {
        OutputStyle::Plain => println!("{status}: {message}"),
        OutputStyle::Rich => println!("{} {message}", colorize(status_style(), status)),
    }
}

pub fn print_detail(style: OutputStyle, message: &str) {
    match style {
        OutputStyle::Plain => println!("  {message}"),
        OutputStyle::Rich => println!("  {}", colorize(detail_style(), message)),
    }
}

/// Progress over apply entries; a bar only when stdout is a terminal.
pub fn apply_progress(style: OutputStyle, total: u64) -> Option<ProgressBar> {
    if style != OutputStyle::Rich {
        return None;
    }

    let progress_bar = ProgressBar::new(total.max(1));
    if let Ok(template) = ProgressStyle::with_template(
        "{spinner:.cyan.bold} {msg:<24} [{bar:20.cyan/blue}] {pos:>3}/{len:3}",
    ) {
        progress_bar.set_style(template.progress_chars("=>-"));
    }
    Some(progress_bar)
}
