use std::io::Write;

use owo_colors::OwoColorize;
use slidesketch_core::{Config, SlideSpec};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print a slide as a readable outline.
pub fn print_slide(w: &mut dyn Write, slide: &SlideSpec, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", slide.title.bold())?;
    } else {
        writeln!(w, "{}", slide.title)?;
    }
    writeln!(w)?;

    for (i, bullet) in slide.bullets.iter().enumerate() {
        writeln!(w, "  {}. {}", i + 1, bullet)?;
    }
    if slide.bullets.is_empty() {
        if color.enabled() {
            writeln!(w, "  {}", "(no bullets)".dimmed())?;
        } else {
            writeln!(w, "  (no bullets)")?;
        }
    }

    if !slide.notes.is_empty() {
        writeln!(w)?;
        if color.enabled() {
            writeln!(w, "{} {}", "Notes:".cyan(), slide.notes)?;
        } else {
            writeln!(w, "Notes: {}", slide.notes)?;
        }
    }
    Ok(())
}

/// Print a slide as the JSON object the web endpoint returns.
pub fn print_slide_json(w: &mut dyn Write, slide: &SlideSpec) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(slide).map_err(std::io::Error::other)?;
    writeln!(w, "{}", json)
}

/// Print the resolved configuration, with the API key masked.
pub fn print_config(w: &mut dyn Write, config: &Config) -> std::io::Result<()> {
    let key = if config.api_key().is_some() {
        "*** (set)"
    } else {
        "(missing)"
    };
    writeln!(w, "api_key:      {}", key)?;
    writeln!(w, "model:        {}", config.model)?;
    writeln!(w, "api_base:     {}", config.api_base)?;
    match config.timeout_secs {
        Some(secs) => writeln!(w, "timeout_secs: {}", secs)?,
        None => writeln!(w, "timeout_secs: (none)")?,
    }
    if let Some(path) = slidesketch_core::config_file::config_path() {
        writeln!(w, "config file:  {}", path.display())?;
    }
    Ok(())
}
