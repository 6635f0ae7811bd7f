use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::cli::{Args, Command};
use crate::config::{self, Config};
use crate::diff::{self, RenderOptions};
use crate::highlighting::SyntaxHighlighter;
use crate::panel::{PanelController, PanelIcon, PanelState};
use crate::tree::ViewMode;

/// Terminal front end: wires the CLI commands to the panel controller and
/// renders whatever state the controller publishes.
pub struct App {
    controller: PanelController,
    command: Command,
    opts: RenderOptions,
    syntax_theme: String,
    json: bool,
}

impl App {
    pub fn new(args: Args, config: Config) -> Result<Self> {
        let dir = match args.repo {
            Some(path) => path,
            None => std::env::current_dir().context("could not determine the working directory")?,
        };

        let mode = if args.flat || config.flat_view {
            ViewMode::Flat
        } else {
            ViewMode::Hierarchical
        };
        let branch_override = args.branch.or(config.branch);
        let color = config.color && !args.no_color;

        Ok(Self {
            controller: PanelController::new(dir, mode, branch_override),
            command: args.command.unwrap_or(Command::Tree),
            opts: RenderOptions {
                pane_width: config.pane_width,
                context_lines: config.context_lines,
                color,
            },
            syntax_theme: config.syntax_theme,
            json: args.json,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let command = self.command.clone();
        match command {
            Command::Tree => self.show_tree(),
            Command::Open { path } => self.open(&path),
            Command::Config => show_config(),
        }
    }

    fn show_tree(&mut self) -> Result<()> {
        let json = self.json;
        let color = self.opts.color;
        self.controller
            .subscribe(Box::new(move |state| render_panel(state, json, color)));
        self.controller.reload();
        Ok(())
    }

    fn open(&mut self, path: &str) -> Result<()> {
        let file_diff = self
            .controller
            .open_file(path)
            .with_context(|| format!("could not open a comparison for {path}"))?;

        let highlighter = SyntaxHighlighter::new(&self.syntax_theme);
        let rendered = diff::render_file_diff(&file_diff, &self.opts, &highlighter);
        print!("{rendered}");
        Ok(())
    }
}

fn show_config() -> Result<()> {
    let path = config::config_path().context("could not determine the config directory")?;
    if !path.exists() {
        config::save(&Config::default()).context("could not write the default config")?;
    }
    println!("{}", path.display());
    Ok(())
}

fn render_panel(state: &PanelState, json: bool, color: bool) {
    if let Some(notice) = &state.notice {
        eprintln!("warning: {notice}");
    }

    if json {
        match serde_json::to_string_pretty(&state.items) {
            Ok(text) => println!("{text}"),
            Err(err) => tracing::warn!(error = %err, "could not serialize panel items"),
        }
        return;
    }

    if !state.branch.is_empty() {
        let title = format!("HEAD vs {}", state.branch);
        if color {
            println!("{}", title.bold());
        } else {
            println!("{title}");
        }
    }

    if state.items.is_empty() {
        println!("(no entries)");
        return;
    }

    for item in &state.items {
        let indent = "  ".repeat(item.depth);
        let glyph = if color {
            painted_glyph(item.icon)
        } else {
            item.icon.glyph().to_string()
        };
        println!("{indent}{glyph} {}", item.label);
    }
}

fn painted_glyph(icon: PanelIcon) -> String {
    let glyph = icon.glyph();
    match icon {
        PanelIcon::Modified => format!("{}", glyph.yellow()),
        PanelIcon::Added => format!("{}", glyph.green()),
        PanelIcon::Deleted => format!("{}", glyph.red()),
        PanelIcon::Renamed => format!("{}", glyph.magenta()),
        PanelIcon::Default => format!("{}", glyph.dimmed()),
        PanelIcon::Folder => format!("{}", glyph.cyan()),
    }
}
