//! keypanel - On-screen Virtual Keyboard
//!
//! Draws the keyboard panel in the terminal and reports clicked keys.

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use ratatui::widgets::Clear;
use std::cell::RefCell;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use keypanel::{
    config::Config,
    panel::KeyboardPanel,
    screen::{CellScale, TerminalScreen},
    style::StyleSheet,
    ui::{panel_point, render_keyboard},
};

#[derive(Parser)]
#[command(name = "keypanel")]
#[command(author, version, about = "On-screen virtual keyboard for the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: ~/.config/keypanel/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Layout units per terminal column
    #[arg(long)]
    units_per_column: Option<u16>,

    /// Layout units per terminal row
    #[arg(long)]
    units_per_row: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration file
    Init,
    /// Show the configuration file path
    ConfigPath,
    /// Print the keyboard layout table
    Layout,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let path = Config::create_default_config_file()?;
            println!("Created default config at: {}", path.display());
            return Ok(());
        }
        Some(Commands::ConfigPath) => {
            let path = Config::config_path()?;
            println!("{}", path.display());
            return Ok(());
        }
        Some(Commands::Layout) => {
            print_layout(&KeyboardPanel::new());
            return Ok(());
        }
        None => {}
    }

    // Load config
    let mut config = match cli.config {
        Some(path) => Config::load_from(&path)?,
        None => Config::load_or_default(),
    };

    // Apply CLI overrides
    if let Some(units) = cli.units_per_column {
        config.display.units_per_column = units;
    }
    if let Some(units) = cli.units_per_row {
        config.display.units_per_row = units;
    }

    run_tui(config)
}

fn print_layout(panel: &KeyboardPanel) {
    let (width, height) = panel.size();
    println!("{} ({}x{})", panel.title(), width, height);
    for row in &panel.layout().rows {
        let keys: Vec<String> = panel
            .row_buttons(row.kind)
            .map(|(_, button)| {
                let bounds = button.bounds();
                let marker = if button.is_special() { "*" } else { "" };
                format!("{}{}:{}x{}", button.label(), marker, bounds.width, bounds.height)
            })
            .collect();
        println!("{:<9} {:>2}  {}", row.kind, keys.len(), keys.join(" "));
    }
    println!("(* = special key)");
}

fn run_tui(config: Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create panel and report pressed keys
    let mut panel = KeyboardPanel::new();
    let scale = config.display.cell_scale_for(&panel);
    let styles = config.theme.style_sheet();
    let screen = TerminalScreen::new(scale);

    let last_key: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&last_key);
    panel.subscribe(move |key| {
        log::info!("Key pressed: {}", key);
        *sink.borrow_mut() = Some(format!("Key pressed: {}", key));
    });
    panel.show(&screen);

    // Main loop
    let result = run_event_loop(&mut terminal, &mut panel, &screen, scale, styles, &last_key);

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    panel: &mut KeyboardPanel,
    screen: &TerminalScreen,
    scale: CellScale,
    styles: StyleSheet,
    last_key: &Rc<RefCell<Option<String>>>,
) -> Result<()> {
    let mut area = Rect::default();

    loop {
        // Draw
        let status = last_key
            .borrow()
            .clone()
            .unwrap_or_else(|| "Click a key | Esc quit".to_string());
        terminal.draw(|frame| {
            area = frame.area();
            frame.render_widget(Clear, area);
            render_keyboard(frame, area, panel, styles, scale, Some(status.as_str()));
        })?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                _ => {}
            },
            Event::Mouse(mouse) => {
                let point = panel_point(area, panel, scale, mouse.column, mouse.row);
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        panel.press_at(point);
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        panel.release_at(point);
                    }
                    MouseEventKind::Down(_) => {
                        panel.cancel_press();
                    }
                    _ => {}
                }
            }
            Event::FocusLost => {
                panel.cancel_press();
            }
            Event::Resize(_, _) => {
                panel.recenter(screen);
            }
            _ => {}
        }
    }
}
