mod playback;
mod renderer;

use std::io::{Stdout, Write};

use crossterm::{
    QueueableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::graph::Graph;
use crate::grid::{Cell, Grid};
use crate::player::Player;
use crate::trace::{
    dijkstra::dijkstra_trace,
    dsu::{DsuConfig, DsuOp, dsu_trace},
    knapsack::{Item, knapsack_trace},
    maze::maze_trace,
};

/// The four visualizable algorithms, in menu order.
#[derive(Debug, Clone, Copy)]
enum Algorithm {
    Dijkstra,
    Dsu,
    Knapsack,
    Maze,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Dijkstra => write!(f, "Dijkstra Shortest Path"),
            Algorithm::Dsu => write!(f, "Disjoint Set Union (Union-Find)"),
            Algorithm::Knapsack => write!(f, "0/1 Knapsack"),
            Algorithm::Maze => write!(f, "Rat in a Maze (Backtracking)"),
        }
    }
}

const ALGORITHMS: [Algorithm; 4] = [
    Algorithm::Dijkstra,
    Algorithm::Dsu,
    Algorithm::Knapsack,
    Algorithm::Maze,
];

/// Get a random number generator, optionally seeded for reproducibility.
fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
/// even if the panic occurs in a different thread
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}

/// Setup terminal in raw mode and enter alternate screen
/// Also sets a panic hook to restore terminal on panic
pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    queue!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    stdout.flush()?;
    Ok(())
}

/// Restore terminal to original state
/// Leave alternate screen and disable raw mode
pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Top-level menu loop: pick an algorithm, run its page, repeat until Esc.
pub fn run(stdout: &mut Stdout) -> std::io::Result<()> {
    loop {
        queue!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            style::PrintStyledContent(
                "stepviz: algorithm visualizer\r\n\r\n"
                    .with(Color::Yellow)
                    .attribute(Attribute::Bold)
            ),
        )?;
        stdout.flush()?;

        let algorithm = match select_from_menu(
            stdout,
            "Select an algorithm to visualize (use arrow keys and Enter, or Esc to exit):",
            &ALGORITHMS,
        )? {
            Some(algorithm) => algorithm,
            None => return Ok(()),
        };
        tracing::info!("Selected algorithm: {algorithm}");

        match algorithm {
            Algorithm::Dijkstra => dijkstra_page(stdout)?,
            Algorithm::Dsu => dsu_page(stdout)?,
            Algorithm::Knapsack => knapsack_page(stdout)?,
            Algorithm::Maze => maze_page(stdout)?,
        }
    }
}

/// Builds a random graph, runs the shortest-path generator once, and plays
/// the trace back. The chain edges guarantee the end node stays reachable;
/// the extra edges give the relaxations something to improve.
fn dijkstra_page(stdout: &mut Stdout) -> std::io::Result<()> {
    let n = match prompt_number(stdout, "Number of nodes (2-8): ", 2, 8, 6)? {
        Some(n) => n as usize,
        None => return Ok(()),
    };

    let mut rng = get_rng(None);
    let mut graph = Graph::new();
    for i in 0..n {
        let pos = (4 + (i % 4) as u16 * 14, (i / 4) as u16 * 4);
        graph.add_node((b'A' + i as u8) as char, pos);
    }
    for i in 0..n - 1 {
        graph
            .add_edge(i, i + 1, rng.random_range(1..10))
            .expect("chain endpoints exist");
    }
    for from in 0..n {
        for to in 0..n {
            if from != to && to != from + 1 && rng.random_range(0..4) == 0 {
                graph
                    .add_edge(from, to, rng.random_range(1..10))
                    .expect("random endpoints exist");
            }
        }
    }

    let (start, end) = (0, n - 1);
    let trace = dijkstra_trace(&graph, start, end);
    tracing::info!("Generated Dijkstra trace with {} steps", trace.len());

    playback::run_playback(stdout, Player::new(trace), |stdout, step| {
        renderer::draw_graph(stdout, &graph, start, end, step)
    })
}

fn dsu_page(stdout: &mut Stdout) -> std::io::Result<()> {
    let n = match prompt_number(stdout, "Universe size (2-10): ", 2, 10, 6)? {
        Some(n) => n as usize,
        None => return Ok(()),
    };
    let path_compression = match select_from_menu(stdout, "Enable path compression?", &["Yes", "No"])? {
        Some(choice) => choice == "Yes",
        None => return Ok(()),
    };
    let union_by_rank = match select_from_menu(stdout, "Enable union by rank?", &["Yes", "No"])? {
        Some(choice) => choice == "Yes",
        None => return Ok(()),
    };

    let mut rng = get_rng(None);
    let ops: Vec<DsuOp> = (0..n + 2)
        .map(|_| {
            if rng.random_range(0..4) == 0 {
                DsuOp::Find(rng.random_range(0..n))
            } else {
                DsuOp::Union(rng.random_range(0..n), rng.random_range(0..n))
            }
        })
        .collect();

    let config = DsuConfig {
        path_compression,
        union_by_rank,
    };
    let trace = dsu_trace(n, &ops, config);
    tracing::info!(
        "Generated DSU trace with {} steps ({} ops, {config:?})",
        trace.len(),
        ops.len()
    );

    playback::run_playback(stdout, Player::new(trace), move |stdout, step| {
        renderer::draw_dsu(stdout, n, step)
    })
}

fn knapsack_page(stdout: &mut Stdout) -> std::io::Result<()> {
    let capacity = match prompt_number(stdout, "Knapsack capacity (1-20): ", 1, 20, 8)? {
        Some(capacity) => capacity,
        None => return Ok(()),
    };

    let mut rng = get_rng(None);
    let items: Vec<Item> = (0..rng.random_range(3..6))
        .map(|_| Item {
            weight: rng.random_range(1..7),
            value: rng.random_range(1..13),
        })
        .collect();

    let trace = knapsack_trace(&items, capacity);
    tracing::info!(
        "Generated knapsack trace with {} steps ({} items, capacity {capacity})",
        trace.len(),
        items.len()
    );

    playback::run_playback(stdout, Player::new(trace), move |stdout, step| {
        renderer::draw_knapsack(stdout, &items, capacity, step)
    })
}

fn maze_page(stdout: &mut Stdout) -> std::io::Result<()> {
    let rows = match prompt_number(stdout, "Maze rows (2-15): ", 2, 15, 10)? {
        Some(rows) => rows as usize,
        None => return Ok(()),
    };
    let cols = match prompt_number(stdout, "Maze columns (2-15): ", 2, 15, 10)? {
        Some(cols) => cols as usize,
        None => return Ok(()),
    };

    let mut rng = get_rng(None);
    let mut grid = Grid::new(rows, cols);
    for r in 0..rows {
        for c in 0..cols {
            if rng.random_range(0..4) == 0 {
                grid.set((r, c), Cell::Blocked);
            }
        }
    }
    // The endpoints stay open; a blocked start would fail the search outright
    let start = (0, 0);
    let end = (rows - 1, cols - 1);
    grid.set(start, Cell::Open);
    grid.set(end, Cell::Open);

    let trace = maze_trace(&grid, start, end);
    tracing::info!("Generated maze trace with {} steps ({rows}x{cols})", trace.len());

    playback::run_playback(stdout, Player::new(trace), move |stdout, step| {
        renderer::draw_maze(stdout, &grid, start, end, step)
    })
}

/// Prompt for a number in `[min, max]`, with real-time validation and
/// feedback. Empty input accepts `default`.
/// Returns None if user cancels input with Esc
fn prompt_number(
    stdout: &mut Stdout,
    prompt: &str,
    min: u32,
    max: u32,
    default: u32,
) -> std::io::Result<Option<u32>> {
    let validate = |s: &str| {
        if s.trim().is_empty() {
            return Ok(default);
        }
        let error_msg = format!("Please enter a number between {min} and {max}.");
        s.trim()
            .parse::<u32>()
            .map_err(|_| error_msg.clone())
            .and_then(|n| {
                if (min..=max).contains(&n) {
                    Ok(n)
                } else {
                    Err(error_msg)
                }
            })
    };
    prompt_with_validation(stdout, prompt, validate)
}

/// Get user input with real-time validation and feedback
/// Returns None if user cancels input with Esc
/// Returns Some(T) if user inputs a valid input and presses Enter, where T is the validated type
fn prompt_with_validation<F, T>(
    stdout: &mut Stdout,
    prompt: &str,
    validate: F,
) -> std::io::Result<Option<T>>
where
    F: Fn(&str) -> Result<T, String>,
{
    // Save cursor position so we can restore / redraw
    queue!(stdout, cursor::Hide, cursor::SavePosition)?;
    stdout.flush()?;

    let mut input = String::new();

    let number_option = loop {
        // Re-render prompt line
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown)
        )?;

        // Print prompt
        stdout.queue(style::PrintStyledContent(
            prompt.with(Color::Cyan).attribute(Attribute::Bold),
        ))?;

        // Decide color based on validity
        let validation_result = validate(input.trim());
        match validation_result {
            Ok(_) => {
                stdout.queue(style::SetForegroundColor(Color::Green))?;
            }
            Err(_) => {
                stdout.queue(style::SetForegroundColor(Color::Red))?;
            }
        }

        queue!(stdout, style::Print(&input), style::ResetColor)?;
        stdout.queue(style::Print(" \r\n"))?;

        // Error message line (if any)
        if let Err(msg) = validation_result {
            stdout.queue(style::PrintStyledContent(
                msg.with(Color::DarkGrey).attribute(Attribute::Dim),
            ))?;
        }

        stdout.flush()?;

        // Wait for key event
        if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
            match code {
                KeyCode::Enter => {
                    match validate(&input) {
                        Ok(n) => break Some(n), // valid input, exit loop
                        Err(_) => continue,     // invalid, re-render
                    }
                }
                KeyCode::Char(c) if kind == event::KeyEventKind::Press => {
                    if !c.is_whitespace() && !c.is_control() {
                        input.push(c);
                    }
                }
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Esc => {
                    // User cancelled input
                    break None;
                }
                _ => {}
            }
        }
    };
    // Cleanup
    queue!(
        stdout,
        cursor::RestorePosition,
        terminal::Clear(ClearType::FromCursorDown),
        cursor::Show
    )?;
    stdout.flush()?;

    Ok(number_option)
}

/// Present a menu of options to the user and let them select one using arrow keys
/// Returns None if user cancels input with Esc
/// Returns Some(T) if user selects an option and presses Enter, where T is the option type
fn select_from_menu<T: std::fmt::Display + Copy>(
    stdout: &mut Stdout,
    prompt: &str,
    options: &[T],
) -> std::io::Result<Option<T>> {
    if options.is_empty() {
        return Ok(None);
    }

    // Save cursor position so we can restore / redraw
    queue!(stdout, cursor::Hide, cursor::SavePosition)?;

    let mut selected = 0;

    let selected_option = loop {
        // Re-render prompt line
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown)
        )?;

        // Print prompt
        stdout.queue(style::PrintStyledContent(prompt.with(Color::Yellow)))?;

        // Print options
        for (i, option) in options.iter().enumerate() {
            if i == selected {
                stdout.queue(style::SetAttribute(Attribute::Reverse))?;
            }
            stdout.queue(style::Print(format!("\r\n{}", option)))?;
            if i == selected {
                stdout.queue(style::SetAttribute(Attribute::NoReverse))?;
            }
        }
        stdout.queue(style::Print("\r\n"))?;

        stdout.flush()?;

        // Wait for key event
        if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
            if kind != event::KeyEventKind::Press {
                // Only handle key press events
                continue;
            }
            match code {
                KeyCode::Up => {
                    selected = match selected {
                        0 => options.len() - 1,
                        _ => selected - 1,
                    };
                }
                KeyCode::Down => {
                    selected = if selected >= options.len() - 1 {
                        0
                    } else {
                        selected + 1
                    };
                }
                KeyCode::Enter => {
                    break Some(options[selected]);
                }
                KeyCode::Esc => {
                    // User cancelled input
                    break None;
                }
                _ => {}
            }
        }
    };
    // Cleanup
    queue!(
        stdout,
        cursor::RestorePosition,
        terminal::Clear(ClearType::FromCursorDown),
        cursor::Show
    )?;
    stdout.flush()?;

    Ok(selected_option)
}
