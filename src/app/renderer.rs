use std::io::{Stdout, Write};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::graph::Graph;
use crate::grid::Grid;
use crate::player::Player;
use crate::trace::{
    Step,
    dijkstra::{DijkstraStep, DijkstraStepKind},
    dsu::DsuStep,
    knapsack::{Item, KnapsackStep},
    maze::{MazeStep, MazeStepKind},
};

/// Width of one maze cell when rendered, in character columns.
pub const CELL_WIDTH: u16 = 2;
/// Row the canvas starts at, leaving room for the page title.
const CANVAS_TOP: u16 = 2;

/// One maze cell glyph. Every variant renders exactly [`CELL_WIDTH`] columns.
#[derive(Clone, Copy)]
enum MazeGlyph {
    Wall,
    Open,
    Start,
    End,
    OnPath,
    Bumped,
}

impl std::fmt::Display for MazeGlyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let styled_symbol = match self {
            MazeGlyph::Wall => "⬜".with(Color::White),
            MazeGlyph::Open => "  ".with(Color::Reset),
            MazeGlyph::Start => "🟩".with(Color::Green),
            MazeGlyph::End => "🟥".with(Color::Red),
            MazeGlyph::OnPath => "🟡".with(Color::Yellow),
            MazeGlyph::Bumped => "🟪".with(Color::Magenta),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                CELL_WIDTH as usize,
                "Each maze cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Clears the screen and prints the page title.
fn clear_frame(stdout: &mut Stdout, title: &str) -> std::io::Result<()> {
    queue!(
        stdout,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        style::PrintStyledContent(title.with(Color::Yellow).attribute(Attribute::Bold)),
    )?;
    Ok(())
}

/// Draws the step counter, playback state, speed, and narration line at the
/// bottom of the terminal. The narration is truncated to the terminal width.
pub fn draw_status<S: Step>(stdout: &mut Stdout, player: &Player<S>) -> std::io::Result<()> {
    let (term_width, term_height) = terminal::size()?;
    let state = if player.is_playing() { "playing" } else { "paused" };
    let counter = match player.cursor() {
        Some(i) => format!("step {}/{}", i + 1, player.len()),
        None => format!("step -/{}", player.len()),
    };
    let header = format!(
        "[{}] {} | {}ms | Enter: play/pause  \u{2192}: step  r: reset  \u{2191}/\u{2193}: speed  Esc: back",
        counter,
        state,
        player.interval().as_millis()
    );
    let message = player
        .current()
        .map(|s| s.message())
        .unwrap_or("Press Enter to play.");
    let (header, _) = header.unicode_truncate(term_width as usize);
    let (message, _) = message.unicode_truncate(term_width as usize);

    queue!(
        stdout,
        cursor::MoveTo(0, term_height.saturating_sub(2)),
        terminal::Clear(ClearType::CurrentLine),
        style::PrintStyledContent(header.with(Color::Cyan)),
        cursor::MoveTo(0, term_height.saturating_sub(1)),
        terminal::Clear(ClearType::CurrentLine),
        style::PrintStyledContent(message.with(Color::Grey).attribute(Attribute::Bold)),
    )?;
    stdout.flush()?;
    Ok(())
}

/// Draws the graph canvas (nodes at their 2D positions), the distance table,
/// and the edge list for one shortest-path step.
pub fn draw_graph(
    stdout: &mut Stdout,
    graph: &Graph,
    start: usize,
    end: usize,
    step: Option<&DijkstraStep>,
) -> std::io::Result<()> {
    clear_frame(stdout, "Dijkstra Shortest Path")?;

    let on_path = |i: usize| {
        step.is_some_and(|s| s.kind == DijkstraStepKind::Finished && s.path.contains(&i))
    };
    let is_visited = |i: usize| step.is_some_and(|s| s.visited[i]);
    let is_current = |i: usize| step.is_some_and(|s| s.current == Some(i));

    // Node canvas. Start and end nodes get a trailing marker.
    let mut canvas_bottom = CANVAS_TOP;
    for (i, node) in graph.nodes().iter().enumerate() {
        let row = CANVAS_TOP + node.pos.1;
        canvas_bottom = canvas_bottom.max(row);
        let color = if is_current(i) {
            Color::Yellow
        } else if on_path(i) {
            Color::Green
        } else if is_visited(i) {
            Color::Blue
        } else {
            Color::White
        };
        let marker = if i == start {
            format!("{}*", node.label)
        } else if i == end {
            format!("{}!", node.label)
        } else {
            node.label.to_string()
        };
        queue!(
            stdout,
            cursor::MoveTo(node.pos.0, row),
            style::PrintStyledContent(marker.with(color).attribute(Attribute::Bold)),
        )?;
    }

    // Distance table
    let mut row = canvas_bottom + 2;
    for (i, node) in graph.nodes().iter().enumerate() {
        let dist = match step.and_then(|s| s.distances[i]) {
            Some(d) => d.to_string(),
            None => "\u{221e}".to_string(),
        };
        let visited_mark = if is_visited(i) { "  visited" } else { "" };
        let color = if is_current(i) { Color::Yellow } else { Color::Reset };
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            style::PrintStyledContent(
                format!("{}: dist {}{}", node.label, dist, visited_mark).with(color)
            ),
        )?;
        row += 1;
    }

    // Edge list, highlighting the edge relaxed by this step
    row += 1;
    for edge in graph.edges() {
        let relaxed = step.is_some_and(|s| s.relaxed == Some((edge.from, edge.to)));
        let color = if relaxed { Color::Yellow } else { Color::DarkGrey };
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            style::PrintStyledContent(
                format!(
                    "{} \u{2192} {} (weight {})",
                    graph.label(edge.from),
                    graph.label(edge.to),
                    edge.weight
                )
                .with(color)
            ),
        )?;
        row += 1;
    }

    stdout.flush()?;
    Ok(())
}

/// Draws the union-find forest as node/parent/rank rows plus the highlighted
/// pointer edges of the current step.
pub fn draw_dsu(stdout: &mut Stdout, n: usize, step: Option<&DsuStep>) -> std::io::Result<()> {
    clear_frame(stdout, "Disjoint Set Union")?;

    let active = step.and_then(|s| s.active);
    let mut print_row = |stdout: &mut Stdout,
                         row: u16,
                         name: &str,
                         value: &dyn Fn(usize) -> String|
     -> std::io::Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            style::PrintStyledContent(format!("{:>7}:", name).with(Color::Cyan)),
        )?;
        for i in 0..n {
            let color = if active == Some(i) {
                Color::Yellow
            } else {
                Color::Reset
            };
            queue!(
                stdout,
                style::PrintStyledContent(format!("{:>4}", value(i)).with(color))
            )?;
        }
        Ok(())
    };

    print_row(stdout, CANVAS_TOP, "node", &|i| i.to_string())?;
    print_row(stdout, CANVAS_TOP + 1, "parent", &|i| match step {
        Some(s) => s.parent[i].to_string(),
        None => i.to_string(),
    })?;
    print_row(stdout, CANVAS_TOP + 2, "rank", &|i| match step {
        Some(s) => s.rank[i].to_string(),
        None => "0".to_string(),
    })?;

    if let Some(step) = step {
        let mut row = CANVAS_TOP + 4;
        for (child, parent) in step.highlights.iter() {
            queue!(
                stdout,
                cursor::MoveTo(0, row),
                style::PrintStyledContent(
                    format!("{} \u{2192} {}", child, parent).with(Color::Magenta)
                ),
            )?;
            row += 1;
        }
    }

    stdout.flush()?;
    Ok(())
}

/// Draws the item list and the DP table for one knapsack step. The cell
/// being compared is shown reversed; the reconstruction path cells turn
/// yellow and the selected items green on the terminal step.
pub fn draw_knapsack(
    stdout: &mut Stdout,
    items: &[Item],
    capacity: u32,
    step: Option<&KnapsackStep>,
) -> std::io::Result<()> {
    clear_frame(stdout, "0/1 Knapsack")?;

    for (i, item) in items.iter().enumerate() {
        let selected = step.is_some_and(|s| s.selected.contains(&i));
        let color = if selected { Color::Green } else { Color::Reset };
        queue!(
            stdout,
            cursor::MoveTo(0, CANVAS_TOP + i as u16),
            style::PrintStyledContent(
                format!("item {}: weight {}, value {}", i, item.weight, item.value).with(color)
            ),
        )?;
    }

    let Some(step) = step else {
        stdout.flush()?;
        return Ok(());
    };

    // Header row of capacities, then one table row per item row
    let table_top = CANVAS_TOP + items.len() as u16 + 1;
    queue!(stdout, cursor::MoveTo(4, table_top))?;
    for w in 0..=capacity {
        queue!(
            stdout,
            style::PrintStyledContent(format!("{:>4}", w).with(Color::Cyan))
        )?;
    }

    for (i, table_row) in step.table.iter().enumerate() {
        queue!(
            stdout,
            cursor::MoveTo(0, table_top + 1 + i as u16),
            style::PrintStyledContent(format!("{:>3} ", i).with(Color::Cyan)),
        )?;
        for (w, &value) in table_row.iter().enumerate() {
            let cell = format!("{:>4}", value);
            let styled = if step.cell == Some((i, w)) {
                cell.with(Color::Yellow).attribute(Attribute::Reverse)
            } else if step.path_cells.contains(&(i, w)) {
                cell.with(Color::Yellow)
            } else {
                cell.with(Color::Reset)
            };
            queue!(stdout, style::PrintStyledContent(styled))?;
        }
    }

    stdout.flush()?;
    Ok(())
}

/// Draws the maze grid for one backtracking step: walls, the active path,
/// the wall cell just bumped into, and the start/end markers.
pub fn draw_maze(
    stdout: &mut Stdout,
    grid: &Grid,
    start: (usize, usize),
    end: (usize, usize),
    step: Option<&MazeStep>,
) -> std::io::Result<()> {
    clear_frame(stdout, "Rat in a Maze")?;

    let on_path = |cell: (usize, usize)| step.is_some_and(|s| s.path.contains(&cell));
    let bumped = |cell: (usize, usize)| {
        step.is_some_and(|s| s.kind == MazeStepKind::Blocked && s.cell == cell)
    };

    for r in 0..grid.rows() {
        queue!(stdout, cursor::MoveTo(0, CANVAS_TOP + r as u16))?;
        for c in 0..grid.cols() {
            let cell = (r, c);
            let glyph = if bumped(cell) {
                MazeGlyph::Bumped
            } else if on_path(cell) {
                MazeGlyph::OnPath
            } else if cell == start {
                MazeGlyph::Start
            } else if cell == end {
                MazeGlyph::End
            } else if grid.is_open(cell) {
                MazeGlyph::Open
            } else {
                MazeGlyph::Wall
            };
            queue!(stdout, style::Print(glyph))?;
        }
    }

    stdout.flush()?;
    Ok(())
}
