mod app;
mod graph;
mod grid;
mod player;
mod trace;

/// Log to a file: stdout belongs to the terminal UI while raw mode is on.
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never(".", "stepviz.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    guard
}

fn main() -> std::io::Result<()> {
    // Keep the guard alive until exit so buffered log lines get flushed
    let _guard = init_logging();

    let mut stdout = std::io::stdout();
    app::setup_terminal(&mut stdout)?;
    let result = app::run(&mut stdout);
    app::restore_terminal(&mut stdout)?;
    result
}
