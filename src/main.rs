mod app;
mod cli;

fn main() {
    init_tracing();
    let cli = cli::parse();
    app::run(cli);
}

/// Route diagnostics to a file; stdout belongs to the TUI.
fn init_tracing() {
    let Some(dir) = dirs::data_dir().map(|d| d.join("capmix")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(dir.join("capmix.log")) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .init();
}
