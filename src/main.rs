// Entry point and high-level CLI flow.
//
// - Option [1] loads the order snapshot, printing diagnostics.
// - Option [2] generates the period report (KPIs, revenue series, top
//   products) and a JSON summary.
// - Option [3] changes the selected period.
use chrono::Local;
use clap::Parser;
use once_cell::sync::Lazy;
use order_report::types::{Order, PeriodWindow};
use order_report::{analytics, loader, output, reports, util};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing_subscriber::EnvFilter;

/// Period reports over an exported order snapshot.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Order snapshot to read; a `.csv` extension selects the flat export format.
    #[arg(long, default_value = "orders.json")]
    input: PathBuf,

    /// Reporting period: YYYY-MM, YYYY or all. Defaults to the latest month with orders.
    #[arg(long)]
    period: Option<PeriodWindow>,

    /// Directory the CSV and JSON outputs are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Number of products in the ranking.
    #[arg(long, default_value_t = analytics::DEFAULT_TOP_PRODUCTS)]
    top: usize,
}

// Loaded once, reported on many times in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        data: None,
        window: None,
    })
});

struct AppState {
    data: Option<Vec<Order>>,
    window: Option<PeriodWindow>,
}

fn app_state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One trimmed line, or `None` once the input is closed or unreadable.
fn next_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut buf = String::new();
    match reader.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Print `prompt` and read one trimmed line from stdin.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    next_line(&mut io::stdin().lock())
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N` or
/// closed the input.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(resp) = read_line("Back to Report Selection (Y/N): ") else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(path: &Path) {
    match loader::load_orders(path) {
        Ok((data, load_report)) => {
            println!(
                "Processing orders... ({} rows read, {} loaded, {} itemized)",
                util::format_int(load_report.total_rows),
                util::format_int(load_report.loaded_rows),
                util::format_int(load_report.itemized_orders)
            );
            if load_report.parse_errors > 0 {
                println!(
                    "Note: {} rows skipped due to parse/validation errors.",
                    util::format_int(load_report.parse_errors)
                );
            }
            let today = Local::now().date_naive();
            let years = analytics::available_years(&data, today);
            println!(
                "Years available: {}\n",
                years.iter().map(|y| y.to_string()).collect::<Vec<_>>().join(", ")
            );
            let mut state = app_state();
            if state.window.is_none() {
                state.window = Some(analytics::default_month(&data, today));
            }
            state.data = Some(data);
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to load order snapshot");
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

fn handle_change_period() {
    let Some(input) = read_line("Enter period (YYYY-MM, YYYY or all): ") else {
        return;
    };
    match input.parse::<PeriodWindow>() {
        Ok(window) => {
            app_state().window = Some(window);
            println!("Period set to {}.\n", window);
        }
        Err(e) => println!("{}\n", e),
    }
}

fn handle_generate_reports(out_dir: &Path, top: usize) {
    let (data, window) = {
        let state = app_state();
        (state.data.clone(), state.window)
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the order file first (option 1).\n");
        return;
    };
    let window = window.unwrap_or_else(|| analytics::default_month(&data, Local::now().date_naive()));

    println!("Generating reports for {}...", window);
    println!("Outputs saved to individual files...\n");
    let report = reports::generate_period_report(&data, window, top);

    println!("Report 1: Period Performance\n");
    let prior = analytics::prior_window(window)
        .map(|p| format!("(Compared with {})", p))
        .unwrap_or_else(|| "(All time, no comparison)".to_string());
    println!("{}\n", prior);
    let kpis = reports::metric_rows(&report.summary.metrics, report.summary.comparison.as_ref());
    output::preview_table_rows(&kpis, kpis.len());

    let series = reports::series_rows(&report.series);
    let file1 = out_dir.join("period_series.csv");
    if let Err(e) = output::write_csv(&file1, &series) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 2: Revenue Evolution");
    println!("(Completed orders only)\n");
    output::preview_table_rows(&series, 12);
    println!("(Full table exported to {})\n", file1.display());

    let file2 = out_dir.join("top_products.csv");
    if let Err(e) = output::write_csv(&file2, &report.rankings) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 3: Top Products");
    println!("(Top {} by revenue, itemized completed orders)\n", top);
    output::preview_table_rows(&report.rankings, top);
    println!("(Full table exported to {})\n", file2.display());

    let file3 = out_dir.join("period_summary.json");
    if let Err(e) = output::write_json(&file3, &report.summary) {
        eprintln!("Write error: {}", e);
    }
    let overview = &report.summary.overview;
    println!("Summary Stats ({}):", file3.display());
    println!(
        "{{\"orders\": {}, \"pending\": {}, \"completed\": {}, \"canceled\": {}, \"revenue\": {}}}\n",
        util::format_int(overview.total),
        util::format_int(overview.pending),
        util::format_int(overview.completed),
        util::format_int(overview.canceled),
        util::format_number(overview.revenue, 2)
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    app_state().window = cli.period;

    loop {
        println!("Order Reports:");
        println!("[1] Load the file");
        println!("[2] Generate Reports");
        println!("[3] Change Period\n");
        let Some(choice) = read_line("Enter choice: ") else {
            println!("\nInput closed. Exiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&cli.input),
            "2" => {
                println!();
                handle_generate_reports(&cli.out_dir, cli.top);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => handle_change_period(),
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_line_stops_at_end_of_input() {
        let mut input: &[u8] = b" 2 \n\nY";
        assert_eq!(next_line(&mut input).as_deref(), Some("2"));
        assert_eq!(next_line(&mut input).as_deref(), Some(""));
        assert_eq!(next_line(&mut input).as_deref(), Some("Y"));
        assert_eq!(next_line(&mut input), None);
        assert_eq!(next_line(&mut input), None);
    }

    #[test]
    fn next_line_on_empty_input_is_none() {
        let mut input: &[u8] = b"";
        assert_eq!(next_line(&mut input), None);
    }
}
