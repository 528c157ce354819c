mod error;
mod parser;
mod schedule;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use error::ScheduleError;
use schedule::Schedule;

#[derive(Parser)]
#[command(
    name = "schedule_parser",
    about = "Convert a YMCA weekly schedule page (HTML) into structured JSON"
)]
struct Cli {
    /// Saved schedule page, e.g. schedules/2026-q1-group-swim.html
    html_file: PathBuf,
    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let schedule = parser::parse_file(&cli.html_file)
        .with_context(|| format!("Cannot parse schedule {}", cli.html_file.display()))?;
    let json = render(&schedule, cli.compact)?;

    match &cli.output {
        Some(path) => {
            write_output(path, &json)?;
            info!("Wrote {} events to {}", schedule.events.total(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write to stdout")?;
        }
    }

    info!("Done in {:.3}s", t0.elapsed().as_secs_f64());
    Ok(())
}

fn render(schedule: &Schedule, compact: bool) -> error::Result<String> {
    let json = if compact {
        serde_json::to_string(schedule)?
    } else {
        serde_json::to_string_pretty(schedule)?
    };
    Ok(json)
}

fn write_output(path: &Path, json: &str) -> error::Result<()> {
    std::fs::write(path, format!("{}\n", json)).map_err(|source| ScheduleError::Write {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn sample() -> Schedule {
        parser::parse_document(
            r#"<option selected="selected" value="4">Été 2026</option>
            <table class="programmation-panel-course-table"><tbody><tr>
              <td><p class="course-title">Aquajogging</p>
                <span class="course-infos"><span class="icon-clock-wrapper"></span>8:15 to 9:00</span></td>
            </tr></tbody></table>"#,
        )
    }

    #[test]
    fn pretty_output_layout() {
        let json = render(&sample(), false).unwrap();
        assert!(json.starts_with("{\n  \"meta\": {\n    \"season\": \"Été 2026\""));
        assert!(json.contains("\"Monday\": [\n      {\n        \"activity\": \"Aquajogging\""));
        let meta = json.find("\"meta\"").unwrap();
        let events = json.find("\"events\"").unwrap();
        assert!(meta < events);
    }

    #[test]
    fn compact_output_is_one_line() {
        let json = render(&sample(), true).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains(r#""Monday":[{"activity":"Aquajogging","start":"08:15","end":"09:00"}]"#));
    }

    #[test]
    fn writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        let json = render(&sample(), false).unwrap();
        write_output(&path, &json).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, format!("{}\n", json));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["events"]["Monday"][0]["start"], "08:15");
    }

    #[test]
    fn write_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("schedule.json");
        let err = write_output(&path, "{}").unwrap_err();
        assert!(matches!(err, ScheduleError::Write { .. }));
    }

    #[test]
    fn path_is_required() {
        Cli::command().debug_assert();
        assert!(Cli::try_parse_from(["schedule_parser"]).is_err());
        let cli = Cli::try_parse_from(["schedule_parser", "in.html", "-o", "out.json"]).unwrap();
        assert_eq!(cli.html_file, PathBuf::from("in.html"));
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert!(!cli.compact);
    }
}
