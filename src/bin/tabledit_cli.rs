//! CLI for tabledit - edits the same tables as the browser app, stored on disk
//!
//! Usage:
//!   tabledit_cli [--store DIR] [--yes] <command> [args...]
//!
//! The store directory defaults to `$TABLEDIT_STORE`, then `.tabledit`.
//! Every editing command opens the table, applies the edit and saves.
//! Run with `--help` for the command list.

#![allow(clippy::exit)]

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tabledit::app::{Decision, TableApp};
use tabledit::editor::TableView;
use tabledit::storage::{FileStore, KeyValueStore};
use tabledit::TableditError;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    App(#[from] TableditError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser)]
#[command(name = "tabledit_cli", version, about = "Edit tabledit tables stored on disk")]
struct Cli {
    /// Directory holding the tables
    #[arg(long, env = "TABLEDIT_STORE", default_value = ".tabledit")]
    store: PathBuf,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List tables
    List,
    /// Create a table
    New,
    /// Print a table with its footer
    Show { id: String },
    /// Rename a table
    SetTitle { id: String, title: String },
    /// Rename a column
    SetHeader { id: String, col: usize, text: String },
    /// Edit a cell
    SetCell {
        id: String,
        row: usize,
        col: usize,
        text: String,
    },
    /// Append an empty row
    AddRow { id: String },
    /// Append a column
    AddColumn { id: String },
    /// Remove a row
    RemoveRow { id: String, row: usize },
    /// Remove a column
    RemoveColumn { id: String, col: usize },
    /// Choose the summed column (`none` to clear)
    Numeric {
        id: String,
        #[arg(value_parser = parse_column_choice)]
        col: ColumnChoice,
    },
    /// Delete a table (asks first)
    Delete { id: String },
    /// Write all tables as JSON to stdout or a file
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all tables with a JSON file (asks first)
    Import { file: PathBuf },
}

/// A column index or `none`.
#[derive(Debug, Clone, Copy)]
struct ColumnChoice(Option<usize>);

fn parse_column_choice(text: &str) -> Result<ColumnChoice, String> {
    if text.eq_ignore_ascii_case("none") {
        return Ok(ColumnChoice(None));
    }
    text.parse::<usize>()
        .map(|col| ColumnChoice(Some(col)))
        .map_err(|_| format!("expected a column index or `none`, got `{text}`"))
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let store = FileStore::open(&cli.store)?;
    let mut app = TableApp::new(store);

    match &cli.command {
        Command::List => {
            for entry in app.table_list() {
                println!("{}\t{}", entry.id, entry.title);
            }
        }
        Command::New => {
            let id = app.create_table()?;
            println!("{id}");
        }
        Command::Show { id } => {
            app.open_table(id)?;
            if let Some(view) = app.view() {
                print_view(&view);
            }
        }
        Command::SetTitle { id, title } => edit(&mut app, id, |app| app.set_title(title))?,
        Command::SetHeader { id, col, text } => {
            edit(&mut app, id, |app| app.set_header(*col, text))?;
        }
        Command::SetCell { id, row, col, text } => {
            edit(&mut app, id, |app| app.set_cell(*row, *col, text))?;
        }
        Command::AddRow { id } => edit(&mut app, id, |app| app.add_row().map(|_| ()))?,
        Command::AddColumn { id } => edit(&mut app, id, |app| app.add_column().map(|_| ()))?,
        Command::RemoveRow { id, row } => edit(&mut app, id, |app| app.remove_row(*row))?,
        Command::RemoveColumn { id, col } => {
            edit(&mut app, id, |app| app.remove_column(*col))?;
        }
        Command::Numeric { id, col } => {
            edit(&mut app, id, |app| app.select_numeric_column(col.0))?;
        }
        Command::Delete { id } => {
            app.open_table(id)?;
            let pending = app.request_delete()?;
            let decision = confirm(pending.prompt(), cli.yes)?;
            match app.resolve_delete(pending, decision)? {
                Some(notice) => eprintln!("{}", notice.message()),
                None => eprintln!("Cancelled."),
            }
        }
        Command::Export { output: None } => {
            let file = app.export()?;
            let mut stdout = io::stdout();
            stdout.write_all(file.contents.as_bytes())?;
            writeln!(stdout)?;
        }
        Command::Export { output: Some(path) } => {
            let file = app.export()?;
            fs::write(path, &file.contents)?;
            eprintln!("Written: {}", path.display());
        }
        Command::Import { file } => {
            let text = fs::read_to_string(file)?;
            let pending = app.stage_import(&text)?;
            eprintln!("{} table(s) in {}", pending.table_count(), file.display());
            let decision = confirm(pending.prompt(), cli.yes)?;
            match app.resolve_import(pending, decision)? {
                Some(notice) => eprintln!("{}", notice.message()),
                None => eprintln!("Cancelled."),
            }
        }
    }
    Ok(())
}

/// Open `id`, apply one edit, save.
fn edit<S, F>(app: &mut TableApp<S>, id: &str, f: F) -> Result<(), CliError>
where
    S: KeyValueStore,
    F: FnOnce(&mut TableApp<S>) -> Result<(), TableditError>,
{
    app.open_table(id)?;
    f(app)?;
    let notice = app.save()?;
    eprintln!("{}", notice.message());
    Ok(())
}

fn confirm(prompt: &str, assume_yes: bool) -> Result<Decision, CliError> {
    if assume_yes {
        return Ok(Decision::Accept);
    }
    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim();
    Ok((answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")).into())
}

fn print_view(view: &TableView) {
    println!("{}{}", view.title, if view.dirty { " *" } else { "" });

    let mut widths: Vec<usize> = view.header.iter().map(|h| h.chars().count()).collect();
    for row in view.body.iter().chain(std::iter::once(&view.footer)) {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        padded.join(" | ")
    };
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    println!("{}", line(&view.header));
    println!("{}", rule.join("-+-"));
    for row in &view.body {
        println!("{}", line(row));
    }
    if view.footer.iter().any(|c| !c.is_empty()) {
        println!("{}", rule.join("-+-"));
        println!("{}", line(&view.footer));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_edit_command() {
        let cli = Cli::try_parse_from([
            "tabledit_cli",
            "--store",
            "/tmp/t",
            "set-cell",
            "table_1",
            "0",
            "2",
            "12 kg",
        ])
        .unwrap();
        assert_eq!(cli.store, PathBuf::from("/tmp/t"));
        match cli.command {
            Command::SetCell { id, row, col, text } => {
                assert_eq!((id.as_str(), row, col, text.as_str()), ("table_1", 0, 2, "12 kg"));
            }
            _ => panic!("expected set-cell"),
        }
    }

    #[test]
    fn test_numeric_accepts_none_and_index() {
        let cli = Cli::try_parse_from(["tabledit_cli", "numeric", "t", "NONE"]).unwrap();
        assert!(matches!(cli.command, Command::Numeric { col: ColumnChoice(None), .. }));
        let cli = Cli::try_parse_from(["tabledit_cli", "numeric", "t", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Numeric { col: ColumnChoice(Some(3)), .. }));
        assert!(Cli::try_parse_from(["tabledit_cli", "numeric", "t", "x"]).is_err());
    }

    #[test]
    fn test_yes_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["tabledit_cli", "delete", "t", "--yes"]).unwrap();
        assert!(cli.yes);
    }

    #[test]
    fn test_bad_index_is_rejected() {
        assert!(Cli::try_parse_from(["tabledit_cli", "remove-row", "t", "-1"]).is_err());
    }
}
