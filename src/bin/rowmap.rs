use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use sqlite_rowmap::{
    ConnectOptions, Database, DynRecord, FieldSpec, OpenMode, ParamValue, RowMapError, ScalarKind,
};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run one SQLite query and print each row as JSON")]
struct Args {
    /// Database file (ignored with --mode memory)
    database: String,
    /// Single SQL statement to run
    sql: String,
    /// Positional parameter as KIND:VALUE (int, double, text); repeat in order
    #[arg(long = "param", value_name = "KIND:VALUE")]
    params: Vec<ParamValue>,
    /// Projected field as NAME:KIND; defaults to every column as text
    #[arg(long = "field", value_name = "NAME:KIND")]
    fields: Vec<FieldSpec>,
    #[arg(long, value_enum, default_value = "read-write-create")]
    mode: OpenMode,
    #[arg(long)]
    busy_timeout_ms: Option<u64>,
    /// Require exactly one row
    #[arg(long)]
    single: bool,
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn run(args: Args) -> Result<(), RowMapError> {
    let opts = ConnectOptions {
        path: args.database,
        mode: args.mode,
        busy_timeout_ms: args.busy_timeout_ms,
    };
    let db = Database::with_options(&opts)?;
    let stmt = db.prepare(&args.sql, &args.params)?;

    let specs: Vec<FieldSpec> = if args.fields.is_empty() {
        stmt.column_names()
            .iter()
            .map(|name| FieldSpec::new(name.as_str(), ScalarKind::Text))
            .collect()
    } else {
        args.fields
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut emit = |record: &DynRecord| -> Result<(), RowMapError> {
        let line = serde_json::to_string(record)
            .map_err(|e| RowMapError::ExecutionError(format!("cannot encode row: {e}")))?;
        writeln!(out, "{line}")
            .map_err(|e| RowMapError::ExecutionError(format!("cannot write row: {e}")))
    };

    if args.single {
        let record = stmt.pull_typed(&specs)?;
        if stmt.next_row(|_| Ok(()))?.is_some() {
            return Err(RowMapError::RuntimeError(
                "--single query returned more than one row".into(),
            ));
        }
        emit(&record)?;
    } else {
        let mut count = 0_usize;
        for record in stmt.typed_sequence(&specs) {
            emit(&record?)?;
            count += 1;
        }
        tracing::info!(rows = count, "query finished");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_max_level(args.log_level)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
