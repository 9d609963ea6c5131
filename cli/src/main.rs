use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use drawing::doc::BoardDoc;
use drawing::session::{DrawSession, SaveRequest, UndoOutcome};
use drawing::stroke::Stroke;
use tally::{CounterDelta, SessionTally};

/// Board poll cadence, matching the site's refresh interval.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;
/// Metrics flush cadence, matching the site's batching interval.
const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("could not read input: {0}")]
    Input(#[from] io::Error),
    #[error("server returned HTTP {status}: {message}")]
    Server { status: u16, message: String },
}

#[derive(Parser, Debug)]
#[command(name = "skysite-cli", about = "Skysite board and metrics CLI")]
struct Cli {
    #[arg(long, env = "SKYSITE_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    Board(BoardCommand),
    Metrics(MetricsCommand),
}

#[derive(Args, Debug)]
struct BoardCommand {
    #[command(subcommand)]
    command: BoardSubcommand,
}

#[derive(Subcommand, Debug)]
enum BoardSubcommand {
    /// Print the shared board as JSON.
    Show,
    /// Draw strokes from JSONL input and save them to the board.
    Save {
        #[arg(long, default_value = "-", help = "Stroke JSONL path, or - for stdin")]
        input: String,
        #[arg(long, default_value_t = false, help = "Drop the last stroke before saving")]
        undo_last: bool,
    },
    /// Wipe the shared board.
    Clear,
    /// Poll the board and report stroke counts as they change.
    Watch {
        #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
        interval_secs: u64,
        #[arg(long, help = "Stop after this many polls")]
        rounds: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct MetricsCommand {
    #[command(subcommand)]
    command: MetricsSubcommand,
}

#[derive(Subcommand, Debug)]
enum MetricsSubcommand {
    /// Print the counter row as JSON (null before the first write).
    Show,
    /// Count one visit.
    Visit,
    /// Flush a batch of interaction deltas.
    Flush {
        #[arg(long, default_value_t = 0)]
        clicks: i64,
        #[arg(long, default_value_t = 0.0, help = "Pointer travel in pixels")]
        mouse_px: f64,
    },
    /// Record a visit, then flush synthetic clicks on the batching timer.
    Pump {
        #[arg(long, default_value_t = 1)]
        clicks_per_tick: i64,
        #[arg(long, default_value_t = 3)]
        ticks: usize,
        #[arg(long, default_value_t = DEFAULT_FLUSH_INTERVAL_SECS)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let api = ApiClient::new(&cli.base_url)?;

    match cli.command {
        Command::Ping => run_ping(&api).await,
        Command::Board(board) => run_board(&api, board.command).await,
        Command::Metrics(metrics) => run_metrics(&api, metrics.command).await,
    }
}

// =============================================================================
// API CLIENT
// =============================================================================

struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    fn new(base_url: &str) -> Result<Self, CliError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http: reqwest::Client::builder().build()?,
        })
    }

    async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, CliError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.request(method, &url);
        let request = match body {
            Some(json) => request.json(&json),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let value = response.json::<Value>().await.unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(CliError::Server { status: status.as_u16(), message: value.to_string() });
        }
        Ok(value)
    }

    async fn get_board(&self) -> Result<BoardDoc, CliError> {
        let value = self.request(reqwest::Method::GET, "/api/board", None).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn post_strokes(&self, request: &SaveRequest) -> Result<BoardDoc, CliError> {
        let body = serde_json::to_value(request)?;
        let value = self.request(reqwest::Method::POST, "/api/board", Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn delete_board(&self) -> Result<BoardDoc, CliError> {
        let value = self.request(reqwest::Method::DELETE, "/api/board", None).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn post_deltas(&self, delta: CounterDelta) -> Result<Value, CliError> {
        let body = serde_json::to_value(delta)?;
        self.request(reqwest::Method::POST, "/api/metrics", Some(body)).await
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn run_ping(api: &ApiClient) -> Result<(), CliError> {
    api.request(reqwest::Method::GET, "/healthz", None).await?;
    println!("ok");
    Ok(())
}

async fn run_board(api: &ApiClient, command: BoardSubcommand) -> Result<(), CliError> {
    match command {
        BoardSubcommand::Show => {
            let doc = api.get_board().await?;
            print_json(&serde_json::to_value(&doc)?)?;
            Ok(())
        }
        BoardSubcommand::Save { input, undo_last } => board_save(api, &input, undo_last).await,
        BoardSubcommand::Clear => {
            api.delete_board().await?;
            println!("board cleared");
            Ok(())
        }
        BoardSubcommand::Watch { interval_secs, rounds } => board_watch(api, interval_secs, rounds).await,
    }
}

/// Replay JSONL strokes into a draw session and save the pending batch.
async fn board_save(api: &ApiClient, input: &str, undo_last: bool) -> Result<(), CliError> {
    let mut session = DrawSession::new();
    session.apply_poll(api.get_board().await?.strokes);

    for stroke in read_strokes(input)? {
        let Some((first, rest)) = stroke.points.split_first() else {
            continue;
        };
        session.begin_stroke(*first, &stroke.color, stroke.width, stroke.is_eraser);
        for point in rest {
            session.extend_stroke(*point);
        }
        session.end_stroke();
    }

    if undo_last && session.undo() == UndoOutcome::PoppedPending {
        eprintln!("dropped the last input stroke");
    }

    let Some(request) = session.save() else {
        println!("nothing to save");
        return Ok(());
    };

    let sent = request.new_strokes.len();
    let merged = api.post_strokes(&request).await?;
    session.complete_save(merged.strokes);
    println!(
        "saved {sent} strokes; board now holds {}",
        session.server_strokes().len()
    );
    Ok(())
}

async fn board_watch(api: &ApiClient, interval_secs: u64, rounds: Option<usize>) -> Result<(), CliError> {
    let mut session = DrawSession::new();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    let mut polled = 0_usize;
    let mut last_count: Option<usize> = None;

    loop {
        ticker.tick().await;
        // Transient poll failures leave the last snapshot in place.
        match api.get_board().await {
            Ok(doc) => {
                session.apply_poll(doc.strokes);
                let count = session.server_strokes().len();
                if last_count != Some(count) {
                    println!("{count} strokes");
                    last_count = Some(count);
                }
            }
            Err(e) => tracing::warn!(error = %e, "board poll failed"),
        }

        polled += 1;
        if rounds.is_some_and(|limit| polled >= limit) {
            return Ok(());
        }
    }
}

async fn run_metrics(api: &ApiClient, command: MetricsSubcommand) -> Result<(), CliError> {
    match command {
        MetricsSubcommand::Show => {
            let value = api.request(reqwest::Method::GET, "/api/metrics", None).await?;
            print_json(&value)?;
            Ok(())
        }
        MetricsSubcommand::Visit => {
            let value = api
                .request(reqwest::Method::POST, "/api/metrics/visit", Some(Value::Object(serde_json::Map::new())))
                .await?;
            print_json(&value)?;
            Ok(())
        }
        MetricsSubcommand::Flush { clicks, mouse_px } => {
            let mut session = SessionTally::new();
            for _ in 0..clicks {
                session.record_click();
            }
            session.record_pointer_move(0.0, 0.0);
            session.record_pointer_move(mouse_px, 0.0);
            flush_once(api, &mut session).await?;
            Ok(())
        }
        MetricsSubcommand::Pump { clicks_per_tick, ticks, interval_secs } => {
            metrics_pump(api, clicks_per_tick, ticks, interval_secs).await
        }
    }
}

/// One flush cycle: drain behind the gate, send, settle the outcome.
async fn flush_once(api: &ApiClient, session: &mut SessionTally) -> Result<(), CliError> {
    let Some(delta) = session.begin_flush() else {
        println!("nothing to flush");
        return Ok(());
    };

    match api.post_deltas(delta).await {
        Ok(row) => {
            session.complete_flush();
            print_json(&row)?;
            Ok(())
        }
        Err(e) => {
            session.fail_flush();
            Err(e)
        }
    }
}

/// Visit once, then batch synthetic clicks on the flush timer. Failed
/// flushes keep their deltas and ride along on the next tick.
async fn metrics_pump(
    api: &ApiClient,
    clicks_per_tick: i64,
    ticks: usize,
    interval_secs: u64,
) -> Result<(), CliError> {
    if let Err(e) = api
        .request(reqwest::Method::POST, "/api/metrics/visit", Some(Value::Object(serde_json::Map::new())))
        .await
    {
        tracing::warn!(error = %e, "visit not recorded");
    }

    let mut session = SessionTally::new();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

    for _ in 0..ticks {
        ticker.tick().await;
        for _ in 0..clicks_per_tick {
            session.record_click();
        }

        let Some(delta) = session.begin_flush() else {
            continue;
        };
        match api.post_deltas(delta).await {
            Ok(row) => {
                session.complete_flush();
                println!("flushed {} clicks; totals: {row}", delta.clicks);
            }
            Err(e) => {
                session.fail_flush();
                tracing::warn!(error = %e, "flush failed; deltas kept for the next tick");
            }
        }
    }
    Ok(())
}

// =============================================================================
// INPUT / OUTPUT
// =============================================================================

/// Parse strokes from JSONL input, one stroke object per line.
fn read_strokes(input: &str) -> Result<Vec<Stroke>, CliError> {
    let reader: Box<dyn Read> = if input == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(File::open(input)?)
    };

    let mut strokes = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        strokes.push(serde_json::from_str::<Stroke>(trimmed)?);
    }
    Ok(strokes)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
