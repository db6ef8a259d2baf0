//! Startup helpers for the console chat client.
//!
//! Reads lines from stdin. A plain line is sent as a turn; lines starting with `/`
//! are commands (`/new`, `/list`, `/select <n>`, `/logs`, `/quit`).

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::task::{JoinError, JoinHandle};

use crate::backend::client::ChatBackend;
use crate::core::config::ClientConfig;
use crate::core::errors::ChatResult;
use crate::session::{ChatSession, IgnoreReason, TurnOutcome};
use crate::view;

/// A parsed console line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send the text as a turn.
    Send(String),
    /// Start a new conversation.
    New,
    /// Show the conversation list.
    List,
    /// Select a conversation by list index.
    Select(usize),
    /// Show backend logs for the selected conversation.
    Logs,
    /// Show the selected conversation.
    Show,
    /// Leave the client.
    Quit,
    /// Unrecognized command.
    Unknown(String),
}

/// Parse one console line.
#[must_use]
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Send(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("new"), None) => Command::New,
        (Some("list"), None) => Command::List,
        (Some("logs"), None) => Command::Logs,
        (Some("show"), None) => Command::Show,
        (Some("quit" | "exit"), None) => Command::Quit,
        (Some("select"), Some(n)) => n
            .parse()
            .map_or_else(|_| Command::Unknown(trimmed.to_string()), Command::Select),
        _ => Command::Unknown(trimmed.to_string()),
    }
}

/// Run the console client.
///
/// # Returns
/// `ExitCode::SUCCESS` on `/quit` or end of input, `1` on startup failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting modular chat client v{}", env!("CARGO_PKG_VERSION"));

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {e}");
            return ExitCode::from(1);
        }
    };
    tracing::info!("Backend endpoint: {}", config.chat_url());

    let session = match ChatSession::from_config(&config) {
        Ok(session) => Arc::new(session),
        Err(e) => {
            tracing::error!("Failed to create session: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let result = rt.block_on(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        console_loop(session, stdin, &mut stdout).await
    });
    if let Err(e) = result {
        tracing::error!("Console error: {e:#}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

async fn emit<W>(out: &mut W, text: &str) -> ChatResult<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        out.write_all(b"\n").await?;
    }
    out.flush().await?;
    Ok(())
}

/// Console rendering of one turn's result. `None` when there is nothing to print.
fn outcome_line(outcome: &TurnOutcome) -> Option<String> {
    match outcome {
        TurnOutcome::Ignored(IgnoreReason::EmptyInput) => None,
        TurnOutcome::Ignored(reason) => Some(format!("(ignorado: {reason:?})")),
        TurnOutcome::Replied(msg) | TurnOutcome::Failed(msg) => {
            let row = view::DisplayRow::from_message(msg);
            let footer = row.footer();
            if footer.is_empty() {
                Some(format!("{}: {}", row.who_label, row.text))
            } else {
                Some(format!("{}: {}\n    {footer}", row.who_label, row.text))
            }
        }
    }
}

/// Resolves when the outstanding turn finishes. Never resolves when there is none.
async fn finished(pending: &mut Option<JoinHandle<TurnOutcome>>) -> Result<TurnOutcome, JoinError> {
    match pending.as_mut() {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

async fn report<W>(out: &mut W, joined: Result<TurnOutcome, JoinError>) -> ChatResult<()>
where
    W: AsyncWrite + Unpin,
{
    match joined {
        Ok(outcome) => match outcome_line(&outcome) {
            Some(line) => emit(out, &line).await,
            None => Ok(()),
        },
        Err(e) => {
            tracing::warn!("Turn task failed: {e}");
            emit(out, "(falha interna no envio)").await
        }
    }
}

enum Event {
    Line(Option<String>),
    TurnDone(Result<TurnOutcome, JoinError>),
}

/// Drive the console: read commands from `input`, write everything to `out`.
///
/// A plain line is bound to its text and to the selected conversation when it is read,
/// then sent on a background task while input keeps flowing. Lines typed while that
/// turn is outstanding are dropped with a notice. On `/quit` or end of input the
/// outstanding turn is awaited and its reply printed before returning.
///
/// # Errors
/// Returns an error if reading `input` or writing `out` fails.
pub async fn console_loop<B, R, W>(
    session: Arc<ChatSession<B>>,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    B: ChatBackend + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    emit(out, &view::render_text(&session.current_conversation())).await?;

    let mut lines = input.lines();
    let mut pending: Option<JoinHandle<TurnOutcome>> = None;

    loop {
        let event = tokio::select! {
            biased;
            joined = finished(&mut pending), if pending.is_some() => Event::TurnDone(joined),
            line = lines.next_line() => Event::Line(line.context("reading input")?),
        };

        let line = match event {
            Event::TurnDone(joined) => {
                pending = None;
                report(out, joined).await?;
                continue;
            }
            Event::Line(Some(line)) => line,
            Event::Line(None) => break,
        };

        match parse_command(&line) {
            Command::Send(text) => {
                if text.trim().is_empty() {
                    continue;
                }
                if pending.is_some() {
                    emit(out, "(aguarde a resposta anterior)").await?;
                    continue;
                }
                let conversation_id = session.current_conversation().id().clone();
                let session = Arc::clone(&session);
                pending = Some(tokio::spawn(async move {
                    session.send_turn(&conversation_id, &text).await
                }));
            }
            Command::New => {
                session.new_conversation();
                emit(out, &view::render_text(&session.current_conversation())).await?;
            }
            Command::List => {
                let rows = session.with_store(view::sidebar);
                let listing: Vec<String> = rows
                    .iter()
                    .map(|r| {
                        let marker = if r.active { '*' } else { ' ' };
                        format!("{marker} {} {} [{}]", r.index, r.title, r.short_id)
                    })
                    .collect();
                emit(out, &listing.join("\n")).await?;
            }
            Command::Select(index) => match session.select_conversation(index) {
                Ok(()) => emit(out, &view::render_text(&session.current_conversation())).await?,
                Err(e) => emit(out, &e.to_string()).await?,
            },
            Command::Show => {
                emit(out, &view::render_text(&session.current_conversation())).await?;
            }
            Command::Logs => match session.fetch_logs().await {
                Ok(logs) if logs.is_empty() => emit(out, "(sem logs)").await?,
                Ok(logs) => emit(out, &logs.join("\n")).await?,
                Err(e) => emit(out, &format!("logs: {e}")).await?,
            },
            Command::Quit => break,
            Command::Unknown(cmd) => emit(out, &format!("comando desconhecido: {cmd}")).await?,
        }
    }

    if let Some(handle) = pending.take() {
        report(out, handle.await).await?;
    }

    Ok(())
}
