use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use secrecy::SecretString;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use mindful_checkin::api::HistoryItem;
use mindful_checkin::app::{MindfulApp, Registration};
use mindful_checkin::checkin::{ActionOutcome, CheckInStep, IgnoreReason};
use mindful_checkin::markdown;
use mindful_checkin::transcript::{Origin, Transcript};

/// Environment variable read before prompting for a password.
const PASSWORD_ENV: &str = "MINDFUL_PASSWORD";

#[derive(Parser)]
#[command(name = "mindful", about = "Mindful: daily wellness check-ins", version)]
enum Cli {
    /// Sign in. The password is read from MINDFUL_PASSWORD or stdin
    Login { email: String },
    /// Create an account and sign in. The password is read like `login`
    Register {
        email: String,
        first_name: String,
        last_name: String,
    },
    /// Sign out and forget the saved session
    Logout,
    /// Guided daily check-in
    #[command(name = "checkin", alias = "check-in")]
    CheckIn,
    /// Free-form messages about your day
    Chat,
    /// List past check-ins and messages, newest first
    History {
        /// Zero-based page number
        #[arg(default_value_t = 0)]
        page: u32,
    },
    /// List raw metrics rows
    Metrics {
        /// Start date, YYYY-MM-DD
        start: Option<String>,
        /// End date, YYYY-MM-DD
        end: Option<String>,
    },
}

impl Cli {
    fn needs_login(&self) -> bool {
        !matches!(self, Self::Login { .. } | Self::Register { .. } | Self::Logout)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the conversation.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let app = MindfulApp::from_env().await?;

    if cli.needs_login() && !app.auth().is_authenticated().await {
        bail!("not signed in; run `mindful login <email>` first");
    }

    match cli {
        Cli::Login { email } => {
            let password = prompt_password().await?;
            let user = app.login(&email, &password).await?;
            println!("Signed in as {}", user.display_name());
        }
        Cli::Register {
            email,
            first_name,
            last_name,
        } => {
            let password = prompt_password().await?;
            let user = app
                .register(Registration {
                    email,
                    password,
                    first_name,
                    last_name,
                })
                .await?;
            println!("Welcome, {}! Your account is ready.", user.display_name());
        }
        Cli::Logout => {
            app.logout().await?;
            println!("Signed out.");
        }
        Cli::CheckIn => run_check_in(&app).await?,
        Cli::Chat => run_chat(&app).await?,
        Cli::History { page } => {
            let size = app.config().history_page_size;
            let history = app.backend().history(page, size).await?;
            if history.content.is_empty() {
                println!("No entries yet.");
            }
            for item in &history.content {
                print_history_item(item);
            }
            println!(
                "Page {} of {} ({} entries)",
                history.current_page + 1,
                history.total_pages.max(1),
                history.total_items
            );
        }
        Cli::Metrics { start, end } => {
            let rows = app
                .backend()
                .metrics(start.as_deref(), end.as_deref())
                .await?;
            for row in &rows {
                let ratings = [
                    row.calmness_rating,
                    row.energy_rating,
                    row.satisfaction_rating,
                    row.connection_rating,
                    row.engagement_rating,
                ]
                .map(|r| r.map_or_else(|| "-".to_string(), |v| v.to_string()))
                .join(" ");
                let day = row.day_rating.map_or_else(|| "-".to_string(), |d| d.to_string());
                println!(
                    "{}  {}  ratings: {ratings}  day: {day}",
                    row.analyzed_at.as_deref().unwrap_or("?"),
                    if row.is_checkin { "check-in" } else { "message " },
                );
            }
            println!("{} entries", rows.len());
        }
    }

    Ok(())
}

async fn prompt_password() -> anyhow::Result<SecretString> {
    let from_env = std::env::var(PASSWORD_ENV).ok();
    if from_env.is_none() {
        eprint!("Password: ");
    }
    read_password(from_env, BufReader::new(tokio::io::stdin())).await
}

/// The password from the environment if set, otherwise the first line of
/// `input`. Never taken from argv.
async fn read_password<R>(from_env: Option<String>, mut input: R) -> anyhow::Result<SecretString>
where
    R: AsyncBufRead + Unpin,
{
    let raw = match from_env {
        Some(value) => value,
        None => {
            let mut line = String::new();
            input.read_line(&mut line).await?;
            line
        }
    };
    let password = raw.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(SecretString::from(password.to_string()))
}

/// Print transcript entries as they are appended. Ends once every handle to
/// the transcript is dropped.
fn spawn_printer(transcript: &Transcript) -> JoinHandle<()> {
    let mut rx = transcript.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(entry) => {
                    let text = entry.render().to_plain_text();
                    match entry.origin {
                        Origin::Agent => println!("\n{text}\n"),
                        Origin::User => println!("  you: {text}"),
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Transcript printer lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

async fn run_check_in(app: &MindfulApp) -> anyhow::Result<()> {
    let transcript = Transcript::new();
    let printer = spawn_printer(&transcript);
    let mut flow = app.check_in(Arc::clone(&transcript));

    if let Some(user) = app.auth().user().await {
        eprintln!("Hi {}, let's check in. /quit to exit.", user.display_name());
    }
    flow.start_check_in().await;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            break;
        }

        let outcome = match flow.step() {
            CheckInStep::Rating => match line.parse::<i64>() {
                Ok(value) => flow.submit_rating(value).await,
                Err(_) => ActionOutcome::Ignored(IgnoreReason::InvalidRating(0)),
            },
            CheckInStep::Open => flow.submit_open_answer(line).await,
            _ => break,
        };
        match outcome {
            ActionOutcome::Ignored(IgnoreReason::InvalidRating(_)) => {
                eprintln!("Please answer with a number from 1 to 5.");
            }
            ActionOutcome::Ignored(IgnoreReason::EmptyAnswer) => {
                eprintln!("Please write a few words.");
            }
            _ => {}
        }
        if flow.step().is_terminal() {
            break;
        }
    }

    drop(flow);
    drop(transcript);
    printer.await?;
    Ok(())
}

async fn run_chat(app: &MindfulApp) -> anyhow::Result<()> {
    let transcript = Transcript::new();
    let printer = spawn_printer(&transcript);
    let chat = app.chat(Arc::clone(&transcript));

    eprintln!("Tell me about your day. /quit to exit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }
        chat.send_message(&line).await;
    }

    drop(chat);
    drop(transcript);
    printer.await?;
    Ok(())
}

fn print_history_item(item: &HistoryItem) {
    let when = item
        .analyzed_at
        .as_deref()
        .or(item.created_at.as_deref())
        .unwrap_or("?");
    if item.is_check_in() {
        let ratings = item
            .ratings()
            .map(|r| r.map(|v| v.to_string()).join(" "))
            .unwrap_or_else(|| "-".to_string());
        println!("── {when}  check-in  ratings: {ratings}");
    } else {
        println!("── {when}  message");
        if let Some(text) = &item.user_text {
            println!("  you: {text}");
        }
    }
    if let Some(rating) = item.day_rating {
        println!("  day rating: {rating}/10");
    }
    if let Some(response) = &item.llm_response {
        println!("{}", markdown::render(response).to_plain_text());
    }
    if let Some(recs) = item.recommendations.as_deref().filter(|r| !r.is_empty()) {
        for (i, rec) in recs.iter().enumerate() {
            println!("  {}. {rec}", i + 1);
        }
    }
    println!();
}
