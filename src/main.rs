#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # regrade
//!
//! Operator front end for the quiz grading engine. It works on a JSON store
//! document of the form `{ "quizzes": [...], "responses": [...] }`.
//!
//! * `regrade backfill [STORE]` regrades every selected response and rewrites
//!   the ones whose derived state changed, then prints a JSON report.
//! * `regrade recompute QUIZ RESPONSE [STORE]` regrades one response and
//!   prints its checked answers.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use bpaf::*;
use dotenvy::dotenv;
use regrade::{
    Grader, JsonStore, MalformedPolicy, ReconciliationJob, ResponseFilter,
    config::{self, ConfigHandle},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, util::SubscriberInitExt};

/// Arguments of the `backfill` command.
#[derive(Debug, Clone)]
struct BackfillArgs {
    /// Only responses to this quiz.
    quiz:      Option<String>,
    /// Only responses by this student.
    student:   Option<String>,
    /// Only these responses.
    responses: Vec<String>,
    /// Only responses that were never graded.
    ungraded:  bool,
    /// Report without writing.
    dry_run:   bool,
    /// Refuse to grade malformed questions.
    strict:    bool,
    /// Concurrency override.
    jobs:      Option<usize>,
    /// Store document override.
    store:     Option<PathBuf>,
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Regrade many stored responses
    Backfill(BackfillArgs),
    /// Regrade a single stored response
    Recompute {
        /// Quiz the response belongs to.
        quiz:     String,
        /// Response to regrade.
        response: String,
        /// Refuse to grade malformed questions.
        strict:   bool,
        /// Store document override.
        store:    Option<PathBuf>,
    },
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the store document path
    fn store() -> impl Parser<Option<PathBuf>> {
        positional::<PathBuf>("STORE")
            .help("JSON store document, defaults to $REGRADE_STORE")
            .optional()
    }

    /// parses the strict flag
    fn strict() -> impl Parser<bool> {
        long("strict")
            .help("Fail responses whose quiz has malformed questions instead of grading them wrong")
            .switch()
    }

    let backfill = {
        let quiz = long("quiz")
            .help("Only responses to this quiz")
            .argument::<String>("ID")
            .optional();
        let student = long("student")
            .help("Only responses by this student")
            .argument::<String>("ID")
            .optional();
        let responses = long("response")
            .help("Only this response, may be repeated")
            .argument::<String>("ID")
            .many();
        let ungraded = long("ungraded")
            .help("Only responses that were never graded")
            .switch();
        let dry_run = long("dry-run")
            .help("Report what would change without writing")
            .switch();
        let strict = strict();
        let jobs = short('j')
            .long("jobs")
            .help("Responses regraded at once")
            .argument::<usize>("N")
            .optional();
        let store = store();

        construct!(BackfillArgs {
            quiz,
            student,
            responses,
            ungraded,
            dry_run,
            strict,
            jobs,
            store
        })
        .to_options()
        .command("backfill")
        .help("Regrade stored responses and save the ones that changed")
        .map(Cmd::Backfill)
    };

    let recompute = {
        let quiz = positional::<String>("QUIZ").help("Quiz id");
        let response = positional::<String>("RESPONSE").help("Response id");
        let strict = strict();
        let store = store();

        construct!(Cmd::Recompute {
            strict,
            quiz,
            response,
            store
        })
        .to_options()
        .command("recompute")
        .help("Regrade one response and print its checked answers")
    };

    let cmd = construct!([backfill, recompute]);

    cmd.to_options()
        .descr("Quiz grading and response backfill")
        .run()
}

/// Resolves the store document from the command line or the configuration.
fn store_path(arg: Option<PathBuf>, cfg: &ConfigHandle) -> Result<PathBuf> {
    arg.or_else(|| cfg.store_path().map(PathBuf::from))
        .context("No store given: pass STORE or set REGRADE_STORE")
}

/// Opens the JSON store at `path`.
async fn open_store(path: PathBuf) -> Result<Arc<JsonStore>> {
    let store = JsonStore::open(&path)
        .await
        .with_context(|| format!("Could not open store {}", path.display()))?;
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let cmd = options();
    let cfg = config::ensure_initialized()?;

    match cmd {
        Cmd::Backfill(args) => {
            let store = open_store(store_path(args.store, &cfg)?).await?;
            let malformed = if args.strict {
                MalformedPolicy::Strict
            } else {
                cfg.malformed()
            };
            let job = ReconciliationJob::builder()
                .quizzes(Arc::clone(&store))
                .responses(Arc::clone(&store))
                .concurrency(args.jobs.unwrap_or(cfg.concurrency()))
                .malformed(malformed)
                .dry_run(args.dry_run || cfg.dry_run())
                .build();
            let grader = Grader::new(job);

            let cancel = grader.job().cancellation();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, finishing responses already in flight");
                    cancel.cancel();
                }
            });

            let mut filter = ResponseFilter::all().with_responses(args.responses);
            if let Some(quiz) = args.quiz {
                filter = filter.for_quiz(quiz);
            }
            if let Some(student) = args.student {
                filter = filter.for_student(student);
            }
            if args.ungraded {
                filter = filter.ungraded_only();
            }

            let report = grader.run_backfill(&filter).await;
            store
                .flush()
                .await
                .with_context(|| format!("Could not write {}", store.path().display()))?;

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Cmd::Recompute {
            quiz,
            response,
            strict,
            store,
        } => {
            let store = open_store(store_path(store, &cfg)?).await?;
            let malformed = if strict {
                MalformedPolicy::Strict
            } else {
                cfg.malformed()
            };
            let grader = Grader::new(
                ReconciliationJob::builder()
                    .quizzes(Arc::clone(&store))
                    .responses(Arc::clone(&store))
                    .malformed(malformed)
                    .build(),
            );

            let checked = grader
                .recompute_one(&quiz, &response)
                .await
                .with_context(|| format!("Could not regrade response {response}"))?;
            store
                .flush()
                .await
                .with_context(|| format!("Could not write {}", store.path().display()))?;

            println!("{}", serde_json::to_string_pretty(&checked)?);
        }
    };

    Ok(())
}
