//! Vault terminal
//!
//! Command-line front end for threshold signature puzzles:
//! 1. Loads a roster (embedded executives or a CSV file)
//! 2. Shows worked solutions for any selection
//! 3. Checks hand-computed coefficients and signatures

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use threshold_heist::roster::EXECUTIVE_THRESHOLD;
use threshold_heist::{
    AnswerKey, ChallengeAnswer, CoefficientSubmission, LagrangeVerifier, Roster, VerifierConfig,
    COEFFICIENT_TOLERANCE, SIGNATURE_TOLERANCE,
};

#[derive(Parser)]
#[command(name = "vault")]
#[command(about = "Reconstruct threshold signatures by hand and check your math")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Roster CSV (id,name,role,position,share); defaults to the five executives
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Shares needed to reconstruct the signature (only with --roster; the executives need 3)
    #[arg(long)]
    threshold: Option<usize>,

    /// Accepted absolute error for each coefficient (exclusive)
    #[arg(long, default_value_t = COEFFICIENT_TOLERANCE)]
    coefficient_tolerance: f64,

    /// Accepted absolute error for the final signature (exclusive)
    #[arg(long, default_value_t = SIGNATURE_TOLERANCE)]
    signature_tolerance: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the roster and its fingerprint
    Roster,

    /// Show the worked solution for a selection
    Explain {
        /// Participant ids
        ids: Vec<String>,
    },

    /// List every valid selection with its expected signature
    Combinations,

    /// Check a hand-computed answer
    Check {
        /// Comma-separated participant ids
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,

        /// Coefficient as id=value, repeatable
        #[arg(long = "coefficient", value_parser = parse_pair)]
        coefficients: Vec<(String, String)>,

        /// Final signature
        #[arg(long, allow_hyphen_values = true)]
        signature: String,
    },

    /// Judge a JSON answer file
    Judge {
        /// Path to the answer JSON
        answer: PathBuf,
    },
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected id=value, got {s:?}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vault=info,threshold_heist=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// The embedded executives have a fixed threshold; any other value needs a roster file.
fn load_roster(path: Option<&Path>, threshold: Option<usize>) -> anyhow::Result<Roster> {
    match path {
        Some(path) => Roster::from_csv_path(threshold.unwrap_or(EXECUTIVE_THRESHOLD), path)
            .with_context(|| format!("loading roster {}", path.display())),
        None => {
            if let Some(t) = threshold.filter(|&t| t != EXECUTIVE_THRESHOLD) {
                anyhow::bail!(
                    "--threshold {t} requires --roster; the executives need {EXECUTIVE_THRESHOLD}"
                );
            }
            Ok(Roster::executives())
        }
    }
}

/// Returns whether the command succeeded from the player's point of view.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let roster = load_roster(cli.roster.as_deref(), cli.threshold)?;
    let config = VerifierConfig {
        coefficient_tolerance: cli.coefficient_tolerance,
        signature_tolerance: cli.signature_tolerance,
    };
    let verifier = LagrangeVerifier::with_config(&roster, config)?;

    match cli.command {
        Commands::Roster => {
            println!("threshold {} of {}", roster.threshold(), roster.len());
            println!("fingerprint {}", roster.fingerprint());
            for p in roster.participants() {
                println!(
                    "{:<10} {:<10} {:<6} x={:<6} share={}",
                    p.id,
                    p.display_name(),
                    p.role,
                    p.position,
                    p.share
                );
            }
            Ok(true)
        }
        Commands::Explain { ids } => {
            let selection = roster.select(&ids)?;
            println!("{}", verifier.explain(&selection));
            Ok(true)
        }
        Commands::Combinations => {
            for selection in roster.combinations() {
                let coeffs = verifier.compute_coefficients(&selection);
                let signature = verifier.compute_expected_signature(&selection, &coeffs);
                println!("{:<30} {:.4}", selection.ids().join(","), signature);
            }
            Ok(true)
        }
        Commands::Check {
            select,
            coefficients,
            signature,
        } => {
            let coefficients: CoefficientSubmission = coefficients.into_iter().collect();
            let result = verifier.evaluate(&select, &coefficients, &signature)?;
            let feedback = threshold_heist::Feedback::from_result(&result, &roster);
            info!(correct = result.is_correct, "answer checked");
            for (id, ok) in &result.coefficient_checks {
                println!("{:<10} {}", id, if *ok { "ok" } else { "wrong" });
            }
            println!("{}", feedback);
            Ok(result.is_correct)
        }
        Commands::Judge { answer } => {
            let text = std::fs::read_to_string(&answer)
                .with_context(|| format!("reading {}", answer.display()))?;
            let answer: ChallengeAnswer =
                serde_json::from_str(&text).context("parsing answer json")?;
            let key = AnswerKey::lagrange_with_config(roster.clone(), config)?;
            let judgement = key.judge(&answer)?;
            info!(correct = judgement.correct, kind = answer.kind(), "answer judged");
            println!("{}", judgement.feedback);
            Ok(judgement.correct)
        }
    }
}
