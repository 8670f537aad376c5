use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sclc_core::{AdvisorService, G8Question};
use sclc_types::{format_points, G8_MAX_POINTS};
use sclc_wire::{parse_g8_answers, FormTnm, RecordFile, Report, ReportFormat};

#[derive(Parser)]
#[command(name = "sclc")]
#[command(about = "Small-cell lung cancer treatment advisor CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the G8 questionnaire with item keys and answer points
    Questions,
    /// Compute a G8 frailty score
    G8 {
        /// Item answer as key=points (repeatable), e.g. --answer weight-loss=3
        #[arg(long = "answer", value_parser = parse_answer)]
        answers: Vec<(String, String)>,
    },
    /// Classify TNM inputs into a stage group
    Tnm {
        /// Greatest tumour dimension in centimetres
        #[arg(long)]
        size: Option<String>,
        /// Characteristic tag (repeatable), e.g. chest-wall-involvement
        #[arg(long = "characteristic")]
        characteristics: Vec<String>,
        /// Nodal category (N0-N3, Nx)
        #[arg(long)]
        nodes: Option<String>,
        /// Metastasis category (M0, M1, M1a-M1c, Mx)
        #[arg(long)]
        metastasis: Option<String>,
    },
    /// Generate recommendations for a patient record file (.yaml, .yml or .json)
    Recommend {
        /// Patient record file
        file: PathBuf,
        /// Output format: text, yaml or json
        #[arg(long, default_value = "text")]
        format: ReportFormat,
    },
}

fn parse_answer(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected key=points, got '{raw}'"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let service = AdvisorService::new();

    match cli.command {
        Some(Commands::Questions) => {
            for question in G8Question::ALL {
                println!("{} - {}", question.key(), question.prompt());
                for option in question.options() {
                    println!("    {:>3}  {}", format_points(option.points), option.label);
                }
            }
        }
        Some(Commands::G8 { answers }) => {
            let answers = parse_g8_answers(answers)?;
            let assessment = service.compute_frailty_score(&answers);
            println!(
                "G8 score: {}/{}",
                format_points(assessment.score),
                format_points(G8_MAX_POINTS)
            );
            if !assessment.complete {
                println!("Questionnaire incomplete: unanswered items are not counted.");
            } else if assessment.frail {
                println!("Frail (score ≤ 14): comprehensive geriatric assessment required.");
            } else {
                println!("No geriatric frailty signal (score > 14).");
            }
        }
        Some(Commands::Tnm {
            size,
            characteristics,
            nodes,
            metastasis,
        }) => {
            let inputs = FormTnm {
                tumor_size_cm: size.unwrap_or_default(),
                characteristics,
                nodes: nodes.unwrap_or_default(),
                metastasis: metastasis.unwrap_or_default(),
            }
            .into_inputs()?;
            let result = service.classify_tnm(&inputs);
            let stage = match result.stage.label() {
                "" => "no stage group for this combination",
                label => label,
            };
            println!("{} {} {}: {}", result.t, result.n, result.m, stage);
        }
        Some(Commands::Recommend { file, format }) => {
            let record = RecordFile::read(&file)
                .with_context(|| format!("failed to load {}", file.display()))?;
            let report = Report::generate(&record);
            print!("{}", report.render(format)?);
        }
        None => {
            println!("Use 'sclc --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_answer_pairs() {
        assert_eq!(
            parse_answer("health-comparison = 0.5").unwrap(),
            ("health-comparison".to_string(), "0.5".to_string())
        );
        assert!(parse_answer("bmi").is_err());
    }

    #[test]
    fn parses_recommend_arguments() {
        let cli = Cli::try_parse_from(["sclc", "recommend", "patient.yaml", "--format", "json"])
            .expect("valid args");
        match cli.command {
            Some(Commands::Recommend { file, format }) => {
                assert_eq!(file, PathBuf::from("patient.yaml"));
                assert_eq!(format, ReportFormat::Json);
            }
            _ => panic!("expected recommend command"),
        }
    }
}
