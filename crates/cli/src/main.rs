use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardio_core::constants::{CATALOG_MODE_ENV, MAX_PASSES_ENV, RULES_FILE_ENV};
use cardio_core::{CoreConfig, DiagnosisCatalog, Engine, Inference, UNDETERMINED_MESSAGE};

mod questionnaire;

use questionnaire::Questionnaire;

#[derive(Parser)]
#[command(name = "cardio")]
#[command(about = "Cardiovascular expert system CLI")]
struct Cli {
    /// YAML rule table to use instead of the built-in rules
    #[arg(long, global = true)]
    rules_file: Option<PathBuf>,
    /// Questionnaire catalog: "questionnaire" or "rules"
    #[arg(long, global = true)]
    catalog: Option<String>,
    /// Matcher pass limit (defaults to the number of rules)
    #[arg(long, global = true)]
    max_passes: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer a diagnosis from symptom identifiers
    Infer {
        /// Symptom identifiers (case-sensitive)
        symptoms: Vec<String>,
        /// Also list every rule that fired
        #[arg(long)]
        explain: bool,
    },
    /// Ask the questionnaire interactively, then infer
    Ask {
        /// Also list every rule that fired
        #[arg(long)]
        explain: bool,
    },
    /// List the rule table in scan order
    Rules,
    /// List the questionnaire symptoms
    Symptoms,
    /// List known diagnoses with their treatment
    Diagnoses,
    /// Validate the configured rule table and report unreachable rules
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cardio_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cfg = CoreConfig::from_env_values(
        cli.rules_file
            .map(|p| p.display().to_string())
            .or_else(|| std::env::var(RULES_FILE_ENV).ok()),
        cli.catalog.or_else(|| std::env::var(CATALOG_MODE_ENV).ok()),
        cli.max_passes.or_else(|| std::env::var(MAX_PASSES_ENV).ok()),
    )?;
    let (engine, catalog) = cfg.build()?;
    let diagnoses = DiagnosisCatalog::builtin();

    match cli.command {
        Some(Commands::Infer { symptoms, explain }) => {
            let inference = engine.infer_detailed(&symptoms);
            print_inference(&inference, &diagnoses, explain);
        }
        Some(Commands::Ask { explain }) => {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut output = std::io::stdout();
            let symptoms = Questionnaire::new(&catalog).run(&mut input, &mut output)?;
            let inference = engine.infer_detailed(&symptoms);
            print_inference(&inference, &diagnoses, explain);
        }
        Some(Commands::Rules) => {
            for rule in engine.registry().rules() {
                let conditions: Vec<String> =
                    rule.conditions().iter().map(ToString::to_string).collect();
                println!(
                    "{}: {} => {}",
                    rule.name(),
                    conditions.join(", "),
                    rule.diagnosis()
                );
            }
        }
        Some(Commands::Symptoms) => {
            for entry in catalog.entries() {
                println!("{}: {}", entry.id, entry.prompt);
            }
        }
        Some(Commands::Diagnoses) => {
            for info in diagnoses.entries() {
                println!("{}: {} ({})", info.id, info.description, info.treatment);
            }
        }
        Some(Commands::Check) => check(&engine, &catalog),
        None => {
            println!("Use 'cardio --help' for commands");
        }
    }

    Ok(())
}

fn print_inference(inference: &Inference, diagnoses: &DiagnosisCatalog, explain: bool) {
    match inference.diagnosis.id() {
        Some(id) => {
            println!("Diagnóstico: {id}");
            if let Some(info) = diagnoses.get(id) {
                println!("Tratamiento recomendado: {}", info.treatment);
            }
        }
        None => println!("{UNDETERMINED_MESSAGE}"),
    }

    if explain {
        for firing in &inference.firings {
            println!(
                "  pass {}: rule '{}' => {}",
                firing.pass, firing.rule, firing.diagnosis
            );
        }
    }
}

fn check(engine: &Engine, catalog: &cardio_core::SymptomCatalog) {
    let registry = engine.registry();
    println!("{} rules loaded", registry.len());

    let unreachable = catalog.unreachable_rules(registry);
    if unreachable.is_empty() {
        println!("Every rule can be satisfied from the questionnaire.");
        return;
    }

    for rule in unreachable {
        let missing: Vec<&str> = rule
            .symptom_conditions()
            .filter(|id| !catalog.contains(id))
            .map(|id| id.as_str())
            .collect();
        println!(
            "rule '{}' can never fire from the questionnaire; never asked: {}",
            rule.name(),
            missing.join(", ")
        );
    }
}
