use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod grade;
mod models;
mod report;
mod store;

use models::{coerce_points_str, truncate_name, Assignment, Category};

#[derive(Parser)]
#[command(name = "grade-tracker")]
#[command(about = "Weighted grade tracker for a single course", long_about = None)]
struct Cli {
    /// Path to the assignment store file
    #[arg(long, global = true, default_value = "assignments.json")]
    store: PathBuf,

    /// Re-normalize weights across the categories that have data
    #[arg(long, global = true)]
    renormalize: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an assignment
    Add {
        #[arg(long)]
        name: String,
        /// formative, minor, or major (anything else counts as formative)
        #[arg(long, default_value = "formative")]
        category: String,
        #[arg(long, default_value = "0")]
        earned: String,
        #[arg(long, default_value = "0")]
        possible: String,
    },
    /// Edit one field of an assignment
    Update {
        #[arg(long)]
        id: String,
        #[arg(long, value_parser = ["name", "category", "earned", "possible"])]
        field: String,
        #[arg(long)]
        value: String,
    },
    /// Remove an assignment by id
    Remove {
        #[arg(long)]
        id: String,
    },
    /// Remove every assignment
    Clear {
        /// Confirm the bulk delete
        #[arg(long)]
        yes: bool,
    },
    /// List stored assignments
    List,
    /// Show the category and final grade summary
    Summary,
    /// Write a markdown grade report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Import assignments from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Insert sample assignments
    Seed,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut assignments = store::load(&cli.store);

    match cli.command {
        Commands::Add {
            name,
            category,
            earned,
            possible,
        } => {
            let assignment = Assignment::new(
                &name,
                Category::parse_or_default(&category),
                coerce_points_str(&earned),
                coerce_points_str(&possible),
            );
            println!("Added {} ({}).", truncate_name(&name), assignment.id);
            assignments.push(assignment);
            store::save(&cli.store, &assignments)?;
            print_summary(&assignments, cli.renormalize);
        }
        Commands::Update { id, field, value } => {
            store::update_field(&mut assignments, &id, &field, &value)?;
            store::save(&cli.store, &assignments)?;
            println!("Updated {field} on {id}.");
            print_summary(&assignments, cli.renormalize);
        }
        Commands::Remove { id } => {
            if store::remove(&mut assignments, &id) {
                store::save(&cli.store, &assignments)?;
                println!("Removed {id}.");
                print_summary(&assignments, cli.renormalize);
            } else {
                println!("No assignment with id {id}.");
            }
        }
        Commands::Clear { yes } => {
            if assignments.is_empty() {
                println!("Nothing to clear.");
            } else if !yes {
                println!(
                    "Refusing to clear {} assignments without --yes. This cannot be undone.",
                    assignments.len()
                );
            } else {
                assignments.clear();
                store::save(&cli.store, &assignments)?;
                println!("Cleared all assignments.");
                print_summary(&assignments, cli.renormalize);
            }
        }
        Commands::List => {
            if assignments.is_empty() {
                println!("No assignments stored.");
            } else {
                for a in &assignments {
                    println!(
                        "- {} | {} ({}) {}/{} {}",
                        a.id,
                        if a.name.is_empty() { "(unnamed)" } else { &a.name },
                        a.category.label(),
                        a.earned,
                        a.possible,
                        report::percent_text(a.percent())
                    );
                }
            }
        }
        Commands::Summary => {
            print_summary(&assignments, cli.renormalize);
        }
        Commands::Report { out } => {
            let result = grade::aggregate(&assignments, cli.renormalize);
            let rendered = report::build_report(
                &assignments,
                &result,
                cli.renormalize,
                chrono::Utc::now().date_naive(),
            );
            std::fs::write(&out, rendered)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Import { csv } => {
            let imported = store::import_csv(&csv)?;
            let count = imported.len();
            assignments.extend(imported);
            store::save(&cli.store, &assignments)?;
            println!("Imported {count} assignments from {}.", csv.display());
            print_summary(&assignments, cli.renormalize);
        }
        Commands::Seed => {
            let inserted = store::seed(&mut assignments);
            store::save(&cli.store, &assignments)?;
            println!("Seed data inserted ({inserted} new).");
            print_summary(&assignments, cli.renormalize);
        }
    }

    Ok(())
}

fn print_summary(assignments: &[Assignment], renormalize: bool) {
    let result = grade::aggregate(assignments, renormalize);
    print!("{}", report::render_summary(&result, renormalize));
}
