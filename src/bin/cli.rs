use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use trivia_api::db::queries::categories::{get_all_categories, import_categories};
use trivia_api::db::queries::questions::{get_all_questions, import_questions};
use trivia_api::db::{establish_connection, run_migrations, Category, Question};
use trivia_api::telemetry::init_tracing;

const CATEGORIES_FILE: &str = "categories.csv";
const QUESTIONS_FILE: &str = "questions.csv";

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database path
    db_path: PathBuf,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import categories and questions from a directory of CSV files
    Import { path: PathBuf },
    /// Export categories and questions to a directory of CSV files
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let db_path = cli.db_path.display().to_string();
    let pool = establish_connection(&db_path)
        .await
        .with_context(|| format!("Cannot connect to {db_path}"))?;
    run_migrations(&pool).await?;
    match cli.command {
        Commands::Export { path } => export_data(&pool, &path).await.context("Cannot export"),
        Commands::Import { path } => import_data(&pool, &path).await.context("Cannot import"),
    }
}

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record?;
        out.push(record);
    }
    Ok(out)
}

async fn export_data(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !path.exists() {
        std::fs::create_dir_all(path)?
    }
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Exporting to {}",
        path.display()
    );
    write_to(&path.join(CATEGORIES_FILE), categories)?;
    write_to(&path.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

async fn import_data(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&path.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&path.join(QUESTIONS_FILE))?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Importing from {}",
        path.display()
    );
    // questions reference categories, so categories go first
    import_categories(pool, categories).await?;
    import_questions(pool, questions).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trivia_api::db::establish_in_memory;

    #[tokio::test]
    async fn export_then_import_into_fresh_database() {
        let source = establish_in_memory().await.unwrap();
        run_migrations(&source).await.unwrap();
        import_questions(
            &source,
            vec![Question {
                id: 7,
                question: "Which is the only team to play in every soccer World Cup tournament?"
                    .into(),
                answer: "Brazil".into(),
                category: 6,
                difficulty: 3,
            }],
        )
        .await
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        export_data(&source, dir.path()).await.unwrap();

        let target = establish_in_memory().await.unwrap();
        run_migrations(&target).await.unwrap();
        import_data(&target, dir.path()).await.unwrap();

        assert_eq!(
            get_all_questions(&target).await.unwrap(),
            get_all_questions(&source).await.unwrap()
        );
        assert_eq!(get_all_categories(&target).await.unwrap().len(), 6);
    }

    #[test]
    fn missing_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_from::<Category>(&dir.path().join(CATEGORIES_FILE)).is_err());
    }
}
