use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use promptkeep_rs::query::{category_name_for, PromptFilter};
use promptkeep_rs::storage::FileSystemStorage;
use promptkeep_rs::transfer::DEFAULT_EXPORT_FILE;
use promptkeep_rs::{Prompt, PromptDraft, PromptKeep, StoreConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the prompt and category collections
    #[arg(long, default_value = "./promptkeep-data")]
    data_dir: PathBuf,

    /// Owner tag stamped on new records
    #[arg(long, default_value = promptkeep_rs::config::DEFAULT_USER_ID)]
    user_id: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List prompts, newest first
    List {
        /// Only prompts in this category (by name)
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive search over name, content and category name
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a prompt, creating its category if needed
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: String,
    },
    /// Edit an existing prompt
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a prompt
    Delete { id: String },
    /// Print a prompt's content, ready to pipe into a clipboard tool
    Copy { id: String },
    /// List categories
    Categories,
    /// List prompts whose category no longer exists
    Dangling,
    /// Write all data to a JSON file
    Export {
        #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },
    /// Replace all data with the contents of a JSON file
    Import { file: PathBuf },
}

fn main() -> Result<()> {
    // Use `RUST_LOG=info` (or debug, trace, etc.) to control log level
    // Example: RUST_LOG=promptkeep_rs=debug promptkeep list
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    tracing::debug!(args = ?args, "Starting promptkeep");

    tracing::info!(path = %args.data_dir.display(), "Using filesystem storage");
    let store = Arc::new(FileSystemStorage::new(&args.data_dir));
    let config = StoreConfig::default().with_user_id(args.user_id);
    let keep = PromptKeep::with_config(store, &config);

    run(&keep, args.command)
}

fn run(keep: &PromptKeep, command: Command) -> Result<()> {
    match command {
        Command::List { category, search } => {
            let mut filter = PromptFilter {
                search,
                ..Default::default()
            };
            if let Some(name) = category {
                match keep.categories().find_by_name(&name) {
                    Some(found) => filter = filter.in_category(found.id),
                    None => bail!("No category named '{}'", name),
                }
            }
            let prompts = keep.search(&filter);
            if prompts.is_empty() {
                println!("No prompts match your current filters.");
            }
            let categories = keep.categories().list();
            for prompt in &prompts {
                print_prompt(prompt, category_name_for(prompt, &categories));
            }
        }
        Command::Add {
            name,
            content,
            category,
        } => {
            let prompt = keep
                .save_prompt(PromptDraft::new(name, content), &category)?
                .context("Prompt vanished while saving")?;
            println!("Created \"{}\" ({})", prompt.name, prompt.id);
        }
        Command::Edit {
            id,
            name,
            content,
            category,
        } => {
            let Some(current) = keep.prompts().find_by_id(&id) else {
                bail!("Prompt '{}' not found. Cannot update.", id);
            };
            let category = match category {
                Some(name) => name,
                None => keep
                    .categories()
                    .find_by_id(&current.category_id)
                    .map(|c| c.name)
                    .context("Prompt has no existing category; pass --category")?,
            };
            let mut draft = PromptDraft::editing(&current);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(content) = content {
                draft.content = content;
            }
            match keep.save_prompt(draft, &category)? {
                Some(prompt) => println!("Updated \"{}\"", prompt.name),
                None => bail!("Prompt '{}' not found. Cannot update.", id),
            }
        }
        Command::Delete { id } => {
            if keep.prompts().delete(&id) {
                println!("Deleted {}", id);
            } else {
                println!("Nothing to delete for {}", id);
            }
        }
        Command::Copy { id } => {
            let prompt = keep
                .prompts()
                .find_by_id(&id)
                .with_context(|| format!("Prompt '{}' not found", id))?;
            print!("{}", prompt.content);
        }
        Command::Categories => {
            for category in keep.categories().list() {
                println!("{}\t{}", category.id, category.name);
            }
        }
        Command::Dangling => {
            for prompt in keep.dangling_prompts() {
                print_prompt(&prompt, None);
            }
        }
        Command::Export { output } => {
            let json = keep.transfer().export()?;
            std::fs::write(&output, json)
                .with_context(|| format!("Failed to write export file: {}", output.display()))?;
            println!("Data exported to {}", output.display());
        }
        Command::Import { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read import file: {}", file.display()))?;
            match keep.transfer().import(&json) {
                Ok(summary) => println!("{}", summary.message()),
                Err(e) => bail!("Import failed ({}): {}", e.code(), e),
            }
        }
    }
    Ok(())
}

fn print_prompt(prompt: &Prompt, category: Option<&str>) {
    println!(
        "{}\t{}\t[{}]\t{}",
        prompt.id,
        prompt.name,
        category.unwrap_or("Uncategorized"),
        prompt.created_at.format("%Y-%m-%d %H:%M")
    );
}
