//! Command-line front end for the manuscript editor.
//!
//! # Responsibility
//! - Map subcommands onto `EditorService` use-cases.
//! - Flush pending state before exit so every command persists.
//! - Log one metadata-only `cli_command` event per invocation.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use manuscript_core::db::open_db;
use manuscript_core::{
    init_logging, load_settings, AiGateway, AiOutcome, DraftIndex, EditorService, GeminiGenerator,
    KvStore, SqliteKvStore,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "manuscript", version, about = "Merge up to three drafts into one manuscript")]
struct Cli {
    /// Settings file (defaults to ./manuscript.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the state database path.
    #[arg(long)]
    database: Option<PathBuf>,
    /// Absolute directory for rolling log files.
    #[arg(long)]
    log_dir: Option<String>,
    #[arg(long, default_value = manuscript_core::default_log_level())]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load text/markdown files into draft slots 1..3 (sorted by file name).
    Import { files: Vec<PathBuf> },
    /// Replace one draft slot with the contents of a file.
    Paste { draft: u8, file: PathBuf },
    /// Set the alias of a draft slot.
    Alias { draft: u8, alias: String },
    /// Print drafts and the final manuscript.
    Show,
    /// Copy one draft paragraph into the final manuscript.
    Add {
        draft: u8,
        paragraph_id: String,
        #[arg(long)]
        at: Option<usize>,
    },
    /// Copy every not-yet-used paragraph of a draft.
    AddAll { draft: u8 },
    /// Remove every final paragraph that came from a draft.
    RemoveFromDraft { draft: u8 },
    /// Delete a paragraph from a draft slot.
    DropParagraph { draft: u8, paragraph_id: String },
    /// Remove one final paragraph.
    Remove { id: String },
    /// Replace the text of one final paragraph.
    Edit { id: String, text: String },
    /// Move a final paragraph (target index counts without the moved item).
    Move { from: usize, to: usize },
    /// Hide a draft paragraph from insertion.
    Dismiss { paragraph_id: String },
    /// Undo a dismissal.
    Restore { paragraph_id: String },
    /// Insert an image file as an inline paragraph.
    Image {
        file: PathBuf,
        #[arg(long)]
        at: Option<usize>,
    },
    /// Empty the final manuscript.
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Write final_manuscript.txt into a directory.
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Polish the final manuscript with the AI service.
    Polish,
    /// Merge the three drafts into the final manuscript with the AI service.
    Synthesize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(&cli.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        settings.database_path = database;
    }

    let conn = open_db(&settings.database_path).with_context(|| {
        format!(
            "failed to open state database `{}`",
            settings.database_path.display()
        )
    })?;
    let mut service = EditorService::open(SqliteKvStore::new(&conn), settings.persist_debounce());

    let command_name = cli.command.name();
    if let Err(err) = run(&mut service, cli.command, &settings) {
        error!(
            "event=cli_command module=cli status=error command={}",
            command_name
        );
        service.flush().context("failed to persist editor state")?;
        return Err(err);
    }
    service.flush().context("failed to persist editor state")?;
    info!(
        "event=cli_command module=cli status=ok command={}",
        command_name
    );
    Ok(())
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Import { .. } => "import",
            Self::Paste { .. } => "paste",
            Self::Alias { .. } => "alias",
            Self::Show => "show",
            Self::Add { .. } => "add",
            Self::AddAll { .. } => "add-all",
            Self::RemoveFromDraft { .. } => "remove-from-draft",
            Self::DropParagraph { .. } => "drop-paragraph",
            Self::Remove { .. } => "remove",
            Self::Edit { .. } => "edit",
            Self::Move { .. } => "move",
            Self::Dismiss { .. } => "dismiss",
            Self::Restore { .. } => "restore",
            Self::Image { .. } => "image",
            Self::Clear { .. } => "clear",
            Self::Export { .. } => "export",
            Self::Polish => "polish",
            Self::Synthesize => "synthesize",
        }
    }
}

fn run<S: KvStore>(
    service: &mut EditorService<S>,
    command: Command,
    settings: &manuscript_core::EditorSettings,
) -> Result<()> {
    match command {
        Command::Import { files } => {
            let report = service.import_files(&files);
            for loaded in &report.loaded {
                println!(
                    "draft {} <- {} ({} paragraphs)",
                    loaded.draft, loaded.file_name, loaded.paragraphs
                );
            }
            for skipped in &report.skipped {
                println!("skipped {}", skipped.display());
            }
        }
        Command::Paste { draft, file } => {
            let draft = slot(draft)?;
            let raw_text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            let paragraphs = service.replace_draft_text(draft, raw_text)?;
            println!("draft {draft} replaced ({paragraphs} paragraphs)");
        }
        Command::Alias { draft, alias } => service.set_draft_alias(slot(draft)?, alias)?,
        Command::Show => print_state(service),
        Command::Add {
            draft,
            paragraph_id,
            at,
        } => {
            let id = service.append_draft_paragraph(slot(draft)?, &paragraph_id, at)?;
            println!("added {id}");
        }
        Command::AddAll { draft } => {
            let added = service.add_all(slot(draft)?)?;
            println!("added {added} paragraphs");
        }
        Command::RemoveFromDraft { draft } => {
            let removed = service.remove_all_from_draft(slot(draft)?)?;
            println!("removed {removed} paragraphs");
        }
        Command::DropParagraph {
            draft,
            paragraph_id,
        } => {
            if !service.remove_draft_paragraph(slot(draft)?, &paragraph_id)? {
                println!("no paragraph {paragraph_id} in draft {draft}");
            }
        }
        Command::Remove { id } => {
            if !service.remove_final(&id)? {
                println!("no final paragraph {id}");
            }
        }
        Command::Edit { id, text } => service.update_final_text(&id, text)?,
        Command::Move { from, to } => service.move_final(from, to)?,
        Command::Dismiss { paragraph_id } => {
            service.dismiss(&paragraph_id)?;
        }
        Command::Restore { paragraph_id } => {
            service.restore(&paragraph_id)?;
        }
        Command::Image { file, at } => {
            let id = service.insert_image(&file, at)?;
            println!("inserted {id}");
        }
        Command::Clear { yes } => {
            if !yes {
                bail!("refusing to clear the final manuscript without --yes");
            }
            service.clear_final(true)?;
        }
        Command::Export { dir } => {
            let path = service.export_to_dir(&dir)?;
            println!("exported {}", path.display());
        }
        Command::Polish => {
            let gateway = AiGateway::new(GeminiGenerator::new(&settings.ai)?);
            report_ai("polish", service.polish_with(&gateway)?);
        }
        Command::Synthesize => {
            let gateway = AiGateway::new(GeminiGenerator::new(&settings.ai)?);
            report_ai("synthesis", service.synthesize_with(&gateway)?);
        }
    }
    Ok(())
}

fn slot(number: u8) -> Result<DraftIndex> {
    Ok(DraftIndex::from_slot_number(number)?)
}

fn report_ai(operation: &str, outcome: AiOutcome) {
    match outcome {
        AiOutcome::Applied { paragraphs } => {
            println!("{operation} applied ({paragraphs} paragraphs)")
        }
        AiOutcome::Unchanged => println!("{operation} left the manuscript unchanged"),
        AiOutcome::Failed => println!("{operation} failed; manuscript unchanged"),
        AiOutcome::Discarded => println!("{operation} result discarded; manuscript changed"),
    }
}

fn print_state<S: KvStore>(service: &EditorService<S>) {
    for (index, draft) in DraftIndex::all().into_iter().zip(service.state().drafts()) {
        println!("== {} [{}]", draft.display_title(), draft.title);
        for view in service.draft_view(index) {
            let marker = match (view.reflected, view.dismissed) {
                (_, true) => "x",
                (true, false) => "*",
                (false, false) => " ",
            };
            println!("{marker} {}  {}", view.paragraph.id, preview(&view.paragraph.text));
        }
    }
    println!("== Final manuscript");
    for (position, paragraph) in service.state().final_paragraphs().iter().enumerate() {
        println!("{position:>3} {}  {}", paragraph.id, preview(&paragraph.text));
    }
}

fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 60;
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > MAX_CHARS {
        format!("{}...", flat.chars().take(MAX_CHARS).collect::<String>())
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn command_names_match_subcommand_spelling() {
        let cli = Cli::try_parse_from(["manuscript", "add-all", "2"]).unwrap();
        assert_eq!(cli.command.name(), "add-all");

        let cli = Cli::try_parse_from(["manuscript", "edit", "final-1", "secret text"]).unwrap();
        assert_eq!(cli.command.name(), "edit");
        assert!(matches!(cli.command, Command::Edit { .. }));
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
