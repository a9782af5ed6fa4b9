use clap::{Parser, Subcommand};
use diffstage::{DiffStage, Row};

#[derive(Parser)]
#[command(name = "diffstage")]
#[command(about = "Line-level staging with side-by-side diff rendering")]
struct Cli {
    /// Path to the git repository
    #[arg(long, default_value = ".")]
    repo: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the diff as side-by-side rows with hunk line indices
    Diff {
        /// Show the staged (index vs HEAD) diff instead of the worktree one
        #[arg(long)]
        staged: bool,
        /// Diff context width (git's default when omitted)
        #[arg(short = 'U', long)]
        context: Option<u32>,
        /// Limit to these files
        files: Vec<String>,
    },
    /// Stage hunk lines by reference (e.g., "src/main.rs:1/2..4")
    Stage {
        /// File, hunk, and line references
        file_refs: Vec<String>,
    },
    /// Remove staged hunk lines from the index
    Unstage {
        /// File, hunk, and line references
        file_refs: Vec<String>,
    },
    /// Throw away worktree changes for the referenced lines
    Discard {
        /// File, hunk, and line references
        file_refs: Vec<String>,
    },
    /// Split a hunk at a context line (e.g., "src/main.rs:1/5")
    Split {
        /// File, hunk, and context line reference
        file_ref: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let stage = DiffStage::new(&cli.repo);

    match cli.command {
        Commands::Diff {
            staged,
            context,
            files,
        } => {
            let stage = match context {
                Some(lines) => stage.context_lines(lines),
                None => stage,
            };
            for file in stage.diff(&files, staged)? {
                println!("{}", file.title());
                for hunk in &file.hunks {
                    let pairing = diffstage::pair::pair(hunk);
                    print_rows(&diffstage::render::render(hunk, &pairing));
                }
            }
        }
        Commands::Stage { file_refs } => {
            for file_ref in &file_refs {
                stage.stage(file_ref)?;
            }
        }
        Commands::Unstage { file_refs } => {
            for file_ref in &file_refs {
                stage.unstage(file_ref)?;
            }
        }
        Commands::Discard { file_refs } => {
            for file_ref in &file_refs {
                stage.discard(file_ref)?;
            }
        }
        Commands::Split { file_ref } => {
            for hunk in stage.split_hunk(&file_ref)? {
                print!("{hunk}");
            }
        }
    }

    Ok(())
}

fn print_rows(rows: &[Row]) {
    let side = |cell: Option<&diffstage::RowCell>, marker: char| match cell {
        Some(cell) => format!(
            "{:>4} {marker}{}",
            cell.number.map_or_else(String::new, |n| n.to_string()),
            cell.text.text()
        ),
        None => String::new(),
    };

    for row in rows {
        match row {
            Row::HunkHeader { text } => println!("{text}"),
            Row::Context { old, new } => {
                println!("{:<50}| {}", side(Some(old), ' '), side(Some(new), ' '));
            }
            Row::Change { old, new } => {
                println!(
                    "{:<50}| {}",
                    side(old.as_ref(), '-'),
                    side(new.as_ref(), '+')
                );
            }
        }
    }
}
