use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use kit::areas::refs::Head;
use kit::areas::repository::Repository;
use kit::artifacts::status::status_report::StatusReport;
use kit::commands::plumbing::cat_file::CatFileOption;
use kit::commands::plumbing::update_index::UpdateIndexOption;
use kit::commands::porcelain::log::LogEntry;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "kit",
    version = "0.1.0",
    about = "A minimal content-addressed version control system",
    long_about = "kit keeps snapshots of a directory in a .kit metadata directory, \
    using the same object, index and ref formats as git.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file as a blob and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(name = "cat-file", about = "Show the type, size or content of an object")]
    CatFile {
        #[arg(index = 1, allow_hyphen_values = true, help = "One of -t, -s or -p")]
        option: String,
        #[arg(index = 2, help = "The object ID")]
        object: String,
    },
    #[command(
        name = "update-index",
        about = "Add an entry with an explicit object ID and mode, or remove one"
    )]
    UpdateIndex {
        #[arg(index = 1)]
        path: PathBuf,
        #[arg(index = 2, allow_hyphen_values = true, help = "-a/--add or -d/--remove")]
        option: String,
        #[arg(index = 3, help = "Object ID to stage")]
        object: Option<String>,
        #[arg(index = 4, help = "Octal mode, e.g. 100644")]
        cacheinfo: Option<String>,
    },
    #[command(name = "write-tree", about = "Write the staged snapshot as tree objects")]
    WriteTree,
    #[command(name = "commit-tree", about = "Create a commit object for a tree")]
    CommitTree {
        #[arg(index = 1)]
        tree: String,
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(short, long, help = "The parent commit")]
        parent: Option<String>,
    },
    #[command(name = "ls-files", about = "List staged paths")]
    LsFiles,
    #[command(name = "add", about = "Stage files or directories")]
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    #[command(name = "unstage", about = "Remove paths from the index, keeping the files")]
    Unstage {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit in the repository with the specified commit message."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "status", about = "Show untracked, staged and unstaged changes")]
    Status,
    #[command(name = "log", about = "Show the history reachable from HEAD")]
    Log,
    #[command(name = "branch", about = "Create a branch, or list branches")]
    Branch {
        #[arg(index = 1)]
        name: Option<String>,
        #[arg(index = 2, help = "Start point, HEAD by default")]
        start: Option<String>,
    },
    #[command(name = "checkout", about = "Switch to a branch, tag or commit")]
    Checkout {
        #[arg(index = 1)]
        target: String,
    },
    #[command(name = "tag", about = "Create an annotated tag, or list tags")]
    Tag {
        #[arg(index = 1)]
        name: Option<String>,
        #[arg(short, long, default_value = "", help = "The tag message")]
        message: String,
        #[arg(index = 2, help = "Object to tag, HEAD by default")]
        object: Option<String>,
    },
    #[command(name = "config", about = "Get or set a configuration value")]
    Config {
        #[arg(index = 1, help = "Key in section.name form")]
        key: String,
        #[arg(index = 2)]
        value: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(error) = run(Cli::parse()) {
        eprintln!("fatal: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let pwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { path } => {
            let path = path.map_or_else(|| pwd.clone(), |path| pwd.join(path));
            let outcome = Repository::init(&path)?;
            let meta_path = outcome.repository().meta_path();

            if outcome.is_reinitialized() {
                println!("Reinitialized existing Kit repository in {}", meta_path.display());
            } else {
                println!("Initialized empty Kit repository in {}", meta_path.display());
            }
        }
        Commands::HashObject { write, file } => {
            let repository = Repository::open(&pwd)?;
            println!("{}", repository.hash_object(&file, write)?);
        }
        Commands::CatFile { option, object } => {
            let repository = Repository::open(&pwd)?;
            let option = CatFileOption::try_from(option.as_str())?;
            let output = repository.cat_file(&object, option)?;
            println!("{}", output.trim_end_matches('\n'));
        }
        Commands::UpdateIndex {
            path,
            option,
            object,
            cacheinfo,
        } => {
            let mut repository = Repository::open(&pwd)?;
            let option = UpdateIndexOption::try_from(option.as_str())?;
            repository.update_index(&path, option, object.as_deref(), cacheinfo.as_deref())?;

            match option {
                UpdateIndexOption::Add => println!("Added {} to index", path.display().to_string().green()),
                UpdateIndexOption::Remove => println!("Removed {} from index", path.display().to_string().red()),
            }
        }
        Commands::WriteTree => {
            let repository = Repository::open(&pwd)?;
            match repository.write_tree(repository.path(), true)? {
                Some(tree_oid) => println!("{tree_oid}"),
                None => anyhow::bail!("nothing staged to write"),
            }
        }
        Commands::CommitTree {
            tree,
            message,
            parent,
        } => {
            let repository = Repository::open(&pwd)?;
            println!("{}", repository.commit_tree(&tree, &message, parent.as_deref())?);
        }
        Commands::LsFiles => {
            let repository = Repository::open(&pwd)?;
            repository.ls_files().iter().for_each(|name| println!("{name}"));
        }
        Commands::Add { paths } => {
            let mut repository = Repository::open(&pwd)?;
            for path in paths {
                repository.add(&path)?;
            }
        }
        Commands::Unstage { paths } => {
            let mut repository = Repository::open(&pwd)?;
            for path in paths {
                repository.unstage(&path)?;
            }
        }
        Commands::Commit { message } => {
            let mut repository = Repository::open(&pwd)?;
            let commit_oid = repository.commit(&message)?;
            let first_line = message.lines().next().unwrap_or_default();

            println!("[{} {}] {}", head_label(&repository)?, commit_oid.to_short_oid(), first_line);
        }
        Commands::Status => {
            let repository = Repository::open(&pwd)?;
            print_status(&repository.status()?);
        }
        Commands::Log => {
            let repository = Repository::open(&pwd)?;
            repository.log()?.iter().for_each(print_log_entry);
        }
        Commands::Branch { name, start } => {
            let repository = Repository::open(&pwd)?;
            match name {
                Some(name) => {
                    let target = repository.branch(&name, start.as_deref())?;
                    println!("Created branch {} at {}", name.green(), target.to_short_oid().red());
                }
                None => {
                    let current = repository.refs().read_head()?;
                    for (name, _) in repository.branches()? {
                        match &current {
                            Head::Symbolic(branch) if *branch == name => println!("* {}", name.green()),
                            _ => println!("  {name}"),
                        }
                    }
                }
            }
        }
        Commands::Checkout { target } => {
            let mut repository = Repository::open(&pwd)?;
            match repository.checkout(&target)? {
                Head::Symbolic(branch) => println!("Switched to branch '{branch}'"),
                Head::Detached(oid) => println!("HEAD is now at {}", oid.to_short_oid()),
            }
        }
        Commands::Tag {
            name,
            message,
            object,
        } => {
            let repository = Repository::open(&pwd)?;
            match name {
                Some(name) => {
                    let tag_oid = repository.tag(&name, &message, object.as_deref())?;
                    println!("Created tag {} as {}", name.green(), tag_oid.to_short_oid().red());
                }
                None => repository.tags()?.iter().for_each(|(name, _)| println!("{name}")),
            }
        }
        Commands::Config { key, value } => {
            let mut repository = Repository::open(&pwd)?;
            match value {
                Some(value) => repository.config_set(&key, &value)?,
                None => match repository.config_get(&key)? {
                    Some(value) => println!("{value}"),
                    None => anyhow::bail!("key '{key}' is not set"),
                },
            }
        }
    }

    Ok(())
}

fn head_label(repository: &Repository) -> Result<String> {
    Ok(match repository.refs().read_head()? {
        Head::Symbolic(branch) => branch,
        Head::Detached(_) => "detached HEAD".to_string(),
    })
}

fn print_status(report: &StatusReport) {
    match &report.head {
        Head::Symbolic(branch) => println!("On branch {}", branch.green()),
        Head::Detached(oid) => println!("HEAD detached at {}", oid.to_short_oid().red()),
    }

    if report.is_clean() {
        println!("nothing to commit, working tree clean");
        return;
    }

    if !report.staged.is_empty() {
        println!("\nChanges to be committed:");
        for change in &report.staged {
            println!("\t{}", format!("{:<12}{}", change.change.label(), change.path).green());
        }
    }

    if !report.unstaged.is_empty() {
        println!("\nChanges not staged for commit:");
        for change in &report.unstaged {
            println!("\t{}", format!("{:<12}{}", change.change.label(), change.path).yellow());
        }
    }

    if !report.untracked.is_empty() {
        println!("\nUntracked files:");
        for path in &report.untracked {
            println!("\t{}", path.red());
        }
    }
}

fn print_log_entry(entry: &LogEntry) {
    let decorations = if entry.decorations.is_empty() {
        String::new()
    } else {
        format!(" ({})", entry.decorations.join(", "))
    };

    println!("{} {}{}", "commit".yellow(), entry.oid.as_ref().yellow(), decorations.cyan());
    println!("Author: {}", entry.commit.author().display_name());
    println!(
        "Date:   {} ({})",
        entry.commit.author().readable_timestamp(),
        entry.age()
    );
    println!("\n    {}\n", entry.commit.short_message());
}
