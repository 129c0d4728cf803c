mod output;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use output::{
    CatFileOutput, CommitTreeOutput, HashObjectOutput, InitOutput, LsTreeOutput, OutputWriter,
    TreeEntryInfo, WriteTreeOutput,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use twig_core::{Digest, Identity, ObjectKind, Repo};

/// Fallback commit identity when no TWIG_AUTHOR_* variables are set.
const DEFAULT_AUTHOR_NAME: &str = "John Doe";
const DEFAULT_AUTHOR_EMAIL: &str = "johndoe@example.com";

/// Twig - a minimal Git-style object store
#[derive(Parser)]
#[command(name = "twig")]
#[command(about = "Content-addressable object store and commit builder", long_about = None)]
#[command(version)]
struct Cli {
    /// Repository directory (defaults to TWIG_DIR env var or ./.twig)
    #[arg(short, long, global = true)]
    repo: Option<PathBuf>,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new repository
    Init,

    /// Store a file (or stdin) as a blob and print its digest
    HashObject {
        /// File to store
        #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
        path: Option<PathBuf>,

        /// Read the content from stdin instead of a file
        #[arg(long)]
        stdin: bool,
    },

    /// Print an object's payload
    CatFile {
        /// Digest of the object
        digest: String,
    },

    /// List a tree's entries
    LsTree {
        /// Digest of the tree
        digest: String,

        /// Show mode, kind, and digest for each entry
        #[arg(short, long)]
        long: bool,
    },

    /// Build and store the tree for a directory
    WriteTree {
        /// Directory to snapshot
        dir: PathBuf,
    },

    /// Create a commit object from a tree digest
    CommitTree {
        /// Digest of the tree to commit
        tree: String,

        /// Digest of the parent commit
        #[arg(short, long)]
        parent: Option<String>,

        /// Commit message
        #[arg(short, long)]
        message: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let out = OutputWriter::new(cli.json);

    // Determine repository directory: CLI arg > TWIG_DIR env var > ./.twig default
    let root = cli
        .repo
        .or_else(|| std::env::var("TWIG_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("./.twig"));

    let result = match cli.command {
        Commands::Init => cmd_init(&root, &out),
        Commands::HashObject { path, stdin } => cmd_hash_object(&root, &out, path, stdin),
        Commands::CatFile { digest } => cmd_cat_file(&root, &out, &digest),
        Commands::LsTree { digest, long } => cmd_ls_tree(&root, &out, &digest, long),
        Commands::WriteTree { dir } => cmd_write_tree(&root, &out, &dir),
        Commands::CommitTree {
            tree,
            parent,
            message,
        } => cmd_commit_tree(&root, &out, &tree, parent.as_deref(), &message),
    };

    if let Err(err) = result {
        out.write_error(&err, 1);
        std::process::exit(1);
    }
}

fn open_repo(root: &Path) -> Result<Repo> {
    Repo::open(root).with_context(|| {
        format!(
            "Failed to open repository at {} (run 'twig init'?)",
            root.display()
        )
    })
}

fn parse_digest(digest_str: &str) -> Result<Digest> {
    Digest::from_hex(digest_str).with_context(|| format!("Invalid digest: {}", digest_str))
}

/// Commit identity: TWIG_AUTHOR_NAME/TWIG_AUTHOR_EMAIL with a fixed fallback.
fn commit_identity() -> Result<Identity> {
    let name =
        std::env::var("TWIG_AUTHOR_NAME").unwrap_or_else(|_| DEFAULT_AUTHOR_NAME.to_string());
    let email =
        std::env::var("TWIG_AUTHOR_EMAIL").unwrap_or_else(|_| DEFAULT_AUTHOR_EMAIL.to_string());

    Identity::new(name, email).context("Invalid commit identity")
}

fn cmd_init(root: &Path, out: &OutputWriter) -> Result<()> {
    let repo = Repo::init(root)
        .with_context(|| format!("Failed to initialize repository at {}", root.display()))?;

    let head = repo.head_ref().context("Failed to read HEAD")?;

    out.write(
        &InitOutput {
            success: true,
            result_code: 0,
            root: root.display().to_string(),
            head: head.clone(),
        },
        || {
            format!(
                "Initialized twig repository at {} (HEAD -> {})\n",
                root.display(),
                head
            )
        },
    )
}

fn cmd_hash_object(
    root: &Path,
    out: &OutputWriter,
    path: Option<PathBuf>,
    stdin: bool,
) -> Result<()> {
    let repo = open_repo(root)?;

    let digest = if stdin {
        if atty::is(atty::Stream::Stdin) {
            anyhow::bail!("Refusing to read object content from a terminal (pipe data instead)");
        }
        let mut content = Vec::new();
        std::io::stdin()
            .read_to_end(&mut content)
            .context("Failed to read stdin")?;
        repo.put_object(ObjectKind::Blob, &content)
            .context("Failed to store blob")?
    } else {
        // clap guarantees a path when --stdin is absent
        let file = path
            .as_ref()
            .context("A file path is required unless --stdin is given")?;
        repo.create_blob(file)
            .with_context(|| format!("Failed to store {}", file.display()))?
    };

    out.write(
        &HashObjectOutput {
            success: true,
            result_code: 0,
            digest,
            path: path.map(|p| p.display().to_string()),
        },
        || format!("{}\n", digest),
    )
}

fn cmd_cat_file(root: &Path, out: &OutputWriter, digest_str: &str) -> Result<()> {
    let repo = open_repo(root)?;
    let digest = parse_digest(digest_str)?;

    let (kind, payload) = repo
        .read_object(&digest)
        .with_context(|| format!("Failed to read object {}", digest))?;

    let text = String::from_utf8_lossy(&payload).into_owned();

    out.write(
        &CatFileOutput {
            success: true,
            result_code: 0,
            digest,
            kind: kind.as_str().to_string(),
            payload: text.clone(),
        },
        || text,
    )
}

fn cmd_ls_tree(root: &Path, out: &OutputWriter, digest_str: &str, long: bool) -> Result<()> {
    let repo = open_repo(root)?;
    let digest = parse_digest(digest_str)?;

    let entries = repo
        .read_tree(&digest)
        .with_context(|| format!("Failed to read tree {}", digest))?;

    let infos: Vec<TreeEntryInfo> = entries
        .iter()
        .map(|entry| TreeEntryInfo {
            mode: entry.mode.as_str().to_string(),
            kind: if entry.mode.is_tree() { "tree" } else { "blob" }.to_string(),
            digest: entry.digest,
            name: entry.name.clone(),
        })
        .collect();

    out.write(
        &LsTreeOutput {
            success: true,
            result_code: 0,
            digest,
            entries: infos.clone(),
        },
        || {
            let mut text = String::new();
            for info in &infos {
                if long {
                    text.push_str(&format!(
                        "{:>6} {} {}\t{}\n",
                        info.mode, info.kind, info.digest, info.name
                    ));
                } else {
                    text.push_str(&format!("{}\n", info.name));
                }
            }
            text
        },
    )
}

fn cmd_write_tree(root: &Path, out: &OutputWriter, dir: &Path) -> Result<()> {
    let repo = open_repo(root)?;

    let digest = repo
        .write_tree(dir)
        .with_context(|| format!("Failed to build tree for {}", dir.display()))?;

    out.write(
        &WriteTreeOutput {
            success: true,
            result_code: 0,
            digest,
            dir: dir.display().to_string(),
        },
        || format!("{}\n", digest),
    )
}

fn cmd_commit_tree(
    root: &Path,
    out: &OutputWriter,
    tree_str: &str,
    parent_str: Option<&str>,
    message: &str,
) -> Result<()> {
    let repo = open_repo(root)?;

    let tree = parse_digest(tree_str)?;
    let parent = parent_str.map(parse_digest).transpose()?;
    let author = commit_identity()?;
    let timestamp = Local::now().fixed_offset();

    let digest = repo
        .commit_tree(&tree, parent.as_ref(), &author, timestamp, message)
        .context("Failed to create commit")?;

    out.write(
        &CommitTreeOutput {
            success: true,
            result_code: 0,
            digest,
            tree,
            parent,
            author,
            timestamp: timestamp.to_rfc3339(),
        },
        || format!("{}\n", digest),
    )
}
