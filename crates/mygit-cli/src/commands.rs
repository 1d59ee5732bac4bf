use std::io::Write;
use std::path::Path;

use anyhow::Context;
use mygit_sdk::{Object, ObjectKind, Repository, Tree, DEFAULT_GIT_DIR};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    debug!(git_dir = %cli.git_dir.display(), "dispatching command");
    match cli.command {
        Command::Init(args) => cmd_init(&cli.git_dir, args, out),
        Command::HashObject(args) => cmd_hash_object(&cli.git_dir, args, out),
        Command::CatFile(args) => cmd_cat_file(&cli.git_dir, args, out),
        Command::LsTree(args) => cmd_ls_tree(&cli.git_dir, args, out),
    }
}

fn open(git_dir: &Path) -> anyhow::Result<Repository> {
    Repository::open(git_dir).with_context(|| format!("opening {}", git_dir.display()))
}

fn cmd_init(git_dir: &Path, args: InitArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let git_dir = match args.path {
        Some(path) => path.join(DEFAULT_GIT_DIR),
        None => git_dir.to_path_buf(),
    };
    Repository::init(&git_dir).with_context(|| format!("initializing {}", git_dir.display()))?;
    writeln!(out, "Initialized git directory")?;
    Ok(())
}

fn cmd_hash_object(git_dir: &Path, args: HashObjectArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let content =
        std::fs::read(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    let id = if args.write {
        open(git_dir)?.hash_object(args.kind, &content, true)?
    } else {
        Object::new(args.kind, content).compute_id()
    };
    writeln!(out, "{id}")?;
    Ok(())
}

fn cmd_cat_file(git_dir: &Path, args: CatFileArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let repo = open(git_dir)?;
    let obj = repo.cat_file(&args.object)?;

    if args.kind {
        writeln!(out, "{}", obj.kind)?;
    } else if args.size {
        writeln!(out, "{}", obj.size)?;
    } else if obj.kind == ObjectKind::Tree {
        write_tree(&Tree::from_object(&obj)?, false, out)?;
    } else {
        out.write_all(&obj.data)?;
    }
    out.flush()?;
    Ok(())
}

fn cmd_ls_tree(git_dir: &Path, args: LsTreeArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let repo = open(git_dir)?;
    let tree = repo.ls_tree(&args.tree)?;
    write_tree(&tree, args.name_only, out)?;
    Ok(())
}

/// One line per entry: `<mode> <kind> <id>\t<name>`, or just the name.
fn write_tree(tree: &Tree, name_only: bool, out: &mut dyn Write) -> std::io::Result<()> {
    for entry in tree {
        if !name_only {
            write!(
                out,
                "{} {} {}\t",
                entry.padded_mode(),
                entry.object_kind(),
                entry.object_id
            )?;
        }
        out.write_all(&entry.name)?;
        writeln!(out)?;
    }
    Ok(())
}
