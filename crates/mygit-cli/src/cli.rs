use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use mygit_sdk::{ObjectKind, DEFAULT_GIT_DIR};

#[derive(Parser)]
#[command(name = "mygit", about = "A minimal git object database", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the repository metadata directory
    #[arg(long, global = true, default_value = DEFAULT_GIT_DIR)]
    pub git_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty repository
    Init(InitArgs),
    /// Compute the object ID of a file, optionally storing it
    HashObject(HashObjectArgs),
    /// Show the content, kind or size of an object
    CatFile(CatFileArgs),
    /// List the entries of a tree object
    LsTree(LsTreeArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Directory to create the repository in (defaults to --git-dir)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct HashObjectArgs {
    /// Write the object into the object database
    #[arg(short = 'w')]
    pub write: bool,
    /// Object kind tag to hash the file as
    #[arg(short = 't', long = "type", default_value = "blob")]
    pub kind: ObjectKind,
    pub file: PathBuf,
}

#[derive(Args)]
#[command(group(ArgGroup::new("mode").required(true).args(["pretty", "kind", "size"])))]
pub struct CatFileArgs {
    /// Pretty-print the object's content
    #[arg(short = 'p')]
    pub pretty: bool,
    /// Show the object's kind
    #[arg(short = 't')]
    pub kind: bool,
    /// Show the object's size
    #[arg(short = 's')]
    pub size: bool,
    pub object: String,
}

#[derive(Args)]
pub struct LsTreeArgs {
    /// List only entry names
    #[arg(long)]
    pub name_only: bool,
    pub tree: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["mygit", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init(InitArgs { path: None })));
        assert_eq!(cli.git_dir, PathBuf::from(".git"));
    }

    #[test]
    fn parse_init_path() {
        let cli = Cli::try_parse_from(["mygit", "init", "/tmp/repo"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.path, Some(PathBuf::from("/tmp/repo")));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_hash_object_write() {
        let cli = Cli::try_parse_from(["mygit", "hash-object", "-w", "file.txt"]).unwrap();
        if let Command::HashObject(args) = cli.command {
            assert!(args.write);
            assert_eq!(args.file, PathBuf::from("file.txt"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_hash_object_dry_run() {
        let cli = Cli::try_parse_from(["mygit", "hash-object", "file.txt"]).unwrap();
        if let Command::HashObject(args) = cli.command {
            assert!(!args.write);
            assert_eq!(args.kind, ObjectKind::Blob);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_hash_object_kind() {
        let cli = Cli::try_parse_from(["mygit", "hash-object", "-t", "note", "f"]).unwrap();
        if let Command::HashObject(args) = cli.command {
            assert_eq!(args.kind.as_str(), "note");
        } else {
            panic!("wrong command");
        }
        assert!(Cli::try_parse_from(["mygit", "hash-object", "-t", "", "f"]).is_err());
    }

    #[test]
    fn parse_cat_file_pretty() {
        let cli = Cli::try_parse_from(["mygit", "cat-file", "-p", "ce01362"]).unwrap();
        if let Command::CatFile(args) = cli.command {
            assert!(args.pretty);
            assert_eq!(args.object, "ce01362");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn cat_file_requires_exactly_one_mode() {
        assert!(Cli::try_parse_from(["mygit", "cat-file", "ce01362"]).is_err());
        assert!(Cli::try_parse_from(["mygit", "cat-file", "-p", "-t", "ce01362"]).is_err());
    }

    #[test]
    fn parse_ls_tree_name_only() {
        let cli = Cli::try_parse_from(["mygit", "ls-tree", "--name-only", "abcd"]).unwrap();
        if let Command::LsTree(args) = cli.command {
            assert!(args.name_only);
            assert_eq!(args.tree, "abcd");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli =
            Cli::try_parse_from(["mygit", "--verbose", "--git-dir", "/srv/x.git", "init"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.git_dir, PathBuf::from("/srv/x.git"));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["mygit", "commit"]).is_err());
    }
}
