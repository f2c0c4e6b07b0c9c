use anyhow::Context;
use clap::{ArgAction, Parser};
use mp4erase::{
    DEFAULT_TAGS, DRM_TAGS, FourCC, destroy, erase_atoms, find_all, parse_all,
    util::hex_dump,
};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Zero out MP4 purchase/ownership atoms in place")]
struct Args {
    /// MP4/ISOBMFF files, modified in place
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Atom tag to erase (repeatable); 4 characters or 0x-prefixed hex
    #[arg(short, long = "tag", conflicts_with = "drm")]
    tags: Vec<FourCC>,

    /// Erase pinf, apID, purd and ownr
    #[arg(long, action = ArgAction::SetTrue)]
    drm: bool,

    /// Hex-dump each target payload before and after erasing
    #[arg(long, action = ArgAction::SetTrue)]
    dump: bool,

    /// Print the parsed atom tree as JSON and leave the files alone
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "dump")]
    tree: bool,

    /// Debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

impl Args {
    fn targets(&self) -> Vec<FourCC> {
        if self.drm {
            DRM_TAGS.to_vec()
        } else if self.tags.is_empty() {
            DEFAULT_TAGS.to_vec()
        } else {
            self.tags.clone()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let targets = args.targets();
    for path in &args.paths {
        if args.tree {
            print_tree(path)?;
        } else if args.dump {
            erase_with_dump(path, &targets)?;
        } else {
            let mut f = open_rw(path)?;
            erase_atoms(&mut f, &targets)
                .with_context(|| format!("{}: erasing {}", path.display(), join(&targets)))?;
        }
    }
    Ok(())
}

fn open_rw(path: &Path) -> anyhow::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("{}: open", path.display()))
}

fn print_tree(path: &Path) -> anyhow::Result<()> {
    let mut f = File::open(path).with_context(|| format!("{}: open", path.display()))?;
    let tree = parse_all(&mut f).with_context(|| format!("{}: parse", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

// Same contract as `erase_atoms`: every target is resolved before anything is written.
fn erase_with_dump(path: &Path, targets: &[FourCC]) -> anyhow::Result<()> {
    let mut f = open_rw(path)?;
    let tree = parse_all(&mut f).with_context(|| format!("{}: parse", path.display()))?;
    let atoms = find_all(&tree, targets).with_context(|| format!("{}: lookup", path.display()))?;

    for atom in atoms {
        let ctx = || format!("{}: {}", path.display(), atom.tag);
        println!(
            "== {} {} payload: offset={:#x}, len={} ==",
            path.display(),
            atom.tag,
            atom.data_start_pos,
            atom.data_len
        );
        let before = atom.read_data(&mut f).with_context(ctx)?;
        print!("{}", hex_dump(&before, atom.data_start_pos));
        destroy(atom, &mut f).with_context(ctx)?;
        let after = atom.read_data(&mut f).with_context(ctx)?;
        println!("-- after --");
        print!("{}", hex_dump(&after, atom.data_start_pos));
    }
    Ok(())
}

fn join(tags: &[FourCC]) -> String {
    tags.iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
