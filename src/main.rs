//! Anchor Pins CLI
//!
//! Usage:
//!   anchor-pins [OPTIONS] [FILE]
//!
//! Options:
//!   -d, --debug   Also print the active constraints of every view
//!   -h, --help    Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use anchor_pins::{Scene, ViewTree};

#[derive(Parser)]
#[command(name = "anchor-pins")]
#[command(about = "Solve a TOML scene of pinned views and print their frames")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Print the active constraints of every view
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let tree = match Scene::from_str(&source).and_then(|scene| scene.solve()) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    print_frames(&tree, cli.debug);
}

fn print_frames(tree: &ViewTree, debug: bool) {
    fn print_view(tree: &ViewTree, view: anchor_pins::ViewId, depth: usize, debug: bool) {
        let indent = "  ".repeat(depth);
        if let (Some(name), Some(frame)) = (tree.name(view), tree.frame(view)) {
            println!(
                "{}{} x={:.1} y={:.1} w={:.1} h={:.1}",
                indent, name, frame.x, frame.y, frame.width, frame.height
            );
        }
        if debug {
            for constraint in tree.constraints_of(view) {
                println!("{}  | {}", indent, constraint.description());
            }
        }
        for &child in tree.children(view) {
            print_view(tree, child, depth + 1, debug);
        }
    }

    print_view(tree, tree.root(), 0, debug);
}

fn print_intro() {
    println!(
        r#"Anchor Pins - solve pinned view layouts

USAGE:
    anchor-pins [OPTIONS] [FILE]
    cat scene.toml | anchor-pins

OPTIONS:
    -d, --debug    Show the active constraints of each view
    -h, --help     Print help

SCENE FORMAT:
    [root]
    width = 320
    height = 200

    [[views]]
    name = "card"
    fill = {{ top = 8, leading = 8, bottom = 8, trailing = 8 }}

    [[views]]
    name = "title"
    parent = "card"
    center_x = 0
    pins = [
        {{ anchor = "top", offset = 12 }},
        {{ anchor = "height", constant = 44 }},
        {{ anchor = "width", relation = "at_most", offset = -24 }},
    ]

ANCHORS:    top bottom leading trailing center_x center_y width height
RELATIONS:  equal at_least at_most
"#
    );
}
