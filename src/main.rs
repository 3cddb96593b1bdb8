use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    rc::Rc,
};

use anyhow::{Context, Result};
use clap::Parser;
use lispette::{Frame, interpret, interpret_program, tokenise};

/// lispette is a small lexically scoped Lisp. Give it a program to run, or nothing for an
/// interactive session.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a program. Every top-level expression is run and the last value printed.
    path: Option<PathBuf>,

    /// Start an interactive session after running the program, sharing its definitions.
    #[arg(short, long)]
    interactive: bool,
}

/// Open parentheses not yet closed in `source`; zero or less means the input is complete.
fn open_parens(source: &str) -> isize {
    tokenise(source).iter().fold(0, |depth, token| match token.as_str() {
        "(" => depth + 1,
        ")" => depth - 1,
        _ => depth,
    })
}

/// Read expressions from stdin and print their values until `QUIT` or end of input.
/// Errors are reported and the session carries on.
fn repl(frame: &Rc<Frame>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    let mut buffer = String::new();

    loop {
        print!("{}", if buffer.is_empty() { "in> " } else { "... " });
        stdout.flush().context("Failed to write the prompt")?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line.context("Failed to read from stdin")?;

        if buffer.is_empty() && line.trim() == "QUIT" {
            return Ok(());
        }
        buffer.push_str(&line);
        buffer.push('\n');

        if open_parens(&buffer) > 0 {
            continue;
        }
        if !tokenise(&buffer).is_empty() {
            match interpret(&buffer, frame) {
                Ok(value) => println!("  out> {value}"),
                Err(err) => println!("  {err}"),
            }
        }
        buffer.clear();
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let frame = Frame::initial();

    match &args.path {
        None => repl(&frame),
        Some(path) => {
            let program_string = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read program at {}", path.display()))?;

            if let Some(result) = interpret_program(&program_string, &frame)
                .with_context(|| format!("Failed to run program at {}", path.display()))?
            {
                println!("{result}");
            }

            if args.interactive {
                repl(&frame)
            } else {
                Ok(())
            }
        }
    }
}
