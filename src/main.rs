use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};

#[derive(Debug, Parser)]
#[clap(name = "semtree", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: SemtreeCommand,
}

#[derive(Debug, Subcommand)]
pub enum SemtreeCommand {
    Tokenize {
        path: PathBuf,
    },
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "outline")]
        format: TreeFormat,
    },
    Run {
        path: PathBuf,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TreeFormat {
    Debug,
    Outline,
}

fn main() -> ExitCode {
    semtree_main().expect("Encountered an error!")
}

fn semtree_main() -> Result<ExitCode> {
    color_eyre::install().expect("Can't fail at first call!");
    let args = CLArgs::parse();
    match args.routine {
        SemtreeCommand::Tokenize { path } => {
            let src = read_to_string(&path)?;
            if !tokenize(&src, &path) {
                return Ok(ExitCode::from(65));
            }
        }
        SemtreeCommand::Parse { path, format } => {
            let src = read_to_string(&path)?;
            if !parse(&src, &path, &format) {
                return Ok(ExitCode::from(65));
            }
        }
        SemtreeCommand::Run { path } => {
            let src = read_to_string(&path)?;
            match run(&src, &path) {
                Ok(true) => {}
                Ok(false) => return Ok(ExitCode::from(65)),
                Err(error) => {
                    eprintln!("Error: {error:#}");
                    return Ok(ExitCode::from(70));
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn tokenize(src: &str, path: &Path) -> bool {
    use semtree::lexer::Lexer;
    use semtree::parser::formatter::{ParserFormatter, PrettyFormatter};
    use semtree::token::TokenKind;

    let formatter = PrettyFormatter::new(src, path);
    let mut scanner = Lexer::new(src);
    let mut succeeded = true;
    loop {
        match scanner.next_token() {
            Ok(token) => {
                println!("{} `{}`", token.kind, token.text);
                if matches!(token.kind, TokenKind::Eof) {
                    return succeeded;
                }
            }
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                return false;
            }
        }
    }
}

fn parse(src: &str, path: &Path, format: &TreeFormat) -> bool {
    use semtree::lexer::Lexer;
    use semtree::parser::formatter::{ParserFormatter, PrettyFormatter};
    use semtree::parser::Parser;
    use semtree::tree::formatter::{DebugFormatter, OutlineFormatter, TreeFormatter};

    let formatter = PrettyFormatter::new(src, path);
    let tokens = match Lexer::new(src).tokenize() {
        Ok(tokens) => tokens,
        Err(error) => {
            eprintln!("{}", formatter.format_lexical_error(&error));
            return false;
        }
    };
    match Parser::new(tokens).parse() {
        Ok(tree) => {
            let tree_formatter: Box<dyn TreeFormatter> = match format {
                TreeFormat::Debug => Box::new(DebugFormatter),
                TreeFormat::Outline => Box::new(OutlineFormatter),
            };
            print!("{}", tree_formatter.format(&tree));
            true
        }
        Err(error) => {
            eprintln!("{}", formatter.format_error(&error));
            false
        }
    }
}

fn run(src: &str, path: &Path) -> Result<bool> {
    use semtree::interpreter::{StdioContext, TreeWalkInterpreter};
    use semtree::lexer::Lexer;
    use semtree::parser::formatter::{ParserFormatter, PrettyFormatter};
    use semtree::parser::Parser;

    let formatter = PrettyFormatter::new(src, path);
    let tokens = match Lexer::new(src).tokenize() {
        Ok(tokens) => tokens,
        Err(error) => {
            eprintln!("{}", formatter.format_lexical_error(&error));
            return Ok(false);
        }
    };
    let tree = match Parser::new(tokens).parse() {
        Ok(tree) => tree,
        Err(error) => {
            eprintln!("{}", formatter.format_error(&error));
            return Ok(false);
        }
    };
    let mut interpreter = TreeWalkInterpreter::new(StdioContext);
    interpreter.run(&tree)?;
    Ok(true)
}
