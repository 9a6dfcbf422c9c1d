use anyhow::Context;
use clap::{Parser as _, ValueEnum};
use flavormark::{FlavorKind, Options, Parser};
use std::io::{self, Read};
use std::path::PathBuf;

/// Command-line names of the shipped flavors
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FlavorArg {
    Markdown,
    Github,
    Gitlab,
    Chyrp,
}

impl From<FlavorArg> for FlavorKind {
    fn from(arg: FlavorArg) -> Self {
        match arg {
            FlavorArg::Markdown => FlavorKind::Markdown,
            FlavorArg::Github => FlavorKind::Github,
            FlavorArg::Gitlab => FlavorKind::Gitlab,
            FlavorArg::Chyrp => FlavorKind::Chyrp,
        }
    }
}

#[derive(clap::Parser)]
#[command(name = "flavormark", version, about = "Convert Markdown to HTML")]
struct Cli {
    /// Markdown file to convert; reads stdin when omitted
    file: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "markdown")]
    flavor: FlavorArg,

    /// Emit HTML5 void elements
    #[arg(long)]
    html5: bool,

    /// Treat every newline as a hard line break
    #[arg(long)]
    newlines: bool,

    /// TOML file with parser options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the parsed document as JSON instead of HTML
    #[arg(long)]
    ast: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut options = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            Options::from_toml_str(&text)
                .with_context(|| format!("invalid options in {}", path.display()))?
        }
        None => Options::default(),
    };
    options.html5 |= cli.html5;
    options.enable_newlines |= cli.newlines;

    let input = match &cli.file {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?
        }
        None => {
            let mut input = Vec::new();
            io::stdin()
                .read_to_end(&mut input)
                .context("failed to read stdin")?;
            input
        }
    };

    let flavor = FlavorKind::from(cli.flavor);
    let parser = Parser::with_options(flavor, options);
    log::info!("converting with the {} flavor", flavor);

    if cli.ast {
        let document = parser.parse_document_bytes(&input)?;
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        print!("{}", parser.parse_bytes(&input)?);
    }
    Ok(())
}
