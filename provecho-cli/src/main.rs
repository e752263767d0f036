use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Read;

use provecho_core::{Config, PromptStyle, Trace, advise, cleanup};

#[derive(Parser)]
#[command(name = "provecho")]
#[command(about = "Food advice CLI tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for cooking tips for a food
    Ask {
        /// Food name, e.g. "aguacate"
        food: String,

        /// Prompt style (direct or structured), overriding PROMPT_STYLE
        #[arg(long)]
        style: Option<PromptStyle>,

        /// Print the diagnostic trace to stderr after the reply
        #[arg(long)]
        show_trace: bool,
    },

    /// Run the reasoning-cleanup heuristic over text (argument or stdin)
    ///
    /// Useful for replaying real model transcripts when tuning the patterns.
    Clean {
        /// Text to clean; reads stdin when omitted
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    // Load .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask {
            food,
            style,
            show_trace,
        } => {
            ask_command(food, style, show_trace).await?;
        }
        Commands::Clean { text } => {
            clean_command(text)?;
        }
    }

    Ok(())
}

async fn ask_command(food: String, style: Option<PromptStyle>, show_trace: bool) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(style) = style {
        config.prompt_style = style;
    }

    let mut trace = Trace::new();
    let reply = advise(&food, &config, &mut trace).await?;

    println!("{}", serde_json::to_string_pretty(&reply)?);

    if show_trace {
        for line in trace.into_lines() {
            eprintln!("{}", line);
        }
    }

    Ok(())
}

fn clean_command(text: Option<String>) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    println!("{}", cleanup::strip_reasoning(&text));
    Ok(())
}
