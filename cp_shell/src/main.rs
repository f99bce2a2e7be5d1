//! Interactive shell for the casino simulator and predictor.
//!
//! Runs an in-process casino; nothing is shared with a running server.

use anyhow::{Context, Result};
use casino_predictor::{
    Casino, CasinoConfig,
    chat::{
        ChatAssistant, ChatConfig, OllamaClient,
        client::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL},
    },
    game::constants::MAX_PREDICTION_WINDOW,
};
use cp_shell::{
    commands::{ShellCommand, parse_command},
    shell::{Shell, WARNING},
};
use log::info;
use pico_args::Arguments;
use std::{
    io::{self, Write},
    sync::Arc,
};

const HELP: &str = "\
Explore the casino simulator and predictor from the terminal

USAGE:
  cp_shell [OPTIONS]

OPTIONS:
  --window      N        Prediction window size  [default: 100]
  --ollama-url  URL      Ollama server root      [default: env OLLAMA_URL or http://localhost:11434]
  --model       NAME     Ollama model            [default: env OLLAMA_MODEL or gemma3:4b]

FLAGS:
  --quick                Start directly in chat mode
  -h, --help             Print help information
";

struct Args {
    window: usize,
    ollama_url: String,
    model: String,
    quick: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Commands,
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let args = Args {
        quick: pargs.contains("--quick"),
        window: pargs
            .opt_value_from_str("--window")
            .context("Invalid --window")?
            .unwrap_or(CasinoConfig::default().prediction_window),
        ollama_url: pargs
            .opt_value_from_str("--ollama-url")?
            .or_else(|| std::env::var("OLLAMA_URL").ok())
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
        model: pargs
            .opt_value_from_str("--model")?
            .or_else(|| std::env::var("OLLAMA_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
    };
    if !(1..=MAX_PREDICTION_WINDOW).contains(&args.window) {
        anyhow::bail!("--window must be between 1 and {MAX_PREDICTION_WINDOW}");
    }

    env_logger::builder().format_target(false).init();

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let casino = Arc::new(Casino::new(CasinoConfig {
        prediction_window: args.window,
    }));
    let client = OllamaClient::new(ChatConfig {
        base_url: args.ollama_url.trim_end_matches('/').to_string(),
        model: args.model,
        ..ChatConfig::default()
    });
    let shell = Shell::new(casino, Arc::new(ChatAssistant::new(Arc::new(client))));
    info!("Casino ready with prediction window {}", args.window);

    println!("CASINO PREDICTOR");
    println!("{WARNING}\n");

    let mut mode = Mode::Commands;
    if args.quick {
        mode = enter_chat(&shell).await;
    } else {
        println!("Type 'help' for commands.");
    }

    loop {
        let prompt = match mode {
            Mode::Commands => "casino> ",
            Mode::Chat => "you> ",
        };
        print!("{prompt}");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            println!();
            break;
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if mode == Mode::Chat {
            match line.to_ascii_lowercase().as_str() {
                "back" => {
                    mode = Mode::Commands;
                    println!("Back to commands.");
                }
                "quit" | "exit" => break,
                _ => {
                    let answer = shell.execute(ShellCommand::Chat(line.to_string())).await;
                    println!("assistant> {answer}\n");
                }
            }
            continue;
        }

        match parse_command(line) {
            Ok(ShellCommand::Quit) => break,
            Ok(ShellCommand::ChatMode) => mode = enter_chat(&shell).await,
            Ok(command) => println!("{}\n", shell.execute(command).await),
            Err(e) => println!("{e}"),
        }
    }

    println!("{}", shell.execute(ShellCommand::Quit).await);
    Ok(())
}

/// Reports backend status; chat mode is only entered when it is reachable.
async fn enter_chat(shell: &Shell) -> Mode {
    let status = shell.assistant().check_connection().await;
    println!("{}", status.message);
    if !status.available {
        println!("Chat needs Ollama: run 'ollama serve' in another terminal, then pull the model.");
        return Mode::Commands;
    }
    println!("{}", shell.execute(ShellCommand::ChatMode).await);
    Mode::Chat
}
