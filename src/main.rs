use anyhow::{bail, Result};
use pico_args::Arguments;
use powerprompt::runtime::{Flags, Terminal};
use powerprompt::utils::logger;
use powerprompt::{config, patch_terminal_width, Engine, ExtraPromptKind};
use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

const TOGGLES_ENV: &str = "POWERPROMPT_TOGGLES";

#[derive(Debug)]
enum Command {
    Primary,
    Right,
    Extra(ExtraPromptKind),
    Debug,
}

#[derive(Debug)]
struct Args {
    command: Command,
    flags: Flags,
    config: Option<PathBuf>,
    help: bool,
}

impl Args {
    fn from_env() -> Result<Self> {
        Self::parse(Arguments::from_env())
    }

    fn parse(mut args: Arguments) -> Result<Self> {
        let help = args.contains(["-h", "--help"]);

        let flags = Flags {
            shell: args
                .opt_value_from_str("--shell")?
                .or_else(|| env::var("POWERPROMPT_SHELL").ok())
                .unwrap_or_default(),
            pwd: args.opt_value_from_str("--pwd")?,
            error_code: args.opt_value_from_str("--status")?.unwrap_or(0),
            execution_time: args.opt_value_from_str("--execution-time")?.unwrap_or(0.0),
            terminal_width: args.opt_value_from_str("--terminal-width")?,
            prompt_count: args.opt_value_from_str("--prompt-count")?.unwrap_or(0),
            cleared: args.contains("--cleared"),
            plain: args.contains("--plain"),
            debug: args.contains("--debug"),
        };

        let config = args
            .opt_value_from_str::<_, PathBuf>("--config")?
            .or_else(|| env::var(config::CONFIG_ENV).ok().map(PathBuf::from));

        let command = match args.subcommand()?.as_deref() {
            None | Some("print") => match args.opt_free_from_str::<String>()?.as_deref() {
                None | Some("primary") => Command::Primary,
                Some("right") => Command::Right,
                Some(kind) => match kind.parse() {
                    Ok(kind) => Command::Extra(kind),
                    Err(err) => bail!(err),
                },
            },
            Some("debug") => Command::Debug,
            Some(other) => bail!("unknown command {other:?}, see --help"),
        };

        let remaining = args.finish();
        if !remaining.is_empty() {
            bail!("unexpected arguments: {}", join_args(&remaining));
        }

        Ok(Self {
            command,
            flags,
            config,
            help,
        })
    }
}

fn join_args(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::from_env()?;

    if args.help {
        print_help();
        return Ok(());
    }

    logger::init(args.flags.debug);
    logger::install_panic_hook();

    // only the debug report headings use `colored`; prompt escapes follow --plain
    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    let config = config::load_config(args.config).await?;

    let toggles = env::var(TOGGLES_ENV).unwrap_or_default();
    let mut terminal = Terminal::new(args.flags).with_toggles(&toggles);
    patch_terminal_width(&config, &mut terminal);

    let mut engine = Engine::new(&config, &terminal);
    let output = match args.command {
        Command::Primary => engine.primary(),
        Command::Right => engine.right(),
        Command::Extra(kind) => engine.extra_prompt(kind),
        Command::Debug => engine.debug_report(),
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

fn print_help() {
    println!("powerprompt - themable shell prompt renderer");
    println!();
    println!("USAGE:");
    println!("    powerprompt [print] [primary|right|transient|secondary|debug|valid|error] [OPTIONS]");
    println!("    powerprompt debug [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --shell <SHELL>            Shell: bash, zsh, fish, pwsh, nu, cmd");
    println!("    --pwd <DIR>                Working directory [default: current directory]");
    println!("    --status <CODE>            Exit code of the last command [default: 0]");
    println!("    --execution-time <MS>      Duration of the last command in milliseconds");
    println!("    --terminal-width <COLS>    Terminal width [default: probed]");
    println!("    --prompt-count <N>         Number of prompts printed in this session");
    println!("    --cleared                  The screen was just cleared");
    println!("    --plain                    Print without colors or escape sequences");
    println!("    --config <FILE>            Config file path");
    println!("    --debug                    Enable debug logging");
    println!("    -h, --help                 Show this help message");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    POWERPROMPT_CONFIG     Override config path");
    println!("    POWERPROMPT_SHELL      Default for --shell");
    println!("    POWERPROMPT_TOGGLES    Comma separated segment types to hide");
    println!("    POWERPROMPT_PALETTE    Palette picked by the built-in theme");
    println!("    POWERPROMPT_DEBUG      Enable debug logging");
}
