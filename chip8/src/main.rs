use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::{error, LevelFilter};
use simple_logger::SimpleLogger;

use chipvm::constants::CLOCK_SPEED_HZ;
use chipvm::{disassemble, Config, QuirkPreset};

mod keymap;
mod run;

#[derive(Parser, Debug)]
#[command(name = "chipvm", version, about = "An interpreter for CHIP-8 programs")]
struct Cli {
    /// More output per occurrence (warn, info, debug, trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log level, overrides -v
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a ROM in a window
    Run(RunArgs),
    /// Print a listing of a ROM without running it
    Disasm {
        rom: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    rom: PathBuf,

    /// Starting set of instruction behaviors, adjusted by the flags below
    #[arg(long, value_name = "PRESET", default_value_t = QuirkPreset::Modern)]
    quirks: QuirkPreset,

    /// 8XY6/8XYE shift VY into VX
    #[arg(long)]
    shift_reads_vy: bool,

    /// FX55/FX65 leave I past the last register
    #[arg(long)]
    load_store_advances_i: bool,

    /// BNNN jumps to XNN + VX
    #[arg(long)]
    jump_offset_uses_vx: bool,

    /// FX1E leaves VF alone
    #[arg(long)]
    no_index_overflow_flag: bool,

    /// Instructions per second
    #[arg(long, value_name = "HZ", default_value_t = CLOCK_SPEED_HZ)]
    clock_speed: u32,

    /// Seed for the random number instruction
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Stop at the first unrecognized opcode
    #[arg(long)]
    strict: bool,

    /// Size of one pixel on screen
    #[arg(long, value_name = "N", default_value_t = 10)]
    scale: u32,
}

impl RunArgs {
    fn config(&self) -> Config {
        let mut quirks = self.quirks.quirks();
        quirks.shift_reads_vy |= self.shift_reads_vy;
        quirks.load_store_advances_i |= self.load_store_advances_i;
        quirks.jump_offset_uses_vx |= self.jump_offset_uses_vx;
        quirks.index_overflow_sets_vf &= !self.no_index_overflow_flag;

        Config {
            quirks,
            clock_speed_hz: self.clock_speed,
            strict: self.strict,
            seed: self.seed,
            ..Config::default()
        }
    }
}

fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn disasm(rom: &Path) -> Result<(), Box<dyn Error>> {
    let program = std::fs::read(rom)?;
    for line in disassemble(&program) {
        println!("{}", line);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = cli.log_level.unwrap_or_else(|| level(cli.verbose));
    if let Err(e) = SimpleLogger::new().with_level(filter).init() {
        eprintln!("unable to start logger: {}", e);
    }

    let result = match &cli.command {
        Command::Run(args) => run::run(&args.rom, args.config(), args.scale),
        Command::Disasm { rom } => disasm(rom),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
