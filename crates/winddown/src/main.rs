mod commands;

use clap::{Parser, Subcommand, ValueEnum};

use winddown_core::SystemAction;

#[derive(Parser)]
#[command(
    name = "winddown",
    version,
    about = "Close an app or power down the machine after a countdown"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Start the countdown daemon
    Start,
    /// Stop the countdown daemon
    Stop,
    /// Show daemon, timer, and selection status
    Status,
    /// List running applications
    List {
        /// Re-poll the process list before printing it
        #[arg(long)]
        refresh: bool,
    },
    /// Select the application the app timer targets
    Select {
        /// PID from `winddown list`
        pid: u32,
    },
    /// Arm a countdown
    Arm {
        #[command(subcommand)]
        timer: ArmCommands,
    },
    /// Cancel a countdown
    Cancel {
        #[command(subcommand)]
        timer: CancelCommands,
    },
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
    /// Run the daemon (internal — not for direct use)
    #[command(hide = true)]
    Daemon,
}

#[derive(Subcommand)]
enum ArmCommands {
    /// Close an application when the countdown elapses
    App {
        /// PID of the application (defaults to the current selection)
        #[arg(long)]
        pid: Option<u32>,
        /// Hours until the timer fires
        #[arg(long, default_value = "0")]
        hours: String,
        /// Minutes until the timer fires
        #[arg(long, default_value = "0")]
        minutes: String,
        /// Shut the system down after the application closes
        #[arg(long)]
        shutdown_after: bool,
    },
    /// Perform a power transition when the countdown elapses
    System {
        /// The power transition to perform
        action: PowerAction,
        /// Hours until the timer fires
        #[arg(long, default_value = "0")]
        hours: String,
        /// Minutes until the timer fires
        #[arg(long, default_value = "0")]
        minutes: String,
    },
}

#[derive(Subcommand)]
enum CancelCommands {
    /// Cancel the app timer
    App,
    /// Cancel the system timer
    System,
}

#[derive(Subcommand)]
enum DebugCommands {
    /// Watch environment-change notifications in real time
    Events,
}

#[derive(Clone, Copy, ValueEnum)]
enum PowerAction {
    /// Shut the machine down
    Shutdown,
    /// Restart the machine
    Restart,
    /// Put the machine to sleep
    Sleep,
}

fn system_action(action: PowerAction) -> SystemAction {
    match action {
        PowerAction::Shutdown => SystemAction::Shutdown,
        PowerAction::Restart => SystemAction::Restart,
        PowerAction::Sleep => SystemAction::Sleep,
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Start => commands::start::execute(),
        Commands::Stop => commands::stop::execute(),
        Commands::Status => commands::status::execute(),
        Commands::List { refresh } => commands::list::execute(refresh),
        Commands::Select { pid } => commands::select::execute(pid),
        Commands::Daemon => commands::daemon::execute(),
        Commands::Arm { timer } => match timer {
            ArmCommands::App {
                pid,
                hours,
                minutes,
                shutdown_after,
            } => commands::arm::execute_app(pid, &hours, &minutes, shutdown_after),
            ArmCommands::System {
                action,
                hours,
                minutes,
            } => commands::arm::execute_system(system_action(action), &hours, &minutes),
        },
        Commands::Cancel { timer } => match timer {
            CancelCommands::App => commands::cancel::execute_app(),
            CancelCommands::System => commands::cancel::execute_system(),
        },
        Commands::Debug { command } => match command {
            DebugCommands::Events => commands::debug::events::execute(),
        },
    }
}
