//! CLI entry point for the Pi temperature monitor

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use pi_temp_monitor::{Monitor, MonitorConfig, PiSensors, Reading, TemperatureSource};

#[derive(Parser)]
#[command(name = "pi-temp-monitor")]
#[command(about = "GPU and CPU temperature monitor for the Raspberry Pi", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Update interval in seconds (pre-fills the window's field)
    #[arg(short, long, global = true, env = "TEMP_MONITOR_INTERVAL")]
    interval: Option<f64>,

    /// Command printing the GPU temperature as temp=NN.N'C
    #[arg(
        long,
        global = true,
        default_value = "vcgencmd measure_temp",
        env = "TEMP_MONITOR_GPU_COMMAND"
    )]
    gpu_command: String,

    /// File holding the CPU temperature in millidegrees Celsius
    #[arg(
        long,
        global = true,
        default_value = "/sys/class/thermal/thermal_zone0/temp",
        env = "TEMP_MONITOR_CPU_TEMP_PATH"
    )]
    cpu_temp_path: PathBuf,

    /// Output format for `read` and `watch`
    #[arg(short, long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the monitor window (default)
    #[cfg(feature = "gui")]
    Gui,
    /// Print one reading and exit
    Read,
    /// Print a reading every interval until a read fails
    Watch,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn print_reading(reading: &Reading, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(reading)?),
        Format::Text => println!(
            "[{}] {} | {}",
            reading.taken_at.format("%H:%M:%S"),
            reading.gpu_text(),
            reading.cpu_text()
        ),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::init();

    let config = MonitorConfig::default()
        .with_interval(cli.interval)
        .with_gpu_command(&cli.gpu_command)
        .with_cpu_temp_path(cli.cpu_temp_path);

    match cli.command {
        #[cfg(feature = "gui")]
        None | Some(Commands::Gui) => {
            pi_temp_monitor::gui::run(config)?;
        }
        #[cfg(not(feature = "gui"))]
        None => {
            return Err(
                "GUI feature not enabled. Use `read` or `watch`, or compile with --features gui"
                    .into(),
            );
        }
        Some(Commands::Read) => {
            let reading = PiSensors::new(&config).read()?;
            print_reading(&reading, cli.format)?;
        }
        Some(Commands::Watch) => {
            let interval = config.refresh_interval()?;
            let mut monitor = Monitor::new(Arc::new(PiSensors::new(&config)));
            monitor.start_with(interval, || {})?;
            while let Some(reading) = monitor.next_reading()? {
                print_reading(&reading, cli.format)?;
            }
        }
    }

    Ok(())
}
