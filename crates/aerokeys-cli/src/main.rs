mod commands;
mod daemon_client;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let code = run(&args);
    std::process::exit(code);
}

fn run(args: &[String]) -> i32 {
    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => cmd_help(),
        Some("show") => commands::show::cmd_show(&args[2..]),
        Some("modes") => commands::daemon::cmd_modes(),
        Some("notify") => commands::daemon::cmd_notify(&args[2..]),
        Some("reload") => commands::daemon::cmd_reload(),
        Some("status") => commands::daemon::cmd_status(),
        Some("config") => commands::config::cmd_config(&args[2..]),
        _ => {
            cmd_help();
            1
        }
    }
}

fn cmd_help() -> i32 {
    println!("aerokeys-cli {}", env!("CARGO_PKG_VERSION"));
    println!("Inspect AeroSpace key bindings and drive the aerokeys daemon.");
    println!();
    println!("Usage: aerokeys-cli <command> [options]");
    println!();
    println!("Commands:");
    println!("  show [mode]         Print the cheat-sheet (reads AeroSpace directly)");
    println!("    --file <path>     Read an aerospace.toml instead of the live config");
    println!("    --json            Print the mode model as JSON");
    println!("    --explain         Show which rule classified each binding");
    println!("  modes               List modes loaded by the daemon");
    println!("  notify <mode>       Tell the daemon AeroSpace entered <mode>");
    println!("  reload              Reload bindings in the daemon");
    println!("  status              Show daemon status");
    println!("  config              Manage config file");
    println!("    path              Print config file path");
    println!("    edit              Open config in $EDITOR");
    println!("    init [--force]    Create config with defaults");
    println!();
    println!("In aerospace.toml, announce mode switches with:");
    println!("  alt-r = ['mode resize', 'exec-and-forget aerokeys-cli notify resize']");
    println!();
    println!("Examples:");
    println!("  aerokeys-cli show");
    println!("  aerokeys-cli show resize --file ~/.aerospace.toml");
    println!("  aerokeys-cli reload");
    0
}
