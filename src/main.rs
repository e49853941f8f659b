mod card;
mod config;
mod detail;
mod form;
mod gesture;
mod logging;
mod model;
mod plans;
mod route;
mod tui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use config::{ConfigFile, ResolvedConfig};

#[derive(Parser, Debug)]
#[command(
    name = "shoplist",
    about = "Shopping plans in your terminal: stores, products, memos and check-offs",
    long_about = None,
)]
struct Args {
    /// Plan to open directly (e.g. 2025-06-24); omit to start on the plan list
    #[arg(env = "SHOPLIST_PLAN")]
    plan: Option<String>,

    /// Product cards per grid row (1-6)
    #[arg(short, long)]
    columns: Option<usize>,

    /// Print the plan list (or the given plan) to stdout instead of starting the TUI
    #[arg(long)]
    plain: bool,

    /// Write a default config file to ~/.config/shoplist/config.toml and exit
    #[arg(long)]
    init: bool,

    /// Generate shell completions and print to stdout (bash, zsh, fish, elvish)
    #[arg(long, value_name = "SHELL")]
    completions: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ── --init ────────────────────────────────────────────────────────────────
    if args.init {
        let path = ConfigFile::write_default_if_missing()?;
        println!("Config written to: {}", path.display());
        return Ok(());
    }

    // ── --completions ─────────────────────────────────────────────────────────
    if let Some(shell_name) = &args.completions {
        return generate_completions(shell_name);
    }

    let file = ConfigFile::load()?;
    let resolved = ResolvedConfig::resolve(&file, args.columns);

    // ── Plain mode (no TUI) ───────────────────────────────────────────────────
    if args.plain {
        print_plain(&resolved, args.plan.as_deref());
        return Ok(());
    }

    let log_file = logging::init(&resolved.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log = ?log_file,
        plans = resolved.plans.len(),
        columns = resolved.grid_columns,
        "starting"
    );

    tui::run(resolved, args.plan).await
}

// ── Plain output ──────────────────────────────────────────────────────────────

fn print_plain(resolved: &ResolvedConfig, plan: Option<&str>) {
    let Some(plan_id) = plan else {
        println!();
        println!("  🛒 Shopping plans");
        for id in &resolved.plans {
            println!("    {id}");
        }
        println!();
        return;
    };

    println!();
    println!("  🗓  {plan_id} shopping plan");
    for group in plans::seed_groups(plan_id) {
        println!();
        println!("  {}  ({}/{})", group.name, group.checked_count(), group.products.len());
        for product in &group.products {
            let mark = if product.checked { "✓" } else { "·" };
            let qty = if product.quantity.get() > 1 {
                format!(" x{}", product.quantity)
            } else {
                String::new()
            };
            let memo = product
                .memo
                .as_deref()
                .map(|m| format!("  ({m})"))
                .unwrap_or_default();
            println!("    {mark} {} {}{qty}{memo}", product.glyph(), product.name);
        }
    }
    println!();
}

// ── Shell completions ─────────────────────────────────────────────────────────

fn generate_completions(shell_name: &str) -> Result<()> {
    use clap_complete::{Shell, generate};

    let shell: Shell = match shell_name.to_lowercase().as_str() {
        "bash"    => Shell::Bash,
        "zsh"     => Shell::Zsh,
        "fish"    => Shell::Fish,
        "elvish"  => Shell::Elvish,
        _ => anyhow::bail!("Unknown shell: {shell_name} (supported: bash, zsh, fish, elvish)"),
    };

    let mut cmd = Args::command();
    generate(shell, &mut cmd, "shoplist", &mut std::io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_plan_and_columns() {
        let args = Args::try_parse_from(["shoplist", "2025-06-24", "--columns", "2", "--plain"]).unwrap();
        assert_eq!(args.plan.as_deref(), Some("2025-06-24"));
        assert_eq!(args.columns, Some(2));
        assert!(args.plain);
    }

    #[test]
    fn test_args_command_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_unknown_shell_is_an_error() {
        assert!(generate_completions("powershell-ish").is_err());
    }
}
