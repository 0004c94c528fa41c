use clap::Parser;
use colored::Colorize;

use geominder::cli::{Cli, Commands, ConfigCommands};
use geominder::config::{StaticConfig, get_config, init_config, update_config};
use geominder::errors::GeominderError;
use geominder::runtime::modes::run_server;
use geominder::system::logging::init_logging;

fn fail(err: &GeominderError) -> ! {
    eprintln!("{}", err.format_colored());
    std::process::exit(1);
}

fn generate_config(output_path: Option<&str>) {
    match output_path {
        Some(path) => {
            if let Err(e) = StaticConfig::default().save_to_file(path) {
                fail(&e);
            }
            println!("{} Sample configuration written to {}", "✓".green(), path);
        }
        None => print!("{}", StaticConfig::generate_sample_config()),
    }
}

#[actix_web::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(Commands::Config {
        action: ConfigCommands::Generate { output_path },
    }) = &cli.command
    {
        generate_config(output_path.as_deref());
        return;
    }

    // 加载配置：默认值 < TOML 文件 < 环境变量 < 命令行参数
    init_config(StaticConfig::load(cli.config.as_deref()).unwrap_or_else(|e| fail(&e)));
    update_config(|config| cli.apply_overrides(config));

    let config = get_config();
    if let Err(e) = config.validate() {
        fail(&e);
    }

    // guard 必须存活到进程退出，否则异步日志会丢失
    let _log_guard = init_logging(&config.logging).unwrap_or_else(|e| fail(&e));

    if let Err(e) = run_server().await {
        eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
        std::process::exit(1);
    }
}
