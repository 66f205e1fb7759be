use colored::Colorize;
use linklister::commands::command_argument_builder;
use linklister::handlers::{handle_run, init_logging};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = command_argument_builder().get_matches();
    init_logging(args.get_flag("verbose"), args.get_flag("quiet"));

    if let Err(e) = handle_run(&args).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
