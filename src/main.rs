use clap::Parser;
use hc::infrastructure::config::AppContext;
use hc::presentation::cli::Cli;

/// hc: named API endpoints without hand-written curl commands
///
/// Requests are sent one at a time on a single-threaded runtime. Setup
/// failures exit with status 1; failed API calls are reported and exit
/// normally.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let ctx = match AppContext::load(cli.config_dir.clone()) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(1);
        }
    };
    let _log_guard = tracing::dispatcher::set_default(&ctx.dispatch);

    if let Err(err) = cli.run(&ctx).await {
        tracing::error!(error = %format!("{:#}", err), "command failed");
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
