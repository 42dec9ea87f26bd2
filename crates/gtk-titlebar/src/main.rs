use clap::Parser;
use console::style;
use gtk_titlebar::cli::Cli;

fn main() {
    let cli = Cli::parse();
    gtk_titlebar::logging::init(cli.verbose);

    if let Err(e) = gtk_titlebar::run(cli) {
        eprintln!("{} {:#}", style("error:").red().bold(), e);
        std::process::exit(1);
    }
}
