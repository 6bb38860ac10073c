use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = mpick::cli::Cli::parse();
    mpick::init(cli.log_file.as_deref(), cli.is_interactive())?;
    mpick::cli::run(cli)
}
