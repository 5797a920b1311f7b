fn main() -> anyhow::Result<()> {
    texkit::cli::run_cli()
}
