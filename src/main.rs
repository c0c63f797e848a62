fn main() -> anyhow::Result<()> {
    studycal::cli::run()
}
