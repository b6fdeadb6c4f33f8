use json_forge::cli::CommandLineInterface;

fn main() -> anyhow::Result<()> {
    CommandLineInterface::load().run()
}
