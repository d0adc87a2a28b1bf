use anyhow::Result;

fn main() -> Result<()> {
    chat_dossier::cli::run()
}
