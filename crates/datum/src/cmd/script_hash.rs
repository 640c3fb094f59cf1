use miette::IntoDiagnostic;
use plutus_data::{hash, Language};
use std::path::PathBuf;

/// Compute the hash of a serialized script
#[derive(clap::Args)]
pub struct Args {
    /// Serialized script file
    input: PathBuf,

    /// Plutus language the script is written for
    #[clap(short, long, default_value = "plutus-v1")]
    language: Language,

    /// Input file contents will be hex decoded
    #[clap(long)]
    hex: bool,
}

pub fn exec(
    Args {
        input,
        language,
        hex,
    }: Args,
) -> miette::Result<()> {
    let bytes = if hex {
        let hex_bytes = std::fs::read_to_string(&input).into_diagnostic()?;

        hex::decode(hex_bytes.trim()).into_diagnostic()?
    } else {
        std::fs::read(&input).into_diagnostic()?
    };

    println!("{}", hash::script_hash(language.script_tag(), &bytes));

    Ok(())
}
