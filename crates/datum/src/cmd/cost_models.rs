use owo_colors::{OwoColorize, Stream::Stdout};
use plutus_data::COST_MODELS;

/// Print the script cost models
#[derive(clap::Args)]
pub struct Args {
    /// Print the ledger's hex-encoded CBOR language view instead
    #[clap(long)]
    cbor: bool,
}

pub fn exec(Args { cbor }: Args) -> miette::Result<()> {
    if cbor {
        println!("{}", COST_MODELS.to_cbor_hex()?);
        return Ok(());
    }

    for model in COST_MODELS.iter() {
        println!(
            "{}",
            model
                .language()
                .if_supports_color(Stdout, |s| s.purple())
                .if_supports_color(Stdout, |s| s.bold())
        );

        let width = model
            .parameters()
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or_default();

        for (name, value) in model.parameters() {
            println!("  {name:<width$}  {value}");
        }
    }

    Ok(())
}
