use plutus_data::{IsData, RawData};

/// Compute the hash of a datum
#[derive(clap::Args)]
pub struct Args {
    /// Hex-encoded CBOR of the datum
    cbor: String,
}

pub fn exec(Args { cbor }: Args) -> miette::Result<()> {
    let datum = RawData::from_cbor_hex(&cbor)?;

    println!("{}", datum.hash()?);

    Ok(())
}
