use crate::{cbor, datum::Datum, error::Error, schema::Data};
use cryptoxide::{blake2b::Blake2b, digest::Digest};
use pallas_crypto::hash::Hash;

/// Blake2b-256 digest of a datum's wire bytes, as referenced from outputs.
pub type DatumHash = Hash<32>;

/// Blake2b-224 digest identifying a script.
pub type ScriptHash = Hash<28>;

/// Hash of a value's canonical encoding. Fails if the value does not fit its
/// schema.
pub fn datum_hash(datum: &Datum, schema: &Data) -> Result<DatumHash, Error> {
    let bytes = cbor::encode(datum, schema)?;

    Ok(blake2b(&bytes))
}

/// Hash of a serialized script, prefixed with its language tag.
pub fn script_hash(tag: u8, script: &[u8]) -> ScriptHash {
    let mut context = Blake2b::new(28);

    context.input(&[tag]);
    context.input(script);

    finish(context)
}

pub fn blake2b<const N: usize>(bytes: &[u8]) -> Hash<N> {
    let mut context = Blake2b::new(N);

    context.input(bytes);

    finish(context)
}

fn finish<const N: usize>(mut context: Blake2b) -> Hash<N> {
    let mut digest = [0u8; N];
    context.result(&mut digest);
    Hash::new(digest)
}
