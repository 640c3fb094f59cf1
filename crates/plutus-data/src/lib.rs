pub mod cbor;
pub mod certificate;
pub mod cost_model;
pub mod datum;
pub mod error;
pub mod hash;
pub mod json;
pub mod language;
pub mod redeemer;
pub mod schema;
pub mod tag;

pub use certificate::Certificate;
pub use cost_model::{CostModel, CostModels, COST_MODELS};
pub use datum::{Datum, Record};
pub use error::{Error, ErrorKind};
pub use hash::{DatumHash, ScriptHash};
pub use json::Separators;
pub use language::Language;
pub use redeemer::{ExUnits, Redeemer, RedeemerTag};
pub use schema::{Annotated, Constructor, Data};

/// A Rust type with a fixed Plutus Data schema.
///
/// Implementors describe their shape once through [`IsData::schema`] and convert
/// to and from the generic [`Datum`] tree; the wire, JSON and hashing entry
/// points are all derived from those three functions.
pub trait IsData: Sized {
    fn schema() -> Data;

    fn to_datum(&self) -> Datum;

    fn from_datum(datum: Datum) -> Result<Self, Error>;

    fn to_cbor(&self) -> Result<Vec<u8>, Error> {
        cbor::encode(&self.to_datum(), &Self::schema())
    }

    fn to_cbor_hex(&self) -> Result<String, Error> {
        self.to_cbor().map(hex::encode)
    }

    fn from_cbor(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_datum(cbor::decode(bytes, &Self::schema())?)
    }

    fn from_cbor_hex(text: &str) -> Result<Self, Error> {
        Self::from_cbor(&hex::decode(text.trim())?)
    }

    fn to_json(&self, separators: Separators) -> Result<String, Error> {
        json::encode(&self.to_datum(), &Self::schema(), separators)
    }

    fn from_json(text: &str) -> Result<Self, Error> {
        Self::from_datum(json::decode(text, &Self::schema())?)
    }

    fn hash(&self) -> Result<DatumHash, Error> {
        hash::datum_hash(&self.to_datum(), &Self::schema())
    }
}

/// The nullary constructor `0`, i.e. a record without fields.
impl IsData for () {
    fn schema() -> Data {
        Constructor::new(0, vec![]).into()
    }

    fn to_datum(&self) -> Datum {
        Datum::Constr(Record::default())
    }

    fn from_datum(datum: Datum) -> Result<Self, Error> {
        let [] = datum.into_fields::<0>(0)?;
        Ok(())
    }
}

/// Any Plutus data, without a schema. Round-trips its wire form as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawData(pub Datum);

impl IsData for RawData {
    fn schema() -> Data {
        Data::Opaque
    }

    fn to_datum(&self) -> Datum {
        self.0.clone()
    }

    fn from_datum(datum: Datum) -> Result<Self, Error> {
        Ok(RawData(datum))
    }
}

impl<T: IsData> IsData for Vec<T> {
    fn schema() -> Data {
        Data::List(Box::new(T::schema()))
    }

    fn to_datum(&self) -> Datum {
        Datum::List(self.iter().map(IsData::to_datum).collect())
    }

    fn from_datum(datum: Datum) -> Result<Self, Error> {
        datum.into_list()?.into_iter().map(T::from_datum).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unit() {
        assert_eq!(().to_cbor_hex().unwrap(), "d87980");
        assert!(<()>::from_cbor_hex("d87980").is_ok());
        assert!(<()>::from_cbor_hex("d87a80").is_err());
    }

    #[test]
    fn lists_of_records() {
        let units = vec![(), ()];

        let hex = units.to_cbor_hex().unwrap();
        assert_eq!(hex, "9fd87980d87980ff");
        assert_eq!(Vec::<()>::from_cbor_hex(&hex).unwrap(), units);

        assert_eq!(Vec::<()>::new().to_cbor_hex().unwrap(), "80");
        assert_eq!(
            units.to_json(Separators::Compact).unwrap(),
            r#"{"list":[{"constructor":0,"fields":[]},{"constructor":0,"fields":[]}]}"#
        );
    }

    #[test]
    fn from_cbor_hex_trims() {
        let raw = RawData::from_cbor_hex(" 182a\n").unwrap();
        assert_eq!(raw, RawData(Datum::from(42)));
    }
}
