//! Canonical CBOR encoding of Plutus Data.
//!
//! Encoding only depends on the value once it has been checked against its
//! schema. Decoding is driven by the schema, which decides list framings and
//! resolves polymorphic fields by trying each alternative in order.

use crate::{
    datum::{Datum, Framing, Record},
    error::Error,
    schema::{Annotated, Constructor, Data},
    tag::{convert_constr_to_tag, convert_tag_to_constr, is_constr_tag, ANY_TAG},
};
use num_bigint::{BigInt, Sign};
use pallas_codec::minicbor::{
    self,
    data::{Int, Tag, Type},
    encode::{self, Write},
    Decoder, Encode, Encoder,
};

/// Byte strings longer than this are split into an indefinite byte string of
/// chunks of at most this size. Longer segments are rejected when decoding.
const BOUNDED_BYTES_CHUNK_SIZE: usize = 64;

/// Encode a value after checking it against its schema.
pub fn encode(datum: &Datum, schema: &Data) -> Result<Vec<u8>, Error> {
    schema.validate(datum)?;

    to_vec(datum)
}

/// Decode a single value, which must span the whole input.
pub fn decode(bytes: &[u8], schema: &Data) -> Result<Datum, Error> {
    decode_whole(bytes, |d| decode_data(d, schema))
}

pub(crate) fn to_vec<T: Encode<()>>(value: &T) -> Result<Vec<u8>, Error> {
    minicbor::to_vec(value).map_err(|err| Error::Encoding(err.to_string()))
}

/// Decode one item that must span the whole input.
pub(crate) fn decode_whole<T>(
    bytes: &[u8],
    decode: impl FnOnce(&mut Decoder<'_>) -> Result<T, Error>,
) -> Result<T, Error> {
    let mut d = Decoder::new(bytes);

    let value = decode(&mut d)?;

    expect_end(&d, bytes)?;

    Ok(value)
}

pub(crate) fn expect_end(d: &Decoder<'_>, bytes: &[u8]) -> Result<(), Error> {
    match bytes.len() - d.position() {
        0 => Ok(()),
        remaining => Err(Error::TrailingBytes { remaining }),
    }
}

impl<C> Encode<C> for Datum {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        match self {
            Datum::Integer(n) => encode_integer(n, e),
            Datum::Bytes(bytes) => encode_bounded_bytes(bytes, e),
            Datum::Chunks(chunks) => {
                e.begin_bytes()?;

                for chunk in chunks {
                    e.bytes(chunk)?;
                }

                e.end()?;

                Ok(())
            }
            Datum::List(items) => encode_framed(items, Framing::Canonical, e, ctx),
            Datum::IndefiniteList(items) => encode_framed(items, Framing::Indefinite, e, ctx),
            Datum::DefiniteList(items) => encode_framed(items, Framing::Definite, e, ctx),
            Datum::Map(entries) => {
                e.map(entries.len() as u64)?;
                encode_entries(entries, e, ctx)
            }
            Datum::IndefiniteMap(entries) => {
                e.begin_map()?;
                encode_entries(entries, e, ctx)?;
                e.end()?;

                Ok(())
            }
            Datum::Constr(record) => record.encode(e, ctx),
        }
    }
}

impl<C> Encode<C> for Record {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        match convert_constr_to_tag(self.constructor) {
            Some(tag) => {
                e.tag(Tag::Unassigned(tag))?;
            }
            None => {
                e.tag(Tag::Unassigned(ANY_TAG))?;
                e.array(2)?;
                e.u64(self.constructor)?;
            }
        }

        encode_framed(&self.fields, self.framing, e, ctx)
    }
}

fn encode_entries<C, W: Write>(
    entries: &[(Datum, Datum)],
    e: &mut Encoder<W>,
    ctx: &mut C,
) -> Result<(), encode::Error<W::Error>> {
    for (k, v) in entries {
        k.encode(e, ctx)?;
        v.encode(e, ctx)?;
    }

    Ok(())
}

fn encode_framed<C, W: Write, T: Encode<C>>(
    items: &[T],
    framing: Framing,
    e: &mut Encoder<W>,
    ctx: &mut C,
) -> Result<(), encode::Error<W::Error>> {
    match framing {
        Framing::Canonical => encode_list(items, e, ctx),
        Framing::Indefinite => encode_indefinite_list(items, e, ctx),
        Framing::Definite => {
            e.array(items.len() as u64)?;

            for item in items {
                item.encode(e, ctx)?;
            }

            Ok(())
        }
    }
}

/// Empty lists are a definite array of size zero, anything else is framed as
/// an indefinite array.
pub(crate) fn encode_list<C, W: Write, T: Encode<C>>(
    items: &[T],
    e: &mut Encoder<W>,
    ctx: &mut C,
) -> Result<(), encode::Error<W::Error>> {
    if items.is_empty() {
        e.array(0)?;
        return Ok(());
    }

    encode_indefinite_list(items, e, ctx)
}

fn encode_indefinite_list<C, W: Write, T: Encode<C>>(
    items: &[T],
    e: &mut Encoder<W>,
    ctx: &mut C,
) -> Result<(), encode::Error<W::Error>> {
    e.begin_array()?;

    for item in items {
        item.encode(e, ctx)?;
    }

    e.end()?;

    Ok(())
}

fn encode_integer<W: Write>(n: &BigInt, e: &mut Encoder<W>) -> Result<(), encode::Error<W::Error>> {
    if let Some(int) = i128::try_from(n).ok().and_then(|n| Int::try_from(n).ok()) {
        e.int(int)?;
        return Ok(());
    }

    // Out of the major-type range: bignum tags carry the magnitude, and
    // negative numbers are stored as -1 - n.
    let (tag, magnitude) = match n.sign() {
        Sign::Minus => (Tag::NegBignum, -(n + BigInt::from(1))),
        Sign::Plus | Sign::NoSign => (Tag::PosBignum, n.clone()),
    };

    e.tag(tag)?;

    encode_bounded_bytes(&magnitude.to_bytes_be().1, e)
}

fn encode_bounded_bytes<W: Write>(
    bytes: &[u8],
    e: &mut Encoder<W>,
) -> Result<(), encode::Error<W::Error>> {
    if bytes.len() <= BOUNDED_BYTES_CHUNK_SIZE {
        e.bytes(bytes)?;
        return Ok(());
    }

    e.begin_bytes()?;

    for chunk in bytes.chunks(BOUNDED_BYTES_CHUNK_SIZE) {
        e.bytes(chunk)?;
    }

    e.end()?;

    Ok(())
}

pub(crate) fn decode_data(d: &mut Decoder<'_>, schema: &Data) -> Result<Datum, Error> {
    match schema {
        Data::Integer => decode_integer(d).map(Datum::Integer),
        Data::Bytes => decode_bounded_bytes(d).map(Datum::Bytes),
        Data::List(item) => decode_array(d, |d| decode_data(d, item)).map(Datum::List),
        Data::IndefiniteList(item) => {
            decode_array(d, |d| decode_data(d, item)).map(Datum::IndefiniteList)
        }
        Data::Map(keys, values) => decode_map(d, keys, values).map(Datum::Map),
        Data::AnyOf(alternatives) => decode_alternatives(d, alternatives).map(Datum::Constr),
        Data::Opaque => decode_opaque(d),
    }
}

fn decode_alternatives(
    d: &mut Decoder<'_>,
    alternatives: &[Annotated<Constructor>],
) -> Result<Record, Error> {
    if let [single] = alternatives {
        return decode_record(d, &single.annotated);
    }

    let start = d.position();

    for alternative in alternatives {
        match decode_record(d, &alternative.annotated) {
            Ok(record) => return Ok(record),
            Err(err) => {
                tracing::trace!(
                    constructor = alternative.annotated.index,
                    %err,
                    "alternative rejected"
                );
                d.set_position(start);
            }
        }
    }

    Err(Error::NoMatchingAlternative {
        field: None,
        alternatives: alternatives
            .iter()
            .map(|alternative| alternative.annotated.index)
            .collect(),
    })
}

fn decode_record(d: &mut Decoder<'_>, constructor: &Constructor) -> Result<Record, Error> {
    let index = decode_constr_header(d)?;

    if index != constructor.index {
        return Err(Error::ConstructorMismatch {
            expected: constructor.index,
            found: index,
        });
    }

    let mut remaining = begin_array(d)?;
    let mut fields = Vec::with_capacity(constructor.fields.len());
    let mut found = 0;

    while next_element(d, &mut remaining)? {
        match constructor.fields.get(found) {
            Some(field) => fields.push(
                decode_data(d, &field.annotated).map_err(|err| err.in_field(field.title()))?,
            ),
            None => d.skip()?,
        }

        found += 1;
    }

    if found != constructor.fields.len() {
        return Err(Error::ArityMismatch {
            constructor: index,
            expected: constructor.fields.len(),
            found,
        });
    }

    Ok(Record::new(index, fields))
}

/// Read a constructor's tag, and for the general tag its leading identifier,
/// leaving the decoder on the field list.
fn decode_constr_header(d: &mut Decoder<'_>) -> Result<u64, Error> {
    let datatype = d.datatype()?;
    if datatype != Type::Tag {
        return Err(Error::unexpected("constructor", describe(datatype)));
    }

    match d.tag()? {
        Tag::Unassigned(ANY_TAG) => {
            let len = match d.datatype()? {
                Type::Array => d.array()?,
                Type::ArrayIndef => {
                    return Err(Error::MalformedGeneralConstr {
                        found: "an indefinite array".to_string(),
                    })
                }
                datatype => {
                    return Err(Error::MalformedGeneralConstr {
                        found: describe(datatype).to_string(),
                    })
                }
            };

            if len != Some(2) {
                return Err(Error::MalformedGeneralConstr {
                    found: format!("an array of {} element(s)", len.unwrap_or_default()),
                });
            }

            decode_unsigned(d).map_err(|err| Error::MalformedGeneralConstr {
                found: err.to_string(),
            })
        }
        Tag::Unassigned(tag) => convert_tag_to_constr(tag).ok_or(Error::UnknownTag { tag }),
        tag => Err(Error::unexpected("constructor tag", format!("{tag:?}"))),
    }
}

/// Data read without a schema. Arrays, maps and byte strings keep the framing
/// they were read with, so that the value encodes back to the same bytes.
fn decode_opaque(d: &mut Decoder<'_>) -> Result<Datum, Error> {
    match d.datatype()? {
        Type::U8
        | Type::U16
        | Type::U32
        | Type::U64
        | Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Int => decode_integer(d).map(Datum::Integer),
        Type::Bytes => decode_bounded_bytes(d).map(Datum::Bytes),
        Type::BytesIndef => decode_chunks(d),
        Type::Array | Type::ArrayIndef => {
            let (items, framing) = decode_framed(d, decode_opaque)?;
            Ok(match framing {
                Framing::Canonical => Datum::List(items),
                Framing::Definite => Datum::DefiniteList(items),
                Framing::Indefinite => Datum::IndefiniteList(items),
            })
        }
        Type::Map => decode_map(d, &Data::Opaque, &Data::Opaque).map(Datum::Map),
        Type::MapIndef => decode_map(d, &Data::Opaque, &Data::Opaque).map(Datum::IndefiniteMap),
        Type::Tag => match d.probe().tag()? {
            Tag::PosBignum | Tag::NegBignum => decode_integer(d).map(Datum::Integer),
            Tag::Unassigned(tag) if is_constr_tag(tag) => {
                let constructor = decode_constr_header(d)?;
                let (fields, framing) = decode_framed(d, decode_opaque)?;
                Ok(Datum::Constr(Record::new(constructor, fields).with_framing(framing)))
            }
            tag => Err(Error::unexpected("plutus data", format!("{tag:?}"))),
        },
        datatype => Err(Error::unexpected("plutus data", describe(datatype))),
    }
}

/// Bytes chunked the way they would be encoded stay plain bytes, anything else
/// keeps its chunks.
fn decode_chunks(d: &mut Decoder<'_>) -> Result<Datum, Error> {
    let mut chunks = Vec::new();

    for chunk in d.bytes_iter()? {
        chunks.push(bounded(chunk?, BOUNDED_BYTES_CHUNK_SIZE)?.to_vec());
    }

    let bytes = chunks.concat();

    if bytes.len() > BOUNDED_BYTES_CHUNK_SIZE
        && bytes
            .chunks(BOUNDED_BYTES_CHUNK_SIZE)
            .eq(chunks.iter().map(Vec::as_slice))
    {
        Ok(Datum::Bytes(bytes))
    } else {
        Ok(Datum::Chunks(chunks))
    }
}

fn decode_map(
    d: &mut Decoder<'_>,
    keys: &Data,
    values: &Data,
) -> Result<Vec<(Datum, Datum)>, Error> {
    let mut remaining = begin_map(d)?;
    let mut entries = Vec::new();

    while next_element(d, &mut remaining)? {
        let k = decode_data(d, keys)?;
        let v = decode_data(d, values)?;
        entries.push((k, v));
    }

    Ok(entries)
}

fn decode_array<T, F>(d: &mut Decoder<'_>, mut decode_item: F) -> Result<Vec<T>, Error>
where
    F: FnMut(&mut Decoder<'_>) -> Result<T, Error>,
{
    let mut remaining = begin_array(d)?;
    let mut items = Vec::new();

    while next_element(d, &mut remaining)? {
        items.push(decode_item(d)?);
    }

    Ok(items)
}

/// Items of an array along with the framing they were read with.
fn decode_framed<T, F>(d: &mut Decoder<'_>, decode_item: F) -> Result<(Vec<T>, Framing), Error>
where
    F: FnMut(&mut Decoder<'_>) -> Result<T, Error>,
{
    let definite = d.datatype()? == Type::Array;
    let items = decode_array(d, decode_item)?;
    let framing = Framing::of(definite, items.len());

    Ok((items, framing))
}

/// Open an array of either framing. The returned length is `None` for
/// indefinite arrays and is meant to be driven by [`next_element`].
pub(crate) fn begin_array(d: &mut Decoder<'_>) -> Result<Option<u64>, Error> {
    match d.datatype()? {
        Type::Array | Type::ArrayIndef => Ok(d.array()?),
        datatype => Err(Error::unexpected("array", describe(datatype))),
    }
}

/// Length of an array that must be definite, as ledger structures are.
pub(crate) fn definite_array(d: &mut Decoder<'_>) -> Result<u64, Error> {
    match d.datatype()? {
        Type::Array => Ok(d.array()?.unwrap_or_default()),
        Type::ArrayIndef => Err(Error::unexpected("definite array", "indefinite array")),
        datatype => Err(Error::unexpected("array", describe(datatype))),
    }
}

pub(crate) fn begin_map(d: &mut Decoder<'_>) -> Result<Option<u64>, Error> {
    match d.datatype()? {
        Type::Map | Type::MapIndef => Ok(d.map()?),
        datatype => Err(Error::unexpected("map", describe(datatype))),
    }
}

/// Whether another element follows in the current array or map. Consumes the
/// closing break of indefinite containers.
pub(crate) fn next_element(
    d: &mut Decoder<'_>,
    remaining: &mut Option<u64>,
) -> Result<bool, Error> {
    match remaining {
        Some(0) => Ok(false),
        Some(n) => {
            *n -= 1;
            Ok(true)
        }
        None => {
            if d.datatype()? == Type::Break {
                d.set_position(d.position() + 1);
                Ok(false)
            } else {
                Ok(true)
            }
        }
    }
}

pub(crate) fn decode_integer(d: &mut Decoder<'_>) -> Result<BigInt, Error> {
    match d.datatype()? {
        Type::U8
        | Type::U16
        | Type::U32
        | Type::U64
        | Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Int => Ok(BigInt::from(i128::from(d.int()?))),
        Type::Tag => match d.tag()? {
            Tag::PosBignum => Ok(BigInt::from_bytes_be(Sign::Plus, &decode_bounded_bytes(d)?)),
            Tag::NegBignum => {
                let magnitude = BigInt::from_bytes_be(Sign::Plus, &decode_bounded_bytes(d)?);
                Ok(-magnitude - BigInt::from(1))
            }
            tag => Err(Error::unexpected("integer", format!("{tag:?}"))),
        },
        datatype => Err(Error::unexpected("integer", describe(datatype))),
    }
}

pub(crate) fn decode_unsigned(d: &mut Decoder<'_>) -> Result<u64, Error> {
    match d.datatype()? {
        Type::U8 | Type::U16 | Type::U32 | Type::U64 => Ok(d.u64()?),
        datatype => Err(Error::unexpected("unsigned integer", describe(datatype))),
    }
}

/// Bytes of Plutus data, where no segment may exceed 64 bytes.
pub(crate) fn decode_bounded_bytes(d: &mut Decoder<'_>) -> Result<Vec<u8>, Error> {
    decode_bytes_within(d, BOUNDED_BYTES_CHUNK_SIZE)
}

/// Bytes of ledger structures, of any length.
pub(crate) fn decode_bytes(d: &mut Decoder<'_>) -> Result<Vec<u8>, Error> {
    decode_bytes_within(d, usize::MAX)
}

fn decode_bytes_within(d: &mut Decoder<'_>, limit: usize) -> Result<Vec<u8>, Error> {
    match d.datatype()? {
        Type::Bytes => Ok(bounded(d.bytes()?, limit)?.to_vec()),
        Type::BytesIndef => {
            let mut bytes = Vec::new();
            for chunk in d.bytes_iter()? {
                bytes.extend_from_slice(bounded(chunk?, limit)?);
            }
            Ok(bytes)
        }
        datatype => Err(Error::unexpected("bytes", describe(datatype))),
    }
}

fn bounded(segment: &[u8], limit: usize) -> Result<&[u8], Error> {
    if segment.len() > limit {
        return Err(Error::unexpected(
            format!("a byte string of at most {limit} bytes"),
            format!("{} bytes", segment.len()),
        ));
    }

    Ok(segment)
}

pub(crate) fn describe(datatype: Type) -> &'static str {
    match datatype {
        Type::U8
        | Type::U16
        | Type::U32
        | Type::U64
        | Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Int => "integer",
        Type::Bytes | Type::BytesIndef => "bytes",
        Type::String | Type::StringIndef => "text",
        Type::Array | Type::ArrayIndef => "array",
        Type::Map | Type::MapIndef => "map",
        Type::Tag => "tag",
        Type::Break => "break",
        _ => "unsupported item",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;

    fn encoded(datum: &Datum) -> String {
        hex::encode(to_vec(datum).unwrap())
    }

    fn record(constructor: u64, fields: Vec<Annotated<Data>>) -> Data {
        Constructor::new(constructor, fields).into()
    }

    #[test]
    fn empty_record_is_definite() {
        assert_eq!(encoded(&Datum::constr(0, vec![])), "d87980");
        assert_eq!(encoded(&Datum::constr(9, vec![])), "d9050280");
    }

    #[test]
    fn non_empty_record_is_indefinite() {
        assert_eq!(encoded(&Datum::constr(1, vec![42.into()])), "d87a9f182aff");
    }

    #[test]
    fn general_tag() {
        assert_eq!(encoded(&Datum::constr(128, vec![])), "d86682188080");
        assert_eq!(encoded(&Datum::constr(130, vec![1.into()])), "d8668218829f01ff");
    }

    #[test]
    fn list_framing() {
        assert_eq!(encoded(&Datum::List(vec![])), "80");
        assert_eq!(encoded(&Datum::List(vec![1.into()])), "9f01ff");
        assert_eq!(encoded(&Datum::IndefiniteList(vec![])), "9fff");
        assert_eq!(encoded(&Datum::IndefiniteList(vec![1.into()])), "9f01ff");
    }

    #[test]
    fn map_keeps_insertion_order() {
        let map = Datum::Map(vec![(2.into(), 20.into()), (1.into(), 10.into())]);
        assert_eq!(encoded(&map), "a20214010a");
    }

    #[test]
    fn big_integers() {
        let two_64 = BigInt::from(u64::MAX) + BigInt::from(1);

        assert_eq!(
            encoded(&Datum::Integer(two_64.clone())),
            "c249010000000000000000"
        );
        assert_eq!(encoded(&Datum::Integer(-two_64.clone())), "3bffffffffffffffff");
        assert_eq!(
            encoded(&Datum::Integer(-two_64.clone() - BigInt::from(1))),
            "c349010000000000000000"
        );

        for n in [
            two_64.clone(),
            -two_64.clone(),
            -two_64 - BigInt::from(1),
            BigInt::from(i64::MIN),
        ] {
            let bytes = to_vec(&Datum::Integer(n.clone())).unwrap();
            assert_eq!(decode(&bytes, &Data::Integer).unwrap(), Datum::Integer(n));
        }
    }

    #[test]
    fn long_bytes_are_chunked() {
        let bytes = vec![0xab; 65];
        let encoded = to_vec(&Datum::Bytes(bytes.clone())).unwrap();

        assert_eq!(encoded[0], 0x5f);
        assert_eq!(&encoded[1..3], &[0x58, 0x40]);
        assert_eq!(encoded[encoded.len() - 1], 0xff);
        assert_eq!(decode(&encoded, &Data::Bytes).unwrap(), Datum::Bytes(bytes));
    }

    #[test]
    fn opaque_keeps_framing() {
        for input in [
            "d8798101",
            "d8799fff",
            "d86682188a8101",
            "820102",
            "9fff",
            "80",
            "bf0102ff",
            "bfff",
            "a0",
            "5f42cafeff",
            "5fff",
            "9fbf0102ff5f4101ffff",
        ] {
            let decoded = decode(&hex::decode(input).unwrap(), &Data::Opaque).unwrap();
            assert_eq!(encoded(&decoded), input);
        }
    }

    #[test]
    fn opaque_framings() {
        let decode_hex = |input: &str| decode(&hex::decode(input).unwrap(), &Data::Opaque).unwrap();

        assert_eq!(
            decode_hex("d8798101"),
            Datum::Constr(Record::new(0, vec![1.into()]).with_framing(Framing::Definite))
        );
        assert_eq!(decode_hex("d8799f01ff"), Datum::constr(0, vec![1.into()]));
        assert_eq!(decode_hex("820102"), Datum::DefiniteList(vec![1.into(), 2.into()]));
        assert_eq!(decode_hex("bf0102ff"), Datum::IndefiniteMap(vec![(1.into(), 2.into())]));
        assert_eq!(decode_hex("5f42cafeff"), Datum::Chunks(vec![vec![0xca, 0xfe]]));
    }

    #[test]
    fn schema_normalizes_framing() {
        let schema = Data::map(Data::Integer, Data::list(Data::Integer));
        let decoded = decode(&hex::decode("bf01820203ff").unwrap(), &schema).unwrap();

        assert_eq!(
            decoded,
            Datum::Map(vec![(1.into(), Datum::List(vec![2.into(), 3.into()]))])
        );
        assert_eq!(encoded(&decoded), "a1019f0203ff");
    }

    #[test]
    fn decode_oversized_bytes() {
        let mut bytes = vec![0x58, 0x41];
        bytes.extend([0xab; 65]);

        let err = decode(&bytes, &Data::Opaque).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structure);
        assert_eq!(
            err.to_string(),
            "Expected a byte string of at most 64 bytes, found 65 bytes."
        );
        assert!(decode(&bytes, &Data::Bytes).is_err());
    }

    #[test]
    fn decode_unknown_tag() {
        let err = decode(&hex::decode("d9057980").unwrap(), &record(0, vec![])).unwrap_err();
        assert!(matches!(err, Error::UnknownTag { tag: 1401 }));

        let err = decode(&hex::decode("d87880").unwrap(), &Data::Opaque).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structure);
    }

    #[test]
    fn decode_constructor_mismatch() {
        let err = decode(&hex::decode("d87a80").unwrap(), &record(0, vec![])).unwrap_err();
        assert!(matches!(
            err,
            Error::ConstructorMismatch {
                expected: 0,
                found: 1
            }
        ));
    }

    #[test]
    fn decode_arity_mismatch() {
        let schema = record(0, vec![Data::Integer.into()]);

        let err = decode(&hex::decode("d8799f0102ff").unwrap(), &schema).unwrap_err();
        assert!(matches!(
            err,
            Error::ArityMismatch {
                expected: 1,
                found: 2,
                ..
            }
        ));

        let err = decode(&hex::decode("d87980").unwrap(), &schema).unwrap_err();
        assert!(matches!(
            err,
            Error::ArityMismatch {
                expected: 1,
                found: 0,
                ..
            }
        ));
    }

    #[test]
    fn decode_accepts_both_framings() {
        let schema = record(0, vec![Data::Integer.into()]);
        let expected = Datum::constr(0, vec![1.into()]);

        assert_eq!(decode(&hex::decode("d8799f01ff").unwrap(), &schema).unwrap(), expected);
        assert_eq!(decode(&hex::decode("d8798101").unwrap(), &schema).unwrap(), expected);
    }

    #[test]
    fn decode_wrong_shape() {
        let schema = record(0, vec![Data::list(Data::Integer).into()]);

        let err = decode(&hex::decode("d8799fa0ff").unwrap(), &schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structure);
        assert_eq!(err.to_string(), "Expected array, found map.");
    }

    #[test]
    fn decode_malformed_general_constr() {
        let err = decode(&hex::decode("d86683010203").unwrap(), &Data::Opaque).unwrap_err();
        assert!(matches!(err, Error::MalformedGeneralConstr { .. }));

        let err = decode(&hex::decode("d866a0").unwrap(), &Data::Opaque).unwrap_err();
        assert!(matches!(err, Error::MalformedGeneralConstr { .. }));
    }

    #[test]
    fn decode_trailing_bytes() {
        let err = decode(&hex::decode("d8798000").unwrap(), &record(0, vec![])).unwrap_err();
        assert!(matches!(err, Error::TrailingBytes { remaining: 1 }));
    }

    #[test]
    fn decode_names_unmatched_field() {
        let schema = record(
            0,
            vec![Annotated::titled(
                "choice",
                Data::any_of([Constructor::new(1, vec![]), Constructor::new(2, vec![])]),
            )],
        );

        let err = decode(&hex::decode("d8799fd87c80ff").unwrap(), &schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structure);
        assert_eq!(
            err.to_string(),
            "No alternative among constructors [1, 2] matches field 'choice'."
        );
    }

    #[test]
    fn polymorphic_first_match_wins() {
        let first = Constructor::new(0, vec![Annotated::titled("a", Data::Bytes)]);
        let second = Constructor::new(0, vec![Annotated::titled("b", Data::Integer)]);
        let schema = Data::any_of([first, second]);

        let decoded = decode(&hex::decode("d8799f01ff").unwrap(), &schema).unwrap();
        assert_eq!(decoded, Datum::constr(0, vec![1.into()]));
    }

    #[test]
    fn encode_checks_types() {
        let schema = record(0, vec![Data::Integer.into()]);
        let err = encode(&Datum::constr(0, vec![vec![1u8].into()]), &schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }
}
