//! The JSON mirror of Plutus Data, as used by the ledger's tooling:
//!
//! ```json
//! {"constructor": 0, "fields": [{"int": 42}, {"bytes": "cafe"}, {"list": []}, {"map": []}]}
//! ```
//!
//! Map entries are written value first (`{"v": .., "k": ..}`).

use crate::{
    datum::{Datum, Record},
    error::Error,
    schema::{Annotated, Constructor, Data},
};
use num_bigint::BigInt;
use serde::Serialize;
use serde_json::{
    ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer},
    Map, Number, Value,
};
use std::{io, str::FromStr};

const INT: &str = "int";
const BYTES: &str = "bytes";
const LIST: &str = "list";
const MAP: &str = "map";
const CONSTRUCTOR: &str = "constructor";
const FIELDS: &str = "fields";
const KEY: &str = "k";
const VALUE: &str = "v";

/// How JSON text gets laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separators {
    /// `,` and `:` with no whitespace at all.
    Compact,
    /// `, ` and `: ` on a single line.
    #[default]
    Default,
    /// Indented over multiple lines.
    Pretty,
}

/// Render a value as JSON text after checking it against its schema.
pub fn encode(datum: &Datum, schema: &Data, separators: Separators) -> Result<String, Error> {
    schema.validate(datum)?;

    to_string(&to_value(datum)?, separators)
}

/// Parse JSON text into a value of the given schema.
pub fn decode(text: &str, schema: &Data) -> Result<Datum, Error> {
    let value: Value = serde_json::from_str(text)?;

    if !value.is_object() {
        return Err(Error::Shape {
            found: kind(&value),
        });
    }

    from_value(&value, schema)
}

pub fn to_value(datum: &Datum) -> Result<Value, Error> {
    let value = match datum {
        Datum::Integer(n) => tagged(INT, Value::Number(number(n)?)),
        Datum::Bytes(bytes) => tagged(BYTES, Value::String(hex::encode(bytes))),
        Datum::Chunks(chunks) => tagged(BYTES, Value::String(hex::encode(chunks.concat()))),
        Datum::List(items) | Datum::IndefiniteList(items) | Datum::DefiniteList(items) => tagged(
            LIST,
            Value::Array(items.iter().map(to_value).collect::<Result<_, _>>()?),
        ),
        Datum::Map(entries) | Datum::IndefiniteMap(entries) => {
            let entries = entries
                .iter()
                .map(|(k, v)| {
                    let mut entry = Map::new();
                    entry.insert(VALUE.to_string(), to_value(v)?);
                    entry.insert(KEY.to_string(), to_value(k)?);
                    Ok(Value::Object(entry))
                })
                .collect::<Result<_, Error>>()?;

            tagged(MAP, Value::Array(entries))
        }
        Datum::Constr(Record {
            constructor,
            fields,
            ..
        }) => {
            let mut object = Map::new();
            object.insert(CONSTRUCTOR.to_string(), Value::from(*constructor));
            object.insert(
                FIELDS.to_string(),
                Value::Array(fields.iter().map(to_value).collect::<Result<_, _>>()?),
            );
            Value::Object(object)
        }
    };

    Ok(value)
}

pub fn from_value(value: &Value, schema: &Data) -> Result<Datum, Error> {
    match schema {
        Data::Integer => expect_integer(value).map(Datum::Integer),
        Data::Bytes => expect_bytes(value).map(Datum::Bytes),
        Data::List(item) => expect_list(value, item).map(Datum::List),
        Data::IndefiniteList(item) => expect_list(value, item).map(Datum::IndefiniteList),
        Data::Map(keys, values) => expect_map(value, keys, values).map(Datum::Map),
        Data::AnyOf(alternatives) => expect_alternatives(value, alternatives).map(Datum::Constr),
        Data::Opaque => from_opaque(value),
    }
}

fn number(n: &BigInt) -> Result<Number, Error> {
    Number::from_str(&n.to_string()).map_err(|err| Error::Encoding(err.to_string()))
}

fn tagged(key: &str, value: Value) -> Value {
    let mut object = Map::new();
    object.insert(key.to_string(), value);
    Value::Object(object)
}

fn field<'a>(value: &'a Value, key: &'static str) -> Result<&'a Value, Error> {
    match value {
        Value::Object(object) => object.get(key).ok_or_else(|| Error::MissingKey {
            expected: key,
            found: describe_keys(object),
        }),
        other => Err(Error::unexpected("an object", kind(other))),
    }
}

fn expect_integer(value: &Value) -> Result<BigInt, Error> {
    match field(value, INT)? {
        Value::Number(n) => {
            BigInt::from_str(&n.to_string()).map_err(|_| Error::unexpected("an integer", n))
        }
        other => Err(Error::unexpected("a number", kind(other))),
    }
}

fn expect_bytes(value: &Value) -> Result<Vec<u8>, Error> {
    match field(value, BYTES)? {
        Value::String(text) => Ok(hex::decode(text)?),
        other => Err(Error::unexpected("a hex string", kind(other))),
    }
}

fn expect_array<'a>(value: &'a Value, key: &'static str) -> Result<&'a [Value], Error> {
    match field(value, key)? {
        Value::Array(items) => Ok(items),
        other => Err(Error::unexpected("an array", kind(other))),
    }
}

fn expect_list(value: &Value, item: &Data) -> Result<Vec<Datum>, Error> {
    expect_array(value, LIST)?
        .iter()
        .map(|element| from_value(element, item))
        .collect()
}

fn expect_map(value: &Value, keys: &Data, values: &Data) -> Result<Vec<(Datum, Datum)>, Error> {
    expect_array(value, MAP)?
        .iter()
        .map(|entry| {
            let k = from_value(field(entry, KEY)?, keys)?;
            let v = from_value(field(entry, VALUE)?, values)?;
            Ok((k, v))
        })
        .collect()
}

fn expect_constructor(value: &Value) -> Result<u64, Error> {
    match field(value, CONSTRUCTOR)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| Error::unexpected("a constructor index", n)),
        other => Err(Error::unexpected("a constructor index", kind(other))),
    }
}

fn expect_record(value: &Value, constructor: &Constructor) -> Result<Record, Error> {
    let index = expect_constructor(value)?;

    if index != constructor.index {
        return Err(Error::ConstructorMismatch {
            expected: constructor.index,
            found: index,
        });
    }

    let values = expect_array(value, FIELDS)?;

    if values.len() != constructor.fields.len() {
        return Err(Error::ArityMismatch {
            constructor: index,
            expected: constructor.fields.len(),
            found: values.len(),
        });
    }

    let fields = values
        .iter()
        .zip(&constructor.fields)
        .map(|(value, field)| {
            from_value(value, &field.annotated).map_err(|err| err.in_field(field.title()))
        })
        .collect::<Result<_, _>>()?;

    Ok(Record::new(index, fields))
}

fn expect_alternatives(
    value: &Value,
    alternatives: &[Annotated<Constructor>],
) -> Result<Record, Error> {
    if let [single] = alternatives {
        return expect_record(value, &single.annotated);
    }

    for alternative in alternatives {
        match expect_record(value, &alternative.annotated) {
            Ok(record) => return Ok(record),
            Err(err) => {
                tracing::trace!(
                    constructor = alternative.annotated.index,
                    %err,
                    "alternative rejected"
                );
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

fn from_opaque(value: &Value) -> Result<Datum, Error> {
    let object = match value {
        Value::Object(object) => object,
        other => return Err(Error::unexpected("an object", kind(other))),
    };

    if object.contains_key(INT) {
        expect_integer(value).map(Datum::Integer)
    } else if object.contains_key(BYTES) {
        expect_bytes(value).map(Datum::Bytes)
    } else if object.contains_key(LIST) {
        expect_list(value, &Data::Opaque).map(Datum::List)
    } else if object.contains_key(MAP) {
        expect_map(value, &Data::Opaque, &Data::Opaque).map(Datum::Map)
    } else if object.contains_key(CONSTRUCTOR) {
        let constructor = expect_constructor(value)?;
        let fields = expect_array(value, FIELDS)?
            .iter()
            .map(from_opaque)
            .collect::<Result<_, _>>()?;
        Ok(Datum::constr(constructor, fields))
    } else {
        Err(Error::MissingKey {
            expected: "int|bytes|list|map|constructor",
            found: describe_keys(object),
        })
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(..) => "a boolean",
        Value::Number(..) => "a number",
        Value::String(..) => "a string",
        Value::Array(..) => "an array",
        Value::Object(..) => "an object",
    }
}

fn describe_keys(object: &Map<String, Value>) -> String {
    let keys = object.keys().map(String::as_str).collect::<Vec<_>>();
    format!("an object with keys [{}]", keys.join(", "))
}

pub fn to_string(value: &Value, separators: Separators) -> Result<String, Error> {
    match separators {
        Separators::Compact => write_with(value, CompactFormatter),
        Separators::Default => write_with(value, SpacedFormatter),
        Separators::Pretty => write_with(value, PrettyFormatter::new()),
    }
}

fn write_with<F: Formatter>(value: &Value, formatter: F) -> Result<String, Error> {
    let mut serializer = Serializer::with_formatter(Vec::new(), formatter);

    value
        .serialize(&mut serializer)
        .map_err(|err| Error::Encoding(err.to_string()))?;

    String::from_utf8(serializer.into_inner()).map_err(|err| Error::Encoding(err.to_string()))
}

/// Single-line output with a space after every separator.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}
