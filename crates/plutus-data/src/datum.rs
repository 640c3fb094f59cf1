use crate::error::Error;
use num_bigint::BigInt;

/// A Plutus Data value.
///
/// Variants holding the same kind of elements only differ by their wire
/// framing and render the same way in JSON. Schemas only ever produce
/// `List`, `IndefiniteList`, `Map` and `Bytes`; the other framings come from
/// data read without a schema, so that it encodes back to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Datum {
    Integer(BigInt),
    Bytes(Vec<u8>),
    /// An indefinite byte string made of exactly these chunks.
    Chunks(Vec<Vec<u8>>),
    List(Vec<Datum>),
    IndefiniteList(Vec<Datum>),
    /// A definite array, even when non-empty.
    DefiniteList(Vec<Datum>),
    /// Entries in insertion order.
    Map(Vec<(Datum, Datum)>),
    IndefiniteMap(Vec<(Datum, Datum)>),
    Constr(Record),
}

/// How an array is delimited on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Framing {
    /// Definite when empty, indefinite otherwise.
    #[default]
    Canonical,
    Definite,
    Indefinite,
}

impl Framing {
    /// The framing an array was read with, given its length.
    pub fn of(definite: bool, len: usize) -> Self {
        match (definite, len) {
            (true, 0) => Framing::Canonical,
            (true, _) => Framing::Definite,
            (false, 0) => Framing::Indefinite,
            (false, _) => Framing::Canonical,
        }
    }
}

/// A constructor applied to its fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Record {
    pub constructor: u64,
    pub fields: Vec<Datum>,
    pub framing: Framing,
}

impl Record {
    pub fn new(constructor: u64, fields: Vec<Datum>) -> Self {
        Record {
            constructor,
            fields,
            framing: Framing::Canonical,
        }
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }
}

impl Datum {
    pub fn constr(constructor: u64, fields: Vec<Datum>) -> Self {
        Datum::Constr(Record::new(constructor, fields))
    }

    /// Short human-readable description of the value's kind, for diagnostics.
    pub fn kind(&self) -> String {
        match self {
            Datum::Integer(..) => "integer".to_string(),
            Datum::Bytes(..) => "bytes".to_string(),
            Datum::Chunks(..) => "chunked bytes".to_string(),
            Datum::List(..) => "list".to_string(),
            Datum::IndefiniteList(..) => "indefinite list".to_string(),
            Datum::DefiniteList(..) => "definite list".to_string(),
            Datum::Map(..) => "map".to_string(),
            Datum::IndefiniteMap(..) => "indefinite map".to_string(),
            Datum::Constr(record) => format!("constructor {}", record.constructor),
        }
    }

    pub fn into_integer(self) -> Result<BigInt, Error> {
        match self {
            Datum::Integer(n) => Ok(n),
            other => Err(Error::unexpected("integer", other.kind())),
        }
    }

    /// Integer narrowed to a machine type.
    pub fn into_int<T: TryFrom<BigInt>>(self) -> Result<T, Error> {
        let n = self.into_integer()?;
        let shown = n.to_string();
        T::try_from(n).map_err(|_| {
            Error::unexpected(
                format!("integer fitting {}", std::any::type_name::<T>()),
                shown,
            )
        })
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, Error> {
        match self {
            Datum::Bytes(bytes) => Ok(bytes),
            Datum::Chunks(chunks) => Ok(chunks.concat()),
            other => Err(Error::unexpected("bytes", other.kind())),
        }
    }

    /// Elements of a list, whatever its framing.
    pub fn into_list(self) -> Result<Vec<Datum>, Error> {
        match self {
            Datum::List(items) | Datum::IndefiniteList(items) | Datum::DefiniteList(items) => {
                Ok(items)
            }
            other => Err(Error::unexpected("list", other.kind())),
        }
    }

    /// Entries of a map, whatever its framing.
    pub fn into_map(self) -> Result<Vec<(Datum, Datum)>, Error> {
        match self {
            Datum::Map(entries) | Datum::IndefiniteMap(entries) => Ok(entries),
            other => Err(Error::unexpected("map", other.kind())),
        }
    }

    pub fn into_record(self) -> Result<Record, Error> {
        match self {
            Datum::Constr(record) => Ok(record),
            other => Err(Error::unexpected("constructor", other.kind())),
        }
    }

    /// Fields of a record built with the given constructor, as a fixed-size
    /// array so that callers can destructure them.
    pub fn into_fields<const N: usize>(self, constructor: u64) -> Result<[Datum; N], Error> {
        let record = self.into_record()?;

        if record.constructor != constructor {
            return Err(Error::ConstructorMismatch {
                expected: constructor,
                found: record.constructor,
            });
        }

        record
            .fields
            .try_into()
            .map_err(|fields: Vec<Datum>| Error::ArityMismatch {
                constructor,
                expected: N,
                found: fields.len(),
            })
    }
}

macro_rules! integer_conversions {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Datum {
                fn from(n: $t) -> Self {
                    Datum::Integer(BigInt::from(n))
                }
            }
        )*
    };
}

integer_conversions!(i32, i64, i128, u32, u64, usize);

impl From<BigInt> for Datum {
    fn from(n: BigInt) -> Self {
        Datum::Integer(n)
    }
}

impl From<Vec<u8>> for Datum {
    fn from(bytes: Vec<u8>) -> Self {
        Datum::Bytes(bytes)
    }
}

impl From<&[u8]> for Datum {
    fn from(bytes: &[u8]) -> Self {
        Datum::Bytes(bytes.to_vec())
    }
}

impl From<Record> for Datum {
    fn from(record: Record) -> Self {
        Datum::Constr(record)
    }
}
