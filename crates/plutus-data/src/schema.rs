use crate::{
    datum::{Datum, Record},
    error::Error,
};
use std::{
    fmt::{self, Display},
    iter,
};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Annotated<T> {
    pub title: Option<String>,
    pub description: Option<String>,
    pub annotated: T,
}

/// A schema for Plutus' Data.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Data {
    Integer,
    Bytes,
    /// A list framed by its length: definite when empty, indefinite otherwise.
    List(Box<Data>),
    /// A list that is always framed as an indefinite array.
    IndefiniteList(Box<Data>),
    Map(Box<Data>, Box<Data>),
    /// A nested record when there is a single constructor, a polymorphic field
    /// otherwise. Alternatives are tried in order when decoding.
    AnyOf(Vec<Annotated<Constructor>>),
    /// Any Plutus data, decoded without a schema.
    Opaque,
}

/// Captures a single constructor with its ordered fields.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Constructor {
    pub index: u64,
    pub fields: Vec<Annotated<Data>>,
}

impl<T> From<T> for Annotated<T> {
    fn from(annotated: T) -> Self {
        Annotated {
            title: None,
            description: None,
            annotated,
        }
    }
}

impl<T> Annotated<T> {
    pub fn titled(title: impl Into<String>, annotated: T) -> Self {
        Annotated {
            title: Some(title.into()),
            description: None,
            annotated,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl Constructor {
    pub fn new(index: u64, fields: Vec<Annotated<Data>>) -> Self {
        Constructor { index, fields }
    }

    /// Append a titled field.
    pub fn field(mut self, title: impl Into<String>, data: Data) -> Self {
        self.fields.push(Annotated::titled(title, data));
        self
    }

    fn validate(&self, record: &Record) -> Result<(), Error> {
        if self.index != record.constructor {
            return Err(Error::mismatch(
                format!("constructor {}", self.index),
                format!("constructor {}", record.constructor),
            ));
        }

        if self.fields.len() != record.fields.len() {
            return Err(Error::mismatch(
                format!("{} field(s) for constructor {}", self.fields.len(), self.index),
                format!("{} field(s)", record.fields.len()),
            ));
        }

        for (field, value) in iter::zip(&self.fields, &record.fields) {
            field.annotated.validate(value)?;
        }

        Ok(())
    }
}

impl From<Constructor> for Data {
    fn from(constructor: Constructor) -> Self {
        Data::AnyOf(vec![constructor.into()])
    }
}

impl From<Annotated<Constructor>> for Data {
    fn from(constructor: Annotated<Constructor>) -> Self {
        Data::AnyOf(vec![constructor])
    }
}

impl Data {
    pub fn list(item: Data) -> Self {
        Data::List(Box::new(item))
    }

    pub fn indefinite_list(item: Data) -> Self {
        Data::IndefiniteList(Box::new(item))
    }

    pub fn map(keys: Data, values: Data) -> Self {
        Data::Map(Box::new(keys), Box::new(values))
    }

    /// A polymorphic field over the given constructors, tried in order.
    pub fn any_of<I>(constructors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Annotated<Constructor>>,
    {
        Data::AnyOf(constructors.into_iter().map(Into::into).collect())
    }

    /// Check that a value fits this schema before it gets encoded.
    ///
    /// List framings are not interchangeable: a value built as a default list
    /// does not fit an indefinite list schema and vice versa.
    pub fn validate(&self, datum: &Datum) -> Result<(), Error> {
        match (self, datum) {
            (Data::Opaque, _)
            | (Data::Integer, Datum::Integer(..))
            | (Data::Bytes, Datum::Bytes(..)) => Ok(()),

            (Data::List(item), Datum::List(items))
            | (Data::IndefiniteList(item), Datum::IndefiniteList(items)) => {
                items.iter().try_for_each(|datum| item.validate(datum))
            }

            (Data::Map(keys, values), Datum::Map(entries)) => {
                for (k, v) in entries {
                    keys.validate(k)?;
                    values.validate(v)?;
                }

                Ok(())
            }

            (Data::AnyOf(alternatives), Datum::Constr(record)) => {
                validate_alternatives(alternatives, record)
            }

            (schema, datum) => Err(Error::mismatch(schema, datum.kind())),
        }
    }

    pub fn matches(&self, datum: &Datum) -> bool {
        self.validate(datum).is_ok()
    }
}

fn validate_alternatives(
    alternatives: &[Annotated<Constructor>],
    record: &Record,
) -> Result<(), Error> {
    if let [single] = alternatives {
        return single.annotated.validate(record);
    }

    if alternatives
        .iter()
        .any(|alternative| alternative.annotated.validate(record).is_ok())
    {
        return Ok(());
    }

    Err(Error::mismatch(
        Data::AnyOf(alternatives.to_vec()),
        format!(
            "constructor {} with {} field(s)",
            record.constructor,
            record.fields.len()
        ),
    ))
}

impl Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Data::Integer => write!(f, "integer"),
            Data::Bytes => write!(f, "bytes"),
            Data::List(item) => write!(f, "list<{item}>"),
            Data::IndefiniteList(item) => write!(f, "indefinite list<{item}>"),
            Data::Map(keys, values) => write!(f, "map<{keys}, {values}>"),
            Data::AnyOf(alternatives) => match &alternatives[..] {
                [single] => write!(f, "constructor {}", single.annotated.index),
                _ => {
                    let indices = alternatives
                        .iter()
                        .map(|alternative| alternative.annotated.index.to_string())
                        .collect::<Vec<_>>();
                    write!(f, "any of constructors [{}]", indices.join(", "))
                }
            },
            Data::Opaque => write!(f, "data"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;

    fn pair() -> Constructor {
        Constructor::new(0, vec![])
            .field("left", Data::Integer)
            .field("right", Data::Bytes)
    }

    #[test]
    fn validate_primitives() {
        assert!(Data::Integer.matches(&Datum::from(42)));
        assert!(Data::Bytes.matches(&Datum::from(vec![0x00u8])));
        assert!(Data::Opaque.matches(&Datum::from(vec![0x00u8])));
        assert!(!Data::Integer.matches(&Datum::from(vec![0x00u8])));
    }

    #[test]
    fn validate_record() {
        let ok = Datum::Constr(Record::new(0, vec![1.into(), vec![2u8].into()]));
        assert!(Data::from(pair()).matches(&ok));

        let swapped = Datum::Constr(Record::new(0, vec![vec![2u8].into(), 1.into()]));
        let err = Data::from(pair()).validate(&swapped).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(
            err.to_string(),
            "Type mismatch: expected integer, found bytes."
        );
    }

    #[test]
    fn validate_wrong_constructor() {
        let other = Datum::Constr(Record::new(1, vec![1.into(), vec![2u8].into()]));
        let err = Data::from(pair()).validate(&other).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn list_framings_are_distinct() {
        let items = vec![Datum::from(1)];
        assert!(Data::list(Data::Integer).matches(&Datum::List(items.clone())));
        assert!(!Data::list(Data::Integer).matches(&Datum::IndefiniteList(items.clone())));
        assert!(Data::indefinite_list(Data::Integer).matches(&Datum::IndefiniteList(items)));
    }

    #[test]
    fn validate_any_of() {
        let schema = Data::any_of([
            Constructor::new(8, vec![Data::Integer.into()]),
            Constructor::new(9, vec![]),
        ]);

        assert!(schema.matches(&Datum::Constr(Record::new(9, vec![]))));
        assert!(schema.matches(&Datum::Constr(Record::new(8, vec![1.into()]))));
        assert!(!schema.matches(&Datum::Constr(Record::new(8, vec![]))));
        assert!(!schema.matches(&Datum::Constr(Record::new(7, vec![]))));

        let titled = Data::any_of([
            Annotated::titled("Some", Constructor::new(0, vec![Data::Opaque.into()])),
            Annotated::titled("None", Constructor::new(1, vec![])),
        ]);

        assert_eq!(titled.to_string(), "any of constructors [0, 1]");
        assert!(titled.matches(&Datum::Constr(Record::new(1, vec![]))));
    }

    #[test]
    fn display() {
        assert_eq!(
            Data::map(Data::Integer, Data::list(Data::Bytes)).to_string(),
            "map<integer, list<bytes>>"
        );
        assert_eq!(
            Data::any_of([pair(), Constructor::new(3, vec![])]).to_string(),
            "any of constructors [0, 3]"
        );
    }
}
