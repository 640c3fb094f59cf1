use crate::{cbor, datum::Datum, error::Error, IsData};
use pallas_codec::minicbor::{
    decode,
    encode::{self, Write},
    Decode, Decoder, Encode, Encoder,
};

/// What a redeemer is spent for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedeemerTag {
    #[default]
    Spend,
    Mint,
    Cert,
    Reward,
}

impl RedeemerTag {
    pub fn code(&self) -> u64 {
        match self {
            RedeemerTag::Spend => 0,
            RedeemerTag::Mint => 1,
            RedeemerTag::Cert => 2,
            RedeemerTag::Reward => 3,
        }
    }
}

impl TryFrom<u64> for RedeemerTag {
    type Error = Error;

    fn try_from(code: u64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RedeemerTag::Spend),
            1 => Ok(RedeemerTag::Mint),
            2 => Ok(RedeemerTag::Cert),
            3 => Ok(RedeemerTag::Reward),
            _ => Err(Error::UnknownCode {
                what: "redeemer tag",
                code,
            }),
        }
    }
}

/// Execution budget granted to a script.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExUnits {
    pub mem: u64,
    pub steps: u64,
}

impl ExUnits {
    pub fn new(mem: u64, steps: u64) -> Self {
        ExUnits { mem, steps }
    }
}

impl<C> Encode<C> for ExUnits {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        e.array(2)?.u64(self.mem)?.u64(self.steps)?;

        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for ExUnits {
    fn decode(d: &mut Decoder<'b>, _ctx: &mut C) -> Result<Self, decode::Error> {
        match d.array()? {
            Some(2) => Ok(ExUnits {
                mem: d.u64()?,
                steps: d.u64()?,
            }),
            _ => Err(decode::Error::message(
                "execution units must be a definite array of two unsigned integers",
            )),
        }
    }
}

/// Datum handed to a script along with its purpose and budget.
///
/// The purpose defaults to spending the input at index 0 and may be assigned
/// any time before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redeemer<T> {
    pub tag: RedeemerTag,
    pub index: u64,
    pub data: T,
    pub ex_units: ExUnits,
}

struct Snapshot<'a> {
    tag: RedeemerTag,
    index: u64,
    datum: &'a Datum,
    ex_units: ExUnits,
}

impl<'a, C> Encode<C> for Snapshot<'a> {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        e.array(4)?;
        e.u64(self.tag.code())?;
        e.u64(self.index)?;
        self.datum.encode(e, ctx)?;
        self.ex_units.encode(e, ctx)?;

        Ok(())
    }
}

impl<T: IsData> Redeemer<T> {
    pub fn new(data: T, ex_units: ExUnits) -> Self {
        Redeemer {
            tag: RedeemerTag::default(),
            index: 0,
            data,
            ex_units,
        }
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, Error> {
        let datum = self.data.to_datum();

        T::schema().validate(&datum)?;

        cbor::to_vec(&Snapshot {
            tag: self.tag,
            index: self.index,
            datum: &datum,
            ex_units: self.ex_units,
        })
    }

    pub fn to_cbor_hex(&self) -> Result<String, Error> {
        self.to_cbor().map(hex::encode)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, Error> {
        let mut d = Decoder::new(bytes);

        let len = cbor::definite_array(&mut d)?;
        if len != 4 {
            return Err(Error::LengthMismatch {
                what: "redeemer",
                expected: 4,
                found: len as usize,
            });
        }

        let tag = RedeemerTag::try_from(cbor::decode_unsigned(&mut d)?)?;
        let index = cbor::decode_unsigned(&mut d)?;
        let datum = cbor::decode_data(&mut d, &T::schema())?;
        let ex_units = d.decode()?;

        cbor::expect_end(&d, bytes)?;

        Ok(Redeemer {
            tag,
            index,
            data: T::from_datum(datum)?,
            ex_units,
        })
    }

    pub fn from_cbor_hex(text: &str) -> Result<Self, Error> {
        Self::from_cbor(&hex::decode(text.trim())?)
    }
}
