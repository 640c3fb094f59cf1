//! Stake certificates, as found in transaction bodies.

use crate::{cbor, error::Error};
use pallas_codec::minicbor::{
    encode::{self, Write},
    Decoder, Encode, Encoder,
};
use pallas_crypto::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeCredential {
    AddrKeyhash(Hash<28>),
    Script(Hash<28>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeRegistration {
    pub stake_credential: StakeCredential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeDeregistration {
    pub stake_credential: StakeCredential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeDelegation {
    pub stake_credential: StakeCredential,
    pub pool_keyhash: Hash<28>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Certificate {
    StakeRegistration(StakeRegistration),
    StakeDeregistration(StakeDeregistration),
    StakeDelegation(StakeDelegation),
}

impl StakeCredential {
    pub fn code(&self) -> u64 {
        match self {
            StakeCredential::AddrKeyhash(..) => 0,
            StakeCredential::Script(..) => 1,
        }
    }

    pub fn hash(&self) -> &Hash<28> {
        match self {
            StakeCredential::AddrKeyhash(hash) | StakeCredential::Script(hash) => hash,
        }
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, Error> {
        cbor::to_vec(self)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, Error> {
        cbor::decode_whole(bytes, StakeCredential::decode)
    }

    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        expect_len(d, "stake credential", 2)?;

        match cbor::decode_unsigned(d)? {
            0 => Ok(StakeCredential::AddrKeyhash(decode_hash(d)?)),
            1 => Ok(StakeCredential::Script(decode_hash(d)?)),
            code => Err(Error::UnknownCode {
                what: "stake credential",
                code,
            }),
        }
    }
}

impl<C> Encode<C> for StakeCredential {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        e.array(2)?.u64(self.code())?.bytes(&self.hash()[..])?;

        Ok(())
    }
}

impl Certificate {
    pub fn code(&self) -> u64 {
        match self {
            Certificate::StakeRegistration(..) => 0,
            Certificate::StakeDeregistration(..) => 1,
            Certificate::StakeDelegation(..) => 2,
        }
    }

    pub fn stake_credential(&self) -> &StakeCredential {
        match self {
            Certificate::StakeRegistration(StakeRegistration { stake_credential })
            | Certificate::StakeDeregistration(StakeDeregistration { stake_credential })
            | Certificate::StakeDelegation(StakeDelegation {
                stake_credential, ..
            }) => stake_credential,
        }
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, Error> {
        cbor::to_vec(self)
    }

    pub fn to_cbor_hex(&self) -> Result<String, Error> {
        self.to_cbor().map(hex::encode)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, Error> {
        cbor::decode_whole(bytes, Certificate::decode)
    }

    pub fn from_cbor_hex(text: &str) -> Result<Self, Error> {
        Self::from_cbor(&hex::decode(text.trim())?)
    }

    fn decode(d: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = cbor::definite_array(d)?;
        let code = cbor::decode_unsigned(d)?;

        let expected = match code {
            0 | 1 => 2,
            2 => 3,
            _ => {
                return Err(Error::UnknownCode {
                    what: "certificate",
                    code,
                })
            }
        };

        if len != expected {
            return Err(Error::LengthMismatch {
                what: "certificate",
                expected: expected as usize,
                found: len as usize,
            });
        }

        let stake_credential = StakeCredential::decode(d)?;

        Ok(match code {
            0 => Certificate::StakeRegistration(StakeRegistration { stake_credential }),
            1 => Certificate::StakeDeregistration(StakeDeregistration { stake_credential }),
            _ => Certificate::StakeDelegation(StakeDelegation {
                stake_credential,
                pool_keyhash: decode_hash(d)?,
            }),
        })
    }
}

impl<C> Encode<C> for Certificate {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        match self {
            Certificate::StakeRegistration(StakeRegistration { stake_credential })
            | Certificate::StakeDeregistration(StakeDeregistration { stake_credential }) => {
                e.array(2)?.u64(self.code())?;
                stake_credential.encode(e, ctx)?;
            }
            Certificate::StakeDelegation(StakeDelegation {
                stake_credential,
                pool_keyhash,
            }) => {
                e.array(3)?.u64(self.code())?;
                stake_credential.encode(e, ctx)?;
                e.bytes(&pool_keyhash[..])?;
            }
        }

        Ok(())
    }
}

impl From<StakeRegistration> for Certificate {
    fn from(certificate: StakeRegistration) -> Self {
        Certificate::StakeRegistration(certificate)
    }
}

impl From<StakeDeregistration> for Certificate {
    fn from(certificate: StakeDeregistration) -> Self {
        Certificate::StakeDeregistration(certificate)
    }
}

impl From<StakeDelegation> for Certificate {
    fn from(certificate: StakeDelegation) -> Self {
        Certificate::StakeDelegation(certificate)
    }
}

fn expect_len(d: &mut Decoder<'_>, what: &'static str, expected: u64) -> Result<(), Error> {
    match cbor::definite_array(d)? {
        len if len == expected => Ok(()),
        len => Err(Error::LengthMismatch {
            what,
            expected: expected as usize,
            found: len as usize,
        }),
    }
}

fn decode_hash(d: &mut Decoder<'_>) -> Result<Hash<28>, Error> {
    let bytes = cbor::decode_bytes(d)?;

    let digest: [u8; 28] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| Error::LengthMismatch {
            what: "hash",
            expected: 28,
            found: bytes.len(),
        })?;

    Ok(Hash::new(digest))
}
