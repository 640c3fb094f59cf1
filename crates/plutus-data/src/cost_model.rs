//! Script execution cost parameters, as agreed on by the ledger.

use crate::{cbor, error::Error, language::Language};
use once_cell::sync::Lazy;
use pallas_codec::minicbor::{
    encode::{self, Write},
    Decoder, Encode, Encoder,
};
use std::collections::BTreeMap;

/// Cost models known to this build, one per supported language.
pub static COST_MODELS: Lazy<CostModels> = Lazy::new(|| {
    let models = CostModels::from_iter([CostModel::plutus_v1()]);

    tracing::debug!(languages = models.len(), "cost models initialized");

    models
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostModel {
    language: Language,
    parameters: Vec<(&'static str, i64)>,
}

impl CostModel {
    pub fn plutus_v1() -> Self {
        CostModel {
            language: Language::PlutusV1,
            parameters: PLUTUS_V1.to_vec(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Parameters in the ledger's order, i.e. sorted by name.
    pub fn parameters(&self) -> &[(&'static str, i64)] {
        &self.parameters
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.parameters
            .iter()
            .find(|(parameter, _)| *parameter == name)
            .map(|(_, value)| *value)
    }

    pub fn values(&self) -> Vec<i64> {
        self.parameters.iter().map(|(_, value)| *value).collect()
    }

    fn from_values(language: Language, values: Vec<i64>) -> Result<Self, Error> {
        let names = parameter_names(language).ok_or(Error::UnknownCode {
            what: "cost model language",
            code: language.id(),
        })?;

        if names.len() != values.len() {
            return Err(Error::LengthMismatch {
                what: "cost model",
                expected: names.len(),
                found: values.len(),
            });
        }

        Ok(CostModel {
            language,
            parameters: names.iter().copied().zip(values).collect(),
        })
    }
}

/// Parameter names of the languages that have a cost model.
fn parameter_names(language: Language) -> Option<Vec<&'static str>> {
    match language {
        Language::PlutusV1 => Some(PLUTUS_V1.iter().map(|(name, _)| *name).collect()),
        Language::PlutusV2 => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CostModels(BTreeMap<Language, CostModel>);

impl FromIterator<CostModel> for CostModels {
    fn from_iter<I: IntoIterator<Item = CostModel>>(models: I) -> Self {
        CostModels(
            models
                .into_iter()
                .map(|model| (model.language, model))
                .collect(),
        )
    }
}

impl CostModels {
    pub fn get(&self, language: Language) -> Option<&CostModel> {
        self.0.get(&language)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CostModel> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize as the ledger's language view: a map from the encoded
    /// language id to the encoded list of parameters, both wrapped in byte
    /// strings.
    pub fn to_cbor(&self) -> Result<Vec<u8>, Error> {
        let entries = self
            .iter()
            .map(|model| {
                Ok((
                    cbor::to_vec(&model.language.id())?,
                    cbor::to_vec(&Values(model.values()))?,
                ))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        cbor::to_vec(&LanguageView(entries))
    }

    pub fn to_cbor_hex(&self) -> Result<String, Error> {
        self.to_cbor().map(hex::encode)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, Error> {
        let mut d = Decoder::new(bytes);
        let mut remaining = cbor::begin_map(&mut d)?;
        let mut models = BTreeMap::new();

        while cbor::next_element(&mut d, &mut remaining)? {
            let key = cbor::decode_bytes(&mut d)?;
            let value = cbor::decode_bytes(&mut d)?;

            let id = cbor::decode_whole(&key, cbor::decode_unsigned)?;
            let language = Language::from_id(id).ok_or(Error::UnknownCode {
                what: "cost model language",
                code: id,
            })?;

            let values = cbor::decode_whole(&value, decode_values)?;

            let model = CostModel::from_values(language, values)?;

            if models.insert(language, model).is_some() {
                return Err(Error::DuplicateCode {
                    what: "cost model language",
                    code: id,
                });
            }
        }

        cbor::expect_end(&d, bytes)?;

        Ok(CostModels(models))
    }
}

fn decode_values(d: &mut Decoder<'_>) -> Result<Vec<i64>, Error> {
    let mut remaining = cbor::begin_array(d)?;
    let mut values = Vec::new();

    while cbor::next_element(d, &mut remaining)? {
        values.push(d.i64()?);
    }

    Ok(values)
}

struct Values(Vec<i64>);

impl<C> Encode<C> for Values {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        cbor::encode_list(&self.0, e, ctx)
    }
}

struct LanguageView(Vec<(Vec<u8>, Vec<u8>)>);

impl<C> Encode<C> for LanguageView {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        e.map(self.0.len() as u64)?;

        for (key, value) in &self.0 {
            e.bytes(key)?;
            e.bytes(value)?;
        }

        Ok(())
    }
}

const PLUTUS_V1: [(&str, i64); 166] = [
    ("addInteger-cpu-arguments-intercept", 197209),
    ("addInteger-cpu-arguments-slope", 0),
    ("addInteger-memory-arguments-intercept", 1),
    ("addInteger-memory-arguments-slope", 1),
    ("appendByteString-cpu-arguments-intercept", 396231),
    ("appendByteString-cpu-arguments-slope", 621),
    ("appendByteString-memory-arguments-intercept", 0),
    ("appendByteString-memory-arguments-slope", 1),
    ("appendString-cpu-arguments-intercept", 150000),
    ("appendString-cpu-arguments-slope", 1000),
    ("appendString-memory-arguments-intercept", 0),
    ("appendString-memory-arguments-slope", 1),
    ("bData-cpu-arguments", 150000),
    ("bData-memory-arguments", 32),
    ("blake2b-cpu-arguments-intercept", 2477736),
    ("blake2b-cpu-arguments-slope", 29175),
    ("blake2b-memory-arguments", 4),
    ("cekApplyCost-exBudgetCPU", 29773),
    ("cekApplyCost-exBudgetMemory", 100),
    ("cekBuiltinCost-exBudgetCPU", 29773),
    ("cekBuiltinCost-exBudgetMemory", 100),
    ("cekConstCost-exBudgetCPU", 29773),
    ("cekConstCost-exBudgetMemory", 100),
    ("cekDelayCost-exBudgetCPU", 29773),
    ("cekDelayCost-exBudgetMemory", 100),
    ("cekForceCost-exBudgetCPU", 29773),
    ("cekForceCost-exBudgetMemory", 100),
    ("cekLamCost-exBudgetCPU", 29773),
    ("cekLamCost-exBudgetMemory", 100),
    ("cekStartupCost-exBudgetCPU", 100),
    ("cekStartupCost-exBudgetMemory", 100),
    ("cekVarCost-exBudgetCPU", 29773),
    ("cekVarCost-exBudgetMemory", 100),
    ("chooseData-cpu-arguments", 150000),
    ("chooseData-memory-arguments", 32),
    ("chooseList-cpu-arguments", 150000),
    ("chooseList-memory-arguments", 32),
    ("chooseUnit-cpu-arguments", 150000),
    ("chooseUnit-memory-arguments", 32),
    ("consByteString-cpu-arguments-intercept", 150000),
    ("consByteString-cpu-arguments-slope", 1000),
    ("consByteString-memory-arguments-intercept", 0),
    ("consByteString-memory-arguments-slope", 1),
    ("constrData-cpu-arguments", 150000),
    ("constrData-memory-arguments", 32),
    ("decodeUtf8-cpu-arguments-intercept", 150000),
    ("decodeUtf8-cpu-arguments-slope", 1000),
    ("decodeUtf8-memory-arguments-intercept", 0),
    ("decodeUtf8-memory-arguments-slope", 8),
    ("divideInteger-cpu-arguments-constant", 148000),
    ("divideInteger-cpu-arguments-model-arguments-intercept", 425507),
    ("divideInteger-cpu-arguments-model-arguments-slope", 118),
    ("divideInteger-memory-arguments-intercept", 0),
    ("divideInteger-memory-arguments-minimum", 1),
    ("divideInteger-memory-arguments-slope", 1),
    ("encodeUtf8-cpu-arguments-intercept", 150000),
    ("encodeUtf8-cpu-arguments-slope", 1000),
    ("encodeUtf8-memory-arguments-intercept", 0),
    ("encodeUtf8-memory-arguments-slope", 8),
    ("equalsByteString-cpu-arguments-constant", 150000),
    ("equalsByteString-cpu-arguments-intercept", 112536),
    ("equalsByteString-cpu-arguments-slope", 247),
    ("equalsByteString-memory-arguments", 1),
    ("equalsData-cpu-arguments-intercept", 150000),
    ("equalsData-cpu-arguments-slope", 10000),
    ("equalsData-memory-arguments", 1),
    ("equalsInteger-cpu-arguments-intercept", 136542),
    ("equalsInteger-cpu-arguments-slope", 1326),
    ("equalsInteger-memory-arguments", 1),
    ("equalsString-cpu-arguments-constant", 1000),
    ("equalsString-cpu-arguments-intercept", 150000),
    ("equalsString-cpu-arguments-slope", 1000),
    ("equalsString-memory-arguments", 1),
    ("fstPair-cpu-arguments", 150000),
    ("fstPair-memory-arguments", 32),
    ("headList-cpu-arguments", 150000),
    ("headList-memory-arguments", 32),
    ("iData-cpu-arguments", 150000),
    ("iData-memory-arguments", 32),
    ("ifThenElse-cpu-arguments", 1),
    ("ifThenElse-memory-arguments", 1),
    ("indexByteString-cpu-arguments", 150000),
    ("indexByteString-memory-arguments", 1),
    ("lengthOfByteString-cpu-arguments", 150000),
    ("lengthOfByteString-memory-arguments", 4),
    ("lessThanByteString-cpu-arguments-intercept", 103599),
    ("lessThanByteString-cpu-arguments-slope", 248),
    ("lessThanByteString-memory-arguments", 1),
    ("lessThanEqualsByteString-cpu-arguments-intercept", 103599),
    ("lessThanEqualsByteString-cpu-arguments-slope", 248),
    ("lessThanEqualsByteString-memory-arguments", 1),
    ("lessThanEqualsInteger-cpu-arguments-intercept", 145276),
    ("lessThanEqualsInteger-cpu-arguments-slope", 1366),
    ("lessThanEqualsInteger-memory-arguments", 1),
    ("lessThanInteger-cpu-arguments-intercept", 179690),
    ("lessThanInteger-cpu-arguments-slope", 497),
    ("lessThanInteger-memory-arguments", 1),
    ("listData-cpu-arguments", 150000),
    ("listData-memory-arguments", 32),
    ("mapData-cpu-arguments", 150000),
    ("mapData-memory-arguments", 32),
    ("mkCons-cpu-arguments", 150000),
    ("mkCons-memory-arguments", 32),
    ("mkNilData-cpu-arguments", 150000),
    ("mkNilData-memory-arguments", 32),
    ("mkNilPairData-cpu-arguments", 150000),
    ("mkNilPairData-memory-arguments", 32),
    ("mkPairData-cpu-arguments", 150000),
    ("mkPairData-memory-arguments", 32),
    ("modInteger-cpu-arguments-constant", 148000),
    ("modInteger-cpu-arguments-model-arguments-intercept", 425507),
    ("modInteger-cpu-arguments-model-arguments-slope", 118),
    ("modInteger-memory-arguments-intercept", 0),
    ("modInteger-memory-arguments-minimum", 1),
    ("modInteger-memory-arguments-slope", 1),
    ("multiplyInteger-cpu-arguments-intercept", 61516),
    ("multiplyInteger-cpu-arguments-slope", 11218),
    ("multiplyInteger-memory-arguments-intercept", 0),
    ("multiplyInteger-memory-arguments-slope", 1),
    ("nullList-cpu-arguments", 150000),
    ("nullList-memory-arguments", 32),
    ("quotientInteger-cpu-arguments-constant", 148000),
    ("quotientInteger-cpu-arguments-model-arguments-intercept", 425507),
    ("quotientInteger-cpu-arguments-model-arguments-slope", 118),
    ("quotientInteger-memory-arguments-intercept", 0),
    ("quotientInteger-memory-arguments-minimum", 1),
    ("quotientInteger-memory-arguments-slope", 1),
    ("remainderInteger-cpu-arguments-constant", 148000),
    ("remainderInteger-cpu-arguments-model-arguments-intercept", 425507),
    ("remainderInteger-cpu-arguments-model-arguments-slope", 118),
    ("remainderInteger-memory-arguments-intercept", 0),
    ("remainderInteger-memory-arguments-minimum", 1),
    ("remainderInteger-memory-arguments-slope", 1),
    ("sha2_256-cpu-arguments-intercept", 2477736),
    ("sha2_256-cpu-arguments-slope", 29175),
    ("sha2_256-memory-arguments", 4),
    ("sha3_256-cpu-arguments-intercept", 0),
    ("sha3_256-cpu-arguments-slope", 82363),
    ("sha3_256-memory-arguments", 4),
    ("sliceByteString-cpu-arguments-intercept", 150000),
    ("sliceByteString-cpu-arguments-slope", 5000),
    ("sliceByteString-memory-arguments-intercept", 0),
    ("sliceByteString-memory-arguments-slope", 1),
    ("sndPair-cpu-arguments", 150000),
    ("sndPair-memory-arguments", 32),
    ("subtractInteger-cpu-arguments-intercept", 197209),
    ("subtractInteger-cpu-arguments-slope", 0),
    ("subtractInteger-memory-arguments-intercept", 1),
    ("subtractInteger-memory-arguments-slope", 1),
    ("tailList-cpu-arguments", 150000),
    ("tailList-memory-arguments", 32),
    ("trace-cpu-arguments", 150000),
    ("trace-memory-arguments", 32),
    ("unBData-cpu-arguments", 150000),
    ("unBData-memory-arguments", 32),
    ("unConstrData-cpu-arguments", 150000),
    ("unConstrData-memory-arguments", 32),
    ("unIData-cpu-arguments", 150000),
    ("unIData-memory-arguments", 32),
    ("unListData-cpu-arguments", 150000),
    ("unListData-memory-arguments", 32),
    ("unMapData-cpu-arguments", 150000),
    ("unMapData-memory-arguments", 32),
    ("verifySignature-cpu-arguments-intercept", 3345831),
    ("verifySignature-cpu-arguments-slope", 1),
    ("verifySignature-memory-arguments", 1),
];

#[cfg(test)]
mod test {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;

    const LANGUAGE_VIEW: &str = concat!(
        "a141005901d59f1a000302590001011a00060bc719026d00011a000249f01903e800011",
        "a000249f018201a0025cea81971f70419744d186419744d186419744d186419744d1864",
        "19744d186419744d18641864186419744d18641a000249f018201a000249f018201a000",
        "249f018201a000249f01903e800011a000249f018201a000249f01903e800081a000242",
        "201a00067e2318760001011a000249f01903e800081a000249f01a0001b79818f7011a0",
        "00249f0192710011a0002155e19052e011903e81a000249f01903e8011a000249f01820",
        "1a000249f018201a000249f0182001011a000249f0011a000249f0041a000194af18f80",
        "11a000194af18f8011a0002377c190556011a0002bdea1901f1011a000249f018201a00",
        "0249f018201a000249f018201a000249f018201a000249f018201a000249f018201a000",
        "242201a00067e23187600010119f04c192bd200011a000249f018201a000242201a0006",
        "7e2318760001011a000242201a00067e2318760001011a0025cea81971f704001a00014",
        "1bb041a000249f019138800011a000249f018201a000302590001011a000249f018201a",
        "000249f018201a000249f018201a000249f018201a000249f018201a000249f018201a0",
        "00249f018201a00330da70101ff",
    );

    #[test]
    fn language_view() {
        assert_eq!(COST_MODELS.to_cbor_hex().unwrap(), LANGUAGE_VIEW);
    }

    #[test]
    fn language_view_decodes() {
        let models = CostModels::from_cbor(&hex::decode(LANGUAGE_VIEW).unwrap()).unwrap();
        assert_eq!(&models, &*COST_MODELS);
    }

    #[test]
    fn parameters_are_sorted() {
        let model = COST_MODELS.get(Language::PlutusV1).unwrap();
        let names = model.parameters().iter().map(|(name, _)| *name);

        assert!(names.clone().zip(names.skip(1)).all(|(a, b)| a < b));
        assert_eq!(model.get("addInteger-cpu-arguments-intercept"), Some(197209));
        assert_eq!(model.get("verifySignature-cpu-arguments-intercept"), Some(3345831));
        assert_eq!(model.get("nope"), None);
        assert!(COST_MODELS.get(Language::PlutusV2).is_none());
    }

    #[test]
    fn reject_wrong_parameter_count() {
        // {h'00': h'9f0102ff'}
        let err = CostModels::from_cbor(&hex::decode("a14100449f0102ff").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                expected: 166,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn reject_unknown_language() {
        // {h'05': h'80'}
        let err = CostModels::from_cbor(&hex::decode("a141054180").unwrap()).unwrap_err();
        assert!(matches!(err, Error::UnknownCode { code: 5, .. }));

        // {h'01': h'80'}
        let err = CostModels::from_cbor(&hex::decode("a141014180").unwrap()).unwrap_err();
        assert!(matches!(err, Error::UnknownCode { code: 1, .. }));
        assert_eq!(err.kind(), ErrorKind::Structure);
    }

    #[test]
    fn reject_repeated_language() {
        let view = hex::decode(LANGUAGE_VIEW).unwrap();
        let entry = &view[1..];

        let err = CostModels::from_cbor(&[&[0xa2u8][..], entry, entry].concat()).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateCode {
                what: "cost model language",
                code: 0
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Structure);
    }
}
