// Discord ids are 64-bit snowflakes. The JSON files store them as decimal
// strings so they stay readable by tools that only know doubles.
//
// Use with `#[serde(with = "crate::core::snowflake")]` and the `vec` / `option`
// submodules for collections. Zero is not a snowflake: a required id of 0 is a
// parse error, a list drops it and an optional id reads it as unset.

use serde::{de, Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    /// Parse without the zero check.
    fn into_raw<E: de::Error>(self) -> Result<u64, E> {
        match self {
            RawId::Number(n) => Ok(n),
            RawId::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| E::custom(format!("invalid snowflake: {s:?}"))),
        }
    }

    fn into_id<E: de::Error>(self) -> Result<u64, E> {
        match self.into_raw::<E>()? {
            0 => Err(E::custom("invalid snowflake: 0")),
            id => Ok(id),
        }
    }
}

pub fn serialize<S: Serializer>(id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    RawId::deserialize(deserializer)?.into_id()
}

pub mod vec {
    use super::RawId;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ids: &[u64], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(ids.len()))?;
        for id in ids {
            seq.serialize_element(&id.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
        let mut ids = Vec::new();
        for raw in Vec::<RawId>::deserialize(deserializer)? {
            match raw.into_raw::<D::Error>()? {
                0 => {}
                id => ids.push(id),
            }
        }
        Ok(ids)
    }
}

pub mod option {
    use super::RawId;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.serialize_some(&id.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        let id = Option::<RawId>::deserialize(deserializer)?
            .map(RawId::into_raw::<D::Error>)
            .transpose()?;
        Ok(id.filter(|id| *id != 0))
    }
}
