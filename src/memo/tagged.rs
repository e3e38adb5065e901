//! Tagged structural encoding for memo keys.
//!
//! A serde `Serializer` that builds a `serde_json::Value` in which every
//! shape that plain JSON would flatten keeps a marker:
//! - `Some(x)` becomes `{"some": x}`, `None` stays `null`
//! - enum variants become `{"Type::Variant": payload}`
//! - named structs and newtypes become `{"Type": payload}`
//! - maps become `{"map": [[k, v], ...]}` sorted by encoded key
//! - chars, bytes and 128-bit integers carry their own tag
//!
//! Non-finite floats have no stable encoding and are rejected.

use serde::ser::{self, Error as _, Serialize};
use serde_json::{Map, Number, Value};

type Error = serde_json::Error;

/// Encodes `value` into its tagged form.
pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value, Error> {
    value.serialize(TaggedEncoder)
}

fn tagged(tag: impl Into<String>, inner: Value) -> Value {
    let mut map = Map::new();
    map.insert(tag.into(), inner);
    Value::Object(map)
}

fn variant_tag(name: &str, variant: &str) -> String {
    format!("{}::{}", name, variant)
}

// == Encoder ==
struct TaggedEncoder;

impl ser::Serializer for TaggedEncoder {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SeqEncoder;
    type SerializeTuple = SeqEncoder;
    type SerializeTupleStruct = SeqEncoder;
    type SerializeTupleVariant = SeqEncoder;
    type SerializeMap = MapEncoder;
    type SerializeStruct = StructEncoder;
    type SerializeStructVariant = StructEncoder;

    fn serialize_bool(self, v: bool) -> Result<Value, Error> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, Error> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, Error> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, Error> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, Error> {
        Ok(Value::Number(v.into()))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, Error> {
        Ok(tagged("i128", Value::String(v.to_string())))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, Error> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, Error> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, Error> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, Error> {
        Ok(Value::Number(v.into()))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, Error> {
        Ok(tagged("u128", Value::String(v.to_string())))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, Error> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, Error> {
        Number::from_f64(v)
            .map(Value::Number)
            .ok_or_else(|| Error::custom(format!("non-finite float {} has no stable key", v)))
    }

    fn serialize_char(self, v: char) -> Result<Value, Error> {
        Ok(tagged("char", Value::String(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Value, Error> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, Error> {
        let bytes = v.iter().map(|b| Value::from(*b)).collect();
        Ok(tagged("bytes", Value::Array(bytes)))
    }

    fn serialize_none(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, Error> {
        Ok(tagged("some", encode(value)?))
    }

    fn serialize_unit(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value, Error> {
        Ok(tagged(name, Value::Null))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, Error> {
        Ok(tagged(variant_tag(name, variant), Value::Null))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Value, Error> {
        Ok(tagged(name, encode(value)?))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, Error> {
        Ok(tagged(variant_tag(name, variant), encode(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqEncoder, Error> {
        Ok(SeqEncoder::new(None, len))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqEncoder, Error> {
        Ok(SeqEncoder::new(None, Some(len)))
    }

    fn serialize_tuple_struct(self, name: &'static str, len: usize) -> Result<SeqEncoder, Error> {
        Ok(SeqEncoder::new(Some(name.to_owned()), Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqEncoder, Error> {
        Ok(SeqEncoder::new(Some(variant_tag(name, variant)), Some(len)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapEncoder, Error> {
        Ok(MapEncoder::default())
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<StructEncoder, Error> {
        Ok(StructEncoder::new(name.to_owned()))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<StructEncoder, Error> {
        Ok(StructEncoder::new(variant_tag(name, variant)))
    }
}

// == Sequences ==
struct SeqEncoder {
    tag: Option<String>,
    items: Vec<Value>,
}

impl SeqEncoder {
    fn new(tag: Option<String>, len: Option<usize>) -> Self {
        Self {
            tag,
            items: Vec::with_capacity(len.unwrap_or(0)),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        self.items.push(encode(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let array = Value::Array(self.items);
        match self.tag {
            Some(tag) => tagged(tag, array),
            None => array,
        }
    }
}

impl ser::SerializeSeq for SeqEncoder {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        self.push(value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqEncoder {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        self.push(value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SeqEncoder {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        self.push(value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SeqEncoder {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        self.push(value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(self.finish())
    }
}

// == Maps ==
/// Collects `[key, value]` pairs and sorts them by encoded key, so hash
/// map iteration order never reaches the output.
#[derive(Default)]
struct MapEncoder {
    entries: Vec<(String, Value)>,
    pending_key: Option<Value>,
}

impl ser::SerializeMap for MapEncoder {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Error> {
        self.pending_key = Some(encode(key)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::custom("map value serialized before its key"))?;
        let value = encode(value)?;
        self.entries
            .push((key.to_string(), Value::Array(vec![key, value])));
        Ok(())
    }

    fn end(mut self) -> Result<Value, Error> {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        let pairs = self.entries.into_iter().map(|(_, pair)| pair).collect();
        Ok(tagged("map", Value::Array(pairs)))
    }
}

// == Structs ==
struct StructEncoder {
    tag: String,
    fields: Map<String, Value>,
}

impl StructEncoder {
    fn new(tag: String) -> Self {
        Self {
            tag,
            fields: Map::new(),
        }
    }

    fn insert<T: ?Sized + Serialize>(&mut self, key: &str, value: &T) -> Result<(), Error> {
        self.fields.insert(key.to_owned(), encode(value)?);
        Ok(())
    }
}

impl ser::SerializeStruct for StructEncoder {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        self.insert(key, value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(tagged(self.tag, Value::Object(self.fields)))
    }
}

impl ser::SerializeStructVariant for StructEncoder {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        self.insert(key, value)
    }

    fn end(self) -> Result<Value, Error> {
        Ok(tagged(self.tag, Value::Object(self.fields)))
    }
}
