//! Key shape signatures
//!
//! bincode writes values without any type information, so two keys of
//! different types can share an encoding (`"ab"` and `b"ab".to_vec()`, or
//! `Some(5u32)` and `(1u8, 5u32)`). The shape signature records the serde
//! data model kind of every node along with struct, variant and field names.
//! It is hashed ahead of the bincode payload so such keys stay apart.
//!
//! References, boxes and owned/borrowed pairs (`&str` and `String`, `&[u8]`
//! and `Vec<u8>`) serialize through the same data model calls and therefore
//! share a signature.

use serde::ser::{self, Serialize};

type ShapeResult = std::result::Result<(), bincode::Error>;

mod tag {
    pub const BOOL: u8 = 1;
    pub const I8: u8 = 2;
    pub const I16: u8 = 3;
    pub const I32: u8 = 4;
    pub const I64: u8 = 5;
    pub const I128: u8 = 6;
    pub const U8: u8 = 7;
    pub const U16: u8 = 8;
    pub const U32: u8 = 9;
    pub const U64: u8 = 10;
    pub const U128: u8 = 11;
    pub const F32: u8 = 12;
    pub const F64: u8 = 13;
    pub const CHAR: u8 = 14;
    pub const STR: u8 = 15;
    pub const BYTES: u8 = 16;
    pub const NONE: u8 = 17;
    pub const SOME: u8 = 18;
    pub const UNIT: u8 = 19;
    pub const UNIT_STRUCT: u8 = 20;
    pub const UNIT_VARIANT: u8 = 21;
    pub const NEWTYPE_STRUCT: u8 = 22;
    pub const NEWTYPE_VARIANT: u8 = 23;
    pub const SEQ: u8 = 24;
    pub const TUPLE: u8 = 25;
    pub const TUPLE_STRUCT: u8 = 26;
    pub const TUPLE_VARIANT: u8 = 27;
    pub const MAP: u8 = 28;
    pub const STRUCT: u8 = 29;
    pub const STRUCT_VARIANT: u8 = 30;
    pub const FIELD: u8 = 31;
    pub const SKIPPED: u8 = 32;
    pub const END: u8 = 33;
}

/// Compute the shape signature of `value`
pub(crate) fn signature<T>(value: &T) -> std::result::Result<Vec<u8>, bincode::Error>
where
    T: Serialize + ?Sized,
{
    let mut writer = ShapeWriter { out: Vec::new() };
    value.serialize(&mut writer)?;
    Ok(writer.out)
}

struct ShapeWriter {
    out: Vec<u8>,
}

impl ShapeWriter {
    fn tag(&mut self, tag: u8) -> ShapeResult {
        self.out.push(tag);
        Ok(())
    }

    fn name(&mut self, name: &str) {
        self.out.extend_from_slice(&(name.len() as u32).to_le_bytes());
        self.out.extend_from_slice(name.as_bytes());
    }

    fn named(&mut self, tag: u8, name: &str) -> ShapeResult {
        self.out.push(tag);
        self.name(name);
        Ok(())
    }

    fn variant(&mut self, tag: u8, name: &str, variant: &str) -> ShapeResult {
        self.out.push(tag);
        self.name(name);
        self.name(variant);
        Ok(())
    }
}

impl ser::Serializer for &mut ShapeWriter {
    type Ok = ();
    type Error = bincode::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _v: bool) -> ShapeResult {
        self.tag(tag::BOOL)
    }

    fn serialize_i8(self, _v: i8) -> ShapeResult {
        self.tag(tag::I8)
    }

    fn serialize_i16(self, _v: i16) -> ShapeResult {
        self.tag(tag::I16)
    }

    fn serialize_i32(self, _v: i32) -> ShapeResult {
        self.tag(tag::I32)
    }

    fn serialize_i64(self, _v: i64) -> ShapeResult {
        self.tag(tag::I64)
    }

    fn serialize_i128(self, _v: i128) -> ShapeResult {
        self.tag(tag::I128)
    }

    fn serialize_u8(self, _v: u8) -> ShapeResult {
        self.tag(tag::U8)
    }

    fn serialize_u16(self, _v: u16) -> ShapeResult {
        self.tag(tag::U16)
    }

    fn serialize_u32(self, _v: u32) -> ShapeResult {
        self.tag(tag::U32)
    }

    fn serialize_u64(self, _v: u64) -> ShapeResult {
        self.tag(tag::U64)
    }

    fn serialize_u128(self, _v: u128) -> ShapeResult {
        self.tag(tag::U128)
    }

    fn serialize_f32(self, _v: f32) -> ShapeResult {
        self.tag(tag::F32)
    }

    fn serialize_f64(self, _v: f64) -> ShapeResult {
        self.tag(tag::F64)
    }

    fn serialize_char(self, _v: char) -> ShapeResult {
        self.tag(tag::CHAR)
    }

    fn serialize_str(self, _v: &str) -> ShapeResult {
        self.tag(tag::STR)
    }

    fn serialize_bytes(self, _v: &[u8]) -> ShapeResult {
        self.tag(tag::BYTES)
    }

    fn serialize_none(self) -> ShapeResult {
        self.tag(tag::NONE)
    }

    fn serialize_some<T>(self, value: &T) -> ShapeResult
    where
        T: Serialize + ?Sized,
    {
        self.tag(tag::SOME)?;
        value.serialize(self)
    }

    fn serialize_unit(self) -> ShapeResult {
        self.tag(tag::UNIT)
    }

    fn serialize_unit_struct(self, name: &'static str) -> ShapeResult {
        self.named(tag::UNIT_STRUCT, name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> ShapeResult {
        self.variant(tag::UNIT_VARIANT, name, variant)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> ShapeResult
    where
        T: Serialize + ?Sized,
    {
        self.named(tag::NEWTYPE_STRUCT, name)?;
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> ShapeResult
    where
        T: Serialize + ?Sized,
    {
        self.variant(tag::NEWTYPE_VARIANT, name, variant)?;
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, bincode::Error> {
        self.tag(tag::SEQ)?;
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, bincode::Error> {
        self.tag(tag::TUPLE)?;
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self, bincode::Error> {
        self.named(tag::TUPLE_STRUCT, name)?;
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self, bincode::Error> {
        self.variant(tag::TUPLE_VARIANT, name, variant)?;
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, bincode::Error> {
        self.tag(tag::MAP)?;
        Ok(self)
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self, bincode::Error> {
        self.named(tag::STRUCT, name)?;
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self, bincode::Error> {
        self.variant(tag::STRUCT_VARIANT, name, variant)?;
        Ok(self)
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

impl ser::SerializeSeq for &mut ShapeWriter {
    type Ok = ();
    type Error = bincode::Error;

    fn serialize_element<T>(&mut self, value: &T) -> ShapeResult
    where
        T: Serialize + ?Sized,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> ShapeResult {
        self.tag(tag::END)
    }
}

impl ser::SerializeTuple for &mut ShapeWriter {
    type Ok = ();
    type Error = bincode::Error;

    fn serialize_element<T>(&mut self, value: &T) -> ShapeResult
    where
        T: Serialize + ?Sized,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> ShapeResult {
        self.tag(tag::END)
    }
}

impl ser::SerializeTupleStruct for &mut ShapeWriter {
    type Ok = ();
    type Error = bincode::Error;

    fn serialize_field<T>(&mut self, value: &T) -> ShapeResult
    where
        T: Serialize + ?Sized,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> ShapeResult {
        self.tag(tag::END)
    }
}

impl ser::SerializeTupleVariant for &mut ShapeWriter {
    type Ok = ();
    type Error = bincode::Error;

    fn serialize_field<T>(&mut self, value: &T) -> ShapeResult
    where
        T: Serialize + ?Sized,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> ShapeResult {
        self.tag(tag::END)
    }
}

impl ser::SerializeMap for &mut ShapeWriter {
    type Ok = ();
    type Error = bincode::Error;

    fn serialize_key<T>(&mut self, key: &T) -> ShapeResult
    where
        T: Serialize + ?Sized,
    {
        key.serialize(&mut **self)
    }

    fn serialize_value<T>(&mut self, value: &T) -> ShapeResult
    where
        T: Serialize + ?Sized,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> ShapeResult {
        self.tag(tag::END)
    }
}

impl ser::SerializeStruct for &mut ShapeWriter {
    type Ok = ();
    type Error = bincode::Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> ShapeResult
    where
        T: Serialize + ?Sized,
    {
        self.named(tag::FIELD, key)?;
        value.serialize(&mut **self)
    }

    fn skip_field(&mut self, key: &'static str) -> ShapeResult {
        self.named(tag::SKIPPED, key)
    }

    fn end(self) -> ShapeResult {
        self.tag(tag::END)
    }
}

impl ser::SerializeStructVariant for &mut ShapeWriter {
    type Ok = ();
    type Error = bincode::Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> ShapeResult
    where
        T: Serialize + ?Sized,
    {
        self.named(tag::FIELD, key)?;
        value.serialize(&mut **self)
    }

    fn skip_field(&mut self, key: &'static str) -> ShapeResult {
        self.named(tag::SKIPPED, key)
    }

    fn end(self) -> ShapeResult {
        self.tag(tag::END)
    }
}
