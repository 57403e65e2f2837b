//! Delimited-text export.
//!
//! Header from the first row's field names in declaration order, values
//! joined with commas, a value containing a comma wrapped in double quotes.
//! Nothing else is escaped and there is no trailing newline.
//!
//! Cells are written the way a browser's `String(value)` writes them, so
//! `NaN` and `Infinity` survive and very large or small numbers switch to
//! exponent form (`1e+21`, `1e-7`).

use crate::core::{Error, Result};
use serde::ser::{self, Serialize, Serializer};

/// Render rows as delimited text. Empty input gives an empty string.
pub fn to_delimited<T: Serialize>(rows: &[T]) -> Result<String> {
    let records = rows
        .iter()
        .map(|row| match row.serialize(CellSerializer)? {
            Cell::Record(fields) => Ok(fields),
            other => Err(Error::Export(format!(
                "rows must serialize to objects, got {}",
                other.kind()
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    let Some(first) = records.first() else {
        return Ok(String::new());
    };
    let headers: Vec<&str> = first.iter().map(|(key, _)| key.as_str()).collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(headers.join(","));

    for record in &records {
        let cells: Vec<String> = headers
            .iter()
            .map(|header| {
                let text = record
                    .iter()
                    .find(|(key, _)| key == header)
                    .map(|(_, cell)| render(cell))
                    .unwrap_or_default();
                quote(text)
            })
            .collect();
        lines.push(cells.join(","));
    }

    Ok(lines.join("\n"))
}

fn quote(cell: String) -> String {
    if cell.contains(',') {
        format!("\"{}\"", cell)
    } else {
        cell
    }
}

/// A serialized value before it is flattened to text.
#[derive(Clone, Debug, PartialEq)]
enum Cell {
    /// `null`, `None` or unit
    Empty,
    Text(String),
    List(Vec<Cell>),
    Record(Vec<(String, Cell)>),
}

impl Cell {
    fn kind(&self) -> &'static str {
        match self {
            Cell::Empty => "null",
            Cell::Text(_) => "scalar",
            Cell::List(_) => "array",
            Cell::Record(_) => "object",
        }
    }
}

/// Text of a single cell.
fn render(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(text) => text.clone(),
        Cell::List(items) => items.iter().map(render).collect::<Vec<_>>().join(","),
        Cell::Record(_) => "[object Object]".to_string(),
    }
}

/// Number text as JavaScript's `Number.prototype.toString` writes it.
fn js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // shortest round-trip digits and the exponent of the leading digit
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let k = digits.len() as i32;
    let n = exponent + 1;
    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat(n.unsigned_abs() as usize), digits)
    } else {
        let sign = if n > 0 { '+' } else { '-' };
        let power = (n - 1).abs();
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", lead, sign, power)
        } else {
            format!("{}.{}e{}{}", lead, rest, sign, power)
        }
    };

    if value < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// Serializes any value into a [`Cell`].
struct CellSerializer;

impl Serializer for CellSerializer {
    type Ok = Cell;
    type Error = Error;
    type SerializeSeq = ListBuilder;
    type SerializeTuple = ListBuilder;
    type SerializeTupleStruct = ListBuilder;
    type SerializeTupleVariant = VariantBuilder<ListBuilder>;
    type SerializeMap = RecordBuilder;
    type SerializeStruct = RecordBuilder;
    type SerializeStructVariant = VariantBuilder<RecordBuilder>;

    fn serialize_bool(self, v: bool) -> Result<Cell> {
        Ok(Cell::Text(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<Cell> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Cell> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Cell> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Cell> {
        Ok(Cell::Text(v.to_string()))
    }

    fn serialize_i128(self, v: i128) -> Result<Cell> {
        Ok(Cell::Text(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Cell> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Cell> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Cell> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Cell> {
        Ok(Cell::Text(v.to_string()))
    }

    fn serialize_u128(self, v: u128) -> Result<Cell> {
        Ok(Cell::Text(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Cell> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Cell> {
        Ok(Cell::Text(js_number(v)))
    }

    fn serialize_char(self, v: char) -> Result<Cell> {
        Ok(Cell::Text(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Cell> {
        Ok(Cell::Text(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Cell> {
        Ok(Cell::List(
            v.iter().map(|b| Cell::Text(b.to_string())).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Cell> {
        Ok(Cell::Empty)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Cell> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Cell> {
        Ok(Cell::Empty)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Cell> {
        Ok(Cell::Empty)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Cell> {
        Ok(Cell::Text(variant.to_string()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Cell> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Cell> {
        Ok(Cell::Record(vec![(
            variant.to_string(),
            value.serialize(CellSerializer)?,
        )]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ListBuilder> {
        Ok(ListBuilder(Vec::with_capacity(len.unwrap_or(0))))
    }

    fn serialize_tuple(self, len: usize) -> Result<ListBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<ListBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder<ListBuilder>> {
        Ok(VariantBuilder {
            variant,
            inner: ListBuilder(Vec::with_capacity(len)),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<RecordBuilder> {
        Ok(RecordBuilder::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<RecordBuilder> {
        Ok(RecordBuilder::with_capacity(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder<RecordBuilder>> {
        Ok(VariantBuilder {
            variant,
            inner: RecordBuilder::with_capacity(len),
        })
    }
}

struct ListBuilder(Vec<Cell>);

impl ser::SerializeSeq for ListBuilder {
    type Ok = Cell;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.0.push(value.serialize(CellSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Cell> {
        Ok(Cell::List(self.0))
    }
}

impl ser::SerializeTuple for ListBuilder {
    type Ok = Cell;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Cell> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for ListBuilder {
    type Ok = Cell;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Cell> {
        ser::SerializeSeq::end(self)
    }
}

/// Object fields in insertion order. A repeated key keeps its first slot.
struct RecordBuilder {
    fields: Vec<(String, Cell)>,
    pending_key: Option<String>,
}

impl RecordBuilder {
    fn with_capacity(len: usize) -> Self {
        Self {
            fields: Vec::with_capacity(len),
            pending_key: None,
        }
    }

    fn insert(&mut self, key: String, cell: Cell) {
        let slot = self.fields.iter().position(|(existing, _)| *existing == key);
        match slot {
            Some(index) => self.fields[index].1 = cell,
            None => self.fields.push((key, cell)),
        }
    }
}

impl ser::SerializeMap for RecordBuilder {
    type Ok = Cell;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.pending_key = Some(render(&key.serialize(CellSerializer)?));
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::SerializationError("map value without a key".to_string()))?;
        let cell = value.serialize(CellSerializer)?;
        self.insert(key, cell);
        Ok(())
    }

    fn end(self) -> Result<Cell> {
        Ok(Cell::Record(self.fields))
    }
}

impl ser::SerializeStruct for RecordBuilder {
    type Ok = Cell;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        let cell = value.serialize(CellSerializer)?;
        self.insert(key.to_string(), cell);
        Ok(())
    }

    fn end(self) -> Result<Cell> {
        Ok(Cell::Record(self.fields))
    }
}

/// Externally tagged enum content: `{ variant: inner }`.
struct VariantBuilder<B> {
    variant: &'static str,
    inner: B,
}

impl ser::SerializeTupleVariant for VariantBuilder<ListBuilder> {
    type Ok = Cell;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> Result<Cell> {
        let inner = ser::SerializeSeq::end(self.inner)?;
        Ok(Cell::Record(vec![(self.variant.to_string(), inner)]))
    }
}

impl ser::SerializeStructVariant for VariantBuilder<RecordBuilder> {
    type Ok = Cell;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Cell> {
        let inner = ser::SerializeStruct::end(self.inner)?;
        Ok(Cell::Record(vec![(self.variant.to_string(), inner)]))
    }
}
