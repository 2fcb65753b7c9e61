//! Reader contract and file metadata types.
//!
//! A collection never touches a file format directly. It asks a
//! [`ReaderFactory`] for one [`SimpleReader`] per path and uses only the
//! metadata and hyperslab reads declared here.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReaderError;

/// Element type of a variable or attribute as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Byte,
    Char,
    Short,
    Int,
    Int64,
    Float,
    Double,
    Other,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Byte => "byte",
            ElementType::Char => "char",
            ElementType::Short => "short",
            ElementType::Int => "int",
            ElementType::Int64 => "int64",
            ElementType::Float => "float",
            ElementType::Double => "double",
            ElementType::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Value of a variable or global attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Text(String),
}

impl AttributeValue {
    /// Numeric values as `f64`. Text yields nothing.
    pub fn as_f64s(&self) -> Vec<f64> {
        match self {
            AttributeValue::Ints(values) => values.iter().map(|&v| v as f64).collect(),
            AttributeValue::Floats(values) => values.clone(),
            AttributeValue::Text(_) => Vec::new(),
        }
    }

    /// Numeric values as `i64`, truncating floats.
    pub fn as_i64s(&self) -> Vec<i64> {
        match self {
            AttributeValue::Ints(values) => values.clone(),
            AttributeValue::Floats(values) => values.iter().map(|&v| v as i64).collect(),
            AttributeValue::Text(_) => Vec::new(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Storage type reported for the attribute.
    pub fn element_type(&self) -> ElementType {
        match self {
            AttributeValue::Ints(_) => ElementType::Int64,
            AttributeValue::Floats(_) => ElementType::Double,
            AttributeValue::Text(_) => ElementType::Char,
        }
    }
}

/// A named attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A named file dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

impl Dimension {
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
        }
    }
}

/// Metadata for one variable: its dimension names (slowest varying first),
/// storage type and attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    pub dim_names: Vec<String>,
    pub xtype: ElementType,
    pub attributes: Vec<Attribute>,
}

impl VariableInfo {
    pub fn new(name: impl Into<String>, dim_names: &[&str], xtype: ElementType) -> Self {
        Self {
            name: name.into(),
            dim_names: dim_names.iter().map(|d| d.to_string()).collect(),
            xtype,
            attributes: Vec::new(),
        }
    }

    pub fn att(&self, name: &str) -> Option<&AttributeValue> {
        find_attribute(&self.attributes, name)
    }

    /// Numeric attribute values, empty when absent or textual.
    pub fn att_f64s(&self, name: &str) -> Vec<f64> {
        self.att(name).map(AttributeValue::as_f64s).unwrap_or_default()
    }

    pub fn att_names(&self) -> Vec<String> {
        self.attributes.iter().map(|a| a.name.clone()).collect()
    }
}

/// Look up an attribute by name.
pub fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a AttributeValue> {
    attributes.iter().find(|a| a.name == name).map(|a| &a.value)
}

/// Reader-side id for a variable opened with [`SimpleReader::open_read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReaderHandle(pub usize);

/// Minimal read access to one gridded data file.
pub trait SimpleReader {
    /// Path the reader was opened on.
    fn path(&self) -> &str;

    fn dimensions(&self) -> &[Dimension];

    fn variables(&self) -> &[VariableInfo];

    fn global_attributes(&self) -> &[Attribute];

    /// Length of a file dimension.
    fn dim_len(&self, name: &str) -> Option<usize> {
        self.dimensions().iter().find(|d| d.name == name).map(|d| d.len)
    }

    fn variable(&self, name: &str) -> Option<&VariableInfo> {
        self.variables().iter().find(|v| v.name == name)
    }

    /// Prepare `variable` for reading.
    fn open_read(&mut self, variable: &VariableInfo) -> Result<ReaderHandle, ReaderError>;

    /// Read the hyperslab `start..start + count` (one entry per file
    /// dimension of the variable) into `buf` in row-major order.
    fn read(
        &mut self,
        handle: ReaderHandle,
        start: &[usize],
        count: &[usize],
        buf: &mut [f64],
    ) -> Result<(), ReaderError>;

    fn close(&mut self, handle: ReaderHandle) -> Result<(), ReaderError>;
}

/// Opens readers by path.
pub trait ReaderFactory {
    fn open(&self, path: &str) -> Result<Box<dyn SimpleReader>, ReaderError>;
}

impl<F> ReaderFactory for F
where
    F: Fn(&str) -> Result<Box<dyn SimpleReader>, ReaderError>,
{
    fn open(&self, path: &str) -> Result<Box<dyn SimpleReader>, ReaderError> {
        self(path)
    }
}

/// Open readers keyed by path.
pub type ReaderMap = BTreeMap<String, Box<dyn SimpleReader>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_conversions() {
        let ints = AttributeValue::Ints(vec![1, -2]);
        assert_eq!(ints.as_f64s(), vec![1.0, -2.0]);
        assert_eq!(ints.element_type(), ElementType::Int64);

        let floats = AttributeValue::Floats(vec![2.75]);
        assert_eq!(floats.as_i64s(), vec![2]);
        assert!(floats.as_text().is_none());

        let text = AttributeValue::Text("degC".to_string());
        assert!(text.as_f64s().is_empty());
        assert_eq!(text.as_text(), Some("degC"));
    }

    #[test]
    fn test_variable_info_attributes() {
        let mut info = VariableInfo::new("temp", &["time", "y", "x"], ElementType::Float);
        info.attributes
            .push(Attribute::new("_FillValue", AttributeValue::Floats(vec![-999.0])));
        info.attributes
            .push(Attribute::new("units", AttributeValue::Text("K".to_string())));

        assert_eq!(info.dim_names, vec!["time", "y", "x"]);
        assert_eq!(info.att_f64s("_FillValue"), vec![-999.0]);
        assert!(info.att_f64s("units").is_empty());
        assert!(info.att("scale_factor").is_none());
        assert_eq!(info.att_names(), vec!["_FillValue", "units"]);
    }

    #[test]
    fn test_element_type_display() {
        assert_eq!(ElementType::Int64.to_string(), "int64");
        assert_eq!(ElementType::Double.to_string(), "double");
    }
}
