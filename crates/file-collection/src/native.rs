//! Native netCDF reader (feature `netcdf`).
//!
//! Wraps the netcdf library (which in turn wraps HDF5). Metadata is read
//! once at open; hyperslab reads go straight to the file and are converted
//! to `f64` by the library.

use std::sync::Once;

use netcdf::types::{FloatType, IntType, NcVariableType};
use tracing::debug;

use crate::error::ReaderError;
use crate::handles::HandlePool;
use crate::reader::{
    Attribute, AttributeValue, Dimension, ElementType, ReaderFactory, ReaderHandle, SimpleReader,
    VariableInfo,
};

/// Silence HDF5's automatic error printing to stderr.
///
/// HDF5 prints diagnostics even for errors the netcdf library handles, e.g.
/// probing for attributes that do not exist. Safe to call more than once.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 with a null handler disables automatic error
        // printing for the default error stack.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Opens [`NetCdfReader`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetCdfFactory;

impl ReaderFactory for NetCdfFactory {
    fn open(&self, path: &str) -> Result<Box<dyn SimpleReader>, ReaderError> {
        Ok(Box::new(NetCdfReader::open(path)?))
    }
}

/// [`SimpleReader`] over a netCDF file on disk.
pub struct NetCdfReader {
    path: String,
    file: netcdf::File,
    dimensions: Vec<Dimension>,
    variables: Vec<VariableInfo>,
    attributes: Vec<Attribute>,
    open: HandlePool<String>,
}

impl NetCdfReader {
    pub fn open(path: &str) -> Result<Self, ReaderError> {
        silence_hdf5_errors();

        let file = netcdf::open(path).map_err(|e| ReaderError::open(format!("{}: {}", path, e)))?;

        let dimensions = file
            .dimensions()
            .map(|dim| Dimension::new(dim.name(), dim.len()))
            .collect();

        let variables = file
            .variables()
            .map(|var| VariableInfo {
                name: var.name(),
                dim_names: var.dimensions().iter().map(|d| d.name()).collect(),
                xtype: element_type(&var.vartype()),
                attributes: var.attributes().filter_map(|attr| convert_attribute(&attr)).collect(),
            })
            .collect::<Vec<_>>();

        let attributes = file
            .attributes()
            .filter_map(|attr| convert_attribute(&attr))
            .collect();

        debug!(path, variables = variables.len(), "Opened netCDF file");

        Ok(Self {
            path: path.to_string(),
            file,
            dimensions,
            variables,
            attributes,
            open: HandlePool::new(),
        })
    }
}

fn element_type(vartype: &NcVariableType) -> ElementType {
    match vartype {
        NcVariableType::Int(IntType::I8) | NcVariableType::Int(IntType::U8) => ElementType::Byte,
        NcVariableType::Int(IntType::I16) | NcVariableType::Int(IntType::U16) => ElementType::Short,
        NcVariableType::Int(IntType::I32) | NcVariableType::Int(IntType::U32) => ElementType::Int,
        NcVariableType::Int(IntType::I64) | NcVariableType::Int(IntType::U64) => ElementType::Int64,
        NcVariableType::Float(FloatType::F32) => ElementType::Float,
        NcVariableType::Float(FloatType::F64) => ElementType::Double,
        NcVariableType::Char => ElementType::Char,
        _ => ElementType::Other,
    }
}

/// Convert a netCDF attribute. Types without a counterpart are dropped.
fn convert_attribute(attr: &netcdf::Attribute) -> Option<Attribute> {
    use netcdf::AttributeValue as Nc;

    let value = match attr.value().ok()? {
        Nc::Str(text) => AttributeValue::Text(text),
        Nc::Short(v) => AttributeValue::Ints(vec![v.into()]),
        Nc::Shorts(v) => AttributeValue::Ints(v.into_iter().map(i64::from).collect()),
        Nc::Int(v) => AttributeValue::Ints(vec![v.into()]),
        Nc::Ints(v) => AttributeValue::Ints(v.into_iter().map(i64::from).collect()),
        Nc::Longlong(v) => AttributeValue::Ints(vec![v]),
        Nc::Longlongs(v) => AttributeValue::Ints(v),
        Nc::Float(v) => AttributeValue::Floats(vec![v.into()]),
        Nc::Floats(v) => AttributeValue::Floats(v.into_iter().map(f64::from).collect()),
        Nc::Double(v) => AttributeValue::Floats(vec![v]),
        Nc::Doubles(v) => AttributeValue::Floats(v),
        other => AttributeValue::Floats(vec![f64::try_from(other).ok()?]),
    };
    Some(Attribute::new(attr.name(), value))
}

impl SimpleReader for NetCdfReader {
    fn path(&self) -> &str {
        &self.path
    }

    fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    fn variables(&self) -> &[VariableInfo] {
        &self.variables
    }

    fn global_attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    fn open_read(&mut self, variable: &VariableInfo) -> Result<ReaderHandle, ReaderError> {
        if self.file.variable(&variable.name).is_none() {
            return Err(ReaderError::MissingVariable(variable.name.clone()));
        }
        Ok(ReaderHandle(self.open.acquire(variable.name.clone())))
    }

    fn read(
        &mut self,
        handle: ReaderHandle,
        start: &[usize],
        count: &[usize],
        buf: &mut [f64],
    ) -> Result<(), ReaderError> {
        let name = self
            .open
            .get(handle.0)
            .ok_or(ReaderError::InvalidHandle(handle.0))?;
        let var = self
            .file
            .variable(name)
            .ok_or_else(|| ReaderError::MissingVariable(name.clone()))?;

        let values: Vec<f64> = var
            .get_values((start, count))
            .map_err(|e| ReaderError::read(format!("{}: {}", name, e)))?;
        if buf.len() < values.len() {
            return Err(ReaderError::shape(format!(
                "{}: buffer holds {} values, {} read",
                name,
                buf.len(),
                values.len()
            )));
        }
        buf[..values.len()].copy_from_slice(&values);
        Ok(())
    }

    fn close(&mut self, handle: ReaderHandle) -> Result<(), ReaderError> {
        self.open
            .release(handle.0)
            .map(|_| ())
            .ok_or(ReaderError::InvalidHandle(handle.0))
    }
}
