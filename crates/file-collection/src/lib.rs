//! Time-varying variables spread across a collection of data files.
//!
//! A [`Collection`] opens a list of files through a [`ReaderFactory`],
//! reconciles the time information of each file into one global time axis
//! and presents every variable as a single series addressed by name and
//! global timestep. Reads go through small integer handles.
//!
//! # Architecture
//!
//! ```text
//! Collection::initialize(files, time_dims, time_coordvars)
//!      │
//!      ├─► ReaderFactory::open ──► SimpleReader per path
//!      │     (MemoryStore, or NetCdfFactory with feature "netcdf")
//!      │
//!      ├─► TimeAxis::build ──► Implicit | DeclaredDim | DeclaredDimWithCoordVar
//!      │     (time table keyed by TimeKey, sorted global axis)
//!      │
//!      └─► TimeVaryingVar::insert per file and variable
//!
//! open_read(ts, var) ──► HandlePool ──► read / read_all / read_slice ──► close
//! ```
//!
//! # Example
//!
//! ```
//! use file_collection::{Collection, ElementType, MemoryFile, MemoryStore};
//!
//! let file = |t: f64| {
//!     MemoryFile::new()
//!         .with_dimension("y", 1)
//!         .with_dimension("x", 2)
//!         .with_variable("temp", &["y", "x"], ElementType::Float, vec![t, t + 0.5])
//! };
//! let store = MemoryStore::new()
//!     .with_file("a.nc", file(1.0))
//!     .with_file("b.nc", file(2.0));
//!
//! let mut collection = Collection::new(store);
//! collection.initialize(&["a.nc", "b.nc"], &[], &[]).unwrap();
//! assert_eq!(collection.times(), &[0.0, 1.0]);
//!
//! let handle = collection.open_read(1, "temp").unwrap();
//! let mut values = [0.0f32; 2];
//! collection.read_all(handle, &mut values).unwrap();
//! assert_eq!(values, [2.0, 2.5]);
//! collection.close(handle).unwrap();
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod handles;
pub mod memory;
#[cfg(feature = "netcdf")]
pub mod native;
pub mod reader;
pub mod time_axis;
pub mod variable;

pub use collection::{Collection, CollectionDimension, FailedVariable, SliceStatus, Whence};
pub use config::CollectionConfig;
pub use error::{CollectionError, ReaderError, Result};
pub use handles::HandlePool;
pub use memory::{MemoryFile, MemoryReader, MemoryStore};
#[cfg(feature = "netcdf")]
pub use native::{silence_hdf5_errors, NetCdfFactory, NetCdfReader};
pub use reader::{
    Attribute, AttributeValue, Dimension, ElementType, ReaderFactory, ReaderHandle, ReaderMap, SimpleReader,
    VariableInfo,
};
pub use time_axis::{FileOrganization, TimeAxis, TimeKey, DERIVED_TIME_DIM};
pub use variable::{TimeStepEntry, TimeVaryingVar};
