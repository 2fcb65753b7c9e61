//! Read handles: hyperslabs, whole variables, slices and seeking.

mod common;

use common::{series_store, series_value, volume_file, FILL, NX, NY};
use file_collection::{Collection, CollectionError, MemoryStore, ReaderError, SliceStatus, Whence};
use test_utils::{files, names};

fn series(nt: usize, time_dims: &[&str]) -> Collection {
    let mut collection = Collection::new(series_store(nt));
    collection.initialize(&files::SERIES, time_dims, &[]).unwrap();
    collection
}

fn volume(nz: usize) -> Collection {
    let store = MemoryStore::new().with_file(files::STATIC, volume_file(nz));
    let mut collection = Collection::new(store);
    collection.initialize(&[files::STATIC], &[], &[]).unwrap();
    collection
}

#[test]
fn test_handle_ids_reuse_smallest_free() {
    let mut collection = series(1, &[names::TIME_DIM]);

    let h0 = collection.open_read(0, names::TEMPERATURE).unwrap();
    let h1 = collection.open_read(1, names::TEMPERATURE).unwrap();
    let h2 = collection.open_read(2, names::TOPOGRAPHY).unwrap();
    assert_eq!((h0, h1, h2), (0, 1, 2));

    collection.close(h1).unwrap();
    assert_eq!(collection.open_handles(), 2);
    assert_eq!(collection.open_read(2, names::TEMPERATURE).unwrap(), 1);
    assert_eq!(collection.open_read(0, names::TOPOGRAPHY).unwrap(), 3);
}

#[test]
fn test_open_read_unknown() {
    let mut collection = series(1, &[names::TIME_DIM]);

    assert!(collection.open_read(0, "absent").unwrap_err().is_not_found());
    assert!(collection.open_read(3, names::TEMPERATURE).unwrap_err().is_not_found());
    assert_eq!(collection.open_handles(), 0);
}

#[test]
fn test_read_selects_record_in_file() {
    let mut collection = series(2, &[names::TIME_DIM]);

    // global timestep 3 is the second record of the second file
    let handle = collection.open_read(3, names::TEMPERATURE).unwrap();
    let mut values = vec![0.0f64; NX * NY];
    collection.read_all(handle, &mut values).unwrap();

    let expected: Vec<f64> = (0..NY)
        .flat_map(|y| (0..NX).map(move |x| series_value(1, 1, y, x)))
        .collect();
    assert_eq!(values, expected);

    let mut window = [0.0f64; 2];
    collection.read(handle, &[1, 1], &[1, 2], &mut window).unwrap();
    assert_eq!(window, [series_value(1, 1, 1, 1), series_value(1, 1, 1, 2)]);
}

#[test]
fn test_read_derived_time_reads_whole_file() {
    let mut collection = series(1, &[]);

    // the synthesized dimension is not a file dimension: no record prefix
    let handle = collection.open_read(2, names::TEMPERATURE).unwrap();
    let mut values = vec![0.0f64; NX * NY];
    collection.read(handle, &[0, 0, 0], &[1, NY, NX], &mut values).unwrap();
    assert_eq!(values[0], series_value(2, 0, 0, 0));
    assert_eq!(values[NX * NY - 1], series_value(2, 0, NY - 1, NX - 1));
}

#[test]
fn test_read_converts_element_type() {
    let mut collection = series(1, &[names::TIME_DIM]);
    let handle = collection.open_read(1, names::TEMPERATURE).unwrap();

    let mut ints = [0i32; NX];
    collection.read(handle, &[1, 0], &[1, NX], &mut ints).unwrap();
    assert_eq!(ints, [1010, 1011, 1012]);

    let mut floats = [0.0f32; NX];
    collection.read(handle, &[0, 0], &[1, NX], &mut floats).unwrap();
    assert_eq!(floats, [1000.0, 1001.0, 1002.0]);
}

#[test]
fn test_read_errors_leave_handle_usable() {
    let mut collection = series(1, &[names::TIME_DIM]);
    let handle = collection.open_read(0, names::TEMPERATURE).unwrap();
    let mut values = vec![0.0f64; NX * NY];

    let err = collection
        .read(handle, &[0, 0], &[NY + 1, NX], &mut vec![0.0f64; (NY + 1) * NX])
        .unwrap_err();
    assert!(matches!(err, CollectionError::Io(ReaderError::Shape(_))));

    let err = collection.read(handle, &[0, 0], &[NY, NX], &mut values[..2]).unwrap_err();
    assert!(matches!(err, CollectionError::Invariant(_)));

    let err = collection.read(handle, &[0], &[NY], &mut values).unwrap_err();
    assert!(matches!(err, CollectionError::Invariant(_)));

    collection.read_all(handle, &mut values).unwrap();
    assert_eq!(values[4], series_value(0, 0, 1, 1));
}

#[test]
fn test_close_unknown_handle() {
    let mut collection = series(1, &[names::TIME_DIM]);
    assert!(collection.close(7).unwrap_err().is_not_found());

    let mut values = [0.0f64; 1];
    assert!(collection.read(7, &[0, 0], &[1, 1], &mut values).unwrap_err().is_not_found());
    assert!(collection.seek_slice(7, 0, Whence::Start).unwrap_err().is_not_found());
}

#[test]
fn test_read_slice_walks_levels() {
    let nz = 4;
    let mut collection = volume(nz);
    let handle = collection.open_read(0, names::SALINITY).unwrap();
    let mut plane = vec![0.0f32; NX * NY];

    for z in 0..nz {
        assert_eq!(collection.read_slice(handle, &mut plane).unwrap(), SliceStatus::Read);
        assert_eq!(plane[0], (100 * z) as f32);
        assert_eq!(plane[NX * NY - 1], (100 * z + 10 * (NY - 1) + NX - 1) as f32);
    }
    assert_eq!(collection.read_slice(handle, &mut plane).unwrap(), SliceStatus::Exhausted);
    assert_eq!(collection.slice_position(handle).unwrap(), nz);
}

#[test]
fn test_seek_slice_clamps() {
    let nz = 4;
    let mut collection = volume(nz);
    let handle = collection.open_read(0, names::SALINITY).unwrap();
    let mut plane = vec![0.0f64; NX * NY];

    collection.seek_slice(handle, 0, Whence::End).unwrap();
    assert_eq!(collection.slice_position(handle).unwrap(), nz - 1);
    collection.read_slice(handle, &mut plane).unwrap();
    assert_eq!(plane[0], 300.0);

    collection.seek_slice(handle, -10, Whence::Current).unwrap();
    assert_eq!(collection.slice_position(handle).unwrap(), 0);

    collection.seek_slice(handle, 2, Whence::Start).unwrap();
    collection.seek_slice(handle, 1, Whence::Current).unwrap();
    assert_eq!(collection.slice_position(handle).unwrap(), 3);

    collection.seek_slice(handle, 99, Whence::Start).unwrap();
    assert_eq!(collection.slice_position(handle).unwrap(), nz - 1);

    collection.seek_slice(handle, -2, Whence::try_from(2).unwrap()).unwrap();
    assert_eq!(collection.slice_position(handle).unwrap(), 1);
}

#[test]
fn test_read_slice_of_plane() {
    let mut collection = series(1, &[names::TIME_DIM]);
    let handle = collection.open_read(2, names::TEMPERATURE).unwrap();
    let mut plane = vec![0.0f64; NX * NY];

    assert_eq!(collection.read_slice(handle, &mut plane).unwrap(), SliceStatus::Read);
    assert_eq!(plane[NX], series_value(2, 0, 1, 0));
    assert_eq!(collection.read_slice(handle, &mut plane).unwrap(), SliceStatus::Exhausted);

    // a plane has a single slice to seek to
    collection.seek_slice(handle, 5, Whence::Start).unwrap();
    assert_eq!(collection.slice_position(handle).unwrap(), 0);
    assert_eq!(collection.read_slice(handle, &mut plane).unwrap(), SliceStatus::Read);
}

#[test]
fn test_failed_slice_does_not_advance() {
    let mut collection = volume(3);
    let handle = collection.open_read(0, names::SALINITY).unwrap();

    let mut short = vec![0.0f64; NX];
    assert!(collection.read_slice(handle, &mut short).is_err());
    assert_eq!(collection.slice_position(handle).unwrap(), 0);

    let mut plane = vec![0.0f64; NX * NY];
    collection.read_slice(handle, &mut plane).unwrap();
    assert_eq!(plane[0], 0.0);
}

#[test]
fn test_slice_requires_planes() {
    let mut store = series_store(1);
    store.insert(
        files::SERIES[0],
        common::series_file(0, 1).with_variable(
            names::SALINITY,
            &[names::X_DIM],
            file_collection::ElementType::Float,
            vec![1.0; NX],
        ),
    );
    let mut collection = Collection::new(store);
    collection.initialize(&files::SERIES, &[names::TIME_DIM], &[]).unwrap();

    let handle = collection.open_read(0, names::SALINITY).unwrap();
    let mut values = vec![0.0f64; NX];
    assert!(matches!(
        collection.read_slice(handle, &mut values),
        Err(CollectionError::Invariant(_))
    ));
    collection.read_all(handle, &mut values).unwrap();
    assert_eq!(values, vec![1.0; NX]);
}

#[test]
fn test_handle_missing_value() {
    let mut collection = series(1, &[names::TIME_DIM]);
    collection.set_missing_value_attribute(names::MISSING_VALUE_ATTR);

    let temp = collection.open_read(0, names::TEMPERATURE).unwrap();
    let topo = collection.open_read(0, names::TOPOGRAPHY).unwrap();
    assert_eq!(collection.handle_missing_value(temp).unwrap(), Some(FILL));
    assert_eq!(collection.handle_missing_value(topo).unwrap(), None);
}

#[test]
fn test_reinitialize_drops_handles() {
    let mut collection = series(1, &[names::TIME_DIM]);
    let handle = collection.open_read(0, names::TEMPERATURE).unwrap();

    collection.initialize(&files::SERIES, &[], &[]).unwrap();
    assert_eq!(collection.open_handles(), 0);
    let mut values = [0.0f64; 1];
    assert!(collection.read(handle, &[0, 0, 0], &[1, 1, 1], &mut values).is_err());
}
