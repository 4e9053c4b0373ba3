use std::io::{
    BufWriter,
    Write,
};
use std::path::Path;

use log::{
    debug,
    info,
};
use ndarray::{
    Array2,
    ArrayView2,
};
use ndarray_npy::{
    ReadNpyError,
    ReadNpyExt,
    WriteNpyExt,
};

use super::staged::StagedFile;
use crate::error::{
    NetError,
    Result,
};

type Decoder = fn(&[u8]) -> std::result::Result<Array2<f64>, ReadNpyError>;

/// Reads a 2-D numeric `.npy` file as `f64`.
///
/// Float and integer payloads of any width are accepted.
/// Fails with [`NetError::Storage`] when the file is missing or its payload
/// is not a 2-D numeric array, and with [`NetError::InvalidInput`] when the
/// matrix is empty or holds non-finite values.
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| NetError::storage(path, e))?;
    let matrix = decode(&bytes).map_err(|e| NetError::storage(path, e))?;

    info!(
        "Loaded {} ({} samples x {} features)",
        path.display(),
        matrix.nrows(),
        matrix.ncols()
    );
    validate(&matrix, path)?;
    Ok(matrix)
}

/// Tries each supported element type in turn, widening the first match to
/// `f64`.
fn decode(bytes: &[u8]) -> std::result::Result<Array2<f64>, ReadNpyError> {
    let decoders: [Decoder; 10] = [
        |b| Array2::<f64>::read_npy(b),
        |b| Array2::<f32>::read_npy(b).map(|m| m.mapv(f64::from)),
        |b| Array2::<i64>::read_npy(b).map(|m| m.mapv(|v| v as f64)),
        |b| Array2::<i32>::read_npy(b).map(|m| m.mapv(f64::from)),
        |b| Array2::<i16>::read_npy(b).map(|m| m.mapv(f64::from)),
        |b| Array2::<i8>::read_npy(b).map(|m| m.mapv(f64::from)),
        |b| Array2::<u64>::read_npy(b).map(|m| m.mapv(|v| v as f64)),
        |b| Array2::<u32>::read_npy(b).map(|m| m.mapv(f64::from)),
        |b| Array2::<u16>::read_npy(b).map(|m| m.mapv(f64::from)),
        |b| Array2::<u8>::read_npy(b).map(|m| m.mapv(f64::from)),
    ];

    let mut mismatch = None;
    for decoder in decoders {
        match decoder(bytes) {
            Ok(matrix) => return Ok(matrix),
            Err(err @ ReadNpyError::WrongDescriptor(_)) => mismatch = Some(err),
            Err(err) => return Err(err),
        }
    }
    match mismatch {
        Some(err) => Err(err),
        None => Err(ReadNpyError::MissingData),
    }
}

fn validate(
    matrix: &Array2<f64>,
    path: &Path,
) -> Result<()> {
    if matrix.is_empty() {
        return Err(NetError::InvalidInput(format!(
            "{} holds an empty matrix ({}x{})",
            path.display(),
            matrix.nrows(),
            matrix.ncols()
        )));
    }
    if let Some(((row, col), value)) = matrix
        .indexed_iter()
        .find(|(_, value)| !value.is_finite())
    {
        return Err(NetError::InvalidInput(format!(
            "{} has a non-finite value {} at row {}, column {}",
            path.display(),
            value,
            row,
            col
        )));
    }
    Ok(())
}

/// Serializes `matrix` into a [`StagedFile`] for `path` without touching
/// `path` itself.
pub fn stage_matrix<P: AsRef<Path>>(
    matrix: ArrayView2<'_, f64>,
    path: P,
) -> Result<StagedFile> {
    let path = path.as_ref();
    let mut staged = StagedFile::new(path)?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        matrix
            .write_npy(&mut writer)
            .map_err(|e| NetError::storage(path, e))?;
        writer.flush().map_err(|e| NetError::storage(path, e))?;
    }
    debug!(
        "Staged {}x{} matrix for {}",
        matrix.nrows(),
        matrix.ncols(),
        path.display()
    );
    Ok(staged)
}

/// Writes `matrix` as `.npy`, replacing any existing file at `path`.
///
/// The payload goes to a temporary file next to the destination which is
/// then renamed over it, so readers never observe a half-written file.
pub fn save_matrix<P: AsRef<Path>>(
    matrix: ArrayView2<'_, f64>,
    path: P,
) -> Result<()> {
    stage_matrix(matrix, path)?.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use assert_approx_eq::assert_approx_eq;
    use ndarray::array;
    use tempfile::tempdir;

    use super::*;

    /// Version 1.0 `.npy` bytes with an arbitrary descriptor.
    fn raw_npy(
        descr: &str,
        shape: (usize, usize),
        data: &[u8],
    ) -> Vec<u8> {
        let mut header = format!(
            "{{'descr': '{}', 'fortran_order': False, 'shape': ({}, {}), }}",
            descr, shape.0, shape.1
        );
        let unpadded = 10 + header.len() + 1;
        header.push_str(&" ".repeat((64 - unpadded % 64) % 64));
        header.push('\n');

        let mut bytes = b"\x93NUMPY\x01\x00".to_vec();
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(data);
        bytes
    }

    #[test]
    fn round_trip() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("m.npy");
        let original = array![[1.5, -2.0, 3.25], [0.0, 1e-12, 7.0]];

        save_matrix(original.view(), &path)?;
        let loaded = load_matrix(&path)?;

        assert_eq!(loaded.dim(), original.dim());
        for (a, b) in loaded.iter().zip(original.iter()) {
            assert_approx_eq!(*a, *b);
        }
        Ok(())
    }

    #[test]
    fn overwrites_existing_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("m.npy");
        save_matrix(array![[1.0, 2.0]].view(), &path)?;
        save_matrix(array![[3.0], [4.0], [5.0]].view(), &path)?;

        assert_eq!(load_matrix(&path)?, array![[3.0], [4.0], [5.0]]);
        Ok(())
    }

    #[test]
    fn missing_file_is_storage_error() {
        let err = load_matrix("definitely/not/here.npy").unwrap_err();
        assert!(matches!(err, NetError::Storage { .. }));
    }

    #[test]
    fn garbage_payload_is_storage_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bad.npy");
        std::fs::write(&path, b"this is not an npy file")?;

        let err = load_matrix(&path).unwrap_err();
        assert!(matches!(err, NetError::Storage { .. }));
        Ok(())
    }

    #[test]
    fn wrong_dimensionality_is_storage_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("vec.npy");
        let file = File::create(&path)?;
        array![1.0, 2.0, 3.0].write_npy(BufWriter::new(file))?;

        let err = load_matrix(&path).unwrap_err();
        assert!(matches!(err, NetError::Storage { .. }));
        Ok(())
    }

    #[test]
    fn float32_payload_is_widened() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("f4.npy");
        let single = array![[1.5f32, -2.25], [0.1, 4.0], [8.0, 0.0]];
        single.write_npy(BufWriter::new(File::create(&path)?))?;

        let loaded = load_matrix(&path)?;
        assert_eq!(loaded.dim(), (3, 2));
        for (a, b) in loaded.iter().zip(single.iter()) {
            assert_eq!(*a, f64::from(*b));
        }
        Ok(())
    }

    #[test]
    fn integer_payload_is_widened() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ints.npy");
        array![[1i64, -2], [3, 40]].write_npy(BufWriter::new(File::create(&path)?))?;

        assert_eq!(load_matrix(&path)?, array![[1.0, -2.0], [3.0, 40.0]]);
        Ok(())
    }

    #[test]
    fn unsupported_dtype_is_storage_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bool.npy");
        std::fs::write(&path, raw_npy("|b1", (1, 2), &[1, 0]))?;

        let err = load_matrix(&path).unwrap_err();
        assert!(matches!(err, NetError::Storage { .. }));
        Ok(())
    }

    #[test]
    fn staged_matrix_waits_for_commit() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("m.npy");
        let staged = stage_matrix(array![[1.0, 2.0]].view(), &path)?;
        assert!(!path.exists());

        staged.commit()?;
        assert_eq!(load_matrix(&path)?, array![[1.0, 2.0]]);
        Ok(())
    }

    #[test]
    fn non_finite_values_rejected() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nan.npy");
        save_matrix(array![[1.0, f64::NAN], [2.0, 3.0]].view(), &path)?;

        let err = load_matrix(&path).unwrap_err();
        assert!(matches!(err, NetError::InvalidInput(_)));
        Ok(())
    }
}
