use crate::core::geometry::embed::Conformer;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Defines the interface for serializing a 3D conformer into a file format.
///
/// Implementors handle format-specific layout; path and in-memory variants
/// are provided on top of [`MolecularFile::write_to`].
pub trait MolecularFile {
    /// The type of metadata written alongside the coordinates.
    type Metadata;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Writes a conformer and its metadata to a writer.
    ///
    /// # Arguments
    ///
    /// * `conformer` - The explicit-hydrogen conformer to write.
    /// * `metadata` - The metadata to include in the output.
    /// * `writer` - The writer to output to.
    ///
    /// # Return
    ///
    /// Returns `Ok(())` on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the conformer cannot be represented in the format
    /// or writing fails.
    fn write_to(
        conformer: &Conformer,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a conformer and metadata to a file path.
    ///
    /// # Arguments
    ///
    /// * `conformer` - The conformer to write.
    /// * `metadata` - The metadata to include in the output.
    /// * `path` - The path to the file to write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        conformer: &Conformer,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(conformer, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Serializes a conformer into an in-memory string.
    ///
    /// # Errors
    ///
    /// Returns an error if the conformer cannot be represented in the format.
    fn write_to_string(
        conformer: &Conformer,
        metadata: &Self::Metadata,
    ) -> Result<String, Self::Error> {
        let mut buffer = Vec::new();
        Self::write_to(conformer, metadata, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
