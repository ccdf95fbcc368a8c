use crate::core::geometry::embed::Conformer;
use crate::core::io::traits::MolecularFile;
use std::io::{self, Write};
use thiserror::Error;

/// Largest atom or bond count a V2000 counts line can hold.
const V2000_LIMIT: usize = 999;
/// Property entries per `M  CHG` / `M  ISO` line.
const ENTRIES_PER_LINE: usize = 8;

#[derive(Debug, Error)]
pub enum SdfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("V2000 records hold at most {V2000_LIMIT} atoms and bonds (got {atoms} atoms, {bonds} bonds)")]
    TooLarge { atoms: usize, bonds: usize },
    #[error("Conformer has {positions} positions for {atoms} atoms")]
    PositionMismatch { atoms: usize, positions: usize },
}

/// Header lines and SD data items of one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SdfMetadata {
    pub title: String,
    pub program: String,
    pub comment: String,
    /// `> <NAME>` data items written after `M  END`, in order.
    pub data_items: Vec<(String, String)>,
}

/// MDL SD file writer producing a single V2000 molfile record.
pub struct SdfFile;

impl MolecularFile for SdfFile {
    type Metadata = SdfMetadata;
    type Error = SdfError;

    fn write_to(
        conformer: &Conformer,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let mol = &conformer.molecule;
        let (atoms, bonds) = (mol.atom_count(), mol.bond_count());
        if atoms > V2000_LIMIT || bonds > V2000_LIMIT {
            return Err(SdfError::TooLarge { atoms, bonds });
        }
        if conformer.positions.len() != atoms {
            return Err(SdfError::PositionMismatch {
                atoms,
                positions: conformer.positions.len(),
            });
        }

        writeln!(writer, "{}", single_line(&metadata.title))?;
        writeln!(writer, "  {}", single_line(&metadata.program))?;
        writeln!(writer, "{}", single_line(&metadata.comment))?;
        writeln!(
            writer,
            "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
            atoms, bonds
        )?;

        for (atom, pos) in mol.atoms().iter().zip(&conformer.positions) {
            writeln!(
                writer,
                "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
                pos.x,
                pos.y,
                pos.z,
                atom.element.symbol()
            )?;
        }

        for bond in mol.bonds() {
            writeln!(
                writer,
                "{:>3}{:>3}{:>3}  0  0  0  0",
                bond.atom1 + 1,
                bond.atom2 + 1,
                bond.order.ctfile_code()
            )?;
        }

        let charges: Vec<(usize, i32)> = mol
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.formal_charge != 0)
            .map(|(i, a)| (i + 1, a.formal_charge as i32))
            .collect();
        write_property_block(writer, "CHG", &charges)?;

        let isotopes: Vec<(usize, i32)> = mol
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.isotope != 0)
            .map(|(i, a)| (i + 1, a.isotope as i32))
            .collect();
        write_property_block(writer, "ISO", &isotopes)?;

        writeln!(writer, "M  END")?;
        for (name, value) in &metadata.data_items {
            writeln!(writer, "> <{}>", name)?;
            writeln!(writer, "{}", single_line(value))?;
            writeln!(writer)?;
        }
        writeln!(writer, "$$$$")?;
        Ok(())
    }
}

fn write_property_block(
    writer: &mut impl Write,
    tag: &str,
    entries: &[(usize, i32)],
) -> io::Result<()> {
    for chunk in entries.chunks(ENTRIES_PER_LINE) {
        write!(writer, "M  {}{:>3}", tag, chunk.len())?;
        for (atom, value) in chunk {
            write!(writer, " {:>3} {:>3}", atom, value)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Header lines and data values must not break the record layout.
fn single_line(text: &str) -> String {
    text.lines().next().unwrap_or("").chars().take(80).collect()
}
