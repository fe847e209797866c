use anyhow::{Context, Result};
use physarum_core::Field;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encode the field as a binary greyscale PGM, one pixel per cell.
/// Values saturate at 1.0; row 0 of the image is the top of the world.
pub fn encode_pgm<W: Write>(field: &Field, out: &mut W) -> std::io::Result<()> {
    let (columns, rows) = (field.columns(), field.rows());
    write!(out, "P5\n{columns} {rows}\n255\n")?;
    let mut line = vec![0u8; columns];
    for iy in (0..rows).rev() {
        let row = &field.values()[iy * columns..(iy + 1) * columns];
        for (px, &v) in line.iter_mut().zip(row) {
            *px = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        out.write_all(&line)?;
    }
    Ok(())
}

pub fn write_pgm(field: &Field, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create snapshot {}", path.display()))?;
    let mut out = BufWriter::new(file);
    encode_pgm(field, &mut out)
        .and_then(|_| out.flush())
        .with_context(|| format!("failed to write snapshot {}", path.display()))
}
