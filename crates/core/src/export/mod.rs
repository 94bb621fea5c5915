//! STL serialisation of tessellated sculptures.

use std::io::Write;

use glam::DVec3;

use crate::error::Result;
use crate::solid::Mesh;

/// Writes the mesh in the 50-bytes-per-facet binary STL layout, carrying
/// `name` in the 80-byte header.
pub fn write_binary_stl<W: Write>(mesh: &Mesh, name: &str, writer: &mut W) -> Result<()> {
    let mut header = [0u8; 80];
    let label = name.as_bytes();
    let len = label.len().min(header.len());
    header[..len].copy_from_slice(&label[..len]);
    writer.write_all(&header)?;
    writer.write_all(&(mesh.triangles.len() as u32).to_le_bytes())?;
    for triangle in &mesh.triangles {
        let (a, b, c) = corners(mesh, triangle);
        for vector in [triangle_normal(a, b, c), a, b, c] {
            for component in [vector.x, vector.y, vector.z] {
                writer.write_all(&(component as f32).to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

/// Writes the mesh as ASCII STL under the given solid name. Slower and far
/// larger than the binary layout, but readable in a text editor.
pub fn write_ascii_stl<W: Write>(mesh: &Mesh, name: &str, writer: &mut W) -> Result<()> {
    writeln!(writer, "solid {name}")?;
    for triangle in &mesh.triangles {
        let (a, b, c) = corners(mesh, triangle);
        let n = triangle_normal(a, b, c);
        writeln!(
            writer,
            "  facet normal {} {} {}",
            n.x as f32, n.y as f32, n.z as f32
        )?;
        writeln!(writer, "    outer loop")?;
        for v in [a, b, c] {
            writeln!(
                writer,
                "      vertex {} {} {}",
                v.x as f32, v.y as f32, v.z as f32
            )?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;
    Ok(())
}

fn corners(mesh: &Mesh, triangle: &[u32; 3]) -> (DVec3, DVec3, DVec3) {
    (
        mesh.vertices[triangle[0] as usize],
        mesh.vertices[triangle[1] as usize],
        mesh.vertices[triangle[2] as usize],
    )
}

fn triangle_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    (b - a).cross(c - a).normalize_or_zero()
}
