//! Stream writer - wraps a byte sink and writes primitive records to it.
//!
//! A VPly stream has no header or footer; it is just records back to back.
//! [`VPlyWriter`] adds position and record bookkeeping on top of any
//! [`Write`] sink and a buffered-file constructor.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, trace};

use crate::attribute::Attribute;
use crate::attributed::{AttributedLineStrip, AttributedPoint};
use crate::primitive::{self, Primitive};
use crate::util::Result;
use crate::value::{Float, Matrix4f, Vector3f};

/// Default write buffer for file output.
pub const DEFAULT_BUFFER_CAPACITY: usize = 2 * 1024 * 1024;

/// Sink adapter counting the bytes that reach the inner writer.
struct Counting<W> {
    inner: W,
    pos: u64,
}

impl<W: Write> Write for Counting<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.pos += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Writes primitive records to a sink.
pub struct VPlyWriter<W: Write> {
    out: Counting<W>,
    primitives: u64,
}

impl VPlyWriter<BufWriter<File>> {
    /// Create (or truncate) a file and write to it through a 2MB buffer.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with_capacity(path, DEFAULT_BUFFER_CAPACITY)
    }

    /// Like [`create`](Self::create) with an explicit buffer size.
    pub fn create_with_capacity(path: impl AsRef<Path>, capacity: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        debug!("Created VPly stream: {} (buffer {} bytes)", path.display(), capacity);
        Ok(Self::new(BufWriter::with_capacity(capacity, file)))
    }
}

impl<W: Write> VPlyWriter<W> {
    /// Wrap an existing sink.
    pub fn new(inner: W) -> Self {
        Self {
            out: Counting { inner, pos: 0 },
            primitives: 0,
        }
    }

    /// Bytes written so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.out.pos
    }

    /// Records written so far.
    #[inline]
    pub fn primitive_count(&self) -> u64 {
        self.primitives
    }

    /// Access the inner sink.
    pub fn get_ref(&self) -> &W {
        &self.out.inner
    }

    fn record(&mut self, name: &str, start: u64) {
        self.primitives += 1;
        trace!("{} #{} at {} ({} bytes)", name, self.primitives, start, self.out.pos - start);
    }

    /// Write any primitive.
    pub fn write(&mut self, prim: &Primitive) -> Result<()> {
        let start = self.out.pos;
        prim.write_to(&mut self.out)?;
        self.record(prim.id().name(), start);
        Ok(())
    }

    pub fn write_point(
        &mut self,
        pos: impl Into<Vector3f>,
        attributes: &[Attribute],
    ) -> Result<()> {
        let start = self.out.pos;
        primitive::write_point(&mut self.out, pos, attributes)?;
        self.record("Point", start);
        Ok(())
    }

    pub fn write_line(
        &mut self,
        p1: impl Into<Vector3f>,
        p2: impl Into<Vector3f>,
        attributes: &[Attribute],
    ) -> Result<()> {
        let start = self.out.pos;
        primitive::write_line(&mut self.out, p1, p2, attributes)?;
        self.record("Line", start);
        Ok(())
    }

    pub fn write_sphere(
        &mut self,
        center: impl Into<Vector3f>,
        radius: impl Into<Float>,
        transform: impl Into<Matrix4f>,
        attributes: &[Attribute],
    ) -> Result<()> {
        let start = self.out.pos;
        primitive::write_sphere(&mut self.out, center, radius, transform, attributes)?;
        self.record("Sphere", start);
        Ok(())
    }

    pub fn write_uniform_grid(
        &mut self,
        transform: impl Into<Matrix4f>,
        attributes: &[Attribute],
    ) -> Result<()> {
        let start = self.out.pos;
        primitive::write_uniform_grid(&mut self.out, transform, attributes)?;
        self.record("UniformGrid", start);
        Ok(())
    }

    pub fn write_box(
        &mut self,
        transform: impl Into<Matrix4f>,
        attributes: &[Attribute],
    ) -> Result<()> {
        let start = self.out.pos;
        primitive::write_box(&mut self.out, transform, attributes)?;
        self.record("Box", start);
        Ok(())
    }

    pub fn write_aabb(
        &mut self,
        corner1: impl Into<Vector3f>,
        corner2: impl Into<Vector3f>,
        attributes: &[Attribute],
    ) -> Result<()> {
        let start = self.out.pos;
        primitive::write_aabb(&mut self.out, corner1, corner2, attributes)?;
        self.record("AABB", start);
        Ok(())
    }

    pub fn write_attributed_point(&mut self, point: &AttributedPoint) -> Result<()> {
        let start = self.out.pos;
        point.write_to(&mut self.out)?;
        self.record("Point", start);
        Ok(())
    }

    pub fn write_line_strip(&mut self, strip: &AttributedLineStrip) -> Result<()> {
        let start = self.out.pos;
        strip.write_to(&mut self.out)?;
        self.record("AttributedLineStrip", start);
        Ok(())
    }

    /// Flush and return the inner sink.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        debug!(
            "Finished VPly stream: {} primitives, {} bytes",
            self.primitives, self.out.pos
        );
        Ok(self.out.inner)
    }
}
