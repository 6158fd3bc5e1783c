//! Polyhedral face streams.
//!
//! A polyhedron is stored as one flat buffer:
//!
//! ```text
//! nfaces, n0, p, p, .., n1, p, p, .., ...
//! ```
//!
//! The leading face count and every per-face vertex count are *markers*;
//! everything else is a point id. All traversal here is count-driven, so a
//! marker is never mistaken for a point id.

use std::convert::Infallible;
use std::iter::FusedIterator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{GridError, GridResult};

/// Connectivity of a single polyhedral cell.
///
/// # Example
///
/// ```
/// use mesh_ugrid::FaceStream;
///
/// // A tetrahedron as four triangular faces.
/// let stream = FaceStream::from_faces(&[[0_u32, 1, 2], [0, 3, 1], [1, 3, 2], [2, 3, 0]]);
/// assert_eq!(stream.face_count(), 4);
/// assert_eq!(stream.as_slice()[..5], [4, 3, 0, 1, 2]);
/// assert_eq!(stream.point_ids(), vec![0, 1, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u32>", into = "Vec<u32>"))]
pub struct FaceStream {
    data: Vec<u32>,
}

impl FaceStream {
    /// Encode a list of faces, each a list of point ids.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // face and vertex counts fit in u32
    pub fn from_faces<F: AsRef<[u32]>>(faces: &[F]) -> Self {
        let len = 1 + faces.iter().map(|f| f.as_ref().len() + 1).sum::<usize>();
        let mut data = Vec::with_capacity(len);
        data.push(faces.len() as u32);
        for face in faces {
            let face = face.as_ref();
            data.push(face.len() as u32);
            data.extend_from_slice(face);
        }
        Self { data }
    }

    /// Wrap an already encoded buffer, checking that the counts add up.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MalformedFaceStream`] if the buffer has no face
    /// count, contains an empty face, or its length disagrees with the
    /// counts it carries. `[0]` is the valid encoding of zero faces, the
    /// same buffer [`FaceStream::from_faces`] builds from an empty list.
    pub fn from_raw(data: Vec<u32>) -> GridResult<Self> {
        let Some(&face_count) = data.first() else {
            return Err(malformed("empty buffer"));
        };

        let mut pos = 1;
        for face in 0..face_count {
            let Some(&n) = data.get(pos) else {
                return Err(malformed(format!("missing vertex count for face {face}")));
            };
            if n == 0 {
                return Err(malformed(format!("face {face} has no vertices")));
            }
            pos += 1 + n as usize;
            if pos > data.len() {
                return Err(malformed(format!("face {face} runs past the end")));
            }
        }
        if pos != data.len() {
            return Err(malformed(format!(
                "{} trailing values after {face_count} faces",
                data.len() - pos
            )));
        }

        Ok(Self { data })
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.data.first().map_or(0, |&n| n as usize)
    }

    /// Iterate over faces as slices of point ids.
    #[must_use]
    pub fn faces(&self) -> Faces<'_> {
        Faces {
            data: &self.data,
            pos: 1,
            remaining: self.face_count(),
        }
    }

    /// Distinct point ids in order of first appearance.
    #[must_use]
    pub fn point_ids(&self) -> Vec<u32> {
        let mut ids = Vec::new();
        for &id in self.faces().flatten() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Rewrite every point id through `f`, leaving markers untouched.
    pub fn remap_point_ids(&mut self, mut f: impl FnMut(u32) -> u32) {
        let result = self.try_remap_point_ids(|id| Ok::<_, Infallible>(f(id)));
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Rewrite every point id through a fallible `f`.
    ///
    /// Stops at the first error; ids already visited stay rewritten.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `f`.
    pub fn try_remap_point_ids<E>(
        &mut self,
        mut f: impl FnMut(u32) -> Result<u32, E>,
    ) -> Result<(), E> {
        let mut pos = 1;
        for _ in 0..self.face_count() {
            let n = self.data[pos] as usize;
            for id in &mut self.data[pos + 1..=pos + n] {
                *id = f(*id)?;
            }
            pos += 1 + n;
        }
        Ok(())
    }

    /// The raw encoded buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    /// Consume the stream, returning the raw buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<u32> {
        self.data
    }
}

impl TryFrom<Vec<u32>> for FaceStream {
    type Error = GridError;

    fn try_from(data: Vec<u32>) -> GridResult<Self> {
        Self::from_raw(data)
    }
}

impl From<FaceStream> for Vec<u32> {
    fn from(stream: FaceStream) -> Self {
        stream.data
    }
}

fn malformed(reason: impl Into<String>) -> GridError {
    GridError::MalformedFaceStream {
        reason: reason.into(),
    }
}

/// Iterator over the faces of a [`FaceStream`].
#[derive(Debug, Clone)]
pub struct Faces<'a> {
    data: &'a [u32],
    pos: usize,
    remaining: usize,
}

impl<'a> Iterator for Faces<'a> {
    type Item = &'a [u32];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let n = *self.data.get(self.pos)? as usize;
        let face = self.data.get(self.pos + 1..self.pos + 1 + n)?;
        self.pos += 1 + n;
        self.remaining -= 1;
        Some(face)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Faces<'_> {}
impl FusedIterator for Faces<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn pyramid() -> FaceStream {
        FaceStream::from_faces(&[
            vec![0_u32, 1, 2, 3],
            vec![0, 1, 4],
            vec![1, 2, 4],
            vec![2, 3, 4],
            vec![3, 0, 4],
        ])
    }

    #[test]
    fn encodes_counts_before_ids() {
        let stream = pyramid();
        assert_eq!(stream.as_slice()[0], 5);
        assert_eq!(stream.as_slice()[1], 4);
        assert_eq!(stream.as_slice()[6], 3);
        assert_eq!(stream.as_slice().len(), 1 + 5 + 4 + 3 * 4);
    }

    #[test]
    fn faces_round_trip_through_raw() {
        let stream = pyramid();
        let raw = FaceStream::from_raw(stream.as_slice().to_vec());
        assert_eq!(raw, Ok(stream.clone()));
        let faces: Vec<&[u32]> = stream.faces().collect();
        assert_eq!(faces.len(), 5);
        assert_eq!(faces[0], &[0, 1, 2, 3]);
        assert_eq!(faces[4], &[3, 0, 4]);
    }

    #[test]
    fn remap_skips_markers() {
        // Ids equal to the marker values make a marker rewrite visible.
        let mut stream = FaceStream::from_faces(&[[3_u32, 4, 5], [4, 5, 3]]);
        stream.remap_point_ids(|id| id + 100);
        assert_eq!(stream.as_slice(), &[2, 3, 103, 104, 105, 3, 104, 105, 103]);
    }

    #[test]
    fn try_remap_propagates_error() {
        let mut stream = pyramid();
        let result = stream.try_remap_point_ids(|id| if id == 4 { Err(id) } else { Ok(id) });
        assert_eq!(result, Err(4));
    }

    #[test]
    fn point_ids_are_unique() {
        assert_eq!(pyramid().point_ids(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn rejects_malformed_buffers() {
        assert!(FaceStream::from_raw(vec![]).is_err());
        assert!(FaceStream::from_raw(vec![1, 3, 0, 1]).is_err());
        assert!(FaceStream::from_raw(vec![1, 0]).is_err());
        assert!(FaceStream::from_raw(vec![1, 2, 0, 1, 9]).is_err());
        assert!(FaceStream::from_raw(vec![2, 2, 0, 1]).is_err());
        assert!(FaceStream::try_from(vec![1, 3, 0, 1]).is_err());
    }

    #[test]
    fn empty_stream_agrees_across_constructors() {
        let empty: [[u32; 3]; 0] = [];
        let built = FaceStream::from_faces(&empty);
        assert_eq!(built.as_slice(), &[0]);
        assert_eq!(FaceStream::from_raw(vec![0]), Ok(built.clone()));
        assert_eq!(built.face_count(), 0);
        assert_eq!(built.faces().count(), 0);
        assert!(built.point_ids().is_empty());

        let mut remapped = built.clone();
        remapped.remap_point_ids(|id| id + 1);
        assert_eq!(remapped, built);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialization_validates_buffer() {
        let stream = pyramid();
        let json = serde_json::to_string(&stream).unwrap();
        assert!(json.starts_with("[5,4,"));
        let back: FaceStream = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stream);

        // Declares two faces but carries one.
        let truncated: Result<FaceStream, _> = serde_json::from_str("[2,3,0,1,2]");
        assert!(truncated.is_err());
        let empty: Result<FaceStream, _> = serde_json::from_str("[]");
        assert!(empty.is_err());
    }
}
