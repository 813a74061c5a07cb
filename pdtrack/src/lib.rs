use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use track_core::nalgebra::Point3;
use track_core::{CorrespondenceGraph, FrameIndex, PointCloudSequence, PointId};

/// One observed point of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub frame: FrameIndex,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default = "default_quality")]
    pub quality: f64,
}

fn default_quality() -> f64 {
    1.0
}

/// Reads a JSON list of [`PointRecord`]. Points get IDs in the order they are listed.
pub fn read_sequence(reader: impl Read) -> serde_json::Result<PointCloudSequence> {
    let records: Vec<PointRecord> = serde_json::from_reader(reader)?;
    let mut sequence = PointCloudSequence::new();
    for record in records {
        sequence.add(
            record.frame,
            Point3::new(record.x, record.y, record.z),
            record.quality,
        );
    }
    Ok(sequence)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: PointId,
    pub frame: FrameIndex,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: PointId,
    pub target: PointId,
    pub weight: f64,
}

/// A correspondence graph as written to the output file.
///
/// Edges point forward in time and every track lists its points in frame order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub vertices: Vec<VertexRecord>,
    pub edges: Vec<EdgeRecord>,
    pub tracks: Vec<Vec<PointId>>,
}

impl GraphExport {
    pub fn new(graph: &CorrespondenceGraph) -> Self {
        let mut vertices: Vec<VertexRecord> = graph
            .vertices()
            .map(|point| VertexRecord {
                id: point.id,
                frame: point.frame,
                x: point.position.x,
                y: point.position.y,
                z: point.position.z,
            })
            .collect();
        vertices.sort_by_key(|vertex| (vertex.frame, vertex.id));

        let frame_of = |id| graph.point(id).map_or(0, |point| point.frame);
        let mut edges: Vec<EdgeRecord> = graph
            .edges()
            .map(|(a, b, weight)| {
                let (source, target) = if (frame_of(a), a) <= (frame_of(b), b) {
                    (a, b)
                } else {
                    (b, a)
                };
                EdgeRecord {
                    source,
                    target,
                    weight,
                }
            })
            .collect();
        edges.sort_by_key(|edge| (frame_of(edge.source), edge.source, edge.target));

        Self {
            vertices,
            edges,
            tracks: graph.connected_components(),
        }
    }

    pub fn write(&self, writer: impl Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}
