//! The `RecordWriter` trait implemented by backend writers.

use crate::record::{ConnectionRecord, ElevationRecord, GeometryRecord, LaneRecord, RoadRecord, UnitRecords};
use crate::OutputResult;

pub trait RecordWriter {
    fn write_roads(&mut self, rows: &[RoadRecord]) -> OutputResult<()>;

    fn write_geometry(&mut self, rows: &[GeometryRecord]) -> OutputResult<()>;

    fn write_elevation(&mut self, rows: &[ElevationRecord]) -> OutputResult<()>;

    fn write_lanes(&mut self, rows: &[LaneRecord]) -> OutputResult<()>;

    fn write_connections(&mut self, rows: &[ConnectionRecord]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;

    /// Check references, then write every record kind.
    fn write_records(&mut self, records: &UnitRecords) -> OutputResult<()> {
        records.check_references()?;
        self.write_roads(&records.roads)?;
        self.write_geometry(&records.geometry)?;
        self.write_elevation(&records.elevation)?;
        self.write_lanes(&records.lanes)?;
        self.write_connections(&records.connections)
    }
}
