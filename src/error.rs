use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Degenerate geometry: a street polyline needs at least two distinct points")]
    DegenerateGeometry,
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
