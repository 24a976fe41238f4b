/// Custom error type for the flowline crate.
#[derive(Debug)]
pub enum FlowError {
    /// Error type from csv crate.
    CsvError(csv::Error),
    /// Malformed row or table in an input file.
    DataFormat(String),
    /// Fourier transform failed inside the precipitation model.
    FftError(String),
    /// A field holds values the geometry cannot be made consistent with.
    InvalidField(String),
    /// Domain bounds or spacing cannot produce a grid.
    InvalidGrid(String),
    /// Model options out of range.
    InvalidOptions(String),
    /// Profile widths must be positive and finite.
    InvalidProfile(String),
    /// Error type from std::io.
    IoError(std::io::Error),
    /// Error type from netcdf crate.
    #[cfg(feature = "netcdf")]
    NetcdfError(netcdf::Error),
    /// Field written to a file built for a different grid.
    ShapeMismatch(String),
    /// Positions of a profile table are not strictly increasing.
    Unsorted(String),
    /// Output format not available in this build.
    Unsupported(String),
}

impl std::error::Error for FlowError {}

impl std::fmt::Display for FlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FlowError::CsvError(e) => write!(f, "Could not read/write csv file: {}", e),
            FlowError::DataFormat(msg) => write!(f, "Malformed input data: {}", msg),
            FlowError::FftError(msg) => write!(f, "Fourier transform failed: {}", msg),
            FlowError::InvalidField(msg) => write!(f, "Invalid field values: {}", msg),
            FlowError::InvalidGrid(msg) => write!(f, "Could not build grid: {}", msg),
            FlowError::InvalidOptions(msg) => write!(f, "Invalid model options: {}", msg),
            FlowError::InvalidProfile(msg) => write!(f, "Invalid profile parameters: {}", msg),
            FlowError::IoError(e) => write!(f, "Could not access file: {}", e),
            #[cfg(feature = "netcdf")]
            FlowError::NetcdfError(e) => write!(f, "Could not read/write netcdf file: {}", e),
            FlowError::ShapeMismatch(msg) => write!(f, "Grid shape mismatch: {}", msg),
            FlowError::Unsorted(msg) => write!(f, "Positions must be strictly increasing: {}", msg),
            FlowError::Unsupported(msg) => write!(f, "Unsupported output: {}", msg),
        }
    }
}

impl From<csv::Error> for FlowError {
    fn from(e: csv::Error) -> Self {
        FlowError::CsvError(e)
    }
}

impl From<std::io::Error> for FlowError {
    fn from(e: std::io::Error) -> Self {
        FlowError::IoError(e)
    }
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for FlowError {
    fn from(e: netcdf::Error) -> Self {
        FlowError::NetcdfError(e)
    }
}
