use twiddle::{server::Dummy, DriverError};

/// A dummy main function for `twiddle`.
/// Hardware is substituted for dummy values so that the driver can be exercised on non-production
/// hardware.
///
/// # Arguments
///
/// The first argument to this executable (via `std::env::args`) is the path to a configuration JSON
/// file.
///
/// The second argument to this executable is a path to a directory where log files should be
/// created.
/// If the directory does not exist, it will be created.
fn main() -> Result<(), DriverError> {
    twiddle::server::run::<Dummy>()
}
