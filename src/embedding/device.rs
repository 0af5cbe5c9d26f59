use candle_core::Device;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::{info, warn};

#[cfg(not(any(feature = "metal", feature = "cuda")))]
use tracing::debug;

/// Picks the compute device for `component` (falls back to CPU, never fails).
pub fn select_device(component: &'static str) -> Device {
    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!(component, "Using Metal GPU acceleration");
                return device;
            }
            Err(e) => {
                warn!(component, error = %e, "Metal device unavailable");
            }
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!(component, "Using CUDA GPU acceleration");
                return device;
            }
            Err(e) => {
                warn!(component, error = %e, "CUDA device unavailable");
            }
        }
    }

    #[cfg(any(feature = "metal", feature = "cuda"))]
    warn!(component, "Falling back to CPU device");

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    debug!(component, "No GPU backend compiled, using CPU");

    Device::Cpu
}
