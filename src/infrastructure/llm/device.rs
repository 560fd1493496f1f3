use candle_core::{DType, Device};

/// Metal when available, otherwise CPU.
pub fn select_device() -> Device {
    Device::new_metal(0).unwrap_or(Device::Cpu)
}

pub fn select_dtype(device: &Device) -> DType {
    if device.is_cpu() {
        DType::F32
    } else {
        DType::F16
    }
}
