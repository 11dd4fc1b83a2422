pub mod config;
pub mod cpu;
pub mod decode;
pub mod error;

pub use config::{DEFAULT_INPUT_SIZE, TensorLayout};
pub use cpu::CpuPreProcessor;
pub use decode::decode_image;
pub use error::ImageError;
