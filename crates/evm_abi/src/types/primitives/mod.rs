pub mod address;
pub mod bool;
pub mod bytes;
pub mod fixed_bytes;
pub mod int;
pub mod string;
pub mod uint;
