pub mod hash;
pub mod id_generator;
pub mod password;
pub mod qr;
pub mod token;
