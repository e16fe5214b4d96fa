//! Sound-velocity profile handling

pub mod svp;

pub use svp::SoundVelocityProfile;
