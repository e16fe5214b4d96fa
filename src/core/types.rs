//! Core data types for the ray-tracing core

use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::core::constants::D2R;

/// A single acoustic pulse as measured by the sounder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ping {
    /// Round-trip travel time from transducer to seabed and back (seconds)
    pub two_way_travel_time: f64,
    /// Sound speed at the transducer face (m/s)
    pub surface_sound_speed: f64,
    /// Transducer depth below the water surface (meters)
    pub transducer_depth: f64,
    /// Beam angle along the vessel track in the sonar frame (radians)
    pub along_track_angle: f64,
    /// Beam angle across the vessel track in the sonar frame (radians)
    pub across_track_angle: f64,
}

impl Ping {
    pub fn new(
        two_way_travel_time: f64,
        surface_sound_speed: f64,
        transducer_depth: f64,
        along_track_angle: f64,
        across_track_angle: f64,
    ) -> Self {
        Self {
            two_way_travel_time,
            surface_sound_speed,
            transducer_depth,
            along_track_angle,
            across_track_angle,
        }
    }

    /// One-way travel time from transducer to seabed (seconds)
    pub fn one_way_travel_time(&self) -> f64 {
        self.two_way_travel_time / 2.0
    }
}

/// (Δrange, Δdepth) contributed by one traversed layer (meters)
pub type RaySegment = Vector2<f64>;

/// Result of a planar ray trace: the ray endpoint in the vertical plane
/// plus its per-layer decomposition in integration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanarRay {
    /// Ray endpoint as (horizontal range, depth) from the transducer (meters)
    pub point: Vector2<f64>,
    /// Ray segments contributed by each traversed layer
    pub layer_rays: Vec<RaySegment>,
    /// Travel time spent in each traversed layer (seconds)
    pub layer_travel_times: Vec<f64>,
}

/// Geodetic position with precomputed latitude/longitude trigonometry.
///
/// The sine and cosine of both angles are cached at construction and
/// refreshed by the setters, so downstream geodetic transforms never
/// recompute them per sounding.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    timestamp_us: u64,
    latitude: f64,
    longitude: f64,
    ellipsoidal_height: f64,
    slat: f64,
    clat: f64,
    slon: f64,
    clon: f64,
}

impl Position {
    /// Create a position from a micro-epoch timestamp, latitude and
    /// longitude in decimal degrees, and ellipsoidal height in meters.
    pub fn new(timestamp_us: u64, latitude: f64, longitude: f64, ellipsoidal_height: f64) -> Self {
        Self {
            timestamp_us,
            latitude,
            longitude,
            ellipsoidal_height,
            slat: (latitude * D2R).sin(),
            clat: (latitude * D2R).cos(),
            slon: (longitude * D2R).sin(),
            clon: (longitude * D2R).cos(),
        }
    }

    pub fn timestamp_us(&self) -> u64 {
        self.timestamp_us
    }

    pub fn set_timestamp_us(&mut self, timestamp_us: u64) {
        self.timestamp_us = timestamp_us;
    }

    /// Latitude in decimal degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn set_latitude(&mut self, latitude: f64) {
        self.latitude = latitude;
        self.slat = (latitude * D2R).sin();
        self.clat = (latitude * D2R).cos();
    }

    /// Longitude in decimal degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn set_longitude(&mut self, longitude: f64) {
        self.longitude = longitude;
        self.slon = (longitude * D2R).sin();
        self.clon = (longitude * D2R).cos();
    }

    /// Ellipsoidal height in meters
    pub fn ellipsoidal_height(&self) -> f64 {
        self.ellipsoidal_height
    }

    pub fn set_ellipsoidal_height(&mut self, ellipsoidal_height: f64) {
        self.ellipsoidal_height = ellipsoidal_height;
    }

    /// Cached sine of the latitude
    pub fn slat(&self) -> f64 {
        self.slat
    }

    /// Cached cosine of the latitude
    pub fn clat(&self) -> f64 {
        self.clat
    }

    /// Cached sine of the longitude
    pub fn slon(&self) -> f64 {
        self.slon
    }

    /// Cached cosine of the longitude
    pub fn clon(&self) -> f64 {
        self.clon
    }

    /// Order a batch of positions by acquisition time
    pub fn sort_by_timestamp(positions: &mut [Position]) {
        positions.sort_by_key(|p| p.timestamp_us);
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "( {} , {} , {} )",
            self.latitude, self.longitude, self.ellipsoidal_height
        )
    }
}
