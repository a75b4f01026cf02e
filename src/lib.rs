//! route-planner
//!
//! Client-side orchestration for planning a driving route through a handful
//! of addresses: geocoding, ordering by an external solver, and drawing the
//! ordered route with per-leg steps and totals.

pub mod address;
pub mod config;
pub mod directions;
pub mod error;
pub mod geocode;
pub mod haversine;
pub mod map;
pub mod osrm;
pub mod planner;
pub mod polyline;
pub mod route;
pub mod solver;
pub mod traits;
