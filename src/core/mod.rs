//! Engine core: refresh orchestration, pacing, scheduling and the HTTP
//! surface.

pub mod http;
pub mod orchestrator;
pub mod pacer;
pub mod scheduler;
