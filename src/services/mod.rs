//! Session services: gateway orchestration, presence broadcast, message relay.

pub mod gateway;
pub mod presence;
pub mod relay;
