// Composition root and HTTP surface.
//
// Responsibilities
// - Read config from environment (in main).
// - Instantiate concrete store implementations and wire them into use cases.
// - Map use case error variants to HTTP status codes; nothing else lives here.

pub mod http;
pub mod identity;
pub mod state;
