// Adapters layer: concrete implementations of the domain ports for external
// systems. Storage backends live with their configuration under src/config.

pub mod twitter;
