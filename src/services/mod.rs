pub mod node_sync;
pub mod wallet;
